//! Client configuration
//!
//! All knobs have defaults matching what real servers tolerate; a YAML
//! document only needs to list the values it overrides:
//!
//! ```yaml
//! icecast_timeout_ms: 3000
//! icecast_content_types:
//!   - text/xml
//!   - application/json
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// User-Agent sent to SHOUTcast v1 servers; some answer 403 to anything
/// that does not look like a desktop browser.
pub const DEFAULT_V1_USER_AGENT: &str =
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.13) Gecko/20080311 Firefox/2.0.0.13";

/// Default User-Agent for every other request
pub const DEFAULT_USER_AGENT: &str = concat!("pmostreaminfo/", env!("CARGO_PKG_VERSION"));

/// Timeout for the SHOUTcast v2 `/statistics` request
pub const DEFAULT_SHOUTCAST_V2_TIMEOUT_MS: u64 = 1500;

/// Timeout for the Icecast `/status-json.xsl` request
pub const DEFAULT_ICECAST_TIMEOUT_MS: u64 = 1500;

/// Timeout for reading in-band metadata from the stream itself
pub const DEFAULT_ICY_TIMEOUT_MS: u64 = 10_000;

/// Bytes of audio we are willing to read while waiting for a StreamTitle
pub const DEFAULT_ICY_MAX_BYTES: usize = 256 * 1024;

/// Settings for [`StreamInfoClient`](crate::StreamInfoClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamInfoConfig {
    /// User-Agent for status pages and ICY streams
    pub user_agent: String,
    /// User-Agent for the SHOUTcast v1 `/7.html` page
    pub v1_user_agent: String,
    /// SHOUTcast v1 timeout; `None` keeps the transport default
    pub shoutcast_v1_timeout_ms: Option<u64>,
    pub shoutcast_v2_timeout_ms: u64,
    pub icecast_timeout_ms: u64,
    pub icy_timeout_ms: u64,
    pub icy_max_bytes: usize,
    /// Content types accepted for the Icecast status document.
    ///
    /// Historically only `text/xml`, even though the body is JSON.
    pub icecast_content_types: Vec<String>,
}

impl Default for StreamInfoConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            v1_user_agent: DEFAULT_V1_USER_AGENT.to_string(),
            shoutcast_v1_timeout_ms: None,
            shoutcast_v2_timeout_ms: DEFAULT_SHOUTCAST_V2_TIMEOUT_MS,
            icecast_timeout_ms: DEFAULT_ICECAST_TIMEOUT_MS,
            icy_timeout_ms: DEFAULT_ICY_TIMEOUT_MS,
            icy_max_bytes: DEFAULT_ICY_MAX_BYTES,
            icecast_content_types: vec!["text/xml".to_string()],
        }
    }
}

impl StreamInfoConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded stream info config from {}", path.as_ref().display());
        Self::from_yaml_str(&content)
    }

    pub fn shoutcast_v1_timeout(&self) -> Option<Duration> {
        self.shoutcast_v1_timeout_ms.map(Duration::from_millis)
    }

    pub fn shoutcast_v2_timeout(&self) -> Duration {
        Duration::from_millis(self.shoutcast_v2_timeout_ms)
    }

    pub fn icecast_timeout(&self) -> Duration {
        Duration::from_millis(self.icecast_timeout_ms)
    }

    pub fn icy_timeout(&self) -> Duration {
        Duration::from_millis(self.icy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = StreamInfoConfig::default();
        assert_eq!(config.shoutcast_v1_timeout(), None);
        assert_eq!(config.shoutcast_v2_timeout(), Duration::from_millis(1500));
        assert_eq!(config.icecast_timeout(), Duration::from_millis(1500));
        assert_eq!(config.icecast_content_types, vec!["text/xml"]);
        assert!(config.v1_user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_partial_yaml() {
        let config = StreamInfoConfig::from_yaml_str(
            "icecast_timeout_ms: 3000\nicecast_content_types: [text/xml, application/json]\n",
        )
        .unwrap();
        assert_eq!(config.icecast_timeout(), Duration::from_secs(3));
        assert_eq!(config.icecast_content_types.len(), 2);
        assert_eq!(config.shoutcast_v2_timeout_ms, DEFAULT_SHOUTCAST_V2_TIMEOUT_MS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = StreamInfoConfig::from_yaml_str("icy_max_bytes: lots").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_file() {
        let err = StreamInfoConfig::from_file("/nonexistent/pmostreaminfo.yaml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
