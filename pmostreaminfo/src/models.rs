//! Data models for stream metadata
//!
//! A [`Station`] is the normalized result of any of the supported dialects;
//! [`StreamSource`] tags which dialect produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Stream source
// ============================================================================

/// Metadata dialect spoken by a streaming server
///
/// Used both as the `fetchsource` tag of a [`Station`] and as the optional
/// hint given to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamSource {
    /// SHOUTcast v1 `/7.html` page
    ShoutcastV1,
    /// SHOUTcast v2 `/statistics` XML document
    ShoutcastV2,
    /// Icecast `/status-json.xsl` document
    Icecast,
    /// In-band ICY metadata read from the audio stream itself
    Stream,
}

impl StreamSource {
    /// All sources, in no particular order
    pub const ALL: [StreamSource; 4] = [
        StreamSource::ShoutcastV1,
        StreamSource::ShoutcastV2,
        StreamSource::Icecast,
        StreamSource::Stream,
    ];

    /// Wire identifier (`SHOUTCAST_V1`, `ICECAST`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShoutcastV1 => "SHOUTCAST_V1",
            Self::ShoutcastV2 => "SHOUTCAST_V2",
            Self::Icecast => "ICECAST",
            Self::Stream => "STREAM",
        }
    }
}

impl fmt::Display for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four wire identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStreamSource(pub String);

impl fmt::Display for UnknownStreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stream source: {}", self.0)
    }
}

impl std::error::Error for UnknownStreamSource {}

impl FromStr for StreamSource {
    type Err = UnknownStreamSource;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StreamSource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| UnknownStreamSource(s.to_string()))
    }
}

// ============================================================================
// Station
// ============================================================================

/// A listener count or bitrate, kept the way the server reported it
///
/// SHOUTcast pages report text, Icecast JSON usually reports numbers.
/// Values are not coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(u64),
    Text(String),
}

impl StatValue {
    /// Numeric value, parsing text if needed
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for StatValue {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StatValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Current state of a radio station
///
/// Only built by a parser once the title has been confirmed present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Current listener count, when the source reports one
    pub listeners: Option<StatValue>,
    /// Stream bitrate, when the source reports one
    pub bitrate: Option<StatValue>,
    /// Normalized current track title
    pub title: String,
    /// Station name, only known for raw ICY streams (`icy-name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dialect that produced this record
    pub fetchsource: StreamSource,
}

impl Station {
    /// Split the title on the first ` - ` into `(artist, title)`
    pub fn artist_and_title(&self) -> (Option<&str>, &str) {
        match self.title.split_once(" - ") {
            Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
                (Some(artist.trim()), title.trim())
            }
            _ => (None, self.title.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_source_round_trip() {
        for source in StreamSource::ALL {
            assert_eq!(source.as_str().parse::<StreamSource>(), Ok(source));
        }
        assert!("shoutcast_v1".parse::<StreamSource>().is_err());
        assert!("".parse::<StreamSource>().is_err());
    }

    #[test]
    fn test_stream_source_serde() {
        let json = serde_json::to_string(&StreamSource::ShoutcastV2).unwrap();
        assert_eq!(json, "\"SHOUTCAST_V2\"");
    }

    #[test]
    fn test_stat_value_untagged() {
        let n: StatValue = serde_json::from_str("128").unwrap();
        let s: StatValue = serde_json::from_str("\"128\"").unwrap();
        assert_eq!(n, StatValue::Number(128));
        assert_eq!(s, StatValue::Text("128".into()));
        assert_eq!(n.as_u64(), s.as_u64());
        assert_eq!(s.to_string(), "128");
    }

    #[test]
    fn test_artist_and_title() {
        let station = Station {
            listeners: None,
            bitrate: None,
            title: "Miles Davis - So What".into(),
            name: None,
            fetchsource: StreamSource::Stream,
        };
        assert_eq!(station.artist_and_title(), (Some("Miles Davis"), "So What"));

        let station = Station {
            title: "Station ID".into(),
            ..station
        };
        assert_eq!(station.artist_and_title(), (None, "Station ID"));
    }
}
