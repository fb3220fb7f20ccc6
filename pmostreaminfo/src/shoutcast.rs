//! SHOUTcast v1 and v2 metadata
//!
//! - **v1** serves `/7.html`, a tiny HTML page whose body is a CSV line:
//!   `listeners,status,peak,max,unique,bitrate,title`.
//! - **v2** serves `/statistics`, an XML document with one `STREAM` entry
//!   per mount point.

use crate::client::{server_url, StreamInfoClient};
use crate::error::{Error, Result};
use crate::models::{StatValue, Station, StreamSource};
use crate::title::normalize_title;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use url::Url;

/// Number of CSV fields on a v1 page when the title has no comma
const V1_FIELD_COUNT: usize = 7;

static V1_BODY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body>(.*)</body>").expect("valid v1 body regex"));

// ============================================================================
// Fetchers
// ============================================================================

impl StreamInfoClient {
    /// Fetch station information from a SHOUTcast v1 `/7.html` page
    pub async fn shoutcast_v1_station(&self, url: &str) -> Result<Station> {
        let page_url = Url::parse(&format!("{}/7.html", url.trim_end_matches('/')))?;

        let response = self
            .get_text(
                page_url,
                self.config.shoutcast_v1_timeout(),
                &self.config.v1_user_agent,
            )
            .await?;

        response.ensure_ok()?;
        response.ensure_content_type(&["text/html"])?;

        parse_v1_response(&response.body)
    }

    /// Fetch station information from a SHOUTcast v2 `/statistics` document
    pub async fn shoutcast_v2_station(&self, url: &str) -> Result<Station> {
        let stats_url = server_url(url, "/statistics")?;

        let response = self
            .get_text(
                stats_url,
                Some(self.config.shoutcast_v2_timeout()),
                &self.config.user_agent,
            )
            .await?;

        response.ensure_ok()?;

        parse_v2_response(url, &response.body)
    }
}

// ============================================================================
// SHOUTcast v1
// ============================================================================

/// Parse a SHOUTcast v1 `/7.html` page
///
/// With exactly seven fields the title is taken verbatim. Titles containing
/// commas spill over several fields; those are joined back and normalized.
pub fn parse_v1_response(body: &str) -> Result<Station> {
    let csv = V1_BODY_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or(Error::NothingToParse)?
        .as_str();

    let fields: Vec<&str> = csv.split(',').collect();

    let title = if fields.len() == V1_FIELD_COUNT {
        fields[6].to_string()
    } else {
        fields
            .get(6..)
            .map(|rest| normalize_title(&rest.join(",")))
            .unwrap_or_default()
    };

    if title.trim().is_empty() {
        return Err(Error::NoStation);
    }

    tracing::debug!("Parsed SHOUTcast v1 page: {}", title);

    Ok(Station {
        listeners: fields.first().map(|&l| StatValue::from(l)),
        bitrate: fields.get(5).map(|&b| StatValue::from(b)),
        title,
        name: None,
        fetchsource: StreamSource::ShoutcastV1,
    })
}

// ============================================================================
// SHOUTcast v2
// ============================================================================

#[derive(Debug, Deserialize)]
struct ShoutcastServer {
    #[serde(rename = "STREAMSTATS")]
    stream_stats: StreamStats,
}

#[derive(Debug, Deserialize)]
struct StreamStats {
    #[serde(rename = "STREAM", default)]
    streams: Vec<V2Stream>,
}

#[derive(Debug, Deserialize)]
struct V2Stream {
    #[serde(rename = "CURRENTLISTENERS")]
    current_listeners: Option<String>,
    #[serde(rename = "BITRATE")]
    bitrate: Option<String>,
    #[serde(rename = "SONGTITLE")]
    song_title: Option<String>,
    #[serde(rename = "SERVERURL")]
    server_url: Option<String>,
}

/// Parse a SHOUTcast v2 `/statistics` document for `url`
///
/// A lone `STREAM` entry is used whatever its `SERVERURL`; with several
/// entries only the one whose `SERVERURL` equals `url` is considered.
pub fn parse_v2_response(url: &str, body: &str) -> Result<Station> {
    let server: ShoutcastServer = quick_xml::de::from_str(body)?;
    let streams = server.stream_stats.streams;

    let selected = match streams.as_slice() {
        [only] => Some(only),
        many => many
            .iter()
            .find(|stream| stream.server_url.as_deref() == Some(url)),
    };

    let stream = selected.ok_or(Error::NoStation)?;

    let title = stream
        .song_title
        .as_deref()
        .map(normalize_title)
        .filter(|t| !t.is_empty())
        .ok_or(Error::NoStation)?;

    tracing::debug!(
        "Parsed SHOUTcast v2 statistics ({} streams): {}",
        streams.len(),
        title
    );

    Ok(Station {
        listeners: stream.current_listeners.clone().map(StatValue::from),
        bitrate: stream.bitrate.clone().map(StatValue::from),
        title,
        name: None,
        fetchsource: StreamSource::ShoutcastV2,
    })
}
