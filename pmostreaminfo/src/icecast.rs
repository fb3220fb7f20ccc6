//! Icecast metadata from `/status-json.xsl`

use crate::client::{server_url, StreamInfoClient};
use crate::error::{Error, Result};
use crate::models::{StatValue, Station, StreamSource};
use crate::title::normalize_title;
use serde::Deserialize;
use serde_json::Value;

impl StreamInfoClient {
    /// Fetch station information from the Icecast JSON status page
    ///
    /// The content type is checked against
    /// [`icecast_content_types`](crate::StreamInfoConfig::icecast_content_types),
    /// `text/xml` by default: that is what the `.xsl` endpoint has been
    /// serving on the servers this was written against, JSON body or not.
    pub async fn icecast_station(&self, url: &str) -> Result<Station> {
        let status_url = server_url(url, "/status-json.xsl")?;

        let response = self
            .get_text(
                status_url,
                Some(self.config.icecast_timeout()),
                &self.config.user_agent,
            )
            .await?;

        response.ensure_ok()?;
        response.ensure_content_type(self.config.icecast_content_types.as_slice())?;

        parse_icecast_response(url, &response.body)
    }
}

#[derive(Debug, Deserialize)]
struct IcecastStatus {
    icestats: Option<IceStats>,
}

#[derive(Debug, Deserialize)]
struct IceStats {
    source: Option<OneOrMany<IcecastSource>>,
}

/// Icecast emits a bare object instead of an array when only one mount
/// point is active.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct IcecastSource {
    listenurl: Option<String>,
    #[serde(default)]
    listeners: Value,
    #[serde(default)]
    bitrate: Value,
    #[serde(default)]
    title: Value,
}

/// Keep numbers as numbers and strings as strings, drop the rest
fn stat_value(value: &Value) -> Option<StatValue> {
    match value {
        Value::Number(n) => Some(match n.as_u64() {
            Some(n) => StatValue::Number(n),
            None => StatValue::Text(n.to_string()),
        }),
        Value::String(s) => Some(StatValue::Text(s.clone())),
        _ => None,
    }
}

fn title_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an Icecast `/status-json.xsl` body for the mount serving `url`
///
/// The mount is found by exact comparison of its `listenurl` with `url`.
pub fn parse_icecast_response(url: &str, body: &str) -> Result<Station> {
    let status: IcecastStatus = serde_json::from_str(body)?;

    let sources = status
        .icestats
        .and_then(|stats| stats.source)
        .map(OneOrMany::into_vec)
        .unwrap_or_default();

    if sources.is_empty() {
        return Err(Error::NoStation);
    }

    let source = sources
        .iter()
        .find(|source| source.listenurl.as_deref() == Some(url))
        .ok_or(Error::NoStation)?;

    let title = title_text(&source.title)
        .map(|raw| normalize_title(&raw))
        .filter(|t| !t.is_empty())
        .ok_or(Error::NoStation)?;

    tracing::debug!(
        "Parsed Icecast status ({} mounts): {}",
        sources.len(),
        title
    );

    Ok(Station {
        listeners: stat_value(&source.listeners),
        bitrate: stat_value(&source.bitrate),
        title,
        name: None,
        fetchsource: StreamSource::Icecast,
    })
}
