//! Provider resolution
//!
//! A stream URL does not say which metadata dialect its server speaks.
//! [`resolve_station`] either asks the one dialect it was told to use, or
//! walks [`PROBE_ORDER`] one provider at a time and keeps the first station.

use crate::error::{Error, Result};
use crate::models::{Station, StreamSource};
use async_trait::async_trait;

/// Fallback priority when no hint is given
///
/// Status pages come first because they are cheap; reading the audio
/// stream itself is the last resort.
pub const PROBE_ORDER: [StreamSource; 4] = [
    StreamSource::ShoutcastV2,
    StreamSource::ShoutcastV1,
    StreamSource::Icecast,
    StreamSource::Stream,
];

/// Something able to fetch a station for a given dialect
#[async_trait]
pub trait StationProvider: Send + Sync {
    async fn fetch_station(&self, source: StreamSource, url: &str) -> Result<Station>;
}

/// Resolve the current station for `url`
///
/// Probes run sequentially; a later probe is only paid for when every
/// earlier one failed. In fallback mode individual failures are logged and
/// dropped, and the caller only ever sees [`Error::UnknownFormat`].
pub async fn resolve_station<P>(provider: &P, url: &str, hint: Option<StreamSource>) -> Result<Station>
where
    P: StationProvider + ?Sized,
{
    if let Some(source) = hint {
        tracing::debug!("Fetching {} metadata for {}", source, url);
        return provider.fetch_station(source, url).await;
    }

    for source in PROBE_ORDER {
        match provider.fetch_station(source, url).await {
            Ok(station) => {
                tracing::info!("{} answered for {}: {}", source, url, station.title);
                return Ok(station);
            }
            Err(e) => {
                tracing::debug!("{} probe failed for {}: {}", source, url, e);
            }
        }
    }

    tracing::warn!("No metadata provider answered for {}", url);
    Err(Error::UnknownFormat)
}
