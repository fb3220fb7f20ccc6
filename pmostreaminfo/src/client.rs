//! HTTP client for streaming server metadata
//!
//! [`StreamInfoClient`] owns the HTTP transport and the per-dialect settings.
//! The dialect fetchers live next to their parsers (`shoutcast`, `icecast`,
//! `icy`); this module only holds what they share.
//!
//! # Example
//!
//! ```no_run
//! use pmostreaminfo::{StreamInfoClient, StreamSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StreamInfoClient::new().await?;
//!
//!     // Probe every dialect
//!     let station = client.station_info("http://radio.example.com:8000/live", None).await?;
//!     println!("{} ({})", station.title, station.fetchsource);
//!
//!     // Ask one dialect only
//!     let station = client
//!         .station_info("http://radio.example.com:8000/live", Some(StreamSource::Icecast))
//!         .await?;
//!     println!("{:?} listeners", station.listeners);
//!
//!     Ok(())
//! }
//! ```

use crate::config::StreamInfoConfig;
use crate::error::{Error, Result};
use crate::models::{Station, StreamSource};
use crate::resolver::{resolve_station, StationProvider};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Stream metadata client
///
/// Stateless: every call issues its own requests and nothing is cached.
#[derive(Debug, Clone)]
pub struct StreamInfoClient {
    pub(crate) client: Client,
    pub(crate) config: StreamInfoConfig,
}

/// Response of a plain GET, body fully read
#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// Fail unless the server answered 200
    pub fn ensure_ok(&self) -> Result<()> {
        if self.status != StatusCode::OK {
            return Err(Error::HttpStatus(self.status.as_u16()));
        }
        Ok(())
    }

    /// Media type essence of the `content-type` header, lowercased
    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type_essence)
    }

    /// Fail unless the content type is one of `accepted`
    pub fn ensure_content_type<S: AsRef<str>>(&self, accepted: &[S]) -> Result<()> {
        let actual = self.content_type();
        let matches = actual.as_deref().is_some_and(|actual| {
            accepted
                .iter()
                .any(|expected| actual.eq_ignore_ascii_case(expected.as_ref()))
        });

        if matches {
            Ok(())
        } else {
            let expected = accepted
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(" or ");
            Err(Error::unexpected_content_type(expected, actual.as_deref()))
        }
    }
}

/// `text/html; charset=UTF-8` → `text/html`
pub(crate) fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Same scheme, host and port as `stream_url`, with `path` and no query
pub(crate) fn server_url(stream_url: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(stream_url)?;
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

impl StreamInfoClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom reqwest::Client
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            config: StreamInfoConfig::default(),
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &StreamInfoConfig {
        &self.config
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Identify what `url` is currently playing
    ///
    /// With a hint, only that dialect is queried and its error is returned
    /// as is. Without one, every dialect is probed in priority order and
    /// [`Error::UnknownFormat`] is returned if none of them answers.
    pub async fn station_info(&self, url: &str, hint: Option<StreamSource>) -> Result<Station> {
        resolve_station(self, url, hint).await
    }

    /// Like [`station_info`](Self::station_info) with a textual hint
    ///
    /// Unrecognized method names fall back to probing.
    pub async fn station_info_with_method(&self, url: &str, method: &str) -> Result<Station> {
        let hint = match method.parse::<StreamSource>() {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::debug!("{}, probing all providers", e);
                None
            }
        };
        resolve_station(self, url, hint).await
    }

    /// Query a single dialect
    pub async fn fetch(&self, source: StreamSource, url: &str) -> Result<Station> {
        match source {
            StreamSource::ShoutcastV1 => self.shoutcast_v1_station(url).await,
            StreamSource::ShoutcastV2 => self.shoutcast_v2_station(url).await,
            StreamSource::Icecast => self.icecast_station(url).await,
            StreamSource::Stream => self.stream_station(url).await,
        }
    }

    /// GET `url` and read the whole body as text
    pub(crate) async fn get_text(
        &self,
        url: Url,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<HttpResponse> {
        tracing::debug!("Fetching {}", url);

        let mut request = self.client.get(url).header(USER_AGENT, user_agent);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl StationProvider for StreamInfoClient {
    async fn fetch_station(&self, source: StreamSource, url: &str) -> Result<Station> {
        self.fetch(source, url).await
    }
}

/// Builder for configuring a StreamInfoClient
#[derive(Debug, Default)]
pub struct ClientBuilder {
    client: Option<Client>,
    config: StreamInfoConfig,
    proxy: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: StreamInfoConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the User-Agent for status pages and ICY streams
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the User-Agent for SHOUTcast v1 pages
    pub fn v1_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.v1_user_agent = user_agent.into();
        self
    }

    /// Set the SHOUTcast v2 request timeout
    pub fn shoutcast_v2_timeout(mut self, timeout: Duration) -> Self {
        self.config.shoutcast_v2_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the Icecast request timeout
    pub fn icecast_timeout(mut self, timeout: Duration) -> Self {
        self.config.icecast_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the ICY stream read timeout
    pub fn icy_timeout(mut self, timeout: Duration) -> Self {
        self.config.icy_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub async fn build(self) -> Result<StreamInfoClient> {
        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder().user_agent(&self.config.user_agent);

            if let Some(proxy_url) = &self.proxy {
                builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
            }

            builder.build()?
        };

        Ok(StreamInfoClient {
            client,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::header::HeaderValue;

    fn response(status: u16, content_type: Option<&str>) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: String::new(),
        }
    }

    #[test]
    fn test_media_type_essence() {
        assert_eq!(media_type_essence("text/html"), "text/html");
        assert_eq!(media_type_essence("Text/HTML; charset=UTF-8"), "text/html");
        assert_eq!(media_type_essence(""), "");
    }

    #[test]
    fn test_server_url() {
        let url = server_url("http://radio.example.com:8000/live.mp3?x=1", "/statistics").unwrap();
        assert_eq!(url.as_str(), "http://radio.example.com:8000/statistics");

        let url = server_url("https://radio.example.com/stream", "/status-json.xsl").unwrap();
        assert_eq!(url.as_str(), "https://radio.example.com/status-json.xsl");

        let err = server_url("not a url", "/statistics").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_ensure_ok() {
        assert!(response(200, None).ensure_ok().is_ok());
        let err = response(403, None).ensure_ok().unwrap_err();
        assert!(matches!(err, Error::HttpStatus(403)));
    }

    #[test]
    fn test_ensure_content_type() {
        let ok = response(200, Some("text/html; charset=iso-8859-1"));
        assert!(ok.ensure_content_type(&["text/html"]).is_ok());

        let err = response(200, Some("application/json"))
            .ensure_content_type(&["text/xml"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedContentType);

        let err = response(200, None).ensure_content_type(&["text/html"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedContentType);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.config, StreamInfoConfig::default());
        assert!(builder.proxy.is_none());
    }

    #[tokio::test]
    async fn test_builder_overrides() {
        let client = StreamInfoClient::builder()
            .icecast_timeout(Duration::from_secs(3))
            .v1_user_agent("Mozilla/5.0 (X11; Linux x86_64)")
            .build()
            .await
            .unwrap();
        assert_eq!(client.config().icecast_timeout_ms, 3000);
        assert_eq!(client.config().v1_user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
    }
}
