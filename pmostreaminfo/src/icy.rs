//! In-band ICY metadata
//!
//! Last resort when the server exposes no status page: connect to the audio
//! stream itself with `Icy-MetaData: 1` and read the first metadata block.
//!
//! The server interleaves one metadata block after every `icy-metaint`
//! bytes of audio. A block starts with a length byte (in units of 16 bytes)
//! followed by a null-padded string such as
//! `StreamTitle='Artist - Song';StreamUrl='';`.

use crate::client::StreamInfoClient;
use crate::error::{Error, Result};
use crate::models::{StatValue, Station, StreamSource};
use crate::title::normalize_title;
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::StatusCode;
use url::Url;

/// Headers parsed from an ICY stream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcyHeaders {
    pub metaint: usize,
    pub station_name: Option<String>,
    pub bitrate: Option<String>,
}

impl IcyHeaders {
    /// Read the ICY headers; `icy-metaint` is mandatory
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let metaint = get("icy-metaint")
            .ok_or_else(|| Error::icy("server did not send icy-metaint"))?
            .parse::<usize>()
            .map_err(|e| Error::icy(format!("invalid icy-metaint: {}", e)))?;

        if metaint == 0 {
            return Err(Error::icy("icy-metaint is zero"));
        }

        Ok(Self {
            metaint,
            station_name: get("icy-name"),
            bitrate: get("icy-br"),
        })
    }
}

#[derive(Debug)]
enum ReadState {
    Audio { remaining: usize },
    Length,
    Metadata { expected: usize, block: Vec<u8> },
}

/// Incremental ICY demuxer that only keeps metadata
///
/// Feed it the response body chunk by chunk; it yields the first non-empty
/// StreamTitle. Empty blocks (length byte 0, or no title) are skipped.
#[derive(Debug)]
pub struct IcyMetadataReader {
    metaint: usize,
    max_bytes: usize,
    consumed: usize,
    state: ReadState,
}

impl IcyMetadataReader {
    pub fn new(metaint: usize, max_bytes: usize) -> Self {
        Self {
            metaint,
            max_bytes,
            consumed: 0,
            state: ReadState::Audio { remaining: metaint },
        }
    }

    /// Bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Consume `data`, returning the normalized title once one is complete
    pub fn push(&mut self, mut data: &[u8]) -> Result<Option<String>> {
        while !data.is_empty() {
            match &mut self.state {
                ReadState::Audio { remaining } => {
                    let n = (*remaining).min(data.len());
                    *remaining -= n;
                    data = &data[n..];
                    self.consumed += n;
                    if *remaining == 0 {
                        self.state = ReadState::Length;
                    }
                }
                ReadState::Length => {
                    let expected = data[0] as usize * 16;
                    data = &data[1..];
                    self.consumed += 1;
                    self.state = if expected == 0 {
                        ReadState::Audio {
                            remaining: self.metaint,
                        }
                    } else {
                        ReadState::Metadata {
                            expected,
                            block: Vec::with_capacity(expected),
                        }
                    };
                }
                ReadState::Metadata { expected, block } => {
                    let n = (*expected - block.len()).min(data.len());
                    block.extend_from_slice(&data[..n]);
                    data = &data[n..];
                    self.consumed += n;

                    if block.len() == *expected {
                        let title = extract_icy_title(block)
                            .map(|raw| normalize_title(&raw))
                            .filter(|t| !t.is_empty());
                        self.state = ReadState::Audio {
                            remaining: self.metaint,
                        };
                        if title.is_some() {
                            return Ok(title);
                        }
                    }
                }
            }

            if self.consumed > self.max_bytes {
                return Err(Error::icy(format!(
                    "no StreamTitle within the first {} bytes",
                    self.max_bytes
                )));
            }
        }

        Ok(None)
    }
}

/// Parse ICY metadata string to extract StreamTitle value.
///
/// ICY metadata format: `StreamTitle='Artist - Song';StreamUrl='...';`
pub fn parse_icy_metadata(metadata: &str) -> Option<String> {
    const KEY: &str = "StreamTitle='";

    let start = metadata.find(KEY)? + KEY.len();
    let rest = &metadata[start..];
    // Titles may contain quotes, so look for the `';` terminator first
    let end = rest.find("';").or_else(|| rest.rfind('\''))?;
    let title = rest[..end].trim();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Extract ICY title from a raw metadata block (with null padding).
pub fn extract_icy_title(raw_block: &[u8]) -> Option<String> {
    let end = raw_block.iter().rposition(|&b| b != 0)? + 1;
    let meta_str = String::from_utf8_lossy(&raw_block[..end]);
    parse_icy_metadata(&meta_str)
}

impl StreamInfoClient {
    /// Read the current title from the audio stream's in-band metadata
    ///
    /// Raw streams do not report listeners; the bitrate comes from `icy-br`.
    pub async fn stream_station(&self, url: &str) -> Result<Station> {
        let stream_url = Url::parse(url)?;
        tracing::debug!("Opening ICY stream {}", stream_url);

        let mut response = self
            .client
            .get(stream_url)
            .header(USER_AGENT, &self.config.user_agent)
            .header("Icy-MetaData", "1")
            .timeout(self.config.icy_timeout())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::HttpStatus(response.status().as_u16()));
        }

        let headers = IcyHeaders::from_headers(response.headers())?;
        let mut reader = IcyMetadataReader::new(headers.metaint, self.config.icy_max_bytes);

        let title = loop {
            match response.chunk().await? {
                Some(chunk) => {
                    if let Some(title) = reader.push(&chunk)? {
                        break title;
                    }
                }
                None => return Err(Error::icy("stream ended before a StreamTitle was sent")),
            }
        };

        tracing::debug!(
            "Read ICY title after {} bytes (metaint {}): {}",
            reader.consumed(),
            headers.metaint,
            title
        );

        Ok(Station {
            listeners: None,
            bitrate: headers.bitrate.map(StatValue::from),
            title,
            name: headers.station_name,
            fetchsource: StreamSource::Stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    /// Build a metadata block: length byte + null-padded payload
    fn meta_block(text: &str) -> Vec<u8> {
        let blocks = text.len().div_ceil(16);
        let mut out = vec![blocks as u8];
        out.extend_from_slice(text.as_bytes());
        out.resize(1 + blocks * 16, 0);
        out
    }

    // --- parse_icy_metadata ---

    #[test]
    fn parse_standard_icy_metadata() {
        let raw = "StreamTitle='Pink Floyd - Comfortably Numb';StreamUrl='';";
        assert_eq!(
            parse_icy_metadata(raw),
            Some("Pink Floyd - Comfortably Numb".to_string())
        );
    }

    #[test]
    fn parse_title_with_apostrophe() {
        let raw = "StreamTitle='Guns N' Roses - Don't Cry';";
        assert_eq!(
            parse_icy_metadata(raw),
            Some("Guns N' Roses - Don't Cry".to_string())
        );
    }

    #[test]
    fn parse_without_semicolon() {
        assert_eq!(parse_icy_metadata("StreamTitle='Live'"), Some("Live".to_string()));
    }

    #[test]
    fn parse_empty_or_missing_title() {
        assert_eq!(parse_icy_metadata("StreamTitle='';"), None);
        assert_eq!(parse_icy_metadata("StreamUrl='http://x';"), None);
        assert_eq!(parse_icy_metadata(""), None);
    }

    #[test]
    fn extract_strips_padding() {
        let block = meta_block("StreamTitle='A - B';");
        assert_eq!(extract_icy_title(&block[1..]), Some("A - B".to_string()));
        assert_eq!(extract_icy_title(&[0u8; 32]), None);
    }

    // --- IcyHeaders ---

    #[test]
    fn headers_require_metaint() {
        let mut headers = HeaderMap::new();
        headers.insert("icy-name", HeaderValue::from_static("Radio X"));
        assert!(IcyHeaders::from_headers(&headers).is_err());

        headers.insert("icy-metaint", HeaderValue::from_static("0"));
        assert!(IcyHeaders::from_headers(&headers).is_err());

        headers.insert("icy-metaint", HeaderValue::from_static("16000"));
        headers.insert("icy-br", HeaderValue::from_static("128"));
        let parsed = IcyHeaders::from_headers(&headers).unwrap();
        assert_eq!(parsed.metaint, 16000);
        assert_eq!(parsed.station_name.as_deref(), Some("Radio X"));
        assert_eq!(parsed.bitrate.as_deref(), Some("128"));
    }

    // --- IcyMetadataReader ---

    #[test]
    fn reader_single_chunk() {
        let mut data = vec![0xAAu8; 8];
        data.extend(meta_block("StreamTitle='Artist - Song';"));
        data.extend([0xAAu8; 8]);

        let mut reader = IcyMetadataReader::new(8, 1024);
        assert_eq!(reader.push(&data).unwrap(), Some("Artist - Song".to_string()));
    }

    #[test]
    fn reader_split_across_chunks() {
        let mut data = vec![0x55u8; 10];
        data.extend(meta_block("StreamTitle='Split - Chunks';"));

        let mut reader = IcyMetadataReader::new(10, 1024);
        let mut title = None;
        for byte in data.chunks(3) {
            if let Some(t) = reader.push(byte).unwrap() {
                title = Some(t);
                break;
            }
        }
        assert_eq!(title.as_deref(), Some("Split - Chunks"));
    }

    #[test]
    fn reader_skips_empty_blocks() {
        let mut data = vec![0u8; 4];
        data.push(0); // empty block
        data.extend([0u8; 4]);
        data.extend(meta_block("StreamTitle='';"));
        data.extend([0u8; 4]);
        data.extend(meta_block("StreamTitle='Third time';"));

        let mut reader = IcyMetadataReader::new(4, 1024);
        assert_eq!(reader.push(&data).unwrap(), Some("Third time".to_string()));
    }

    #[test]
    fn reader_needs_more_data() {
        let mut reader = IcyMetadataReader::new(16, 1024);
        assert_eq!(reader.push(&[0u8; 16]).unwrap(), None);
        assert_eq!(reader.consumed(), 16);
    }

    #[test]
    fn reader_gives_up_after_budget() {
        let mut reader = IcyMetadataReader::new(8, 20);
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend([0u8; 8]);
            data.push(0);
        }
        let err = reader.push(&data).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedBody);
    }
}
