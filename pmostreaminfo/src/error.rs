//! Error types for the stream metadata client

/// Result type alias for stream metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
///
/// Callers usually only care about which stage failed: the request itself,
/// the dialect check, the body decoding, or the mount lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network failure, timeout, invalid URL or non-200 status
    Transport,
    /// Response content-type does not match the expected dialect marker
    UnexpectedContentType,
    /// Body could not be decoded per the format's rules
    MalformedBody,
    /// Body decoded but no entry matched the URL, or the title was absent
    NoMatchingMount,
    /// Every fallback probe failed
    UnknownFormat,
    /// Configuration could not be loaded
    Configuration,
}

/// Errors that can occur while fetching station information
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with something other than 200 OK
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response is not the metadata dialect we asked for
    #[error("Not valid metadata: expected {expected}, got {}", .actual.as_deref().unwrap_or("no content-type"))]
    UnexpectedContentType {
        expected: String,
        actual: Option<String>,
    },

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// SHOUTcast v1 page had no `<body>` section
    #[error("Nothing to parse")]
    NothingToParse,

    /// ICY stream framing or metadata block was unusable
    #[error("Invalid ICY stream: {0}")]
    Icy(String),

    /// Body was understood but holds no usable station for the URL
    #[error("Unable to determine current station information")]
    NoStation,

    /// All providers were probed and none returned a station
    #[error("Unable to determine stream format: no provider returned station information")]
    UnknownFormat,

    /// YAML configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an ICY framing error
    pub fn icy(msg: impl Into<String>) -> Self {
        Self::Icy(msg.into())
    }

    /// Build a content-type mismatch error
    pub fn unexpected_content_type(expected: impl Into<String>, actual: Option<&str>) -> Self {
        Self::UnexpectedContentType {
            expected: expected.into(),
            actual: actual.map(str::to_string),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::HttpStatus(_) | Self::InvalidUrl(_) => ErrorKind::Transport,
            Self::UnexpectedContentType { .. } => ErrorKind::UnexpectedContentType,
            Self::Json(_) | Self::Xml(_) | Self::NothingToParse | Self::Icy(_) => {
                ErrorKind::MalformedBody
            }
            Self::NoStation => ErrorKind::NoMatchingMount,
            Self::UnknownFormat => ErrorKind::UnknownFormat,
            Self::Config(_) | Self::Io(_) => ErrorKind::Configuration,
        }
    }
}
