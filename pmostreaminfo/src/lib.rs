//! Now-playing information for internet radio streams
//!
//! Given nothing but a stream URL, this crate finds out what the stream is
//! currently playing, along with listener and bitrate statistics when the
//! server reports them.
//!
//! # Supported servers
//!
//! - **SHOUTcast v2**: `/statistics` XML document
//! - **SHOUTcast v1**: `/7.html` CSV page
//! - **Icecast**: `/status-json.xsl` JSON document
//! - **Any ICY stream**: in-band `StreamTitle` metadata from the audio itself
//!
//! When the dialect is unknown, they are probed sequentially in that order
//! and the first one returning a station wins.
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
//!     let station = client.station_info("http://radio.example.com:8000/live", None).await?;
//!     println!("Now playing: {}", station.title);
//!     println!("Source: {}", station.fetchsource);
//!
//!     if let Some(listeners) = &station.listeners {
//!         println!("Listeners: {}", listeners);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Parsing without I/O
//!
//! The parsers are plain functions over the response body:
//!
//! ```
//! use pmostreaminfo::shoutcast::parse_v1_response;
//!
//! let station = parse_v1_response("<body>12,0,0,0,0,128,My Song</body>").unwrap();
//! assert_eq!(station.title, "My Song");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod icecast;
pub mod icy;
pub mod models;
pub mod resolver;
pub mod shoutcast;
pub mod title;

// Re-exports
pub use client::{ClientBuilder, StreamInfoClient};
pub use config::StreamInfoConfig;
pub use error::{Error, ErrorKind, Result};
pub use models::{StatValue, Station, StreamSource, UnknownStreamSource};
pub use resolver::{resolve_station, StationProvider, PROBE_ORDER};
pub use title::normalize_title;
