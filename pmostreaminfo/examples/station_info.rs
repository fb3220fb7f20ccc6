//! Example: Show what a radio stream is currently playing
//!
//! Run with: cargo run -p pmostreaminfo --example station_info -- <stream-url>
//! Or with a specific dialect:
//!   cargo run -p pmostreaminfo --example station_info -- <stream-url> ICECAST
//!
//! Set `RUST_LOG=pmostreaminfo=debug` to see each probe.

use pmostreaminfo::StreamInfoClient;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("usage: station_info <stream-url> [SHOUTCAST_V1|SHOUTCAST_V2|ICECAST|STREAM]");
        std::process::exit(2);
    };
    let method = args.next();

    println!("Fetching station information for {}...\n", url);

    let client = StreamInfoClient::new().await?;
    let station = match &method {
        Some(method) => client.station_info_with_method(&url, method).await?,
        None => client.station_info(&url, None).await?,
    };

    if let Some(name) = &station.name {
        println!("Station: {}", name);
    }

    match station.artist_and_title() {
        (Some(artist), title) => {
            println!("Artist: {}", artist);
            println!("Title: {}", title);
        }
        (None, title) => println!("Title: {}", title),
    }

    if let Some(listeners) = &station.listeners {
        println!("Listeners: {}", listeners);
    }
    if let Some(bitrate) = &station.bitrate {
        println!("Bitrate: {} kbps", bitrate);
    }
    println!("Source: {}", station.fetchsource);

    Ok(())
}
