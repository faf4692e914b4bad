//! Loopback demo: a fake detector and a client in one process.
//!
//! The detector answers every frame with one detection covering the frame.
//! The client sends frames as fast as flow control allows and logs results.
//!
//! Usage:
//!   cargo run --example loopback
//!   cargo run --example loopback -- --debug

// ============================================================================
// Imports
// ============================================================================

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use image::{Rgb, RgbImage};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edge_detect_client::{ClientConfig, EdgeClient, Frame};

// ============================================================================
// Constants
// ============================================================================

const FRAMES: usize = 20;
const POLL: Duration = Duration::from_millis(10);

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let debug = std::env::args().any(|a| a == "--debug");
    init_logging(debug);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(run_detector(listener));

    let config = ClientConfig::network().with_network_addr(addr.to_string());
    let mut client = EdgeClient::connect(config).await?;
    info!(identity = %client.identity(), endpoint = %client.endpoint(), "Client connected");

    let started = Instant::now();
    let mut completed = 0;
    let mut rejected = 0;

    while completed < FRAMES {
        let frame = synthetic_frame(completed as u8);
        if !client.send(&frame)? {
            rejected += 1;
        }

        match client.receive(POLL).await {
            Ok(Some(detections)) => {
                completed += 1;
                for d in &detections {
                    info!(
                        frame = completed,
                        category = %d.category(),
                        score = d.score(),
                        bbox = ?d.bbox().to_array(),
                        "Detection"
                    );
                }
            }
            Ok(None) => {}
            Err(e) if e.is_protocol_error() => warn!(error = %e, "Dropping cycle"),
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        frames = completed,
        rejected,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Done"
    );

    client.close().await;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "edge_detect_client=trace,loopback=debug"
    } else {
        "edge_detect_client=info,loopback=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// A 320x240 gradient that shifts with `seed`.
fn synthetic_frame(seed: u8) -> Frame {
    Frame::from(RgbImage::from_fn(320, 240, |x, y| {
        Rgb([seed.wrapping_mul(12), (x % 256) as u8, (y % 256) as u8])
    }))
}

/// Replies to each frame with a fixed detection after a short delay.
async fn run_detector(listener: TcpListener) -> anyhow::Result<()> {
    let (stream, _) = listener.accept().await?;
    let mut ws = tokio_tungstenite::accept_async(stream).await?;

    while let Some(message) = ws.next().await {
        if let Message::Binary(jpeg) = message? {
            tokio::time::sleep(Duration::from_millis(25)).await;
            let reply = format!(
                r#"{{"detections":[{{"bbox":[0,0,320,240],"score":0.99,"category":"frame-{}b"}}]}}"#,
                jpeg.len()
            );
            ws.send(Message::Text(reply.into())).await?;
        }
    }

    Ok(())
}
