//! A stand-in for the counting device.
//!
//! The device runs a WebSocket server. Every time a part passes the sensor
//! it bumps three counters (+1 Grande, +2 Media, +3 Pequena) and sends one
//! frame per category with the new totals and the local date and time.
//! [`DeviceCounters`] reproduces the frame stream; [`serve`] puts it behind
//! a real listener so the dashboard can be run without hardware.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::NaiveDateTime;
use feedchart_core::palette::KNOWN_CATEGORIES;
use futures_util::SinkExt;
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Counter increments per detection, in [`KNOWN_CATEGORIES`] order.
pub const STEP: [u64; 3] = [1, 2, 3];

/// Running totals for one client connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCounters {
    totals: [u64; 3],
}

impl DeviceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals(&self) -> [u64; 3] {
        self.totals
    }

    /// Register one detection and return the frames to send, one per category.
    pub fn detect(&mut self, now: NaiveDateTime) -> Vec<String> {
        for (total, step) in self.totals.iter_mut().zip(STEP) {
            *total += step;
        }

        let date = now.format("%d/%m/%Y").to_string();
        let time = now.format("%H:%M:%S").to_string();
        KNOWN_CATEGORIES
            .iter()
            .zip(self.totals)
            .map(|(tipo, quantidade)| {
                json!({
                    "quantidade": quantidade,
                    "tipo": tipo,
                    "data": date,
                    "hora": time,
                })
                .to_string()
            })
            .collect()
    }
}

/// Simulator settings.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Time between detections
    pub interval: Duration,
    /// Close each client connection after this many detections
    pub detections_per_connection: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            detections_per_connection: None,
        }
    }
}

/// Accept clients forever, streaming detections to each one.
pub async fn serve(listener: TcpListener, config: SimConfig) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "simulator listening");
    loop {
        let (stream, peer) = listener.accept().await?;
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_client(stream, peer, config).await {
                warn!(%peer, error = %e, "client session ended with error");
            }
        });
    }
}

async fn serve_client(stream: TcpStream, peer: SocketAddr, config: SimConfig) -> anyhow::Result<()> {
    let mut ws = tokio_tungstenite::accept_async(stream).await?;
    info!(%peer, "client connected");

    let mut counters = DeviceCounters::new();
    let mut ticker = tokio::time::interval(config.interval);
    ticker.tick().await;

    let mut sent: u64 = 0;
    loop {
        if config.detections_per_connection.is_some_and(|limit| sent >= limit) {
            info!(%peer, detections = sent, "closing client connection");
            ws.close(None).await?;
            return Ok(());
        }

        ticker.tick().await;
        let now = chrono::Local::now().naive_local();
        for frame in counters.detect(now) {
            debug!(%peer, %frame, "sending");
            ws.send(Message::Text(frame)).await?;
        }
        sent += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_frame;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_detection_advances_counters() {
        let mut counters = DeviceCounters::new();
        counters.detect(at(8, 0, 0));
        assert_eq!(counters.totals(), [1, 2, 3]);
        counters.detect(at(8, 0, 1));
        assert_eq!(counters.totals(), [2, 4, 6]);
    }

    #[test]
    fn test_frames_decode_as_records() {
        let mut counters = DeviceCounters::new();
        let frames = counters.detect(at(9, 15, 30));
        assert_eq!(frames.len(), 3);

        let records: Vec<_> = frames.iter().map(|f| decode_frame(f).unwrap()).collect();
        let names: Vec<_> = records.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Grande", "Media", "Pequena"]);
        let values: Vec<_> = records.iter().map(|r| r.quantity).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert!(records.iter().all(|r| r.observed_at == Some(at(9, 15, 30))));
    }
}
