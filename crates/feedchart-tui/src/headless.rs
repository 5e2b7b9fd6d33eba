//! Headless mode: apply feed events without a terminal UI.

use std::future::Future;

use feedchart_feed::{FeedEvent, apply_event};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::sink::SnapshotSink;

/// Apply events to `sink` until `shutdown` resolves or the listener stops.
pub async fn run_headless<F>(
    sink: &mut SnapshotSink,
    events: &mut mpsc::Receiver<FeedEvent>,
    shutdown: F,
) where
    F: Future,
{
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            event = events.recv() => event,
        };

        let Some(event) = event else {
            break;
        };

        match &event {
            FeedEvent::DecodeFailed { error, .. } => warn!(%error, "frame skipped"),
            FeedEvent::Stopped => {
                info!(updates = sink.updates(), "feed stopped");
                break;
            }
            _ => {}
        }
        apply_event(sink, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedchart_core::Record;
    use std::time::Duration;

    #[tokio::test]
    async fn test_runs_until_listener_stops() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(FeedEvent::Record(Record::new("Grande", 3.0))).await.unwrap();
        tx.send(FeedEvent::DecodeFailed {
            frame: "[1]".into(),
            error: "expected a JSON object".into(),
        })
        .await
        .unwrap();
        tx.send(FeedEvent::Record(Record::new("Grande", 7.0))).await.unwrap();
        tx.send(FeedEvent::Stopped).await.unwrap();

        let mut sink = SnapshotSink::new();
        run_headless(&mut sink, &mut rx, std::future::pending::<()>()).await;

        assert_eq!(sink.updates(), 2);
        assert_eq!(sink.summary(), "Grande=7");
    }

    #[tokio::test]
    async fn test_shutdown_future_ends_run() {
        let (_tx, mut rx) = mpsc::channel::<FeedEvent>(8);
        let mut sink = SnapshotSink::new();

        tokio::time::timeout(
            Duration::from_secs(1),
            run_headless(&mut sink, &mut rx, async {}),
        )
        .await
        .expect("shutdown should end the run");
        assert_eq!(sink.updates(), 0);
    }

    #[tokio::test]
    async fn test_closed_channel_ends_run() {
        let (tx, mut rx) = mpsc::channel::<FeedEvent>(8);
        drop(tx);
        let mut sink = SnapshotSink::new();
        run_headless(&mut sink, &mut rx, std::future::pending::<()>()).await;
        assert!(sink.series().is_empty());
    }
}
