//! # feedchart-feed
//!
//! The data feed side of feedchart.
//!
//! This crate provides:
//! - [`decode`] - Turn inbound JSON frames into [`feedchart_core::Record`]s
//! - [`listener`] - The WebSocket listener with fixed-delay reconnect
//! - [`sink`] - The [`ChartSink`] trait records are applied through
//! - [`sim`] - A simulated counting device (also the `feed_sim` binary)

pub mod decode;
pub mod listener;
pub mod sim;
pub mod sink;

pub use decode::{decode_binary_frame, decode_frame};
pub use listener::{ConnectionState, FeedEvent, FeedListener, ListenerConfig, ListenerHandle};
pub use sink::{ChartSink, apply_event};
