//! # feedchart-core
//!
//! Core types, errors, and utilities shared by the feedchart crates.
//!
//! This crate provides:
//! - [`FeedChartError`] - Error type for decoding, connection, and configuration failures
//! - [`logging`] - Tracing setup and log file locations
//! - [`types`] - Categories, records, and color codes
//! - [`palette`] - The fixed category to color table
//! - [`series`] - The parallel label/value/color lists backing the chart
//!
//! ## Example
//!
//! ```
//! use feedchart_core::{Category, Series, Upsert};
//!
//! let mut series = Series::new();
//! let outcome = series.upsert(Category::from("Grande"), 3.0);
//! assert_eq!(outcome, Upsert::Inserted { index: 0 });
//! assert_eq!(series.values(), &[3.0]);
//! ```

pub mod error;
pub mod logging;
pub mod palette;
pub mod series;
pub mod types;

// Re-export main types for convenience
pub use error::{FeedChartError, Result};
pub use logging::{LogGuard, LogOutput, init_logging};
pub use palette::color_for;
pub use series::{Series, Upsert};
pub use types::{Category, ColorCode, Record};
