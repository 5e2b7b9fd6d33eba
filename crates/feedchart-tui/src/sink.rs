//! Chart sinks used by the dashboard and by headless mode.

use std::fmt::Write as _;

use feedchart_core::{Record, Series, Upsert};
use feedchart_feed::ChartSink;
use tracing::{debug, info, trace};

/// The rendered chart's data plus a redraw flag.
///
/// Every upsert marks the chart dirty, so the next loop iteration redraws it
/// before handling another event.
#[derive(Debug, Default)]
pub struct BarChartSink {
    series: Series,
    dirty: bool,
}

impl BarChartSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Check if the chart changed since the last call and clear the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl ChartSink for BarChartSink {
    fn upsert_record(&mut self, record: &Record) -> Upsert {
        self.dirty = true;
        let outcome = self.series.upsert(record.category.clone(), record.quantity);
        trace!(category = %record.category, index = outcome.index(), "bar changed");
        outcome
    }
}

/// Sink for headless mode. Logs every change instead of drawing it.
#[derive(Debug, Default)]
pub struct SnapshotSink {
    series: Series,
    updates: u64,
}

impl SnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Number of upserts applied so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// One-line view of the chart, e.g. `Grande=7 Media=20`.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (label, value, _) in self.series.iter() {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{label}={value}");
        }
        out
    }
}

impl ChartSink for SnapshotSink {
    fn upsert_record(&mut self, record: &Record) -> Upsert {
        let outcome = self.series.upsert(record.category.clone(), record.quantity);
        self.updates += 1;
        match outcome {
            Upsert::Inserted { index } => {
                info!(category = %record.category, quantity = record.quantity, index, "category added");
            }
            Upsert::Updated { index, previous } => {
                debug!(
                    category = %record.category,
                    quantity = record.quantity,
                    previous,
                    index,
                    "category updated"
                );
            }
        }
        info!(snapshot = %self.summary(), "chart");
        outcome
    }
}
