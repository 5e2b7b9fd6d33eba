//! The consumer side of the feed.

use feedchart_core::{Record, Series, Upsert};

use crate::listener::FeedEvent;

/// Something that holds the chart snapshot and accepts decoded records.
pub trait ChartSink {
    /// Insert the record's category if absent, else overwrite its value.
    fn upsert_record(&mut self, record: &Record) -> Upsert;
}

impl ChartSink for Series {
    fn upsert_record(&mut self, record: &Record) -> Upsert {
        self.upsert(record.category.clone(), record.quantity)
    }
}

/// Route a listener event to a sink. Only [`FeedEvent::Record`] mutates it.
pub fn apply_event<S: ChartSink + ?Sized>(sink: &mut S, event: &FeedEvent) -> Option<Upsert> {
    match event {
        FeedEvent::Record(record) => Some(sink.upsert_record(record)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_is_a_sink() {
        let mut series = Series::new();
        let outcome = series.upsert_record(&Record::new("Grande", 3.0));
        assert_eq!(outcome, Upsert::Inserted { index: 0 });
        assert_eq!(series.get(&"Grande".into()), Some(3.0));
    }

    #[test]
    fn test_apply_event_only_records_mutate() {
        let mut series = Series::new();

        let failed = FeedEvent::DecodeFailed {
            frame: "oops".into(),
            error: "expected value".into(),
        };
        assert_eq!(apply_event(&mut series, &failed), None);
        assert!(series.is_empty());

        let record = FeedEvent::Record(Record::new("Media", 20.0));
        assert_eq!(
            apply_event(&mut series, &record),
            Some(Upsert::Inserted { index: 0 })
        );
        assert_eq!(series.values(), &[20.0]);
    }

    #[test]
    fn test_apply_event_through_trait_object() {
        let mut series = Series::new();
        let sink: &mut dyn ChartSink = &mut series;
        apply_event(sink, &FeedEvent::Record(Record::new("Grande", 1.0)));
        apply_event(sink, &FeedEvent::Record(Record::new("Grande", 4.0)));
        assert_eq!(series.values(), &[4.0]);
    }
}
