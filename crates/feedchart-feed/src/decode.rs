//! Frame decoding.
//!
//! The counting device sends one JSON object per frame:
//!
//! ```json
//! {"quantidade": 7, "tipo": "Grande", "data": "14/03/2025", "hora": "10:30:00"}
//! ```
//!
//! `tipo` and `quantidade` are required. `data` and `hora` are optional and
//! only used when both parse; a bad timestamp never rejects the frame.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use feedchart_core::{Category, FeedChartError, Record, Result};
use serde::Deserialize;
use serde_json::Value;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "tipo")]
    category: String,
    #[serde(rename = "quantidade")]
    quantity: f64,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    hora: Option<Value>,
}

/// Decode one text frame into a [`Record`].
pub fn decode_frame(text: &str) -> Result<Record> {
    let value: Value = serde_json::from_str(text).map_err(FeedChartError::decode_json)?;
    if !value.is_object() {
        return Err(FeedChartError::decode(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let wire: WireRecord = serde_json::from_value(value).map_err(FeedChartError::decode_json)?;
    if !wire.quantity.is_finite() {
        return Err(FeedChartError::decode("quantidade is not a finite number"));
    }

    let mut record = Record::new(Category::from(wire.category), wire.quantity);
    if let Some(observed_at) = observed_at(wire.data.as_ref(), wire.hora.as_ref()) {
        record = record.with_observed_at(observed_at);
    }
    Ok(record)
}

/// Decode a binary frame, which must hold UTF-8 JSON text.
pub fn decode_binary_frame(bytes: &[u8]) -> Result<Record> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FeedChartError::decode(format!("binary frame is not UTF-8: {e}")))?;
    decode_frame(text)
}

fn observed_at(date: Option<&Value>, time: Option<&Value>) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date?.as_str()?, DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time?.as_str()?, TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
