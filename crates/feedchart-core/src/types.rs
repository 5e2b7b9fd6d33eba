//! Shared type definitions used across feedchart crates.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A named bucket of the data feed, rendered as one bar.
///
/// Categories are opaque: any string is accepted, including ones the
/// palette has no color for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The category name as sent by the data source.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Which bar to update
    pub category: Category,
    /// New value for that bar
    pub quantity: f64,
    /// Device-side timestamp, when the frame carried a valid one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<NaiveDateTime>,
}

impl Record {
    /// Create a record without a device timestamp.
    pub fn new(category: impl Into<Category>, quantity: f64) -> Self {
        Self {
            category: category.into(),
            quantity,
            observed_at: None,
        }
    }

    /// Attach a device timestamp.
    pub fn with_observed_at(mut self, observed_at: NaiveDateTime) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// A display color in `#rrggbb` or `#rrggbbaa` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorCode(&'static str);

impl ColorCode {
    /// Wrap a static hex color literal.
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    /// The hex notation, including the leading `#`.
    pub fn hex(&self) -> &'static str {
        self.0
    }

    /// Red, green, and blue components, ignoring alpha.
    ///
    /// Returns `None` if the literal is not valid 6- or 8-digit hex.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let digits = self.0.strip_prefix('#')?;
        if digits.len() != 6 && digits.len() != 8 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
