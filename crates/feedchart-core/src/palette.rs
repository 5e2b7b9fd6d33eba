//! Fixed category to color table.
//!
//! The table is closed: only the three part sizes reported by the counting
//! device have a color. Everything else maps to `None` and is left to the
//! renderer's fallback.

use crate::types::{Category, ColorCode};

/// Color for "Grande" bars.
pub const GRANDE: ColorCode = ColorCode::new("#fcff32ff");
/// Color for "Media" bars.
pub const MEDIA: ColorCode = ColorCode::new("#34e758ff");
/// Color for "Pequena" bars.
pub const PEQUENA: ColorCode = ColorCode::new("#ba66f5ff");

/// Categories that have an assigned color, in device order.
pub const KNOWN_CATEGORIES: [&str; 3] = ["Grande", "Media", "Pequena"];

/// Look up the display color for a category.
pub fn color_for(category: &Category) -> Option<ColorCode> {
    match category.as_str() {
        "Grande" => Some(GRANDE),
        "Media" => Some(MEDIA),
        "Pequena" => Some(PEQUENA),
        _ => None,
    }
}
