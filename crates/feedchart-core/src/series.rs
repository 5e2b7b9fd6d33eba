//! The chart's data model.
//!
//! A [`Series`] is three parallel lists: category labels, numeric values, and
//! display colors. Their lengths are always equal and labels never repeat.
//! The only mutation is [`Series::upsert`].

use crate::palette::color_for;
use crate::types::{Category, ColorCode};

/// What an upsert did to the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upsert {
    /// The category was new and was appended at `index`
    Inserted { index: usize },
    /// The category already existed at `index`; its value was replaced
    Updated { index: usize, previous: f64 },
}

impl Upsert {
    /// Position of the affected bar.
    pub fn index(&self) -> usize {
        match self {
            Self::Inserted { index } | Self::Updated { index, .. } => *index,
        }
    }

    /// Returns true if a new bar was added.
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Ordered category snapshot backing the bar chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    labels: Vec<Category>,
    values: Vec<f64>,
    colors: Vec<Option<ColorCode>>,
}

impl Series {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the category if absent, else overwrite its value in place.
    ///
    /// A new category is appended along with its palette color. An existing
    /// category keeps its position, label, and color.
    pub fn upsert(&mut self, category: Category, quantity: f64) -> Upsert {
        match self.position(&category) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.values[index], quantity);
                Upsert::Updated { index, previous }
            }
            None => {
                let color = color_for(&category);
                self.labels.push(category);
                self.values.push(quantity);
                self.colors.push(color);
                Upsert::Inserted {
                    index: self.labels.len() - 1,
                }
            }
        }
    }

    /// Index of a category, if present.
    pub fn position(&self, category: &Category) -> Option<usize> {
        self.labels.iter().position(|label| label == category)
    }

    /// Current value of a category, if present.
    pub fn get(&self, category: &Category) -> Option<f64> {
        self.position(category).map(|i| self.values[i])
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no record has been applied yet.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[Category] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn colors(&self) -> &[Option<ColorCode>] {
        &self.colors
    }

    /// Iterate `(label, value, color)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, f64, Option<ColorCode>)> + '_ {
        self.labels
            .iter()
            .zip(self.values.iter().copied())
            .zip(self.colors.iter().copied())
            .map(|((label, value), color)| (label, value, color))
    }

    /// Largest value, or `None` when empty.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{GRANDE, MEDIA};
    use std::collections::HashSet;

    fn assert_invariants(series: &Series) {
        assert_eq!(series.labels().len(), series.values().len());
        assert_eq!(series.labels().len(), series.colors().len());
        let unique: HashSet<_> = series.labels().iter().collect();
        assert_eq!(unique.len(), series.len(), "labels must be unique");
    }

    #[test]
    fn test_first_upsert_on_empty_series() {
        let mut series = Series::new();
        let outcome = series.upsert("Grande".into(), 3.0);

        assert_eq!(outcome, Upsert::Inserted { index: 0 });
        assert_eq!(series.labels(), &[Category::from("Grande")]);
        assert_eq!(series.values(), &[3.0]);
        assert_eq!(series.colors(), &[Some(GRANDE)]);
    }

    #[test]
    fn test_second_category_appends() {
        let mut series = Series::new();
        series.upsert("Grande".into(), 3.0);
        let outcome = series.upsert("Media".into(), 20.0);

        assert_eq!(outcome, Upsert::Inserted { index: 1 });
        assert_eq!(
            series.labels(),
            &[Category::from("Grande"), Category::from("Media")]
        );
        assert_eq!(series.values(), &[3.0, 20.0]);
        assert_eq!(series.colors(), &[Some(GRANDE), Some(MEDIA)]);
    }

    #[test]
    fn test_existing_category_updates_in_place() {
        let mut series = Series::new();
        series.upsert("Grande".into(), 3.0);
        series.upsert("Media".into(), 20.0);
        let outcome = series.upsert("Grande".into(), 7.0);

        assert_eq!(outcome, Upsert::Updated { index: 0, previous: 3.0 });
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), &[7.0, 20.0]);
        assert_eq!(series.colors(), &[Some(GRANDE), Some(MEDIA)]);
    }

    #[test]
    fn test_unknown_category_gets_no_color() {
        let mut series = Series::new();
        series.upsert("Enorme".into(), 1.0);
        assert_eq!(series.colors(), &[None]);
        assert_invariants(&series);
    }

    #[test]
    fn test_invariants_hold_after_every_upsert() {
        let mut series = Series::new();
        let feed = [
            ("Grande", 1.0),
            ("Media", 2.0),
            ("Grande", 3.0),
            ("Pequena", 4.0),
            ("Outra", 5.0),
            ("Media", 6.0),
            ("Pequena", 7.0),
        ];
        let mut expected_len = 0;
        let mut seen = HashSet::new();
        for (name, value) in feed {
            let outcome = series.upsert(name.into(), value);
            if seen.insert(name) {
                expected_len += 1;
                assert!(outcome.is_insert());
            } else {
                assert!(!outcome.is_insert());
            }
            assert_eq!(series.len(), expected_len);
            assert_eq!(series.get(&name.into()), Some(value));
            assert_invariants(&series);
        }
    }

    #[test]
    fn test_iter_and_max() {
        let mut series = Series::new();
        assert_eq!(series.max_value(), None);
        series.upsert("Grande".into(), 3.0);
        series.upsert("Outra".into(), 11.5);

        let rows: Vec<_> = series.iter().map(|(l, v, c)| (l.as_str(), v, c)).collect();
        assert_eq!(rows, vec![("Grande", 3.0, Some(GRANDE)), ("Outra", 11.5, None)]);
        assert_eq!(series.max_value(), Some(11.5));
    }

    #[test]
    fn test_upsert_index_accessor() {
        assert_eq!(Upsert::Inserted { index: 4 }.index(), 4);
        assert_eq!(Upsert::Updated { index: 2, previous: 1.0 }.index(), 2);
    }
}
