//! Tabular view over readings: columns, free-text filter, stable sort
//!
//! Every operation here builds a new sequence (of readings or of row
//! indices). The canonical reading order in the log is never touched, so
//! the graph, statistics and export consumers are unaffected by whatever
//! the table happens to show.

use serde::Serialize;

use crate::experiment::Reading;
use crate::quantity::Quantity;

/// Name of the 1-based row-number column.
pub const ROW_NUMBER: &str = "#";

/// Default decimals for numeric cells.
pub const DEFAULT_PRECISION: usize = 4;

/// `#` followed by the first reading's input keys, then its output keys.
#[must_use]
pub fn columns(readings: &[Reading]) -> Vec<String> {
    let mut columns = vec![ROW_NUMBER.to_string()];
    if let Some(first) = readings.first() {
        columns.extend(first.keys().into_iter().map(str::to_string));
    }
    columns
}

/// Display text for one cell: numbers to `precision` decimals, text
/// verbatim, undefined as `N/A`, missing as empty.
#[must_use]
pub fn format_cell(value: Option<&Quantity>, precision: usize) -> String {
    value.map(|q| q.to_fixed(precision)).unwrap_or_default()
}

/// Whether any data cell of `reading` contains `needle` (already lowercased).
fn matches(reading: &Reading, needle: &str) -> bool {
    reading
        .inputs()
        .iter()
        .chain(reading.outputs().iter())
        .any(|(_, value)| value.to_string().to_lowercase().contains(needle))
}

/// Indices of readings with a cell containing `query`, case-insensitive.
///
/// A blank query keeps every row. Otherwise the query is matched as typed,
/// surrounding whitespace included.
#[must_use]
pub fn filter_indices(readings: &[Reading], query: &str) -> Vec<usize> {
    let active = !query.trim().is_empty();
    let needle = query.to_lowercase();
    readings
        .iter()
        .enumerate()
        .filter(|(_, r)| !active || matches(r, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Readings matching `query`, as a new sequence in log order.
#[must_use]
pub fn filter(readings: &[Reading], query: &str) -> Vec<Reading> {
    filter_indices(readings, query)
        .into_iter()
        .map(|i| readings[i].clone())
        .collect()
}

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

// Missing and non-numeric cells compare as 0.
fn sort_value(readings: &[Reading], index: usize, column: &str) -> f64 {
    if column == ROW_NUMBER {
        #[allow(clippy::cast_precision_loss)]
        return (index + 1) as f64;
    }
    readings[index]
        .get(column)
        .and_then(Quantity::as_f64)
        .unwrap_or(0.0)
}

/// Stable sort of row `indices` by `column`.
pub fn sort_indices(
    readings: &[Reading],
    indices: &mut [usize],
    column: &str,
    direction: SortDirection,
) {
    indices.sort_by(|&a, &b| {
        let ord = sort_value(readings, a, column).total_cmp(&sort_value(readings, b, column));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Readings sorted by `column`, as a new sequence.
#[must_use]
pub fn sort(readings: &[Reading], column: &str, direction: SortDirection) -> Vec<Reading> {
    let mut indices: Vec<usize> = (0..readings.len()).collect();
    sort_indices(readings, &mut indices, column, direction);
    indices.into_iter().map(|i| readings[i].clone()).collect()
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Index into the canonical reading sequence.
    pub index: usize,
    /// Formatted cells aligned with [`TableView::columns`].
    pub cells: Vec<String>,
}

/// Filter text plus sort state for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    query: String,
    sort: Option<(String, SortDirection)>,
    precision: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl TableView {
    /// Unfiltered, unsorted view.
    #[must_use]
    pub const fn new(precision: usize) -> Self {
        Self {
            query: String::new(),
            sort: None,
            precision,
        }
    }

    /// Current filter text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active sort column and direction.
    #[must_use]
    pub fn sort_key(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    /// Replace the filter text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Sort by `column`; selecting the active column again flips direction.
    pub fn sort_by(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some((active, direction)) if active == column => (active, direction.toggled()),
            _ => (column.to_string(), SortDirection::Ascending),
        });
    }

    /// Drop the sort, returning to log order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Column headers for `readings`.
    #[must_use]
    pub fn columns(&self, readings: &[Reading]) -> Vec<String> {
        columns(readings)
    }

    /// Filtered then sorted rows.
    #[must_use]
    pub fn rows(&self, readings: &[Reading]) -> Vec<TableRow> {
        let columns = columns(readings);
        let mut indices = filter_indices(readings, &self.query);
        if let Some((column, direction)) = &self.sort {
            sort_indices(readings, &mut indices, column, *direction);
        }
        indices
            .into_iter()
            .map(|index| TableRow {
                index,
                cells: columns
                    .iter()
                    .map(|column| {
                        if column == ROW_NUMBER {
                            (index + 1).to_string()
                        } else {
                            format_cell(readings[index].get(column), self.precision)
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}
