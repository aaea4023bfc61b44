//! Graph composer - turns readings into per-run plottable series
//!
//! ## Series model
//!
//! ```text
//! ChartData
//!   ├── x_key, y_keys[]
//!   └──< Series (one per run, colour = PALETTE[run index % 7])
//!          └──< SeriesPoint { index, x, y[] }   y[i] ↔ y_keys[i], None = gap
//! ```
//!
//! A reading becomes a point when its X value is numeric. Missing or
//! non-numeric Y values are kept as `None` so the chart can draw a gap
//! instead of compressing the X domain; whether lines connect across gaps
//! is the host's display choice.

use serde::Serialize;

use crate::experiment::{Reading, ReadingLog};
use crate::geometry::Color;

/// Cyclic run palette.
pub const PALETTE: [Color; 7] = [
    Color::hex(0x00_d4_ff),
    Color::hex(0x79_28_ca),
    Color::hex(0x10_b9_81),
    Color::hex(0xf5_9e_0b),
    Color::hex(0xef_44_44),
    Color::hex(0xec_48_99),
    Color::hex(0xa7_8b_fa),
];

/// Label of the series built from the unsaved log.
pub const CURRENT_LABEL: &str = "Current";

/// Colour for the run at `index`.
#[must_use]
pub const fn run_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Point ordering within a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PointOrder {
    /// Recording order (replay semantics).
    #[default]
    Insertion,
    /// Stable ascending sort on the X value.
    ByX,
}

/// Line or scatter rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    /// Connected line chart.
    #[default]
    Line,
    /// Unconnected markers.
    Scatter,
}

/// Display flags passed through to the host chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartStyle {
    /// Line or scatter.
    pub kind: ChartKind,
    /// Draw point markers.
    pub show_points: bool,
    /// Draw connecting lines.
    pub show_lines: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            show_points: true,
            show_lines: true,
        }
    }
}

/// Chosen X key and set of Y keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisSelection {
    x: String,
    y: Vec<String>,
}

impl AxisSelection {
    /// Explicit selection. `x` is dropped from `y` if present.
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let x = x.into();
        let mut selection = Self { x, y: Vec::new() };
        for key in y {
            let key = key.into();
            if key != selection.x && !selection.y.contains(&key) {
                selection.y.push(key);
            }
        }
        selection
    }

    /// First variable on X, second on Y; `None` with fewer than two.
    #[must_use]
    pub fn default_for(variables: &[String]) -> Option<Self> {
        match variables {
            [x, y, ..] => Some(Self::new(x.as_str(), [y.as_str()])),
            _ => None,
        }
    }

    /// X key.
    #[must_use]
    pub fn x(&self) -> &str {
        &self.x
    }

    /// Y keys in selection order.
    #[must_use]
    pub fn y(&self) -> &[String] {
        &self.y
    }

    /// Change the X key, removing it from the Y set.
    pub fn set_x(&mut self, key: impl Into<String>) {
        self.x = key.into();
        let x = self.x.clone();
        self.y.retain(|k| *k != x);
    }

    /// Add or remove a Y key. The X key cannot become a Y key.
    pub fn toggle_y(&mut self, key: &str) {
        if key == self.x {
            return;
        }
        if let Some(pos) = self.y.iter().position(|k| k == key) {
            self.y.remove(pos);
        } else {
            self.y.push(key.to_string());
        }
    }
}

/// One plotted reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Position of the reading within its run.
    pub index: usize,
    /// X value.
    pub x: f64,
    /// Y values aligned with [`ChartData::y_keys`]; `None` marks a gap.
    pub y: Vec<Option<f64>>,
}

/// Points of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Run label.
    pub label: String,
    /// Run colour.
    pub color: Color,
    /// Points in the requested order.
    pub points: Vec<SeriesPoint>,
}

/// Input for one series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSource<'a> {
    /// Series label.
    pub label: &'a str,
    /// Readings to plot.
    pub readings: &'a [Reading],
    /// Index into [`PALETTE`] (the run's position among all runs).
    pub color_index: usize,
}

/// Everything a host chart needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// X key.
    pub x_key: String,
    /// Y keys, aligned with every point's `y`.
    pub y_keys: Vec<String>,
    /// One series per plotted run.
    pub series: Vec<Series>,
    /// Display flags.
    pub style: ChartStyle,
}

impl ChartData {
    /// Whether no series has any point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Build per-run series for `x_key` against `y_keys`.
#[must_use]
pub fn build_series(
    x_key: &str,
    y_keys: &[String],
    sources: &[SeriesSource<'_>],
    order: PointOrder,
) -> Vec<Series> {
    sources
        .iter()
        .map(|source| {
            let mut points: Vec<SeriesPoint> = source
                .readings
                .iter()
                .enumerate()
                .filter_map(|(index, reading)| {
                    let x = reading.get(x_key)?.as_f64()?;
                    let y = y_keys
                        .iter()
                        .map(|k| reading.get(k).and_then(|q| q.as_f64()))
                        .collect();
                    Some(SeriesPoint { index, x, y })
                })
                .collect();
            if order == PointOrder::ByX {
                points.sort_by(|a, b| a.x.total_cmp(&b.x));
            }
            Series {
                label: source.label.to_string(),
                color: run_color(source.color_index),
                points,
            }
        })
        .collect()
}

/// Variables available for axes: keys of the first current reading, or of
/// the first saved run's first reading.
#[must_use]
pub fn variables(log: &ReadingLog) -> Vec<String> {
    log.current()
        .first()
        .or_else(|| log.runs().first().and_then(|r| r.readings().first()))
        .map(|r| r.keys().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Stateful composer: axis selection, style and ordering for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphComposer {
    axes: Option<AxisSelection>,
    style: ChartStyle,
    order: PointOrder,
}

impl GraphComposer {
    /// Composer with no axes chosen yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current axis selection.
    #[must_use]
    pub const fn axes(&self) -> Option<&AxisSelection> {
        self.axes.as_ref()
    }

    /// Replace the axis selection.
    pub fn select(&mut self, axes: AxisSelection) {
        self.axes = Some(axes);
    }

    /// Mutable access to the axis selection, if any.
    pub fn axes_mut(&mut self) -> Option<&mut AxisSelection> {
        self.axes.as_mut()
    }

    /// Set display flags.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Set point ordering.
    pub fn set_order(&mut self, order: PointOrder) {
        self.order = order;
    }

    /// Chart for a log: every visible saved run, or the current readings
    /// as a single `Current` series when nothing has been saved.
    ///
    /// Picks default axes on first use. Returns `None` when fewer than two
    /// variables exist.
    pub fn compose(&mut self, log: &ReadingLog) -> Option<ChartData> {
        if self.axes.is_none() {
            self.axes = AxisSelection::default_for(&variables(log));
        }
        let axes = self.axes.as_ref()?;

        let sources: Vec<SeriesSource<'_>> = if log.run_count() > 0 {
            log.runs()
                .iter()
                .enumerate()
                .filter(|(_, run)| run.is_visible())
                .map(|(i, run)| SeriesSource {
                    label: run.label(),
                    readings: run.readings(),
                    color_index: i,
                })
                .collect()
        } else {
            vec![SeriesSource {
                label: CURRENT_LABEL,
                readings: log.current(),
                color_index: 0,
            }]
        };

        Some(ChartData {
            x_key: axes.x().to_string(),
            y_keys: axes.y().to_vec(),
            series: build_series(axes.x(), axes.y(), &sources, self.order),
            style: self.style,
        })
    }
}
