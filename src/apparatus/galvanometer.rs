//! Galvanometer conversion to ammeter (shunt) and voltmeter (series resistor)

use super::{safe_div, Evaluation, ParameterSet, ParameterSpec};
use crate::geometry::{Animated, Color, Geometry, Point, Primitive, Stroke, TextStyle};
use crate::quantity::{Fields, Quantity};

/// Moving-coil galvanometer and the two target meter ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galvanometer {
    /// Full-scale current rating `Ig` (A).
    pub ig: f64,
    /// Coil resistance `G` (Ω).
    pub g: f64,
    /// Target ammeter range `I` (A).
    pub i: f64,
    /// Target voltmeter range `V` (V).
    pub v: f64,
}

/// Derived resistances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalvanometerResult {
    /// Shunt `S = Ig·G/(I − Ig)`; undefined when `I = Ig`.
    pub shunt: Option<f64>,
    /// Series resistor `Rs = V/Ig − G`; undefined when `Ig = 0`.
    pub series: Option<f64>,
}

impl Galvanometer {
    /// Declared controls.
    pub const PARAMETERS: [ParameterSpec; 4] = [
        ParameterSpec::new("Ig", "Full Scale Current", "A", 0.001, 0.1, 0.001, 0.01),
        ParameterSpec::new("G", "Galvanometer Resistance", "Ω", 10.0, 200.0, 5.0, 50.0),
        ParameterSpec::new("I", "Ammeter Range", "A", 0.1, 10.0, 0.1, 1.0),
        ParameterSpec::new("V", "Voltmeter Range", "V", 1.0, 50.0, 1.0, 10.0),
    ];

    /// Read the model inputs from a parameter set.
    #[must_use]
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            ig: params.require("Ig"),
            g: params.require("G"),
            i: params.require("I"),
            v: params.require("V"),
        }
    }

    /// Compute shunt and series resistances.
    #[must_use]
    pub fn solve(&self) -> GalvanometerResult {
        GalvanometerResult {
            shunt: safe_div(self.ig * self.g, self.i - self.ig),
            series: safe_div(self.v, self.ig).map(|r| r - self.g),
        }
    }

    /// Derived quantities and schematic.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        let result = self.solve();
        let derived: Fields = [
            ("shuntResistance", opt(result.shunt)),
            ("seriesResistance", opt(result.series)),
            ("fullScaleCurrent_mA", Quantity::number(self.ig * 1000.0)),
            ("ammeterRange", Quantity::number(self.i)),
            ("voltmeterRange", Quantity::number(self.v)),
        ]
        .into_iter()
        .collect();

        Evaluation {
            derived,
            geometry: self.sketch(&result),
        }
    }

    fn sketch(&self, r: &GalvanometerResult) -> Geometry {
        let (w, h) = (800.0, 500.0);
        let (cx, cy) = (w / 2.0, h / 2.0 - 20.0);
        let mut g = Geometry::new();

        g.push(Primitive::Circle {
            center: Point::new(cx, cy),
            radius: 60.0,
            fill: None,
            stroke: Some(Stroke::solid(Color::PURPLE, 4.0)),
            glow: Some((Color::PURPLE, 20.0)),
        });
        g.text(cx, cy + 6.0, "G", TextStyle::bold(18.0, Color::PURPLE));
        g.text(cx, cy + 24.0, format!("Rg = {} Ω", self.g), TextStyle::regular(12.0, Color::SLATE));
        g.push_animated(Animated::Needle {
            pivot: Point::new(cx, cy),
            length: 50.0,
            stroke: Stroke::solid(Color::RED, 3.0),
        });

        let panels = [
            (
                30.0,
                Color::EMERALD,
                "Ammeter",
                format!("Range: 0 – {} A", self.i),
                "Shunt Resistance:",
                format!("S = {} Ω", fixed(r.shunt, 4)),
                Color::CYAN,
                "Formula: S = IgG / (I - Ig)",
                "S connected in parallel",
            ),
            (
                w - 220.0,
                Color::BLUE,
                "Voltmeter",
                format!("Range: 0 – {} V", self.v),
                "Series Resistance:",
                format!("Rs = {} Ω", fixed(r.series, 2)),
                Color::AMBER,
                "Formula: Rs = V/Ig - G",
                "Rs connected in series",
            ),
        ];
        for (left, accent, title, range, caption, value, value_color, formula, wiring) in panels {
            let mid = left + 95.0;
            g.panel(
                left,
                40.0,
                190.0,
                180.0,
                accent.with_alpha(0.15),
                Some(Stroke::solid(accent, 2.0)),
            );
            g.text(mid, 62.0, title, TextStyle::bold(14.0, accent));
            let body = TextStyle::regular(12.0, Color::TEXT);
            g.text(mid, 84.0, range, body);
            g.text(mid, 106.0, caption, body);
            g.text(mid, 128.0, value, TextStyle::bold(15.0, value_color));
            let note = TextStyle::regular(11.0, Color::SLATE);
            g.text(mid, 150.0, formula, note);
            g.text(mid, 168.0, wiring, note);
            g.text(mid, 185.0, "with galvanometer", note);
        }

        g.text(
            cx,
            h - 30.0,
            format!(
                "Full-scale current: {:.1} mA   |   Galvanometer resistance: {} Ω",
                self.ig * 1000.0,
                self.g
            ),
            TextStyle::regular(12.0, Color::SLATE_DIM),
        );
        g
    }
}

fn opt(value: Option<f64>) -> Quantity {
    value.map_or(Quantity::Undefined, Quantity::number)
}

fn fixed(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{v:.precision$}"))
}
