//! Potentiometer - comparing the EMFs of two cells

use super::{safe_div, Evaluation, ParameterSet, ParameterSpec};
use crate::geometry::{Color, Geometry, Point, Stroke, TextStyle};
use crate::quantity::{Fields, Quantity};

/// `|e1/e2 - l1/l2|` below this counts as verified.
pub const VERIFY_TOLERANCE: f64 = 0.01;

/// Balanced potentiometer with two cells on a uniform wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Potentiometer {
    /// EMF of cell 1 (V).
    pub emf1: f64,
    /// EMF of cell 2 (V).
    pub emf2: f64,
    /// Total wire length (cm).
    pub wire_length: f64,
    /// Rheostat setting (Ω), shown on the schematic only.
    pub rheostat: f64,
}

/// Derived results of a potentiometer evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotentiometerResult {
    /// Balance length for cell 1 (cm).
    pub l1: Option<f64>,
    /// Balance length for cell 2 (cm).
    pub l2: Option<f64>,
    /// `e1/e2`.
    pub emf_ratio: Option<f64>,
    /// `l1/l2`.
    pub length_ratio: Option<f64>,
    /// Whether both ratios agree within [`VERIFY_TOLERANCE`].
    pub verified: Option<bool>,
}

impl Potentiometer {
    /// Declared controls.
    pub const PARAMETERS: [ParameterSpec; 4] = [
        ParameterSpec::new("emf1", "Cell 1 EMF", "V", 1.0, 3.0, 0.1, 1.5),
        ParameterSpec::new("emf2", "Cell 2 EMF", "V", 1.0, 3.0, 0.1, 1.1),
        ParameterSpec::new("wireLength", "Wire Length", "cm", 50.0, 200.0, 10.0, 100.0),
        ParameterSpec::new("rheostat", "Rheostat", "Ω", 1.0, 50.0, 1.0, 20.0),
    ];

    /// Read the model inputs from a parameter set.
    #[must_use]
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            emf1: params.require("emf1"),
            emf2: params.require("emf2"),
            wire_length: params.require("wireLength"),
            rheostat: params.require("rheostat"),
        }
    }

    /// Apply the potentiometer principle.
    #[must_use]
    pub fn solve(&self) -> PotentiometerResult {
        let total = self.emf1 + self.emf2;
        let l1 = safe_div(self.wire_length * self.emf1, total);
        let l2 = safe_div(self.wire_length * self.emf2, total);
        let emf_ratio = safe_div(self.emf1, self.emf2);
        let length_ratio = l1.zip(l2).and_then(|(a, b)| safe_div(a, b));
        let verified = emf_ratio
            .zip(length_ratio)
            .map(|(e, l)| (e - l).abs() < VERIFY_TOLERANCE);

        PotentiometerResult {
            l1,
            l2,
            emf_ratio,
            length_ratio,
            verified,
        }
    }

    /// Derived quantities and schematic.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        let result = self.solve();
        let verdict = match result.verified {
            Some(true) => Quantity::from("verified"),
            Some(false) => Quantity::from("not verified"),
            None => Quantity::Undefined,
        };

        let derived: Fields = [
            ("balanceLength1", opt(result.l1)),
            ("balanceLength2", opt(result.l2)),
            ("EMF_ratio", opt(result.emf_ratio)),
            ("length_ratio", opt(result.length_ratio)),
            ("verified", verdict),
        ]
        .into_iter()
        .collect();

        Evaluation {
            derived,
            geometry: self.sketch(&result),
        }
    }

    fn sketch(&self, r: &PotentiometerResult) -> Geometry {
        let (w, h) = (800.0, 500.0);
        let wire_y = h / 2.0 - 30.0;
        let (x1, x2) = (80.0, w - 80.0);
        let span = x2 - x1;
        let mut g = Geometry::new();

        g.line(
            Point::new(x1, wire_y),
            Point::new(x2, wire_y),
            Stroke::solid(Color::AMBER, 5.0),
        );
        let label = TextStyle::regular(13.0, Color::SLATE);
        g.text(x1, wire_y - 12.0, "A", label);
        g.text(x2, wire_y - 12.0, "B", label);

        let length = self.wire_length;
        g.scale(x1, x2, wire_y, 10, 8.0, |i| {
            format!("{}", f64::from(i) * length / 10.0)
        });

        // Jockey positions; skipped when the balance is undefined.
        let jockeys = [
            (r.l1, Color::EMERALD, 1.0, "J₁", "l₁", "E₁", self.emf1),
            (r.l2, Color::BLUE, -1.0, "J₂", "l₂", "E₂", self.emf2),
        ];
        for (len, color, dir, tag, sym, cell, emf) in jockeys {
            let Some(len) = len.filter(|_| length > 0.0) else {
                continue;
            };
            let x = x1 + (len / length) * span;
            g.line(
                Point::new(x, wire_y),
                Point::new(x, wire_y + dir * 80.0),
                Stroke::dashed(color, 3.0, 5.0, 4.0),
            );
            g.dot(Point::new(x, wire_y), 7.0, color);
            let bold = TextStyle::bold(10.0, Color::WHITE);
            g.text(x, wire_y + dir * 100.0, tag, bold);
            g.text(x, wire_y + dir * 115.0, format!("{sym} = {len:.1} cm"), bold);
            let box_y = if dir > 0.0 { wire_y + 120.0 } else { wire_y - 148.0 };
            g.fill_rect(x - 35.0, box_y, 70.0, 28.0, color);
            g.text(
                x,
                box_y + 19.0,
                format!("{cell} = {emf:.1}V"),
                TextStyle::regular(11.0, Color::WHITE),
            );
        }

        g.fill_rect(x1 - 60.0, wire_y - 20.0, 50.0, 40.0, Color::PURPLE);
        g.text(
            x1 - 35.0,
            wire_y + 5.0,
            format!("Rh={}Ω", self.rheostat),
            TextStyle::regular(10.0, Color::WHITE),
        );

        g.panel(w - 200.0, 20.0, 180.0, 90.0, Color::PANEL, None);
        g.text(w - 110.0, 40.0, "Results", TextStyle::bold(13.0, Color::CYAN));
        let body = TextStyle::regular(12.0, Color::TEXT);
        g.text(w - 110.0, 60.0, format!("E₁/E₂ = {}", fixed(r.emf_ratio, 3)), body);
        g.text(w - 110.0, 78.0, format!("l₁/l₂ = {}", fixed(r.length_ratio, 3)), body);
        let (verdict, color) = match r.verified {
            Some(true) => ("Verified ✓", Color::EMERALD),
            Some(false) => ("Not verified ✗", Color::RED),
            None => ("Undefined", Color::RED),
        };
        g.text(w - 110.0, 96.0, verdict, TextStyle::regular(12.0, color));
        g
    }
}

fn opt(value: Option<f64>) -> Quantity {
    value.map_or(Quantity::Undefined, Quantity::number)
}

fn fixed(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.precision$}"))
}
