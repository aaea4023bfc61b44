//! Meter bridge - Wheatstone balance on a 100 cm wire

use super::{safe_div, Evaluation, ParameterSet, ParameterSpec};
use crate::geometry::{Color, Geometry, Point, Primitive, Stroke, TextStyle};
use crate::quantity::{Fields, Quantity};

/// Percent error below which the reading is highlighted as good.
const GOOD_ERROR_PERCENT: f64 = 2.0;

/// Meter bridge with a known resistance `R` and an unknown `S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterBridge {
    /// Known resistance R (Ω).
    pub known_r: f64,
    /// True value of the unknown resistance S (Ω).
    pub unknown_r: f64,
    /// Wire resistance per metre (Ω/m), shown for context only.
    pub wire_resistance: f64,
}

/// Derived results of a meter bridge evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterBridgeResult {
    /// Balance length `l` from the left end (cm).
    pub balance_point: Option<f64>,
    /// `S` recovered from the balance, `R·(100 − l)/l`.
    pub measured: Option<f64>,
    /// `|S_meas − S_true| / S_true · 100`.
    pub percent_error: Option<f64>,
}

impl MeterBridge {
    /// Declared controls.
    pub const PARAMETERS: [ParameterSpec; 3] = [
        ParameterSpec::new("knownR", "Known Resistance", "Ω", 10.0, 500.0, 10.0, 100.0),
        ParameterSpec::new("unknownR", "Unknown R (Actual)", "Ω", 10.0, 500.0, 10.0, 150.0),
        ParameterSpec::new("wireResistance", "Wire Resistance", "Ω/m", 0.1, 2.0, 0.1, 1.0),
    ];

    /// Read the model inputs from a parameter set.
    #[must_use]
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            known_r: params.require("knownR"),
            unknown_r: params.require("unknownR"),
            wire_resistance: params.require("wireResistance"),
        }
    }

    /// Solve the bridge balance.
    #[must_use]
    pub fn solve(&self) -> MeterBridgeResult {
        let balance_point = safe_div(100.0 * self.known_r, self.known_r + self.unknown_r);
        let measured = balance_point.and_then(|l| safe_div(self.known_r * (100.0 - l), l));
        let percent_error = measured
            .and_then(|s| safe_div((s - self.unknown_r).abs(), self.unknown_r))
            .map(|ratio| ratio * 100.0);

        MeterBridgeResult {
            balance_point,
            measured,
            percent_error,
        }
    }

    /// Derived quantities and schematic.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        let result = self.solve();
        let derived: Fields = [
            ("balancePoint", opt(result.balance_point)),
            ("measuredResistance", opt(result.measured)),
            ("actualResistance", Quantity::number(self.unknown_r)),
            ("percentError", opt(result.percent_error)),
        ]
        .into_iter()
        .collect();

        Evaluation {
            derived,
            geometry: self.sketch(&result),
        }
    }

    fn sketch(&self, r: &MeterBridgeResult) -> Geometry {
        let (w, h) = (800.0, 500.0);
        let y = h / 2.0;
        let (x1, x2) = (80.0, w - 80.0);
        let mut g = Geometry::new();

        g.line(Point::new(x1, y), Point::new(x2, y), Stroke::solid(Color::SLATE, 6.0));
        g.scale(x1, x2, y, 10, 10.0, |i| format!("{}", i * 10));

        if let Some(l) = r.balance_point {
            let bx = x1 + (l / 100.0) * (x2 - x1);
            g.line(
                Point::new(bx, y - 60.0),
                Point::new(bx, y + 60.0),
                Stroke::dashed(Color::CYAN, 3.0, 4.0, 4.0),
            );
            g.push(Primitive::Circle {
                center: Point::new(bx, y),
                radius: 9.0,
                fill: Some(Color::CYAN),
                stroke: None,
                glow: Some((Color::CYAN, 12.0)),
            });
            g.text(bx, y + 80.0, format!("D ({l:.1} cm)"), TextStyle::bold(12.0, Color::WHITE));

            // Galvanometer above the jockey
            g.line(
                Point::new(bx, y - 60.0),
                Point::new(bx, y - 100.0),
                Stroke::solid(Color::VIOLET, 2.0),
            );
            g.dot(Point::new(bx, y - 115.0), 15.0, Color::VIOLET);
            g.text(bx, y - 110.0, "G", TextStyle::bold(14.0, Color::WHITE));
        }

        let small = TextStyle::regular(11.0, Color::WHITE);
        g.fill_rect(x1 - 60.0, y - 30.0, 55.0, 35.0, Color::EMERALD);
        g.text(x1 - 32.0, y - 12.0, "R (Known)", small);
        g.text(x1 - 32.0, y + 5.0, format!("{} Ω", self.known_r), small);
        g.fill_rect(x2 + 5.0, y - 30.0, 55.0, 35.0, Color::AMBER);
        g.text(x2 + 32.0, y - 12.0, "S (Unknown)", small);
        g.text(x2 + 32.0, y + 5.0, format!("{} Ω", self.unknown_r), small);

        g.panel(20.0, 20.0, 200.0, 100.0, Color::PANEL, None);
        g.text(120.0, 40.0, "Wheatstone Bridge", TextStyle::bold(13.0, Color::CYAN));
        let body = TextStyle::regular(12.0, Color::TEXT);
        g.text(120.0, 60.0, format!("Balance Point l = {} cm", fixed(r.balance_point)), body);
        g.text(120.0, 78.0, format!("Measured S = {} Ω", fixed(r.measured)), body);
        let color = match r.percent_error {
            Some(e) if e < GOOD_ERROR_PERCENT => Color::EMERALD,
            _ => Color::AMBER,
        };
        g.text(
            120.0,
            96.0,
            format!("Error = {}%", fixed(r.percent_error)),
            TextStyle::regular(12.0, color),
        );
        g
    }
}

fn opt(value: Option<f64>) -> Quantity {
    value.map_or(Quantity::Undefined, Quantity::number)
}

fn fixed(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_bridge() {
        let bridge = MeterBridge {
            known_r: 10.0,
            unknown_r: 15.0,
            wire_resistance: 1.0,
        };
        let r = bridge.solve();
        assert!((r.balance_point.unwrap() - 40.0).abs() < 1e-9);
        assert!((r.measured.unwrap() - 15.0).abs() < 1e-9);
        assert!(r.percent_error.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_bridge_is_undefined() {
        let bridge = MeterBridge {
            known_r: 0.0,
            unknown_r: 0.0,
            wire_resistance: 1.0,
        };
        let eval = bridge.evaluate();
        assert_eq!(eval.derived.get("balancePoint"), Some(&Quantity::Undefined));
        assert_eq!(eval.derived.get("percentError"), Some(&Quantity::Undefined));
        assert_eq!(eval.derived.get("actualResistance"), Some(&Quantity::Number(0.0)));
    }

    #[test]
    fn test_zero_known_resistance_leaves_measurement_undefined() {
        let bridge = MeterBridge {
            known_r: 0.0,
            unknown_r: 20.0,
            wire_resistance: 1.0,
        };
        let r = bridge.solve();
        assert_eq!(r.balance_point, Some(0.0));
        assert_eq!(r.measured, None);
    }
}
