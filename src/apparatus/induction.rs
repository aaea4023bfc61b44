//! Electromagnetic induction - Faraday's law with an oscillating magnet

use std::f64::consts::PI;

use super::{safe_div, Evaluation, ParameterSet, ParameterSpec};
use crate::geometry::{Animated, Color, Geometry, Point, Primitive, Size, Stroke, TextStyle};
use crate::quantity::{Fields, Quantity};

/// Coil of `N` turns threaded by a flux swinging with period `T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Induction {
    /// Peak magnetic flux Φ (Wb).
    pub flux: f64,
    /// Number of coil turns N.
    pub turns: f64,
    /// Period of the magnet's motion T (s).
    pub period: f64,
}

impl Induction {
    /// Declared controls.
    pub const PARAMETERS: [ParameterSpec; 3] = [
        ParameterSpec::new("flux", "Magnetic Flux", "Wb", 0.01, 0.5, 0.01, 0.1),
        ParameterSpec::new("turns", "Coil Turns", "", 10.0, 200.0, 10.0, 50.0),
        ParameterSpec::new("period", "Time Period", "s", 0.1, 2.0, 0.1, 0.5),
    ];

    /// Read the model inputs from a parameter set.
    #[must_use]
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            flux: params.require("flux"),
            turns: params.require("turns"),
            period: params.require("period"),
        }
    }

    /// Peak induced EMF `N·Φ/T` (V).
    #[must_use]
    pub fn emf(&self) -> Option<f64> {
        safe_div(self.turns * self.flux, self.period)
    }

    /// Derived quantities and schematic.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        let emf = self.emf();
        let derived: Fields = [("emf", emf.map_or(Quantity::Undefined, Quantity::number))]
            .into_iter()
            .collect();

        Evaluation {
            derived,
            geometry: self.sketch(emf),
        }
    }

    fn sketch(&self, emf: Option<f64>) -> Geometry {
        let (w, h) = (800.0, 500.0);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let mut g = Geometry::new();

        for i in 0..8 {
            g.push(Primitive::Ellipse {
                center: Point::new(cx - 100.0 + f64::from(i) * 28.0, cy),
                rx: 12.0,
                ry: 40.0,
                stroke: Stroke::solid(Color::AMBER, 3.0),
            });
        }

        // Without a usable period the magnet stays at rest.
        let period = if self.period > 0.0 { self.period } else { 1.0 };
        let pole = TextStyle::bold(14.0, Color::WHITE);
        g.push_animated(Animated::Oscillator {
            parts: vec![
                Primitive::Rect {
                    origin: Point::new(cx - 20.0, cy - 25.0),
                    size: Size::new(40.0, 25.0),
                    fill: Some(Color::RED),
                    stroke: None,
                    radius: 0.0,
                },
                Primitive::Rect {
                    origin: Point::new(cx - 20.0, cy),
                    size: Size::new(40.0, 25.0),
                    fill: Some(Color::BLUE),
                    stroke: None,
                    radius: 0.0,
                },
                Primitive::Text {
                    position: Point::new(cx, cy - 7.0),
                    content: "N".to_string(),
                    style: pole,
                },
                Primitive::Text {
                    position: Point::new(cx, cy + 18.0),
                    content: "S".to_string(),
                    style: pole,
                },
            ],
            amplitude: if self.period > 0.0 { 120.0 } else { 0.0 },
            period,
        });
        g.push_animated(Animated::Arrow {
            tail: Point::new(cx - 80.0, cy - 60.0),
            scale: self.flux * 60.0,
            period,
            stroke: Stroke::solid(Color::CYAN, 2.0),
        });

        // EMF waveform over four periods
        let wave_y = h - 80.0;
        if let Some(emf) = emf {
            let (left, right) = (50.0_f64, w - 50.0);
            let samples = (right - left) as u32;
            let points = (0..samples)
                .map(|k| {
                    let x = left + f64::from(k);
                    let tau = (x - left) / (right - left) * 4.0 * self.period;
                    Point::new(x, wave_y - emf * 30.0 * (tau * 2.0 * PI / self.period).cos())
                })
                .collect();
            g.push(Primitive::Polyline {
                points,
                stroke: Stroke::solid(Color::EMERALD, 2.0),
            });
        }
        g.line(
            Point::new(50.0, wave_y),
            Point::new(w - 50.0, wave_y),
            Stroke::solid(Color::SLATE.with_alpha(0.3), 1.0),
        );

        g.panel(20.0, 20.0, 200.0, 80.0, Color::PANEL, None);
        g.text(120.0, 40.0, "Faraday's Law", TextStyle::bold(13.0, Color::CYAN));
        let body = TextStyle::regular(12.0, Color::TEXT);
        let emf_text = emf.map_or_else(|| "N/A".to_string(), |e| format!("{e:.3}"));
        g.text(120.0, 60.0, format!("ε = {emf_text} V"), body);
        g.text(120.0, 78.0, format!("N = {}, Φ = {} Wb", self.turns, self.flux), body);
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_emf() {
        let coil = Induction {
            flux: 0.1,
            turns: 50.0,
            period: 0.5,
        };
        assert!((coil.emf().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_period_is_undefined() {
        let coil = Induction {
            flux: 0.1,
            turns: 50.0,
            period: 0.0,
        };
        let eval = coil.evaluate();
        assert_eq!(eval.derived.get("emf"), Some(&Quantity::Undefined));
        assert!(eval.geometry.is_animated());
    }
}
