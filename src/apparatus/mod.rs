//! Apparatus models - closed-form physics for each simulated instrument
//!
//! Every apparatus is a pure function from a [`ParameterSet`] to an
//! [`Evaluation`]: derived quantities plus schematic [`Geometry`].
//! Dispatch is a single `match` over the closed [`Apparatus`] enum; each
//! variant's formulas live in their own module and are testable alone.
//!
//! ```text
//! ParameterSet ──> Apparatus::compute ──┬──> derived: Fields   (Reading outputs)
//!                                       └──> geometry: Geometry (renderer input)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use physlab::apparatus::Apparatus;
//! use physlab::quantity::Quantity;
//!
//! let bridge = Apparatus::MeterBridge;
//! let mut params = bridge.defaults();
//! params.set("knownR", 10.0);
//! params.set("unknownR", 15.0);
//!
//! let eval = bridge.compute(&params);
//! assert_eq!(eval.derived.get("balancePoint"), Some(&Quantity::Number(40.0)));
//! ```

mod galvanometer;
mod induction;
mod meter_bridge;
mod potentiometer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::quantity::Fields;
use crate::{Error, Result};

pub use galvanometer::Galvanometer;
pub use induction::Induction;
pub use meter_bridge::MeterBridge;
pub use potentiometer::Potentiometer;

/// Denominators with magnitude at or below this are treated as zero.
pub const NEAR_ZERO: f64 = 1e-9;

/// Divide, returning `None` when the denominator is (near) zero or the
/// result is not finite.
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() <= NEAR_ZERO {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

/// Declaration of one adjustable control.
///
/// Invariant: `min <= default <= max` and `step > 0`, checked by
/// [`ParameterSpec::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Identifier used as the reading input key.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Unit string (may be empty).
    pub unit: &'static str,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Slider increment.
    pub step: f64,
    /// Initial value.
    pub default: f64,
}

impl ParameterSpec {
    /// Declare a control.
    #[must_use]
    pub const fn new(
        id: &'static str,
        label: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Self {
        Self {
            id,
            label,
            unit,
            min,
            max,
            step,
            default,
        }
    }

    /// Check the declaration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSpec`] if `min <= default <= max`
    /// or `step > 0` does not hold.
    pub fn validate(&self) -> Result<()> {
        if !(self.min <= self.default && self.default <= self.max) {
            return Err(Error::InvalidParameterSpec(format!(
                "{}: default {} outside [{}, {}]",
                self.id, self.default, self.min, self.max
            )));
        }
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(Error::InvalidParameterSpec(format!(
                "{}: step must be positive, got {}",
                self.id, self.step
            )));
        }
        Ok(())
    }

    /// Clamp a raw value into `[min, max]`. `NaN` falls back to the default.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            self.default
        } else {
            raw.clamp(self.min, self.max)
        }
    }
}

/// Current value of every control of one apparatus, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: Vec<(String, f64)>,
}

impl ParameterSet {
    /// Seed a set from the declared defaults.
    #[must_use]
    pub fn from_specs(specs: &[ParameterSpec]) -> Self {
        Self {
            values: specs.iter().map(|s| (s.id.to_string(), s.default)).collect(),
        }
    }

    /// Value of a parameter, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| k == id).map(|(_, v)| *v)
    }

    /// Value of a parameter the model requires.
    ///
    /// A missing parameter is a programming error in the catalog; debug
    /// builds panic, release builds read it as `0.0`.
    #[must_use]
    pub fn require(&self, id: &str) -> f64 {
        let value = self.get(id);
        debug_assert!(value.is_some(), "parameter '{id}' missing from set");
        value.unwrap_or(0.0)
    }

    /// Set a value without bounds checking (see
    /// [`ControlPanel`](crate::controls::ControlPanel) for clamped updates).
    pub fn set(&mut self, id: &str, value: f64) {
        if let Some(slot) = self.values.iter_mut().find(|(k, _)| k == id) {
            slot.1 = value;
        } else {
            self.values.push((id.to_string(), value));
        }
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot as reading inputs.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        self.iter().collect()
    }
}

/// Output of one model evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Derived quantities keyed by output name.
    pub derived: Fields,
    /// Schematic for the renderer.
    pub geometry: Geometry,
}

impl Evaluation {
    /// Names of outputs that came out undefined, for surfacing as warnings.
    #[must_use]
    pub fn undefined_outputs(&self) -> Vec<&str> {
        self.derived
            .iter()
            .filter(|(_, v)| v.is_undefined())
            .map(|(k, _)| k)
            .collect()
    }
}

/// The closed set of simulated instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Apparatus {
    /// Comparing two EMFs on a potentiometer wire.
    Potentiometer,
    /// Wheatstone meter bridge for an unknown resistance.
    MeterBridge,
    /// Galvanometer converted to ammeter and voltmeter.
    Galvanometer,
    /// Faraday induction in a coil with a moving magnet.
    EmInduction,
}

impl Apparatus {
    /// Every catalogued apparatus.
    pub const ALL: [Self; 4] = [
        Self::Potentiometer,
        Self::MeterBridge,
        Self::Galvanometer,
        Self::EmInduction,
    ];

    /// Catalog identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Potentiometer => "potentiometer",
            Self::MeterBridge => "meter-bridge",
            Self::Galvanometer => "galvanometer",
            Self::EmInduction => "em-induction",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Potentiometer => "Potentiometer EMF",
            Self::MeterBridge => "Meter Bridge",
            Self::Galvanometer => "Galvanometer Conversion",
            Self::EmInduction => "Electromagnetic Induction",
        }
    }

    /// Curriculum grade the experiment belongs to.
    #[must_use]
    pub const fn grade(self) -> &'static str {
        "class12"
    }

    /// Topic category.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::EmInduction => "magnetism",
            _ => "electricity",
        }
    }

    /// One-line statement of the governing principle.
    #[must_use]
    pub const fn theory(self) -> &'static str {
        match self {
            Self::Potentiometer => "E₁/E₂ = l₁/l₂ (Potentiometer principle)",
            Self::MeterBridge => "R/S = l/(100-l), Wheatstone bridge balance",
            Self::Galvanometer => "S = IgG/(I-Ig) for ammeter, R = V/Ig - G for voltmeter",
            Self::EmInduction => "ε = -N(dΦ/dt) (Faraday's Law)",
        }
    }

    /// Declared controls, in display order.
    #[must_use]
    pub const fn parameters(self) -> &'static [ParameterSpec] {
        match self {
            Self::Potentiometer => &Potentiometer::PARAMETERS,
            Self::MeterBridge => &MeterBridge::PARAMETERS,
            Self::Galvanometer => &Galvanometer::PARAMETERS,
            Self::EmInduction => &Induction::PARAMETERS,
        }
    }

    /// Look up one control declaration.
    #[must_use]
    pub fn parameter(self, id: &str) -> Option<&'static ParameterSpec> {
        self.parameters().iter().find(|p| p.id == id)
    }

    /// Fresh parameter set seeded from defaults.
    #[must_use]
    pub fn defaults(self) -> ParameterSet {
        ParameterSet::from_specs(self.parameters())
    }

    /// Evaluate the model. Callers clamp values first; the model does not
    /// re-validate bounds.
    #[must_use]
    pub fn compute(self, params: &ParameterSet) -> Evaluation {
        match self {
            Self::Potentiometer => Potentiometer::from_params(params).evaluate(),
            Self::MeterBridge => MeterBridge::from_params(params).evaluate(),
            Self::Galvanometer => Galvanometer::from_params(params).evaluate(),
            Self::EmInduction => Induction::from_params(params).evaluate(),
        }
    }
}

impl fmt::Display for Apparatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Apparatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| Error::UnknownApparatus(s.to_string()))
    }
}
