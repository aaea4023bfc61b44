//! Control panel state - bounded parameter values for the active apparatus

use tracing::warn;

use crate::apparatus::{Apparatus, Evaluation, ParameterSet, ParameterSpec};
use crate::{Error, Result};

/// Current control values of one apparatus.
///
/// Every mutation clamps into the declared `[min, max]` so the panel can
/// never hold an invalid value, then re-evaluates the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    apparatus: Apparatus,
    values: ParameterSet,
}

impl ControlPanel {
    /// Panel seeded from the apparatus defaults.
    #[must_use]
    pub fn new(apparatus: Apparatus) -> Self {
        Self {
            apparatus,
            values: apparatus.defaults(),
        }
    }

    /// The apparatus these controls drive.
    #[must_use]
    pub const fn apparatus(&self) -> Apparatus {
        self.apparatus
    }

    /// Control declarations, in display order.
    #[must_use]
    pub const fn specs(&self) -> &'static [ParameterSpec] {
        self.apparatus.parameters()
    }

    /// Current values.
    #[must_use]
    pub const fn values(&self) -> &ParameterSet {
        &self.values
    }

    /// Current value of one control.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.get(id)
    }

    /// Set a control, clamping out-of-range input.
    ///
    /// Returns the updated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if the apparatus declares no
    /// control named `id`.
    pub fn set_parameter(&mut self, id: &str, raw: f64) -> Result<&ParameterSet> {
        let spec = self
            .apparatus
            .parameter(id)
            .ok_or_else(|| Error::UnknownParameter {
                apparatus: self.apparatus.id().to_string(),
                parameter: id.to_string(),
            })?;
        let value = spec.clamp(raw);
        if value.to_bits() != raw.to_bits() {
            warn!(parameter = id, raw, clamped = value, "control value clamped to bounds");
        }
        self.values.set(id, value);
        Ok(&self.values)
    }

    /// Set a control and evaluate the model in one step.
    ///
    /// # Errors
    ///
    /// Same as [`ControlPanel::set_parameter`].
    pub fn update(&mut self, id: &str, raw: f64) -> Result<Evaluation> {
        self.set_parameter(id, raw)?;
        Ok(self.evaluate())
    }

    /// Restore every control to its default.
    pub fn reset(&mut self) {
        self.values = self.apparatus.defaults();
    }

    /// Evaluate the model at the current values.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        self.apparatus.compute(&self.values)
    }
}
