//! Laboratory configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Host-facing settings for a lab session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    frame_rate: u32,
    viewport: Size,
    report_precision: usize,
    table_precision: usize,
}

impl LabConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> LabConfigBuilder {
        LabConfigBuilder::default()
    }

    /// Animation ticks per second.
    #[must_use]
    pub const fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Interval between animation ticks.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    /// Target viewport the renderer maps onto.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Decimals used by the statistics report.
    #[must_use]
    pub const fn report_precision(&self) -> usize {
        self.report_precision
    }

    /// Decimals used for numeric table cells.
    #[must_use]
    pub const fn table_precision(&self) -> usize {
        self.table_precision
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfigBuilder::default().build()
    }
}

/// Builder for `LabConfig`.
#[derive(Debug)]
pub struct LabConfigBuilder {
    frame_rate: u32,
    viewport: Size,
    report_precision: usize,
    table_precision: usize,
}

impl Default for LabConfigBuilder {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            viewport: Size::CANVAS,
            report_precision: 6,
            table_precision: 4,
        }
    }
}

impl LabConfigBuilder {
    /// Set the animation frame rate (clamped to at least 1).
    #[must_use]
    pub fn frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps.max(1);
        self
    }

    /// Set the viewport size.
    #[must_use]
    pub const fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    /// Set the statistics report precision.
    #[must_use]
    pub const fn report_precision(mut self, decimals: usize) -> Self {
        self.report_precision = decimals;
        self
    }

    /// Set the table cell precision.
    #[must_use]
    pub const fn table_precision(mut self, decimals: usize) -> Self {
        self.table_precision = decimals;
        self
    }

    /// Build the `LabConfig`.
    #[must_use]
    pub const fn build(self) -> LabConfig {
        LabConfig {
            frame_rate: self.frame_rate,
            viewport: self.viewport,
            report_precision: self.report_precision,
            table_precision: self.table_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LabConfig::default();
        assert_eq!(config.frame_rate(), 60);
        assert_eq!(config.viewport(), Size::CANVAS);
        assert_eq!(config.report_precision(), 6);
        assert_eq!(config.table_precision(), 4);
    }

    #[test]
    fn test_builder_overrides() {
        let config = LabConfig::builder()
            .frame_rate(0)
            .viewport(1024.0, 640.0)
            .report_precision(3)
            .build();
        assert_eq!(config.frame_rate(), 1);
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
        assert_eq!(config.viewport(), Size::new(1024.0, 640.0));
        assert_eq!(config.report_precision(), 3);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = LabConfig::builder().frame_rate(30).build();
        let json = serde_json::to_string(&config).unwrap();
        let back: LabConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
