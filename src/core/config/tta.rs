//! Configuration of the TTA wrapper.

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use super::parallel::ParallelPolicy;
use crate::processors::merge::{MEAN_MODE, MergeMode};
use crate::processors::types::ChannelOrder;

/// Settings chosen when a TTA wrapper is constructed.
///
/// `merge_mode` is kept as its configuration name so files can be loaded
/// without knowing the set of modes; it is resolved into a [`MergeMode`] by
/// [`TtaConfig::resolve_merge_mode`] when the wrapper is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtaConfig {
    /// Either `mean` or `tsharpen`.
    /// Default: `mean`
    #[serde(default = "TtaConfig::default_merge_mode")]
    pub merge_mode: String,

    /// Apply a sigmoid to raw model outputs before they are merged.
    /// Default: false
    #[serde(default)]
    pub activate: bool,

    /// Exponent used by `tsharpen`; ignored by `mean`.
    /// Default: 0.5
    #[serde(default = "TtaConfig::default_temperature")]
    pub temperature: f32,

    /// Axis layout of input images and model predictions.
    /// Default: CHW
    #[serde(default)]
    pub channel_order: ChannelOrder,

    /// Parallel processing of the images of a batch.
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl TtaConfig {
    /// Create a new TtaConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merge mode by name.
    pub fn with_merge_mode(mut self, merge_mode: impl Into<String>) -> Self {
        self.merge_mode = merge_mode.into();
        self
    }

    /// Enable or disable the sigmoid activation.
    pub fn with_activate(mut self, activate: bool) -> Self {
        self.activate = activate;
        self
    }

    /// Set the tsharpen temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the channel order.
    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    /// Set the parallel processing policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolves `merge_mode` and `temperature` into a [`MergeMode`].
    pub fn resolve_merge_mode(&self) -> Result<MergeMode, ConfigError> {
        MergeMode::from_name(&self.merge_mode, self.temperature)
    }

    fn default_merge_mode() -> String {
        MEAN_MODE.to_string()
    }

    fn default_temperature() -> f32 {
        0.5
    }
}

impl Default for TtaConfig {
    fn default() -> Self {
        Self {
            merge_mode: Self::default_merge_mode(),
            activate: false,
            temperature: Self::default_temperature(),
            channel_order: ChannelOrder::default(),
            parallel: ParallelPolicy::default(),
        }
    }
}

impl ConfigValidator for TtaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mode = self.resolve_merge_mode()?;
        if let MergeMode::TSharpen { temperature } = mode {
            self.validate_finite_f32(temperature, "temperature")?;
        }
        self.parallel.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TtaConfig::default();
        assert_eq!(config.merge_mode, "mean");
        assert!(!config.activate);
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.channel_order, ChannelOrder::CHW);
        assert!(config.validate().is_ok());
        assert_eq!(config.resolve_merge_mode().unwrap(), MergeMode::Mean);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: TtaConfig =
            serde_json::from_str(r#"{"merge_mode": "tsharpen", "temperature": 2.0}"#).unwrap();
        assert_eq!(
            config.resolve_merge_mode().unwrap(),
            MergeMode::TSharpen { temperature: 2.0 }
        );
        assert_eq!(config.parallel, ParallelPolicy::default());
    }

    #[test]
    fn test_invalid_merge_mode_fails_validation() {
        let config = TtaConfig::new().with_merge_mode("median");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("median"));
    }

    #[test]
    fn test_temperature_must_be_finite_for_tsharpen() {
        let mean = TtaConfig::new().with_temperature(-1.0);
        assert!(mean.validate().is_ok());

        let mean_nan = TtaConfig::new().with_temperature(f32::NAN);
        assert!(mean_nan.validate().is_ok());

        for temperature in [0.0, -1.0, 3.0] {
            let sharpen = TtaConfig::new()
                .with_merge_mode("tsharpen")
                .with_temperature(temperature);
            assert!(sharpen.validate().is_ok());
        }

        let nan = TtaConfig::new()
            .with_merge_mode("tsharpen")
            .with_temperature(f32::NAN);
        assert!(nan.validate().is_err());
    }
}
