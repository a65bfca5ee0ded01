// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use crate::error::{Error, Result};

/// The ViBe algorithm's tunable parameters, deserializable with independent
/// per-field defaults so a configuration file may override just one or two
/// without restating the rest.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct VibeParameters {
    /// Samples held per pixel (N).
    #[serde(default = "VibeParameters::default_samples_per_pixel")]
    pub samples_per_pixel: usize,

    /// Color-space match radius (R). Stored as the radius itself; the
    /// classifier compares against its square.
    #[serde(default = "VibeParameters::default_match_radius")]
    pub match_radius: u32,

    /// Minimum number of matching samples to call a pixel background (M).
    #[serde(default = "VibeParameters::default_match_threshold")]
    pub match_threshold: usize,

    /// Inverse subsampling probability (phi): a 1/phi chance per coin flip.
    #[serde(default = "VibeParameters::default_subsampling_factor")]
    pub subsampling_factor: u32,

    /// Foreground ratio above which the model is wholesale re-initialized
    /// from the current frame (tau).
    #[serde(default = "VibeParameters::default_reinit_threshold")]
    pub reinit_threshold: f32,
}

impl VibeParameters {
    const fn default_samples_per_pixel() -> usize {
        20
    }

    const fn default_match_radius() -> u32 {
        20
    }

    const fn default_match_threshold() -> usize {
        2
    }

    const fn default_subsampling_factor() -> u32 {
        16
    }

    const fn default_reinit_threshold() -> f32 {
        0.5
    }

    pub(super) fn squared_match_radius(&self) -> u32 {
        self.match_radius * self.match_radius
    }

    /// Check that the parameters can actually produce a valid model --
    /// called once at engine construction, not per-frame.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.samples_per_pixel == 0 {
            return Err(Error::ResourceExhaustion(
                "samples_per_pixel must be greater than zero".to_string(),
            ));
        }
        if self.match_threshold == 0 || self.match_threshold > self.samples_per_pixel {
            return Err(Error::ResourceExhaustion(format!(
                "match_threshold ({}) must be between 1 and samples_per_pixel ({})",
                self.match_threshold, self.samples_per_pixel
            )));
        }
        if self.subsampling_factor == 0 {
            return Err(Error::ResourceExhaustion(
                "subsampling_factor must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reinit_threshold) {
            return Err(Error::ResourceExhaustion(format!(
                "reinit_threshold ({}) must be between 0.0 and 1.0",
                self.reinit_threshold
            )));
        }
        Ok(())
    }
}

impl Default for VibeParameters {
    fn default() -> Self {
        Self {
            samples_per_pixel: Self::default_samples_per_pixel(),
            match_radius: Self::default_match_radius(),
            match_threshold: Self::default_match_threshold(),
            subsampling_factor: Self::default_subsampling_factor(),
            reinit_threshold: Self::default_reinit_threshold(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::VibeParameters;

    #[test]
    fn defaults_match_the_design_fixed_table() {
        let params = VibeParameters::default();
        assert_eq!(params.samples_per_pixel, 20);
        assert_eq!(params.match_radius, 20);
        assert_eq!(params.match_threshold, 2);
        assert_eq!(params.subsampling_factor, 16);
        assert_eq!(params.reinit_threshold, 0.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn defaults_from_empty_toml() -> anyhow::Result<()> {
        let params: VibeParameters = toml::from_str("")?;
        assert_eq!(params, VibeParameters::default());
        Ok(())
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() -> anyhow::Result<()> {
        let params: VibeParameters = toml::from_str("match_radius = 30")?;
        assert_eq!(params.match_radius, 30);
        assert_eq!(params.samples_per_pixel, 20);
        Ok(())
    }

    #[test]
    fn squared_match_radius_is_exact() {
        let params = VibeParameters::default();
        assert_eq!(params.squared_match_radius(), 400);
    }

    #[test]
    fn rejects_zero_samples_per_pixel() {
        let params = VibeParameters {
            samples_per_pixel: 0,
            ..VibeParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_threshold_above_sample_count() {
        let params = VibeParameters {
            match_threshold: 25,
            ..VibeParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_reinit_threshold() {
        let params = VibeParameters {
            reinit_threshold: 1.5,
            ..VibeParameters::default()
        };
        assert!(params.validate().is_err());
    }
}
