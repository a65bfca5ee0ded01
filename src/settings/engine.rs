// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::vibe::{Engine, VibeParameters};

/// The frame geometry and tunable parameters an [`Engine`] is built from.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "EngineSettings::default_width")]
    pub width: usize,

    #[serde(default = "EngineSettings::default_height")]
    pub height: usize,

    #[serde(default)]
    pub parameters: VibeParameters,
}

impl EngineSettings {
    const fn default_width() -> usize {
        320
    }

    const fn default_height() -> usize {
        256
    }

    pub fn build(&self, seed: Option<u64>) -> Result<Engine> {
        Engine::new(self.width, self.height, self.parameters, seed)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            parameters: VibeParameters::default(),
        }
    }
}

/// Overlay a config-file-or-environment-sourced settings struct onto program
/// defaults and CLI flags, field by field, in ascending priority order.
/// `None` fields in an overlay leave the lower-priority value untouched.
#[derive(Clone, Debug, Default)]
pub struct PartialEngineSettings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub samples_per_pixel: Option<usize>,
    pub match_radius: Option<u32>,
    pub match_threshold: Option<usize>,
    pub subsampling_factor: Option<u32>,
    pub reinit_threshold: Option<f32>,
}

impl PartialEngineSettings {
    /// Parse `VIBE_`-prefixed environment variables into an overlay. Unknown
    /// or unparseable values are ignored rather than rejected -- only a
    /// fully-merged [`EngineSettings`] is validated, at engine construction.
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }
        Self {
            width: var("VIBE_WIDTH"),
            height: var("VIBE_HEIGHT"),
            samples_per_pixel: var("VIBE_SAMPLES_PER_PIXEL"),
            match_radius: var("VIBE_MATCH_RADIUS"),
            match_threshold: var("VIBE_MATCH_THRESHOLD"),
            subsampling_factor: var("VIBE_SUBSAMPLING_FACTOR"),
            reinit_threshold: var("VIBE_REINIT_THRESHOLD"),
        }
    }

    fn apply(self, base: &mut EngineSettings) {
        if let Some(width) = self.width {
            base.width = width;
        }
        if let Some(height) = self.height {
            base.height = height;
        }
        if let Some(samples_per_pixel) = self.samples_per_pixel {
            base.parameters.samples_per_pixel = samples_per_pixel;
        }
        if let Some(match_radius) = self.match_radius {
            base.parameters.match_radius = match_radius;
        }
        if let Some(match_threshold) = self.match_threshold {
            base.parameters.match_threshold = match_threshold;
        }
        if let Some(subsampling_factor) = self.subsampling_factor {
            base.parameters.subsampling_factor = subsampling_factor;
        }
        if let Some(reinit_threshold) = self.reinit_threshold {
            base.parameters.reinit_threshold = reinit_threshold;
        }
    }
}

/// Merge a TOML config file's contents (lowest priority after defaults), an
/// environment overlay, and a CLI overlay (highest priority) into a single
/// validated [`EngineSettings`].
pub fn resolve(
    config_toml: Option<&str>,
    env: PartialEngineSettings,
    cli: PartialEngineSettings,
) -> Result<EngineSettings> {
    let mut settings: EngineSettings = match config_toml {
        Some(text) => toml::from_str(text)
            .map_err(|e| Error::ResourceExhaustion(format!("invalid configuration file: {}", e)))?,
        None => EngineSettings::default(),
    };
    env.apply(&mut settings);
    cli.apply(&mut settings);
    settings.parameters.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_the_design_fixed_table() {
        let settings = EngineSettings::default();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 256);
        assert_eq!(settings.parameters, VibeParameters::default());
    }

    #[test]
    fn cli_overlay_takes_priority_over_env_overlay() {
        let env = PartialEngineSettings {
            match_radius: Some(10),
            ..Default::default()
        };
        let cli = PartialEngineSettings {
            match_radius: Some(30),
            ..Default::default()
        };
        let settings = resolve(None, env, cli).unwrap();
        assert_eq!(settings.parameters.match_radius, 30);
    }

    #[test]
    fn toml_file_overrides_defaults_and_is_overridden_by_overlays() {
        let toml_text = "width = 160\nheight = 120\n\n[parameters]\nmatch_radius = 15\n";
        let env = PartialEngineSettings::default();
        let cli = PartialEngineSettings {
            height: Some(200),
            ..Default::default()
        };
        let settings = resolve(Some(toml_text), env, cli).unwrap();
        assert_eq!(settings.width, 160);
        assert_eq!(settings.height, 200);
        assert_eq!(settings.parameters.match_radius, 15);
    }

    #[test]
    fn invalid_merged_parameters_fail_validation() {
        let cli = PartialEngineSettings {
            samples_per_pixel: Some(0),
            ..Default::default()
        };
        assert!(resolve(None, PartialEngineSettings::default(), cli).is_err());
    }
}
