// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use structopt::clap::AppSettings;
use structopt::StructOpt;

use super::engine::PartialEngineSettings;

#[derive(Clone, Debug, StructOpt)]
#[structopt(setting(AppSettings::DeriveDisplayOrder))]
pub struct Args {
    /// Directory to read input{N}.ppm frames from.
    #[structopt(parse(from_os_str))]
    pub input_dir: PathBuf,

    /// Directory to write output{N}.ppm masks to.
    #[structopt(parse(from_os_str))]
    pub output_dir: PathBuf,

    /// Path to a TOML configuration file.
    #[structopt(short, long, parse(from_os_str))]
    pub config_path: Option<PathBuf>,

    /// Frame width in pixels.
    #[structopt(long)]
    pub width: Option<usize>,

    /// Frame height in pixels.
    #[structopt(long)]
    pub height: Option<usize>,

    /// Samples held per pixel (N).
    #[structopt(long)]
    pub samples_per_pixel: Option<usize>,

    /// Color-space match radius (R).
    #[structopt(long)]
    pub match_radius: Option<u32>,

    /// Minimum matching samples to call a pixel background (M).
    #[structopt(long)]
    pub match_threshold: Option<usize>,

    /// Inverse subsampling probability (phi).
    #[structopt(long)]
    pub subsampling_factor: Option<u32>,

    /// Foreground ratio above which the model is reinitialized (tau).
    #[structopt(long)]
    pub reinit_threshold: Option<f32>,

    /// Seed the random source for reproducible runs; otherwise seeded from
    /// system entropy.
    #[structopt(long)]
    pub seed: Option<u64>,
}

impl Args {
    pub(crate) fn as_overlay(&self) -> PartialEngineSettings {
        PartialEngineSettings {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples_per_pixel,
            match_radius: self.match_radius,
            match_threshold: self.match_threshold,
            subsampling_factor: self.subsampling_factor,
            reinit_threshold: self.reinit_threshold,
        }
    }
}
