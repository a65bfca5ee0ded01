// SPDX-License-Identifier: GPL-3.0-or-later
//! The segmenter: owns the sample model and per-frame buffers, and drives
//! the classify-then-update sweep over a new frame.

use tracing::debug;

use crate::error::{Error, InputRejection, Result};
use crate::frame::{Frame, Mask};

use super::classifier::is_background;
use super::neighbor::{random_neighbor, Extent};
use super::params::VibeParameters;
use super::rng::Rng;
use super::sample_model::SampleModel;
use super::updater::{apply_background_branch, apply_foreground_branch};

/// A running ViBe background/foreground segmenter for a fixed frame size.
///
/// An [`Engine`] must be seeded with a first frame via [`Engine::init_from_frame`]
/// before [`Engine::process_frame`] can be called.
#[derive(Debug)]
pub struct Engine {
    width: usize,
    height: usize,
    params: VibeParameters,
    model: Option<SampleModel>,
    previous: Option<Frame>,
    rng: Rng,
}

impl Engine {
    /// Build an engine for `width`x`height` frames. Returns an error if
    /// `params` can never produce a valid model.
    pub fn new(width: usize, height: usize, params: VibeParameters, seed: Option<u64>) -> Result<Self> {
        params.validate()?;
        if width == 0 || height == 0 {
            return Err(Error::ResourceExhaustion(
                "width and height must both be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            params,
            model: None,
            previous: None,
            rng: seed.map(Rng::from_seed).unwrap_or_else(Rng::from_entropy),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the engine has been seeded and is ready for [`Engine::process_frame`].
    pub fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    fn check_dimensions(&self, frame: &Frame) -> Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(InputRejection::DimensionMismatch {
                expected: (self.width, self.height),
                found: (frame.width(), frame.height()),
            }
            .into());
        }
        Ok(())
    }

    /// Discard all learned state. The next call must be [`Engine::init_from_frame`].
    pub fn reset(&mut self, seed: Option<u64>) {
        self.model = None;
        self.previous = None;
        self.rng = seed.map(Rng::from_seed).unwrap_or_else(Rng::from_entropy);
    }

    /// Seed the sample model entirely from `frame`: every pixel's samples are
    /// each drawn from an independently chosen random neighbor in the
    /// extended window, producing a spatially coherent but non-degenerate
    /// initial model instead of N identical copies of the observed pixel.
    pub fn init_from_frame(&mut self, frame: Frame) -> Result<Mask> {
        self.check_dimensions(&frame)?;

        let pixel_count = self.width * self.height;
        let mut model = SampleModel::new(pixel_count, self.params.samples_per_pixel);
        for i in 0..pixel_count {
            for slot in 0..self.params.samples_per_pixel {
                let source =
                    random_neighbor(&mut self.rng, i, self.width, self.height, Extent::Extended);
                model.set(i, slot, frame.pixel(source));
            }
        }

        let mask = Mask::background(self.width, self.height);
        self.model = Some(model);
        self.previous = Some(frame);
        Ok(mask)
    }

    /// Classify and update against the next frame in the sequence. Returns
    /// the foreground mask for `frame`; re-initializes the model from
    /// `frame` afterward if the foreground ratio exceeded the configured
    /// threshold.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Engine::init_from_frame`].
    pub fn process_frame(&mut self, frame: Frame) -> Result<Mask> {
        self.check_dimensions(&frame)?;
        let model = self
            .model
            .as_mut()
            .expect("process_frame called before init_from_frame");
        let previous = self
            .previous
            .as_ref()
            .expect("process_frame called before init_from_frame");

        let pixel_count = self.width * self.height;
        let squared_radius = self.params.squared_match_radius();
        let mut mask = Mask::background(self.width, self.height);
        let mut next_previous = Frame::filled(self.width, self.height, Default::default());

        for i in 0..pixel_count {
            let current = frame.pixel(i);
            let previous_pixel = previous.pixel(i);
            next_previous.set_pixel(i, current);

            let background =
                is_background(model, i, current, squared_radius, self.params.match_threshold);
            mask.set(i, !background);

            if background {
                apply_background_branch(
                    model,
                    &mut self.rng,
                    &self.params,
                    self.width,
                    self.height,
                    i,
                    current,
                );
            } else {
                apply_foreground_branch(
                    model,
                    &mut self.rng,
                    &self.params,
                    &mask,
                    self.width,
                    self.height,
                    i,
                    current,
                    previous_pixel,
                );
            }
        }

        self.previous = Some(next_previous);

        let ratio = mask.foreground_ratio();
        debug!(foreground_ratio = ratio, "frame processed");
        if ratio > self.params.reinit_threshold {
            debug!(foreground_ratio = ratio, "foreground ratio exceeded threshold, reinitializing");
            self.init_from_frame(frame)?;
        }

        Ok(mask)
    }
}
