// SPDX-License-Identifier: GPL-3.0-or-later
//! The stochastic sample-replacement policy: own-pixel updates and spatial
//! diffusion into neighboring pixels' sample sets.

use crate::frame::{Mask, Rgb};

use super::neighbor::{random_neighbor, Extent};
use super::params::VibeParameters;
use super::rng::Rng;
use super::sample_model::SampleModel;

/// Replace a uniformly chosen slot of pixel `i` with `value`.
fn update_own_sample(model: &mut SampleModel, rng: &mut Rng, i: usize, value: Rgb) {
    let slot = rng.uniform(model.samples_per_pixel());
    model.set(i, slot, value);
}

/// Replace a uniformly chosen slot of a random neighbor of `i` with `value`.
fn update_neighbor_sample(
    model: &mut SampleModel,
    rng: &mut Rng,
    i: usize,
    width: usize,
    height: usize,
    extent: Extent,
    value: Rgb,
) {
    let neighbor = random_neighbor(rng, i, width, height, extent);
    let slot = rng.uniform(model.samples_per_pixel());
    model.set(neighbor, slot, value);
}

fn subsampling_hit(rng: &mut Rng, params: &VibeParameters) -> bool {
    rng.uniform(params.subsampling_factor as usize) == 0
}

/// The update policy applied when the classifier called pixel `i`
/// background: an independent 1/phi chance of an own-sample update, and an
/// independent (mutually exclusive) 1/phi-vs-(phi-1)/phi choice between an
/// immediate- and extended-neighbor update.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_background_branch(
    model: &mut SampleModel,
    rng: &mut Rng,
    params: &VibeParameters,
    width: usize,
    height: usize,
    i: usize,
    current: Rgb,
) {
    if subsampling_hit(rng, params) {
        update_own_sample(model, rng, i, current);
    }
    if subsampling_hit(rng, params) {
        update_neighbor_sample(model, rng, i, width, height, Extent::Extended, current);
    } else if subsampling_hit(rng, params) {
        update_neighbor_sample(model, rng, i, width, height, Extent::Immediate, current);
    }
}

/// Whether all four already-visited 4-neighbors of `i` are foreground in the
/// mask being built this frame. Off-grid neighbors (including ones not yet
/// visited this sweep, for neighbors below/to the right) read as "not
/// foreground" -- the intended asymmetric behavior.
fn surrounded_by_foreground(mask: &Mask, width: usize, height: usize, i: usize) -> bool {
    let x = i % width;
    let y = i / width;

    let up = y > 0 && mask.is_foreground(i - width);
    let right = x + 1 < width && mask.is_foreground(i + 1);
    let down = y + 1 < height && mask.is_foreground(i + width);
    // Using `>= 0` (i.e. `x > 0` on unsigned x) for the left neighbor keeps
    // this gate symmetric with the other three; the source algorithm this is
    // based on used a strict `> 0` column test here, which would have
    // excluded column 1's left neighbor (column 0) too.
    let left = x > 0 && mask.is_foreground(i - 1);

    up && right && down && left
}

/// The update policy applied when the classifier called pixel `i`
/// foreground: an own-sample update only fires if the pixel is temporally
/// coherent with its own last frame (not a brand new color from motion) and
/// isn't fully enclosed by other foreground pixels (the blob-interior gate,
/// which keeps persistent foreground objects from being silently absorbed
/// back into the background).
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_foreground_branch(
    model: &mut SampleModel,
    rng: &mut Rng,
    params: &VibeParameters,
    mask: &Mask,
    width: usize,
    height: usize,
    i: usize,
    current: Rgb,
    previous: Rgb,
) {
    if !subsampling_hit(rng, params) {
        return;
    }
    let temporally_coherent =
        current.squared_distance(&previous) < params.squared_match_radius();
    if temporally_coherent && !surrounded_by_foreground(mask, width, height, i) {
        update_own_sample(model, rng, i, current);
    }
}

#[cfg(test)]
mod test {
    use super::surrounded_by_foreground;
    use crate::frame::Mask;

    #[test]
    fn left_edge_column_has_no_left_neighbor() {
        let mut mask = Mask::background(4, 4);
        // Fill every neighbor that a symmetric `>= 0` check would consider,
        // except that column 0 simply has no left neighbor to fill.
        for i in 0..4 {
            mask.set(i, true);
        }
        // Pixel (0, 1): up=(0,0), right=(1,1), down=(0,2), left=none.
        let i = 1 * 4;
        mask.set(i - 4, true); // up
        mask.set(i + 1, true); // right
        mask.set(i + 4, true); // down
        assert!(surrounded_by_foreground(&mask, 4, 4, i));
    }

    #[test]
    fn interior_pixel_needs_all_four_neighbors_foreground() {
        let mut mask = Mask::background(4, 4);
        let i = 1 * 4 + 1;
        mask.set(i - 4, true);
        mask.set(i + 1, true);
        mask.set(i + 4, true);
        // Left neighbor left unset.
        assert!(!surrounded_by_foreground(&mask, 4, 4, i));
        mask.set(i - 1, true);
        assert!(surrounded_by_foreground(&mask, 4, 4, i));
    }

    #[test]
    fn off_grid_neighbors_count_as_not_foreground() {
        let mask = Mask::background(4, 4);
        // Top-left corner: up and left are off-grid, so this can never be
        // "surrounded" no matter what right/down say.
        assert!(!surrounded_by_foreground(&mask, 4, 4, 0));
    }
}
