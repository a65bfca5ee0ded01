// SPDX-License-Identifier: GPL-3.0-or-later
//! Random neighbor selection for the update and initializer steps.
//!
//! The source algorithm draws a horizontal and vertical offset independently,
//! rejecting zero and out-of-bounds draws until both succeed. Since an
//! offset's validity on one axis never depends on the other axis, that is
//! equivalent to enumerating the valid offsets on each axis up front and
//! drawing a single uniform index into each list -- which is what this module
//! does, to avoid an unbounded rejection loop.

use super::rng::Rng;

/// How far from a pixel a neighbor may be drawn from, in each direction.
/// `Immediate` covers a pixel's 4 diagonal neighbors (extent 2); `Extended`
/// covers the rest of the surrounding 5x5 window (extent 4).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Extent {
    Immediate,
    Extended,
}

impl Extent {
    fn window(self) -> i32 {
        match self {
            Extent::Immediate => 2,
            Extent::Extended => 4,
        }
    }
}

/// Valid nonzero offsets along one axis, within `[-window/2, window/2]`, that
/// keep `coordinate + offset` inside `[0, bound)`.
fn valid_offsets(coordinate: usize, bound: usize, window: i32) -> Vec<i32> {
    let half = window / 2;
    (-half..=half)
        .filter(|&offset| offset != 0)
        .filter(|&offset| {
            let target = coordinate as i64 + offset as i64;
            target >= 0 && target < bound as i64
        })
        .collect()
}

/// Draw a random neighbor of row-major index `i` (at `(x, y)` in a
/// `width`x`height` grid), using offsets bounded by `extent`. The result is
/// always a distinct, in-bounds index.
pub(crate) fn random_neighbor(
    rng: &mut Rng,
    i: usize,
    width: usize,
    height: usize,
    extent: Extent,
) -> usize {
    let x = i % width;
    let y = i / width;
    let window = extent.window();

    let dx_choices = valid_offsets(x, width, window);
    let dy_choices = valid_offsets(y, height, window);
    debug_assert!(
        !dx_choices.is_empty() && !dy_choices.is_empty(),
        "a {}x{} grid always has at least one valid neighbor in either extent",
        width,
        height
    );
    let dx = dx_choices[rng.uniform(dx_choices.len())];
    let dy = dy_choices[rng.uniform(dy_choices.len())];

    let new_x = (x as i32 + dx) as usize;
    let new_y = (y as i32 + dy) as usize;
    new_y * width + new_x
}
