// SPDX-License-Identifier: GPL-3.0-or-later
//! The CLI driver: discovers an `input{n}.ppm` frame sequence, runs each
//! frame through the engine, and writes `output{n:05}.ppm` masks.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, debug_span, info};

use crate::error::Result;
use crate::frame::Frame;
use crate::ppm;
use crate::vibe::Engine;

/// The ordered sequence of `input{n}.ppm` paths found in `dir`, starting
/// from `input0.ppm` and continuing while the next index's file exists.
fn discover_frames(dir: &Path) -> Vec<PathBuf> {
    let mut frames = Vec::new();
    let mut i = 0usize;
    loop {
        let path = dir.join(format!("input{}.ppm", i));
        if !path.is_file() {
            break;
        }
        frames.push(path);
        i += 1;
    }
    frames
}

fn output_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("output{:05}.ppm", index))
}

/// Run the full sequence found in `input_dir`, writing masks to
/// `output_dir`. Returns the number of frames processed.
pub fn run(engine: &mut Engine, input_dir: &Path, output_dir: &Path) -> Result<usize> {
    let frame_paths = discover_frames(input_dir);
    let total_frames = frame_paths.len();
    info!(total_frames, "discovered input frames");

    let start = Instant::now();
    for (index, path) in frame_paths.into_iter().enumerate() {
        let span = debug_span!("frame", index);
        let _enter = span.enter();

        let frame = read_frame(engine, &path)?;
        let mask = if engine.is_initialized() {
            engine.process_frame(frame)?
        } else {
            engine.init_from_frame(frame)?
        };
        debug!(foreground_ratio = mask.foreground_ratio(), "mask computed");

        let out_path = output_path(output_dir, index);
        let out_file = BufWriter::new(File::create(&out_path)?);
        ppm::write_mask(out_file, &mask)?;
    }
    let elapsed = start.elapsed().as_secs_f64();

    let fps = if elapsed > 0.0 {
        total_frames as f64 / elapsed
    } else {
        0.0
    };
    info!(
        total_frames,
        total_time_seconds = elapsed,
        frames_per_second = fps,
        "run complete"
    );

    Ok(total_frames)
}

fn read_frame(engine: &Engine, path: &Path) -> Result<Frame> {
    let file = BufReader::new(File::open(path)?);
    ppm::read_frame(file, engine.width(), engine.height())
}
