// SPDX-License-Identifier: GPL-3.0-or-later
//! The background-membership test: is an observed pixel consistent with
//! enough of its model's stored samples to call it background?

use crate::frame::Rgb;

use super::sample_model::SampleModel;

/// `true` if at least `threshold` of `model`'s samples for pixel `i` are
/// within `radius` of `observed` (squared radius, to avoid a square root per
/// sample -- numerically exact for integer inputs). Scans slots in order and
/// exits as soon as the threshold is reached; this can never change the
/// result, only how many slots get examined.
pub(crate) fn is_background(
    model: &SampleModel,
    i: usize,
    observed: Rgb,
    squared_radius: u32,
    threshold: usize,
) -> bool {
    let mut matches = 0;
    for slot in 0..model.samples_per_pixel() {
        if observed.squared_distance(&model.get(i, slot)) < squared_radius {
            matches += 1;
            if matches >= threshold {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::is_background;
    use crate::frame::Rgb;
    use crate::vibe::sample_model::SampleModel;

    fn model_with_samples(samples: &[Rgb]) -> SampleModel {
        let mut model = SampleModel::new(1, samples.len());
        for (slot, &sample) in samples.iter().enumerate() {
            model.set(0, slot, sample);
        }
        model
    }

    #[test]
    fn background_when_enough_samples_match() {
        let model = model_with_samples(&[
            Rgb::new(100, 100, 100),
            Rgb::new(101, 100, 100),
            Rgb::new(200, 200, 200),
        ]);
        assert!(is_background(&model, 0, Rgb::new(100, 100, 100), 400, 2));
    }

    #[test]
    fn foreground_when_too_few_samples_match() {
        let model = model_with_samples(&[
            Rgb::new(100, 100, 100),
            Rgb::new(200, 200, 200),
            Rgb::new(210, 210, 210),
        ]);
        assert!(!is_background(&model, 0, Rgb::new(100, 100, 100), 400, 2));
    }

    #[test]
    fn distance_exactly_at_radius_does_not_match() {
        // squared_radius of 400 corresponds to a radius of 20; a sample
        // exactly 20 away in one channel should not count ("< R", not "<= R").
        let model = model_with_samples(&[Rgb::new(120, 100, 100), Rgb::new(120, 100, 100)]);
        assert!(!is_background(&model, 0, Rgb::new(100, 100, 100), 400, 2));
    }

    #[test]
    fn scan_order_does_not_affect_result() {
        let forward = model_with_samples(&[
            Rgb::new(100, 100, 100),
            Rgb::new(100, 100, 100),
            Rgb::new(255, 0, 0),
        ]);
        let reversed = model_with_samples(&[
            Rgb::new(255, 0, 0),
            Rgb::new(100, 100, 100),
            Rgb::new(100, 100, 100),
        ]);
        let observed = Rgb::new(100, 100, 100);
        assert_eq!(
            is_background(&forward, 0, observed, 400, 2),
            is_background(&reversed, 0, observed, 400, 2)
        );
    }
}
