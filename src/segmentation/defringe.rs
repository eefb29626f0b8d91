//! Alpha-fringe decontamination at the background boundary
//!
//! A hard cutout leaves a halo of background-tinted pixels along sprite
//! edges. Instead, sprite-side pixels near the boundary get an estimated
//! alpha and are unblended back to their true color, so the sprite
//! composites cleanly over arbitrary backgrounds.

use crate::math::blend;
use crate::math::color::{self, Rgb};
use crate::segmentation::pipeline::ExtractionParams;
use crate::spatial::cell::CellBuffer;
use crate::spatial::mask::{DISTANCE_UNREACHED, PixelMask};

/// Zero out the background and soften the sprite's edge fringe
///
/// Every pixel in the full background mask is hard-removed first. Then,
/// within `defringe_width` pixels of the background boundary, each sprite
/// pixel gets a combined alpha from two estimates -- color distance to the
/// background (weighted higher, it is the more reliable signal) and
/// spatial distance to the boundary -- and its observed color is unblended
/// against the background at that alpha. Pixels outside the fringe keep
/// their original channels.
pub fn decontaminate(
    mut cell: CellBuffer,
    background_mask: &PixelMask,
    background: Rgb,
    params: &ExtractionParams,
) -> CellBuffer {
    for row in 0..cell.height() {
        for col in 0..cell.width() {
            if background_mask.get(row, col) {
                cell.clear_pixel(row, col);
            }
        }
    }

    if params.defringe_width == 0 || !background_mask.any() {
        return cell;
    }

    let fringe_width = params.defringe_width as f64;
    let color_window = params.color_window * params.flood_tolerance;
    let distances = background_mask.boundary_distance(params.defringe_width as u32);

    for row in 0..cell.height() {
        for col in 0..cell.width() {
            let steps = distances.get((row, col)).copied().unwrap_or(0);
            if steps == 0 || steps == DISTANCE_UNREACHED {
                continue;
            }

            let observed = cell.rgb(row, col);
            let alpha_color = blend::coverage_from_distance(
                color::distance(observed, background),
                color_window,
            );
            let alpha_spatial = blend::coverage_from_distance(f64::from(steps), fringe_width);
            let alpha = blend::mix_coverage(
                alpha_color,
                alpha_spatial,
                params.color_weight,
                params.spatial_weight,
                params.alpha_floor,
            );

            let mut recovered = [0.0; 3];
            for (slot, (&channel, &bg_channel)) in recovered
                .iter_mut()
                .zip(observed.iter().zip(background.iter()))
            {
                *slot =
                    blend::unblend_channel(channel, bg_channel, alpha, params.unblend_floor, 255.0);
            }

            cell.set_rgba(row, col, recovered, alpha * 255.0);
        }
    }

    cell
}

#[cfg(test)]
mod tests {
    use super::decontaminate;
    use crate::segmentation::pipeline::ExtractionParams;
    use crate::spatial::cell::CellBuffer;
    use crate::spatial::mask::PixelMask;

    const MAGENTA: [f64; 3] = [255.0, 0.0, 255.0];

    #[test]
    fn test_background_is_hard_removed() {
        let mut cell = CellBuffer::new(4, 1);
        for col in 0..4 {
            cell.set_rgba(0, col, MAGENTA, 255.0);
        }
        let mut mask = PixelMask::new(4, 1);
        mask.mark(0, 0);
        mask.mark(0, 1);

        let cell = decontaminate(cell, &mask, MAGENTA, &ExtractionParams::default());
        assert!(cell.alpha(0, 0).abs() < f64::EPSILON);
        assert_eq!(cell.rgb(0, 1), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fringe_alpha_saturates_far_from_background_color() {
        // One background column, the rest solid black: maximally distant
        // from the background color, so fringe alpha must hit 255
        let mut cell = CellBuffer::new(6, 1);
        cell.set_rgba(0, 0, MAGENTA, 255.0);
        for col in 1..6 {
            cell.set_rgba(0, col, [0.0, 0.0, 0.0], 255.0);
        }
        let mut mask = PixelMask::new(6, 1);
        mask.mark(0, 0);

        let params = ExtractionParams::default();
        let cell = decontaminate(cell, &mask, MAGENTA, &params);

        // Distance 4 inside the fringe: both estimates saturate
        assert!((cell.alpha(0, 4) - 255.0).abs() < f64::EPSILON);
        // Distance 1: alpha = 0.7 * 1.0 + 0.3 * 0.25
        assert!((cell.alpha(0, 1) - 0.775 * 255.0).abs() < 1e-9);
        // Black channels unblend negative and clamp back to black
        assert_eq!(cell.rgb(0, 1), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_background_colored_fringe_pixel_floors() {
        // A sprite-side pixel whose color equals the background: color
        // evidence is zero, so alpha lands near the floor instead of
        // dividing the unblend by zero
        let mut cell = CellBuffer::new(3, 1);
        cell.set_rgba(0, 0, MAGENTA, 255.0);
        cell.set_rgba(0, 1, MAGENTA, 255.0);
        cell.set_rgba(0, 2, [0.0, 0.0, 0.0], 255.0);
        let mut mask = PixelMask::new(3, 1);
        mask.mark(0, 0);

        let params = ExtractionParams::default();
        let cell = decontaminate(cell, &mask, MAGENTA, &params);

        let expected = (0.3 * 0.25_f64).max(params.alpha_floor) * 255.0;
        assert!((cell.alpha(0, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_width_skips_decontamination() {
        let mut cell = CellBuffer::new(2, 1);
        cell.set_rgba(0, 0, MAGENTA, 255.0);
        cell.set_rgba(0, 1, [0.0, 0.0, 0.0], 255.0);
        let mut mask = PixelMask::new(2, 1);
        mask.mark(0, 0);

        let params = ExtractionParams {
            defringe_width: 0,
            ..ExtractionParams::default()
        };
        let cell = decontaminate(cell, &mask, MAGENTA, &params);

        assert!((cell.alpha(0, 1) - 255.0).abs() < f64::EPSILON);
        assert_eq!(cell.rgb(0, 1), [0.0, 0.0, 0.0]);
    }
}
