//! Background color estimation and interior void detection

use crate::math::color::{self, Rgb};
use crate::spatial::cell::CellBuffer;
use crate::spatial::mask::PixelMask;

/// Derive the cell's authoritative background color
///
/// Three-tier fallback, never fatal: per-channel median of the
/// flood-filled pixels; failing that, the mean of the anchors that ran;
/// failing that, the color at (0, 0). Pure function of its inputs, and
/// required to run after the flood fill completes and before any
/// decontamination logic.
pub fn estimate_background(cell: &CellBuffer, mask: &PixelMask, anchors: &[Rgb]) -> Rgb {
    let mut masked = Vec::with_capacity(mask.count());
    for row in 0..cell.height() {
        for col in 0..cell.width() {
            if mask.get(row, col) {
                masked.push(cell.rgb(row, col));
            }
        }
    }

    color::channel_median(&masked)
        .or_else(|| color::channel_mean(anchors))
        .unwrap_or_else(|| cell.rgb(0, 0))
}

/// Mark background-colored pixels the edge-seeded fill could not reach
///
/// A global color-distance pass against the estimated background catches
/// regions fully enclosed by sprite content (a gap in a robe, the hole of
/// a ring). The tolerance is intentionally stricter than the flood-fill
/// tolerance so moderately background-like sprite regions -- shadows,
/// mostly -- are not eaten; the comparison is strict (`<`), matching that
/// conservatism at the threshold itself.
pub fn interior_voids(cell: &CellBuffer, background: Rgb, tolerance: f64) -> PixelMask {
    let mut voids = PixelMask::new(cell.width(), cell.height());
    let tolerance_sq = tolerance * tolerance;

    for row in 0..cell.height() {
        for col in 0..cell.width() {
            if color::distance_squared(cell.rgb(row, col), background) < tolerance_sq {
                voids.mark(row, col);
            }
        }
    }

    voids
}
