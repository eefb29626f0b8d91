//! Background anchor sampling from cell corners and edge midpoints

use crate::math::color::{self, Rgb};
use crate::spatial::cell::CellBuffer;

/// A background reference color with the seed it was sampled around
///
/// Anchors are independent of one another; each drives its own flood fill
/// and keeps its color fixed for the fill's whole lifetime.
#[derive(Clone, Copy, Debug)]
pub struct Anchor {
    /// Median color of the sampled patch
    pub color: Rgb,
    /// Seed position as (row, col)
    pub seed: (usize, usize),
}

/// Sample anchor candidates from the four corners and four edge midpoints
///
/// Patches are inset from the true cell edge to dodge grid-line bleed. A
/// patch survives only when its seed pixel sits within `tolerance`
/// (squared-distance comparison) of the patch's own median; patches seeded
/// on sprite content fail this test and are discarded as
/// non-background-like. Pure function, no side effects.
pub fn sample_anchors(
    cell: &CellBuffer,
    inset: usize,
    patch: usize,
    tolerance: f64,
) -> Vec<Anchor> {
    if cell.is_empty() {
        return Vec::new();
    }

    let width = cell.width();
    let height = cell.height();
    let tolerance_sq = tolerance * tolerance;

    let last_row = height - 1;
    let last_col = width - 1;
    let seed_row_low = inset.min(last_row);
    let seed_row_high = last_row.saturating_sub(inset);
    let seed_col_low = inset.min(last_col);
    let seed_col_high = last_col.saturating_sub(inset);

    let near_band = |low: usize| (low, low + patch);
    let far_band = |limit: usize| (limit.saturating_sub(inset + patch), limit.saturating_sub(inset));
    let mid_band = |limit: usize| {
        let center = limit / 2;
        (center.saturating_sub(patch / 2), center + patch.div_ceil(2))
    };

    // Corners first, then edge midpoints, matching seed priority: the
    // claimed grid in the flood fill gives earlier seeds first pick.
    let placements = [
        ((seed_row_low, seed_col_low), near_band(inset), near_band(inset)),
        ((seed_row_low, seed_col_high), near_band(inset), far_band(width)),
        ((seed_row_high, seed_col_low), far_band(height), near_band(inset)),
        ((seed_row_high, seed_col_high), far_band(height), far_band(width)),
        ((seed_row_low, width / 2), near_band(inset), mid_band(width)),
        ((seed_row_high, width / 2), far_band(height), mid_band(width)),
        ((height / 2, seed_col_low), mid_band(height), near_band(inset)),
        ((height / 2, seed_col_high), mid_band(height), far_band(width)),
    ];

    let mut anchors = Vec::new();
    for (seed, row_band, col_band) in placements {
        let Some(anchor_color) = patch_median(cell, row_band, col_band) else {
            continue;
        };

        let seed_color = cell.rgb(seed.0, seed.1);
        if color::distance_squared(seed_color, anchor_color) <= tolerance_sq {
            anchors.push(Anchor {
                color: anchor_color,
                seed,
            });
        }
    }

    anchors
}

fn patch_median(
    cell: &CellBuffer,
    row_band: (usize, usize),
    col_band: (usize, usize),
) -> Option<Rgb> {
    let row_end = row_band.1.min(cell.height());
    let col_end = col_band.1.min(cell.width());
    let row_start = row_band.0.min(row_end);
    let col_start = col_band.0.min(col_end);

    let mut samples = Vec::with_capacity((row_end - row_start) * (col_end - col_start));
    for row in row_start..row_end {
        for col in col_start..col_end {
            samples.push(cell.rgb(row, col));
        }
    }

    color::channel_median(&samples)
}
