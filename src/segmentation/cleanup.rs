//! Border blanking and small-island removal

use crate::spatial::cell::CellBuffer;
use crate::spatial::mask::PixelMask;
use std::collections::VecDeque;

/// Zero the alpha of a fixed-width band along all four cell edges
///
/// Runs unconditionally, regardless of how the band was classified:
/// grid-line and antialiasing bleed from the source template survives the
/// color-based stages and has to go either way. A band wider than the
/// cell clamps to the full cell.
pub fn blank_border(mut cell: CellBuffer, border: usize) -> CellBuffer {
    let width = cell.width();
    let height = cell.height();
    let band = border.min(width).min(height);

    for row in 0..height {
        for col in 0..width {
            let in_band = row < band
                || row >= height - band
                || col < band
                || col >= width - band;
            if in_band {
                cell.set_alpha(row, col, 0.0);
            }
        }
    }

    cell
}

/// Remove connected opaque regions below a minimum pixel area
///
/// Labels 4-connected components of the alpha>0 grid and forces the alpha
/// of undersized components to zero. Idempotent: every surviving
/// component already meets the threshold, so a second pass changes
/// nothing.
pub fn remove_islands(mut cell: CellBuffer, min_area: usize) -> CellBuffer {
    let width = cell.width();
    let height = cell.height();
    let mut visited = PixelMask::new(width, height);
    let mut component = Vec::new();
    let mut frontier = VecDeque::new();

    for start_row in 0..height {
        for start_col in 0..width {
            if visited.get(start_row, start_col) || cell.alpha(start_row, start_col) <= 0.0 {
                continue;
            }

            component.clear();
            visited.mark(start_row, start_col);
            frontier.push_back((start_row, start_col));

            while let Some((row, col)) = frontier.pop_front() {
                component.push((row, col));
                for (dr, dc) in [(-1_i64, 0_i64), (1, 0), (0, -1), (0, 1)] {
                    let next_row = row as i64 + dr;
                    let next_col = col as i64 + dc;
                    if next_row < 0
                        || next_col < 0
                        || next_row >= height as i64
                        || next_col >= width as i64
                    {
                        continue;
                    }
                    let (next_row, next_col) = (next_row as usize, next_col as usize);
                    if !visited.get(next_row, next_col) && cell.alpha(next_row, next_col) > 0.0 {
                        visited.mark(next_row, next_col);
                        frontier.push_back((next_row, next_col));
                    }
                }
            }

            if component.len() < min_area {
                for &(row, col) in &component {
                    cell.set_alpha(row, col, 0.0);
                }
            }
        }
    }

    cell
}
