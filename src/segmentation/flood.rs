//! Multi-seeded flood fill over the cell's connected background

use crate::math::color::{self, Rgb};
use crate::segmentation::anchor::Anchor;
use crate::spatial::cell::CellBuffer;
use crate::spatial::mask::PixelMask;
use std::collections::VecDeque;

/// Grow the background mask from every accepted anchor
///
/// Each anchor runs its own 4-connected breadth-first fill from its seed.
/// Candidates are compared against the anchor's color, which stays fixed
/// for the life of that fill -- never against their immediate neighbor --
/// so gradient drift cannot walk the fill into sprite interior. All fills
/// share one claimed grid with first-visitor-wins semantics; a seed whose
/// pixel was already claimed by an earlier fill is skipped entirely.
///
/// Returns the union of all reachable background sets together with the
/// colors of the anchors that actually ran.
pub fn flood_fill(cell: &CellBuffer, anchors: &[Anchor], tolerance: f64) -> (PixelMask, Vec<Rgb>) {
    let width = cell.width();
    let height = cell.height();
    let mut background = PixelMask::new(width, height);
    let mut claimed = PixelMask::new(width, height);
    let mut used_anchors = Vec::new();

    if cell.is_empty() {
        return (background, used_anchors);
    }

    let tolerance_sq = tolerance * tolerance;
    let mut frontier = VecDeque::new();

    for anchor in anchors {
        let (seed_row, seed_col) = anchor.seed;
        if seed_row >= height || seed_col >= width || claimed.get(seed_row, seed_col) {
            continue;
        }

        used_anchors.push(anchor.color);
        claimed.mark(seed_row, seed_col);
        background.mark(seed_row, seed_col);
        frontier.push_back((seed_row, seed_col));

        while let Some((row, col)) = frontier.pop_front() {
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
                if claimed.get(next_row, next_col) {
                    continue;
                }
                claimed.mark(next_row, next_col);

                let candidate = cell.rgb(next_row, next_col);
                if color::distance_squared(candidate, anchor.color) <= tolerance_sq {
                    background.mark(next_row, next_col);
                    frontier.push_back((next_row, next_col));
                }
            }
        }
    }

    (background, used_anchors)
}

#[cfg(test)]
mod tests {
    use super::flood_fill;
    use crate::segmentation::anchor::Anchor;
    use crate::spatial::cell::CellBuffer;

    const MAGENTA: [f64; 3] = [255.0, 0.0, 255.0];

    fn cell_with_block(size: usize, block: (usize, usize, usize, usize)) -> CellBuffer {
        let mut cell = CellBuffer::new(size, size);
        for row in 0..size {
            for col in 0..size {
                let inside = row >= block.0 && row < block.2 && col >= block.1 && col < block.3;
                let rgb = if inside { [0.0, 0.0, 0.0] } else { MAGENTA };
                cell.set_rgba(row, col, rgb, 255.0);
            }
        }
        cell
    }

    #[test]
    fn test_fill_stops_at_sprite_boundary() {
        let cell = cell_with_block(20, (5, 5, 15, 15));
        let anchor = Anchor {
            color: MAGENTA,
            seed: (0, 0),
        };

        let (mask, used) = flood_fill(&cell, &[anchor], 45.0);
        assert_eq!(used.len(), 1);
        // Background is everything outside the 10x10 block
        assert_eq!(mask.count(), 20 * 20 - 100);
        assert!(mask.get(0, 19));
        assert!(!mask.get(10, 10));
    }

    #[test]
    fn test_first_visitor_wins_between_seeds() {
        let cell = cell_with_block(20, (5, 5, 15, 15));
        let anchors = [
            Anchor {
                color: MAGENTA,
                seed: (0, 0),
            },
            // Second seed lands on ground the first fill already claimed
            Anchor {
                color: MAGENTA,
                seed: (0, 19),
            },
        ];

        let (mask, used) = flood_fill(&cell, &anchors, 45.0);
        assert_eq!(used.len(), 1);
        assert_eq!(mask.count(), 20 * 20 - 100);
    }

    #[test]
    fn test_anchor_comparison_resists_gradient_drift() {
        // A horizontal gradient ending far from the anchor color: a
        // neighbor-relative fill would leak across the whole row, the
        // anchor-relative fill must stop partway
        let mut cell = CellBuffer::new(64, 4);
        for row in 0..4 {
            for col in 0..64 {
                cell.set_rgba(row, col, [col as f64 * 4.0, 0.0, 0.0], 255.0);
            }
        }

        let anchor = Anchor {
            color: [0.0, 0.0, 0.0],
            seed: (0, 0),
        };
        let (mask, _) = flood_fill(&cell, &[anchor], 45.0);

        assert!(mask.get(0, 11)); // 44 < 45 away
        assert!(!mask.get(0, 12)); // 48 > 45 away
    }
}
