//! Boolean pixel grids backed by bit vectors

use bitvec::prelude::{BitVec, bitvec};
use ndarray::Array2;
use std::collections::VecDeque;

/// Distance value for pixels farther from the marked set than the cap
pub const DISTANCE_UNREACHED: u32 = u32::MAX;

/// Boolean grid congruent with a cell's pixel grid
///
/// Row-major bit storage with O(1) membership tests. Marks only ever
/// accumulate: there is no clear operation, so a grown mask is always a
/// superset of its earlier states. The flood fill also uses a `PixelMask`
/// as its shared claimed grid (first visitor wins).
#[derive(Clone, Debug)]
pub struct PixelMask {
    bits: BitVec,
    width: usize,
    height: usize,
}

impl PixelMask {
    /// Create an all-false mask for a `width` x `height` pixel grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            bits: bitvec![0; width * height],
            width,
            height,
        }
    }

    /// Grid width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of grid positions
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// Test whether the grid has zero positions
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    const fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Test whether a position is marked
    ///
    /// Out-of-bounds positions read as unmarked.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .is_some_and(|index| self.bits.get(index).as_deref() == Some(&true))
    }

    /// Mark a position
    ///
    /// Out-of-bounds positions are ignored; marks cannot be removed.
    pub fn mark(&mut self, row: usize, col: usize) {
        if let Some(index) = self.index(row, col) {
            self.bits.set(index, true);
        }
    }

    /// Test whether any position is marked
    pub fn any(&self) -> bool {
        self.bits.any()
    }

    /// Count marked positions
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Union another mask into this one in-place
    ///
    /// Masks built for the same cell are always congruent; a mask of
    /// different dimensions is ignored.
    pub fn union_with(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.bits |= &other.bits;
        }
    }

    /// Test whether every mark in `other` is also marked here
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && other
                .bits
                .iter_ones()
                .all(|index| self.bits.get(index).as_deref() == Some(&true))
    }

    /// Distance from every unmarked position to the nearest marked position
    ///
    /// Multi-source breadth-first expansion with 4-connectivity: marked
    /// positions read zero, their unmarked neighbors one, and so on.
    /// Positions farther than `cap` steps (or unreachable because the mask
    /// is empty) read [`DISTANCE_UNREACHED`]. Cost is bounded by the band
    /// within `cap` steps of the marked set.
    pub fn boundary_distance(&self, cap: u32) -> Array2<u32> {
        let mut distances = Array2::from_elem((self.height, self.width), DISTANCE_UNREACHED);
        let mut frontier = VecDeque::new();

        for index in self.bits.iter_ones() {
            let row = index / self.width;
            let col = index % self.width;
            if let Some(slot) = distances.get_mut((row, col)) {
                *slot = 0;
            }
            frontier.push_back((row, col));
        }

        while let Some((row, col)) = frontier.pop_front() {
            let here = distances.get((row, col)).copied().unwrap_or(0);
            if here >= cap {
                continue;
            }

            for (dr, dc) in [(-1_i64, 0_i64), (1, 0), (0, -1), (0, 1)] {
                let next_row = row as i64 + dr;
                let next_col = col as i64 + dc;
                if next_row < 0 || next_col < 0 {
                    continue;
                }
                let (next_row, next_col) = (next_row as usize, next_col as usize);
                if let Some(slot) = distances.get_mut((next_row, next_col)) {
                    if *slot == DISTANCE_UNREACHED {
                        *slot = here + 1;
                        frontier.push_back((next_row, next_col));
                    }
                }
            }
        }

        distances
    }
}
