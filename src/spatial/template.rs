//! Grid template geometry and scale-tolerant cell slicing
//!
//! The generation service fills a fixed grid template and may return the
//! result at a different resolution than requested. As long as the output
//! is a uniform scale of the template, scaling the nominal cell geometry
//! by the actual-to-nominal size ratio recovers every cell rectangle.

/// Nominal geometry of a generated grid template
///
/// Dimensions describe the template at its nominal sheet size; `cell_rect`
/// scales them to the actual input image. The per-cell label strip of
/// `header_height` pixels sits at the top of each nominal cell and is
/// excluded from the content rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridTemplate {
    /// Grid columns
    pub columns: usize,
    /// Grid rows
    pub rows: usize,
    /// Nominal sheet side length in pixels
    pub nominal_size: u32,
    /// Nominal cell width including its label strip
    pub cell_width: u32,
    /// Nominal cell height including its label strip
    pub cell_height: u32,
    /// Height of the per-cell label strip
    pub header_height: u32,
    /// Grid-line thickness between cells
    pub border: u32,
}

/// Pixel rectangle of one cell's content within the source image
///
/// Half-open on the right and bottom edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge, inclusive
    pub x0: u32,
    /// Top edge, inclusive
    pub y0: u32,
    /// Right edge, exclusive
    pub x1: u32,
    /// Bottom edge, exclusive
    pub y1: u32,
}

impl CellRect {
    /// Test whether the rectangle encloses no pixels
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

impl GridTemplate {
    /// Full-size template: 2822 px sheet, 468 px cells, 28 px labels
    ///
    /// 6 columns satisfy `6 * 468 + 7 * 2 = 2822`, so the nominal size is
    /// consistent with the cell geometry for the default grid.
    pub const fn full_size(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            nominal_size: 2822,
            cell_width: 468,
            cell_height: 468,
            header_height: 28,
            border: 2,
        }
    }

    /// 1K template: 1015 px sheet, 168 px cells, 16 px labels
    pub const fn one_k(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            nominal_size: 1015,
            cell_width: 168,
            cell_height: 168,
            header_height: 16,
            border: 1,
        }
    }

    /// Pick the built-in template whose scale to the image is closest to 1
    ///
    /// The generation service returns whatever resolution it likes; the
    /// template whose nominal size best matches the actual width wins.
    pub fn detect(image_width: u32, columns: usize, rows: usize) -> Self {
        let candidates = [Self::full_size(columns, rows), Self::one_k(columns, rows)];

        let mut best = candidates[0];
        let mut best_error = f64::INFINITY;
        for candidate in candidates {
            let scale = f64::from(image_width) / f64::from(candidate.nominal_size);
            let error = (scale - 1.0).abs();
            if error < best_error {
                best_error = error;
                best = candidate;
            }
        }

        best
    }

    /// Horizontal and vertical scale from nominal to actual image size
    pub fn scale(&self, image_width: u32, image_height: u32) -> (f64, f64) {
        (
            f64::from(image_width) / f64::from(self.nominal_size),
            f64::from(image_height) / f64::from(self.nominal_size),
        )
    }

    /// Total number of grid positions
    pub const fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Content rectangle of the cell at a grid index, clamped to the image
    ///
    /// The rectangle skips the scaled label strip at the top of the cell.
    /// Indices run row-major. Rectangles near the right/bottom image edge
    /// are clamped rather than rejected; a fully clamped-away rectangle is
    /// simply empty.
    pub fn cell_rect(&self, index: usize, image_width: u32, image_height: u32) -> CellRect {
        let col = index % self.columns.max(1);
        let row = index / self.columns.max(1);
        let (sx, sy) = self.scale(image_width, image_height);

        let cell_stride_x = f64::from(self.cell_width + self.border);
        let cell_stride_y = f64::from(self.cell_height + self.border);
        let border = f64::from(self.border);

        let x0 = ((border + col as f64 * cell_stride_x) * sx).round() as i64;
        let row_base = ((border + row as f64 * cell_stride_y) * sy).round() as i64;
        let y0 = row_base + (f64::from(self.header_height) * sy).round() as i64;
        let x1 = x0 + (f64::from(self.cell_width) * sx).round() as i64;
        let y1 = row_base + (f64::from(self.cell_height) * sy).round() as i64;

        let clamp_x = |value: i64| value.clamp(0, i64::from(image_width)) as u32;
        let clamp_y = |value: i64| value.clamp(0, i64::from(image_height)) as u32;

        CellRect {
            x0: clamp_x(x0),
            y0: clamp_y(y0),
            x1: clamp_x(x1),
            y1: clamp_y(y1),
        }
    }
}
