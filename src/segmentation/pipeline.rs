//! Per-cell pipeline orchestration and tunable parameters

use crate::io::configuration::{
    ALPHA_COLOR_WEIGHT, ALPHA_FLOOR, ALPHA_SPATIAL_WEIGHT, ANCHOR_INSET_EXTRA, ANCHOR_PATCH_SIZE,
    COLOR_ALPHA_WINDOW, DEFAULT_BORDER_BLANK, DEFAULT_DEFRINGE_WIDTH, DEFAULT_FLOOD_TOLERANCE,
    DEFAULT_INTERIOR_TOLERANCE, DEFAULT_MIN_ISLAND_AREA, UNBLEND_MIN_ALPHA,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::color::Rgb;
use crate::segmentation::{anchor, background, cleanup, defringe, flood};
use crate::sheet::packer::Sprite;
use crate::spatial::bbox;
use crate::spatial::cell::CellBuffer;

/// Tunable parameters for the per-cell extraction pipeline
///
/// All values trade correctness against quality; none change the
/// pipeline's structure. The decontamination weights and floors are
/// empirically tuned -- override them knowingly, since any change shifts
/// visual output without failing loudly.
#[derive(Clone, Copy, Debug)]
pub struct ExtractionParams {
    /// Max RGB distance from a flood-fill anchor still counted as background
    pub flood_tolerance: f64,
    /// Max RGB distance from the estimated background for interior voids
    ///
    /// Intentionally stricter than `flood_tolerance`; see
    /// [`background::interior_voids`].
    pub interior_tolerance: f64,
    /// How many pixels from the background boundary to decontaminate
    pub defringe_width: usize,
    /// Minimum connected-component area kept by the island filter
    pub min_island_area: usize,
    /// Border band width blanked to kill grid-line bleed
    pub border_blank: usize,
    /// Side length of the patches sampled for anchor colors
    pub anchor_patch: usize,
    /// Weight of the color-distance alpha estimate
    pub color_weight: f64,
    /// Weight of the boundary-distance alpha estimate
    pub spatial_weight: f64,
    /// Lower alpha bound preventing unblending blow-up
    pub alpha_floor: f64,
    /// Minimum denominator for the unblending solve
    pub unblend_floor: f64,
    /// Color-alpha normalization window, as a multiple of `flood_tolerance`
    pub color_window: f64,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            flood_tolerance: DEFAULT_FLOOD_TOLERANCE,
            interior_tolerance: DEFAULT_INTERIOR_TOLERANCE,
            defringe_width: DEFAULT_DEFRINGE_WIDTH,
            min_island_area: DEFAULT_MIN_ISLAND_AREA,
            border_blank: DEFAULT_BORDER_BLANK,
            anchor_patch: ANCHOR_PATCH_SIZE,
            color_weight: ALPHA_COLOR_WEIGHT,
            spatial_weight: ALPHA_SPATIAL_WEIGHT,
            alpha_floor: ALPHA_FLOOR,
            unblend_floor: UNBLEND_MIN_ALPHA,
            color_window: COLOR_ALPHA_WINDOW,
        }
    }
}

impl ExtractionParams {
    /// Inset from the cell edge for anchor patches
    ///
    /// Sits past the blanked border so grid-line bleed cannot contaminate
    /// the sampled patches.
    pub const fn anchor_inset(&self) -> usize {
        self.border_blank + ANCHOR_INSET_EXTRA
    }

    /// Validate parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending parameter when a tolerance is
    /// not positive, a weight is negative, or a floor leaves the unblend
    /// division unprotected.
    pub fn validate(&self) -> Result<()> {
        if self.flood_tolerance <= 0.0 {
            return Err(invalid_parameter(
                "flood_tolerance",
                &self.flood_tolerance,
                &"must be positive",
            ));
        }
        if self.interior_tolerance < 0.0 {
            return Err(invalid_parameter(
                "interior_tolerance",
                &self.interior_tolerance,
                &"must not be negative",
            ));
        }
        if self.color_weight < 0.0 || self.spatial_weight < 0.0 {
            return Err(invalid_parameter(
                "color_weight/spatial_weight",
                &format!("{}/{}", self.color_weight, self.spatial_weight),
                &"weights must not be negative",
            ));
        }
        if self.alpha_floor <= 0.0 || self.alpha_floor > 1.0 {
            return Err(invalid_parameter(
                "alpha_floor",
                &self.alpha_floor,
                &"must lie in (0, 1]",
            ));
        }
        if self.unblend_floor <= 0.0 {
            return Err(invalid_parameter(
                "unblend_floor",
                &self.unblend_floor,
                &"must be positive",
            ));
        }
        Ok(())
    }
}

/// Per-cell diagnostics for the reporting collaborator
///
/// Not part of the pipeline's correctness contract; consumed by the CLI's
/// per-cell log lines.
#[derive(Clone, Copy, Debug)]
pub struct CellReport {
    /// Estimated background color
    pub background: Rgb,
    /// Fraction of the cell classified as background
    pub background_fraction: f64,
    /// Cropped sprite size, `None` for an empty cell
    pub cropped: Option<(u32, u32)>,
}

/// Result of processing one grid cell
#[derive(Debug)]
pub struct CellOutcome {
    /// The cropped sprite, `None` when nothing survived masking
    pub sprite: Option<Sprite>,
    /// The keyed full-cell buffer, for debug dumps
    pub keyed: CellBuffer,
    /// Diagnostics for reporting
    pub report: CellReport,
}

/// Runs the fixed-order extraction pipeline on independent cells
///
/// Cells share nothing; the extractor itself is immutable state, so
/// processing order carries no meaning beyond final sheet placement.
#[derive(Clone, Copy, Debug)]
pub struct SpriteExtractor {
    params: ExtractionParams,
}

impl SpriteExtractor {
    /// Create an extractor with the given parameters
    pub const fn new(params: ExtractionParams) -> Self {
        Self { params }
    }

    /// The extractor's parameters
    pub const fn params(&self) -> &ExtractionParams {
        &self.params
    }

    /// Isolate the sprite in one cell
    ///
    /// Takes ownership of the cell buffer and threads it through the
    /// stages in their required order: anchors, flood fill, background
    /// estimate, interior voids, decontamination, border blank, island
    /// filter, crop. Degenerate inputs (empty cells, no anchors, nothing
    /// visible) degrade to an empty outcome; nothing in here is fatal.
    pub fn extract(&self, cell: CellBuffer) -> CellOutcome {
        let params = &self.params;
        let total_pixels = cell.pixel_count();

        let anchors = anchor::sample_anchors(
            &cell,
            params.anchor_inset(),
            params.anchor_patch,
            params.flood_tolerance,
        );
        let (flood_mask, used_anchors) = flood::flood_fill(&cell, &anchors, params.flood_tolerance);

        // The background color must be fixed here: both the void pass and
        // the decontamination below compare against it
        let bg_color = background::estimate_background(&cell, &flood_mask, &used_anchors);

        let voids = background::interior_voids(&cell, bg_color, params.interior_tolerance);
        let mut full_mask = flood_mask;
        full_mask.union_with(&voids);

        let keyed = defringe::decontaminate(cell, &full_mask, bg_color, params);
        let keyed = cleanup::blank_border(keyed, params.border_blank);
        let keyed = cleanup::remove_islands(keyed, params.min_island_area);

        let bounds = bbox::content_bounds(&keyed);
        let sprite = bounds.map(|bounds| Sprite::new(keyed.crop(&bounds)));

        let opaque = keyed.opaque_count();
        let background_fraction = if total_pixels == 0 {
            1.0
        } else {
            1.0 - opaque as f64 / total_pixels as f64
        };

        let report = CellReport {
            background: bg_color,
            background_fraction,
            cropped: sprite
                .as_ref()
                .map(|sprite| (sprite.width(), sprite.height())),
        };

        CellOutcome {
            sprite,
            keyed,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractionParams, SpriteExtractor};
    use crate::spatial::cell::CellBuffer;

    #[test]
    fn test_empty_cell_degrades_gracefully() {
        let extractor = SpriteExtractor::new(ExtractionParams::default());
        let outcome = extractor.extract(CellBuffer::new(0, 0));

        assert!(outcome.sprite.is_none());
        assert!(outcome.report.cropped.is_none());
        assert!((outcome.report.background_fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let params = ExtractionParams {
            flood_tolerance: 0.0,
            ..ExtractionParams::default()
        };
        assert!(params.validate().is_err());
        assert!(ExtractionParams::default().validate().is_ok());
    }
}
