//! Background segmentation and the per-cell extraction pipeline
//!
//! The stages run in a fixed order per cell: anchor sampling feeds the
//! flood fill, whose mask and surviving anchors feed the background
//! estimator; the estimated color drives interior-void detection and edge
//! decontamination; border blanking and island removal clean up before the
//! bounding-box crop.

/// Background anchor sampling from cell corners and edge midpoints
pub mod anchor;
/// Background color estimation and interior void detection
pub mod background;
/// Border blanking and small-island removal
pub mod cleanup;
/// Alpha-fringe decontamination at the background boundary
pub mod defringe;
/// Multi-seeded flood fill over the cell's connected background
pub mod flood;
/// Per-cell pipeline orchestration and tunable parameters
pub mod pipeline;

pub use pipeline::{CellOutcome, CellReport, ExtractionParams, SpriteExtractor};
