//! Chroma-key sprite extraction and sheet packing for generated sprite grids
//!
//! The system slices a generated grid image into cells, isolates each sprite
//! from its chroma-key background (multi-seeded flood fill, interior void
//! detection, alpha-fringe decontamination, border and island cleanup), crops
//! to visible content, and repacks everything into a uniform sprite sheet.

#![forbid(unsafe_code)]

/// Input/output operations, CLI, and error handling
pub mod io;
/// Color arithmetic and coverage estimation utilities
pub mod math;
/// Background segmentation and the per-cell extraction pipeline
pub mod segmentation;
/// Sprite packing into uniform sheet layouts
pub mod sheet;
/// Pixel masks, cell buffers, and grid template geometry
pub mod spatial;

pub use io::error::{ExtractionError, Result};
