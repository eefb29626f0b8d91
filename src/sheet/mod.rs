//! Sprite packing into uniform sheet layouts

/// Uniform cell layout computation and alpha-aware sheet composition
pub mod packer;

pub use packer::{SheetLayout, Sprite, pack};
