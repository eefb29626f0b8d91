//! Image loading, cell slicing, and sheet export

use crate::io::error::{ExtractionError, Result};
use crate::spatial::cell::CellBuffer;
use crate::spatial::template::GridTemplate;
use image::RgbaImage;
use std::path::Path;

/// Load a PNG (or any supported format) as RGBA
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| ExtractionError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgba8())
}

/// Slice every cell's content rectangle out of the source image
///
/// Rectangles come from the template scaled to the actual image size;
/// rectangles clamped away at the image edge yield empty buffers, which
/// the pipeline treats as empty cells.
pub fn slice_cells(image: &RgbaImage, template: &GridTemplate) -> Vec<CellBuffer> {
    (0..template.cell_count())
        .map(|index| {
            let rect = template.cell_rect(index, image.width(), image.height());
            CellBuffer::from_image(image, &rect)
        })
        .collect()
}

/// Save an RGBA image, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the
/// image cannot be encoded to the given path.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractionError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    image.save(path).map_err(|e| ExtractionError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
