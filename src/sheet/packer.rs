//! Uniform cell layout computation and alpha-aware sheet composition

use image::{RgbaImage, imageops};

/// A cropped sprite ready for packing
#[derive(Clone, Debug)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    /// Wrap a cropped RGBA buffer
    pub const fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Sprite width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Sprite height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The sprite's pixel buffer
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Uniform cell geometry shared by every sprite on the sheet
///
/// The cell is sized to the largest cropped sprite plus a margin on all
/// sides, so every grid position holds every sprite. Placement is a pure
/// function of grid index and sprite size: repeated packs of the same
/// sprites land on identical pixel offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    /// Grid columns
    pub columns: usize,
    /// Grid rows
    pub rows: usize,
    /// Uniform cell width
    pub cell_width: u32,
    /// Uniform cell height
    pub cell_height: u32,
    /// Transparent margin inside each cell
    pub margin: u32,
}

impl SheetLayout {
    /// Compute the uniform cell from the sprites to be packed
    ///
    /// Empty grid positions contribute nothing; a fully empty set degrades
    /// to a `2 * margin` cell and a (tiny) fully transparent sheet.
    pub fn from_sprites(
        sprites: &[Option<Sprite>],
        columns: usize,
        rows: usize,
        margin: u32,
    ) -> Self {
        let mut max_width = 0;
        let mut max_height = 0;
        for sprite in sprites.iter().flatten() {
            max_width = max_width.max(sprite.width());
            max_height = max_height.max(sprite.height());
        }

        Self {
            columns,
            rows,
            cell_width: max_width + margin * 2,
            cell_height: max_height + margin * 2,
            margin,
        }
    }

    /// Total sheet width in pixels
    pub const fn sheet_width(&self) -> u32 {
        self.columns as u32 * self.cell_width
    }

    /// Total sheet height in pixels
    pub const fn sheet_height(&self) -> u32 {
        self.rows as u32 * self.cell_height
    }

    /// Pixel offset for a sprite at a grid index
    ///
    /// Horizontally centered in its cell; vertically aligned to the shared
    /// baseline (cell bottom minus the margin), so a walk cycle's frames
    /// stand on one line regardless of individual sprite heights.
    pub const fn placement(&self, index: usize, sprite_width: u32, sprite_height: u32) -> (i64, i64) {
        let col = (index % self.columns) as i64;
        let row = (index / self.columns) as i64;

        let x = col * self.cell_width as i64
            + (self.cell_width as i64 - sprite_width as i64) / 2;
        let y = row * self.cell_height as i64
            + (self.cell_height as i64 - sprite_height as i64 - self.margin as i64);

        (x, y)
    }
}

/// Composite sprites onto a transparent sheet canvas
///
/// Destination regions never overlap (one cell per grid index), so paste
/// order does not matter; empty positions stay fully transparent.
pub fn pack(sprites: &[Option<Sprite>], layout: &SheetLayout) -> RgbaImage {
    let mut sheet = RgbaImage::new(layout.sheet_width(), layout.sheet_height());

    for (index, sprite) in sprites.iter().enumerate() {
        let Some(sprite) = sprite else {
            continue;
        };
        let (x, y) = layout.placement(index, sprite.width(), sprite.height());
        imageops::overlay(&mut sheet, sprite.image(), x, y);
    }

    sheet
}
