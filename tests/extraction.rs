//! Validates the extraction pipeline end-to-end on synthetic chroma-key cells

use image::{Rgba, RgbaImage};
use spritekey::io::cli::{Cli, FileProcessor};
use spritekey::io::image::load_rgba;
use spritekey::segmentation::{ExtractionParams, SpriteExtractor, anchor, background, flood};
use spritekey::spatial::cell::CellBuffer;
use spritekey::spatial::template::{CellRect, GridTemplate};

const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn cell_from_image(image: &RgbaImage) -> CellBuffer {
    let rect = CellRect {
        x0: 0,
        y0: 0,
        x1: image.width(),
        y1: image.height(),
    };
    CellBuffer::from_image(image, &rect)
}

fn square_on_background(size: u32, square: (u32, u32, u32, u32)) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(size, size, MAGENTA);
    for y in square.1..square.3 {
        for x in square.0..square.2 {
            image.put_pixel(x, y, BLACK);
        }
    }
    image
}

#[test]
fn test_black_square_round_trip() {
    // 100x100 magenta cell with an opaque 40x40 black square
    let image = square_on_background(100, (30, 30, 70, 70));
    let extractor = SpriteExtractor::new(ExtractionParams::default());
    let outcome = extractor.extract(cell_from_image(&image));

    // The bounding box matches the square exactly: defringing softens
    // edge alpha but never to zero for a color this far from background
    assert_eq!(outcome.report.cropped, Some((40, 40)));

    // Estimated background is the chroma key itself
    let bg = outcome.report.background;
    assert!((bg[0] - 255.0).abs() < 1.0);
    assert!(bg[1].abs() < 1.0);
    assert!((bg[2] - 255.0).abs() < 1.0);

    // 8400 of 10000 pixels are background
    let removed = outcome.report.background_fraction * 100.0;
    assert!((removed - 84.0).abs() < 0.5);

    // No background-tinted pixels survive inside the crop
    let sprite = match outcome.sprite {
        Some(sprite) => sprite,
        None => unreachable!("square cell must produce a sprite"),
    };
    for pixel in sprite.image().pixels() {
        let [r, g, b, a] = pixel.0;
        if a > 0 {
            assert!(
                !(r > 200 && b > 200 && g < 100),
                "background-colored pixel survived: {r},{g},{b},{a}"
            );
        }
    }
}

#[test]
fn test_full_mask_is_superset_of_flood_mask() {
    // Black ring with an enclosed magenta hole: the edge-seeded fill can
    // never reach the hole, the interior pass must
    let mut image = square_on_background(60, (20, 20, 40, 40));
    for y in 27..33 {
        for x in 27..33 {
            image.put_pixel(x, y, MAGENTA);
        }
    }
    let cell = cell_from_image(&image);
    let params = ExtractionParams::default();

    let anchors = anchor::sample_anchors(
        &cell,
        params.anchor_inset(),
        params.anchor_patch,
        params.flood_tolerance,
    );
    let (flood_mask, used) = flood::flood_fill(&cell, &anchors, params.flood_tolerance);
    let bg = background::estimate_background(&cell, &flood_mask, &used);
    let voids = background::interior_voids(&cell, bg, params.interior_tolerance);

    let mut full_mask = flood_mask.clone();
    full_mask.union_with(&voids);

    assert!(full_mask.is_superset_of(&flood_mask));
    assert!(!flood_mask.get(30, 30));
    assert!(full_mask.get(30, 30));
    assert!(full_mask.count() > flood_mask.count());
}

#[test]
fn test_enclosed_void_becomes_transparent() {
    let mut image = square_on_background(60, (20, 20, 40, 40));
    for y in 27..33 {
        for x in 27..33 {
            image.put_pixel(x, y, MAGENTA);
        }
    }

    let extractor = SpriteExtractor::new(ExtractionParams::default());
    let outcome = extractor.extract(cell_from_image(&image));

    assert_eq!(outcome.report.cropped, Some((20, 20)));
    let sprite = match outcome.sprite {
        Some(sprite) => sprite,
        None => unreachable!("ring cell must produce a sprite"),
    };

    // Hole center, in crop-local coordinates
    let hole = sprite.image().get_pixel_checked(10, 10);
    assert_eq!(hole.map(|p| p.0[3]), Some(0));
}

#[test]
fn test_uniform_background_cell_is_empty() {
    let image = RgbaImage::from_pixel(80, 80, MAGENTA);
    let extractor = SpriteExtractor::new(ExtractionParams::default());
    let outcome = extractor.extract(cell_from_image(&image));

    assert!(outcome.sprite.is_none());
    assert!(outcome.report.cropped.is_none());
    assert!((outcome.report.background_fraction - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_noisy_background_still_segments() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(7);
    let mut image = RgbaImage::new(100, 100);
    for pixel in image.pixels_mut() {
        let jitter = |rng: &mut StdRng, base: i32| {
            (base + rng.random_range(-8..=8)).clamp(0, 255) as u8
        };
        *pixel = Rgba([
            jitter(&mut rng, 247),
            jitter(&mut rng, 8),
            jitter(&mut rng, 247),
            255,
        ]);
    }
    for y in 30..70 {
        for x in 30..70 {
            image.put_pixel(x, y, BLACK);
        }
    }

    let extractor = SpriteExtractor::new(ExtractionParams::default());
    let outcome = extractor.extract(cell_from_image(&image));

    assert_eq!(outcome.report.cropped, Some((40, 40)));
    let removed = outcome.report.background_fraction;
    assert!(removed > 0.83 && removed < 0.85);
}

#[test]
fn test_processor_packs_grid_into_sheet() {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };

    // Fill a nominal 1K template grid and draw sprites into two cells
    let template = GridTemplate::one_k(6, 6);
    let mut image = RgbaImage::from_pixel(1015, 1015, MAGENTA);
    for index in [0, 35] {
        let rect = template.cell_rect(index, 1015, 1015);
        let cx = (rect.x0 + rect.x1) / 2;
        let cy = (rect.y0 + rect.y1) / 2;
        for y in cy - 20..cy + 20 {
            for x in cx - 20..cx + 20 {
                image.put_pixel(x, y, BLACK);
            }
        }
    }

    let input = dir.path().join("monster.png");
    assert!(image.save(&input).is_ok());

    let cli = Cli {
        target: input,
        columns: 6,
        rows: 6,
        flood_tolerance: 45.0,
        interior_tolerance: 20.0,
        defringe: 4,
        min_island: 20,
        border_blank: 6,
        margin: 4,
        debug_cells: false,
        quiet: true,
        no_skip: false,
    };

    let mut processor = FileProcessor::new(cli);
    assert!(processor.process().is_ok());

    // Two 40x40 sprites: uniform cells of 48x48 in a 6x6 sheet
    let sheet = match load_rgba(&dir.path().join("monster_sheet.png")) {
        Ok(sheet) => sheet,
        Err(e) => unreachable!("sheet must exist after processing: {e}"),
    };
    assert_eq!(sheet.dimensions(), (288, 288));

    // Cell 0 holds content, cell 1 stays transparent
    let cell0_opaque = (0..48_u32)
        .flat_map(|y| (0..48_u32).map(move |x| (x, y)))
        .filter(|&(x, y)| sheet.get_pixel_checked(x, y).is_some_and(|p| p.0[3] > 0))
        .count();
    let cell1_opaque = (0..48_u32)
        .flat_map(|y| (48..96_u32).map(move |x| (x, y)))
        .filter(|&(x, y)| sheet.get_pixel_checked(x, y).is_some_and(|p| p.0[3] > 0))
        .count();

    assert_eq!(cell0_opaque, 40 * 40);
    assert_eq!(cell1_opaque, 0);
}
