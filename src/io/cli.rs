//! Command-line interface for batch sprite-sheet extraction

use crate::io::configuration::{
    DEBUG_DIR_SUFFIX, DEFAULT_BORDER_BLANK, DEFAULT_COLUMNS, DEFAULT_DEFRINGE_WIDTH,
    DEFAULT_FLOOD_TOLERANCE, DEFAULT_INTERIOR_TOLERANCE, DEFAULT_MIN_ISLAND_AREA, DEFAULT_ROWS,
    DEFAULT_SHEET_MARGIN, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, target_error};
use crate::io::image::{load_rgba, save_png, slice_cells};
use crate::io::progress::ProgressManager;
use crate::segmentation::{CellReport, ExtractionParams, SpriteExtractor};
use crate::sheet::packer::{SheetLayout, Sprite, pack};
use crate::spatial::template::GridTemplate;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "spritekey")]
#[command(
    author,
    version,
    about = "Extract chroma-keyed sprites from generated grid sheets"
)]
/// Command-line arguments for the extraction tool
// CLI tools commonly need multiple boolean flags for various features
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Grid columns in the source template
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,

    /// Grid rows in the source template
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Flood-fill tolerance as RGB distance from the anchor color
    #[arg(short = 't', long, default_value_t = DEFAULT_FLOOD_TOLERANCE)]
    pub flood_tolerance: f64,

    /// Interior void tolerance as RGB distance from the background color
    #[arg(long, default_value_t = DEFAULT_INTERIOR_TOLERANCE)]
    pub interior_tolerance: f64,

    /// How many pixels from the background boundary to decontaminate
    #[arg(long, default_value_t = DEFAULT_DEFRINGE_WIDTH)]
    pub defringe: usize,

    /// Minimum connected-component area to keep, in pixels
    #[arg(long, default_value_t = DEFAULT_MIN_ISLAND_AREA)]
    pub min_island: usize,

    /// Border band width to blank, in pixels
    #[arg(long, default_value_t = DEFAULT_BORDER_BLANK)]
    pub border_blank: usize,

    /// Transparent margin around each sprite in the packed sheet
    #[arg(short, long, default_value_t = DEFAULT_SHEET_MARGIN)]
    pub margin: u32,

    /// Dump per-cell keyed PNGs next to the output
    #[arg(short, long)]
    pub debug_cells: bool,

    /// Suppress progress display and per-cell reporting
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build extraction parameters from the CLI arguments
    pub fn extraction_params(&self) -> ExtractionParams {
        ExtractionParams {
            flood_tolerance: self.flood_tolerance,
            interior_tolerance: self.interior_tolerance,
            defringe_width: self.defringe,
            min_island_area: self.min_island,
            border_blank: self.border_blank,
            ..ExtractionParams::default()
        }
    }
}

/// Orchestrates batch processing of grid sheets with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, parameter validation, or
    /// file processing fails.
    pub fn process(&mut self) -> Result<()> {
        self.cli.extraction_params().validate()?;
        if self.cli.columns == 0 || self.cli.rows == 0 {
            return Err(crate::io::error::invalid_parameter(
                "columns/rows",
                &format!("{}/{}", self.cli.columns, self.cli.rows),
                &"grid dimensions must be positive",
            ));
        }

        let files = self.collect_files()?;
        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(target_error("Target file must be a PNG image"))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && !Self::is_own_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(target_error("Target must be a PNG file or directory"))
        }
    }

    // Don't re-extract sheets this tool produced on an earlier run
    fn is_own_output(path: &Path) -> bool {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&self, input_path: &Path) -> Result<()> {
        let output_path = Self::get_output_path(input_path);
        let image = load_rgba(input_path)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(crate::io::error::invalid_source(
                &format!("'{}' decoded to a zero-sized image", input_path.display()),
            ));
        }

        let template = GridTemplate::detect(image.width(), self.cli.columns, self.cli.rows);
        let extractor = SpriteExtractor::new(self.cli.extraction_params());

        if let Some(ref pm) = self.progress_manager {
            pm.start_file(input_path, template.cell_count());
        }

        let debug_dir = self
            .cli
            .debug_cells
            .then(|| Self::get_debug_dir(input_path));

        let mut sprites: Vec<Option<Sprite>> = Vec::with_capacity(template.cell_count());
        for (index, cell) in slice_cells(&image, &template).into_iter().enumerate() {
            let outcome = extractor.extract(cell);

            if let Some(ref dir) = debug_dir {
                save_png(&outcome.keyed.to_image(), &dir.join(format!("{index:02}.png")))?;
            }

            self.report_cell(index, &outcome.report);
            sprites.push(outcome.sprite);

            if let Some(ref pm) = self.progress_manager {
                pm.cell_done();
            }
        }

        let layout =
            SheetLayout::from_sprites(&sprites, template.columns, template.rows, self.cli.margin);
        let sheet = pack(&sprites, &layout);
        save_png(&sheet, &output_path)?;

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file();
        }
        self.report_sheet(&output_path, &layout);

        Ok(())
    }

    // Allow print for the per-cell diagnostic contract
    #[allow(clippy::print_stderr)]
    fn report_cell(&self, index: usize, report: &CellReport) {
        if self.cli.quiet {
            return;
        }

        let bg = report.background;
        let removed = report.background_fraction * 100.0;
        match report.cropped {
            Some((width, height)) => {
                eprintln!(
                    "  [{index:02}] {width}x{height}  bg=({:.0},{:.0},{:.0}) removed={removed:.0}%",
                    bg[0], bg[1], bg[2]
                );
            }
            None => {
                eprintln!(
                    "  [{index:02}] EMPTY  bg=({:.0},{:.0},{:.0})",
                    bg[0], bg[1], bg[2]
                );
            }
        }
    }

    // Allow print for user feedback after each sheet
    #[allow(clippy::print_stderr)]
    fn report_sheet(&self, output_path: &Path, layout: &SheetLayout) {
        if self.cli.quiet {
            return;
        }

        eprintln!(
            "Sprite sheet saved: {} ({}x{}, cells {}x{})",
            output_path.display(),
            layout.sheet_width(),
            layout.sheet_height(),
            layout.cell_width,
            layout.cell_height,
        );
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    fn get_debug_dir(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let dir_name = format!("{}{}", stem.to_string_lossy(), DEBUG_DIR_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(dir_name)
        } else {
            PathBuf::from(dir_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, FileProcessor};
    use clap::Parser;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => unreachable!("CLI args must parse: {e}"),
        }
    }

    #[test]
    fn test_defaults_match_configuration() {
        let cli = parse(&["spritekey", "sheet.png"]);
        assert_eq!(cli.columns, 6);
        assert_eq!(cli.rows, 6);
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());

        let params = cli.extraction_params();
        assert!((params.flood_tolerance - 45.0).abs() < f64::EPSILON);
        assert_eq!(params.defringe_width, 4);
    }

    #[test]
    fn test_output_path_naming() {
        let output = FileProcessor::get_output_path(Path::new("art/monster.png"));
        assert_eq!(output, Path::new("art/monster_sheet.png"));

        let debug = FileProcessor::get_debug_dir(Path::new("art/monster.png"));
        assert_eq!(debug, Path::new("art/monster_cells"));
    }

    #[test]
    fn test_own_output_is_not_reprocessed() {
        assert!(FileProcessor::is_own_output(Path::new("a/b_sheet.png")));
        assert!(!FileProcessor::is_own_output(Path::new("a/b.png")));
    }
}
