//! Progress display for batch extraction

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} cells")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for batch extraction
///
/// One bar tracks the cells of the file currently being processed; a
/// second batch bar appears above it when more than one file is queued.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    cell_bar: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let cell_bar = ProgressBar::new(0);
        cell_bar.set_style(CELL_STYLE.clone());

        Self {
            multi_progress,
            batch_bar: None,
            cell_bar,
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
        self.cell_bar = self.multi_progress.add(self.cell_bar.clone());
    }

    /// Configure the cell bar for a new file
    pub fn start_file(&self, path: &Path, cell_count: usize) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.cell_bar.set_length(cell_count as u64);
        self.cell_bar.set_position(0);
        self.cell_bar.set_message(display_name);
    }

    /// Report one more cell finished
    pub fn cell_done(&self) {
        self.cell_bar.inc(1);
    }

    /// Mark the current file as completed
    pub fn complete_file(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        self.cell_bar.finish_and_clear();
        let _ = self.multi_progress.clear();
    }
}
