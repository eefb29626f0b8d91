//! Extraction constants and runtime defaults

// Grid shape of the generated templates
/// Default grid columns
pub const DEFAULT_COLUMNS: usize = 6;
/// Default grid rows
pub const DEFAULT_ROWS: usize = 6;

// Segmentation tolerances, in RGB distance over 0-255 channels
/// Max distance from a flood-fill anchor still counted as background
pub const DEFAULT_FLOOD_TOLERANCE: f64 = 45.0;
// Shadows under hat brims sit moderately close to the background hue;
// the interior pass stays conservative so they survive
/// Max distance from the estimated background for interior voids
pub const DEFAULT_INTERIOR_TOLERANCE: f64 = 20.0;

// Cleanup parameters
/// Pixels from the background boundary to decontaminate
pub const DEFAULT_DEFRINGE_WIDTH: usize = 4;
/// Minimum connected-component area kept by the island filter
pub const DEFAULT_MIN_ISLAND_AREA: usize = 20;
/// Border band width blanked to kill grid-line and header bleed
pub const DEFAULT_BORDER_BLANK: usize = 6;

// Anchor sampling geometry
/// Side length of the patches sampled for anchor colors
pub const ANCHOR_PATCH_SIZE: usize = 8;
/// Extra inset past the blanked border for anchor patches
pub const ANCHOR_INSET_EXTRA: usize = 2;

// Decontamination constants. Empirically tuned; changing any of them
// silently changes visual output
/// Weight of the color-distance alpha estimate
pub const ALPHA_COLOR_WEIGHT: f64 = 0.7;
/// Weight of the boundary-distance alpha estimate
pub const ALPHA_SPATIAL_WEIGHT: f64 = 0.3;
/// Lower alpha bound preventing unblending blow-up
pub const ALPHA_FLOOR: f64 = 0.05;
/// Minimum denominator for the unblending solve
pub const UNBLEND_MIN_ALPHA: f64 = 0.1;
/// Color-alpha normalization window, as a multiple of the flood tolerance
pub const COLOR_ALPHA_WINDOW: f64 = 2.0;

// Output settings
/// Transparent margin around each sprite in the packed sheet
pub const DEFAULT_SHEET_MARGIN: u32 = 4;
/// Suffix added to sheet output filenames
pub const OUTPUT_SUFFIX: &str = "_sheet";
/// Suffix added to per-cell debug directories
pub const DEBUG_DIR_SUFFIX: &str = "_cells";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
