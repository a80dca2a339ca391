//! Rendering constants, size presets and runtime configuration defaults

// Master surface
/// Edge length of the square working surface motifs are scattered on
pub const MASTER_SIZE: u32 = 2400;
/// Fewest scatter objects a master surface receives
pub const MIN_SCATTER_OBJECTS: usize = 3;
/// Number of distinct object counts above the minimum (3..=120)
pub const SCATTER_OBJECT_SPAN: usize = 118;
/// Upper bound on scatter objects per master surface
pub const MAX_SCATTER_OBJECTS: usize = MIN_SCATTER_OBJECTS + SCATTER_OBJECT_SPAN - 1;
/// Smallest motif edge as a fraction of the master size
pub const MIN_OBJECT_SCALE: f64 = 0.02;
/// Range added on top of the smallest motif scale
pub const OBJECT_SCALE_SPAN: f64 = 0.48;

// Panel geometry
/// Panel inset for the 1200x628 row layout
pub const ROW_PANEL_MARGIN: f32 = 24.0;
/// Panel inset for the 1080x1080 grid layout
pub const GRID_PANEL_MARGIN: f32 = 48.0;
/// Corner radius of overlay panels
pub const PANEL_CORNER_RADIUS: f32 = 24.0;
/// Width of the panel outline
pub const PANEL_STROKE_WIDTH: f32 = 2.0;
/// Warm neutral used for the translucent panel and every panel outline
pub const PANEL_TINT: [u8; 3] = [229, 223, 214];
/// Opacity of the translucent panel fill
pub const TRANSPARENT_PANEL_ALPHA: f32 = 0.45;

// Covers
/// Height every cover is scaled to in the row layout
pub const ROW_COVER_HEIGHT: f32 = 366.0;
/// Gap between neighbouring covers in rows and grids
pub const COVER_GAP: f32 = 30.0;
/// Most covers placed in the 2x2 grid
pub const MAX_GRID_COVERS: usize = 4;
/// Corner radius of the cover clip
pub const COVER_CORNER_RADIUS: f32 = 4.0;
/// Opacity shared by every cover gradient stop
pub const COVER_GRADIENT_ALPHA: f32 = 0.40;
/// Drop shadow offset `(x, y)` in pixels
pub const COVER_SHADOW_OFFSET: (f32, f32) = (-8.0, 12.0);
/// Drop shadow blur standard deviation in pixels
pub const COVER_SHADOW_BLUR: f32 = 16.0;
/// Drop shadow colour channels
pub const COVER_SHADOW_COLOR: [u8; 3] = [10, 10, 10];
/// Drop shadow opacity
pub const COVER_SHADOW_ALPHA: f32 = 0.36;

// Text
/// Horizontal space kept free on both sides of the text block combined
pub const TEXT_HORIZONTAL_INSET: f32 = 192.0;
/// Spacing added after each glyph when laying out overlay text
pub const TEXT_LETTER_SPACING: f32 = -2.0;
/// Opaque stand-in for the translucent panel when choosing a text colour
pub const TRANSPARENT_PANEL_CONTRAST_BASE: &str = "#e5dfd6";

// Post-processing
/// Quantisation step used by the dither filter
pub const DITHER_LEVEL_STEP: f64 = 16.0;

// Option ranges
/// Accepted overlay opacity range
pub const OVERLAY_ALPHA_RANGE: (f32, f32) = (0.1, 1.0);
/// Accepted font size range in pixels
pub const FONT_SIZE_RANGE: (f32, f32) = (20.0, 200.0);
/// Accepted line height range in pixels
pub const LINE_HEIGHT_RANGE: (f32, f32) = (20.0, 250.0);

// Default values for configurable parameters
/// Default overlay opacity
pub const DEFAULT_OVERLAY_ALPHA: f32 = 1.0;
/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 116.0;
/// Default line height in pixels
pub const DEFAULT_LINE_HEIGHT: f32 = 96.0;
/// Default overlay text
pub const DEFAULT_OVERLAY_TEXT: &str = "Must read romances of the season.";
/// Default number of background render workers
pub const DEFAULT_WORKER_COUNT: usize = 2;

// Output settings
/// File extension of written outputs
pub const OUTPUT_EXTENSION: &str = "png";
/// Suffix of the text variant key for the grid layout
pub const TEXT_VARIANT_SUFFIX: &str = "-text";
/// Suffix of the covers variant key for the grid layout
pub const COVERS_VARIANT_SUFFIX: &str = "-covers";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Named output sizes offered by default `(name, width, height)`
pub const SIZE_PRESETS: [(&str, u32, u32); 5] = [
    ("Homepage", 1200, 628),
    ("Landing Page", 2000, 380),
    ("Email", 1080, 1080),
    ("Instagram Post (Portrait)", 1080, 1350),
    ("Instagram Story", 1080, 1920),
];

/// Genre palettes; the first colour of each is used as the background
pub const GENRE_PALETTES: [(&str, &[&str]); 11] = [
    ("Romance", &["#ED5F93", "#FFC636", "#FF602B", "#7CCFD4", "#FFE4BC"]),
    ("Sci-Fi & Fantasy", &["#573DE8", "#4091ED", "#098E9B", "#DBD000", "#9565DE"]),
    ("Fiction", &["#F24911", "#3AABB1", "#90BD11", "#BA9DEC", "#F7C57E"]),
    ("Kids & YA", &["#FF8FB8", "#FFC636", "#FCF56F", "#64ABFB", "#C8EC64"]),
    ("Mysteries & Thrillers", &["#CF202A", "#750029", "#230F66", "#005761", "#554F46"]),
    ("Historical Fiction", &["#FF9B0D", "#AD4900", "#D97E00", "#90BD11", "#755F66"]),
    ("Nonfiction", &["#C8EC64", "#64ABFB", "#FFD978", "#005D81", "#709900"]),
    ("Women's Fiction", &["#FF9B0D", "#FF8FB8", "#9565DE", "#90BD11", "#FFE4BC"]),
    ("Book Club", &["#BA9DEC", "#7CCFD4", "#FFE4BC", "#FFD978", "#B5AFA6"]),
    (
        "New Books",
        &["#F24911", "#ED5F93", "#FF8FB8", "#573DE8", "#3AABB1", "#64ABFB"],
    ),
    (
        "Biographies & Memoirs",
        &["#D97E00", "#FFE4BC", "#D5CFC6", "#755F66", "#005D81"],
    ),
];

/// Look up a genre palette by case-insensitive name
pub fn genre_palette(name: &str) -> Option<&'static [&'static str]> {
    GENRE_PALETTES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(name))
        .map(|(_, colors)| *colors)
}
