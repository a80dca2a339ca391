//! Render request model: the only contract between callers and the engine
//!
//! A [`RenderRequest`] goes in, a [`RenderedPattern`] comes out. Nothing in
//! here is mutated while a render is running.

use crate::io::configuration::{
    COVERS_VARIANT_SUFFIX, DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT, DEFAULT_OVERLAY_ALPHA,
    DEFAULT_OVERLAY_TEXT, FONT_SIZE_RANGE, LINE_HEIGHT_RANGE, OVERLAY_ALPHA_RANGE, SIZE_PRESETS,
    TEXT_VARIANT_SUFFIX,
};
use crate::io::error::{PatternError, Result, file_system_error, invalid_parameter};
use crate::io::image::SourceImage;
use crate::math::color::Rgba;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Raw font file bytes shared between requests
pub type FontData = Arc<[u8]>;

/// Where an input image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Already decoded pixels
    Decoded(SourceImage),
    /// Encoded bytes owned by the request
    Encoded(Arc<[u8]>),
    /// A file only reachable from the caller's context
    File(PathBuf),
    /// A file that could not be read while materialising
    ///
    /// Loading it fails the same way loading the original file would.
    Unreadable {
        /// The referenced file
        path: PathBuf,
        /// Kind of the read failure
        kind: io::ErrorKind,
        /// Message of the read failure
        reason: String,
    },
}

impl ImageSource {
    /// Decode the source into pixels
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the bytes cannot be decoded
    pub fn load(&self, index: usize) -> Result<SourceImage> {
        match self {
            Self::Decoded(image) => Ok(image.clone()),
            Self::Encoded(bytes) => SourceImage::decode(bytes, index),
            Self::File(path) => SourceImage::open(path, index),
            Self::Unreadable { path, kind, reason } => Err(file_system_error(
                path,
                "read image",
                io::Error::new(*kind, reason.clone()),
            )),
        }
    }

    /// Replace a file reference with its bytes so the source is self-contained
    ///
    /// A file that cannot be read becomes [`ImageSource::Unreadable`], so the
    /// failure surfaces as a skipped image at render time, as it would when
    /// rendering from the file directly.
    pub async fn materialize(self) -> Self {
        match self {
            Self::File(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => Self::Encoded(bytes.into()),
                Err(error) => {
                    log::warn!("Could not read {}: {error}", path.display());
                    Self::Unreadable {
                        path,
                        kind: error.kind(),
                        reason: error.to_string(),
                    }
                }
            },
            other => other,
        }
    }

    /// Whether the source still points outside the request
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Identity used to decide whether cached renders still apply
    pub fn key(&self) -> SourceKey {
        match self {
            Self::Decoded(image) => SourceKey::Pixels(image.clone()),
            Self::Encoded(bytes) => SourceKey::Bytes(Arc::clone(bytes)),
            Self::File(path) | Self::Unreadable { path, .. } => SourceKey::Path(path.clone()),
        }
    }
}

impl From<SourceImage> for ImageSource {
    fn from(image: SourceImage) -> Self {
        Self::Decoded(image)
    }
}

/// Identity of an image or font buffer
///
/// Buffers compare by address. The key holds its own reference, so an address
/// cannot be reused by other data while a cache entry keyed on it exists.
#[derive(Debug, Clone)]
pub enum SourceKey {
    /// Shared decoded pixels
    Pixels(SourceImage),
    /// Shared encoded bytes
    Bytes(Arc<[u8]>),
    /// A file path
    Path(PathBuf),
}

impl PartialEq for SourceKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Pixels(a), Self::Pixels(b)) => a.same_pixels(b),
            (Self::Bytes(a), Self::Bytes(b)) => Arc::ptr_eq(a, b),
            (Self::Path(a), Self::Path(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SourceKey {}

impl Hash for SourceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Pixels(image) => image.identity().hash(state),
            Self::Bytes(bytes) => (bytes.as_ptr() as usize, bytes.len()).hash(state),
            Self::Path(path) => path.hash(state),
        }
    }
}

/// An output size; its dimensions select the overlay layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Human-readable name
    pub name: String,
}

impl Size {
    /// Create a named size
    pub fn new(width: u32, height: u32, name: impl Into<String>) -> Self {
        Self {
            width,
            height,
            name: name.into(),
        }
    }

    /// Output key, `"{width}x{height}"`
    pub fn key(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Output key for one variant of a dual-variant size
    pub fn variant_key(&self, variant: DecorationVariant) -> String {
        let suffix = match variant {
            DecorationVariant::Text => TEXT_VARIANT_SUFFIX,
            DecorationVariant::Covers => COVERS_VARIANT_SUFFIX,
        };
        format!("{}{suffix}", self.key())
    }

    /// The built-in output sizes
    pub fn presets() -> Vec<Self> {
        SIZE_PRESETS
            .iter()
            .map(|&(name, width, height)| Self::new(width, height, name))
            .collect()
    }
}

impl FromStr for Size {
    type Err = PatternError;

    /// Parse `WIDTHxHEIGHT`, naming it after a matching preset if there is one
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || invalid_parameter("size", &s, &"expected WIDTHxHEIGHT");
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().ok().ok_or_else(invalid)?;
        let height: u32 = height.trim().parse().ok().ok_or_else(invalid)?;
        if width == 0 || height == 0 {
            return Err(invalid_parameter("size", &s, &"dimensions must be positive"));
        }

        let name = SIZE_PRESETS
            .iter()
            .find(|&&(_, w, h)| w == width && h == height)
            .map_or_else(|| format!("{width}x{height}"), |&(name, _, _)| name.to_string());
        Ok(Self::new(width, height, name))
    }
}

/// Ordered palette colour strings; the first is the background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

/// A palette with every usable colour parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPalette {
    /// Surface fill colour
    pub background: Rgba,
    /// Colours motifs are tinted with; never empty
    pub objects: Vec<Rgba>,
}

impl Palette {
    /// Palette from colour strings
    pub fn new<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> Self {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw colour strings
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Parse the palette, skipping unusable entries
    ///
    /// A palette with a single usable colour reuses it as the only object colour.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPalette`] if no entry parses
    pub fn resolve(&self) -> Result<ResolvedPalette> {
        let parsed: Vec<Rgba> = self
            .colors
            .iter()
            .filter_map(|color| match color.parse::<Rgba>() {
                Ok(rgba) => Some(rgba),
                Err(error) => {
                    log::warn!("Skipping palette entry: {error}");
                    None
                }
            })
            .collect();

        let (&background, rest) = parsed.split_first().ok_or_else(|| PatternError::InvalidPalette {
            reason: format!("no usable colour among {} entries", self.colors.len()),
        })?;

        let objects = if rest.is_empty() {
            vec![background]
        } else {
            rest.to_vec()
        };

        Ok(ResolvedPalette {
            background,
            objects,
        })
    }
}

/// Panel style drawn behind decorations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayStyle {
    /// No panel
    None,
    /// Fixed warm translucent panel
    #[default]
    Transparent,
    /// Panel filled with the batch overlay colour
    Solid,
}

/// Which decorations the grid layout receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoverVariant {
    /// Wrapped overlay text
    #[default]
    Text,
    /// Up to four covers in a 2x2 grid
    Covers,
    /// Both, as two separately keyed outputs
    Both,
}

/// A single decoration pass for the grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationVariant {
    /// Text pass
    Text,
    /// Cover grid pass
    Covers,
}

impl CoverVariant {
    /// Decoration passes this variant expands to
    pub const fn passes(self) -> &'static [DecorationVariant] {
        match self {
            Self::Text => &[DecorationVariant::Text],
            Self::Covers => &[DecorationVariant::Covers],
            Self::Both => &[DecorationVariant::Text, DecorationVariant::Covers],
        }
    }
}

impl FromStr for OverlayStyle {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "transparent" => Ok(Self::Transparent),
            "solid" => Ok(Self::Solid),
            _ => Err(invalid_parameter(
                "overlay_style",
                &s,
                &"expected none, transparent or solid",
            )),
        }
    }
}

impl FromStr for CoverVariant {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "covers" | "books" => Ok(Self::Covers),
            "both" => Ok(Self::Both),
            _ => Err(invalid_parameter(
                "cover_variant",
                &s,
                &"expected text, covers or both",
            )),
        }
    }
}

impl fmt::Display for OverlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Transparent => "transparent",
            Self::Solid => "solid",
        })
    }
}

impl fmt::Display for CoverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Covers => "covers",
            Self::Both => "both",
        })
    }
}

/// Overlay and post-processing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Panel style
    pub overlay_style: OverlayStyle,
    /// Opacity of the solid panel
    pub overlay_alpha: f32,
    /// Decorations for the grid layout
    pub cover_variant: CoverVariant,
    /// Overlay text
    pub text: String,
    /// Font size in pixels
    pub font_size: f32,
    /// Distance between baselines in pixels
    pub line_height: f32,
    /// Blur standard deviation in pixels, 0 disables
    pub blur_amount: f32,
    /// Dither noise strength, 0 disables
    pub dither_amount: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            overlay_style: OverlayStyle::default(),
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            cover_variant: CoverVariant::default(),
            text: DEFAULT_OVERLAY_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
            blur_amount: 0.0,
            dither_amount: 0.0,
        }
    }
}

impl RenderOptions {
    /// Check every option against its accepted range
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidParameter`] naming the first option out of range
    pub fn validate(&self) -> Result<()> {
        check_range("overlay_alpha", self.overlay_alpha, OVERLAY_ALPHA_RANGE)?;
        check_range("font_size", self.font_size, FONT_SIZE_RANGE)?;
        check_range("line_height", self.line_height, LINE_HEIGHT_RANGE)?;
        check_non_negative("blur_amount", self.blur_amount)?;
        check_non_negative("dither_amount", self.dither_amount)?;
        Ok(())
    }

    /// Whether both filters are disabled
    pub fn filters_disabled(&self) -> bool {
        self.blur_amount <= 0.0 && self.dither_amount <= 0.0
    }
}

fn check_range(parameter: &'static str, value: f32, (min, max): (f32, f32)) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter(
            parameter,
            &value,
            &format!("must be within [{min}, {max}]"),
        ))
    }
}

fn check_non_negative(parameter: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(parameter, &value, &"must be >= 0"))
    }
}

/// Everything one render needs
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Motif images scattered on the master surface
    pub images: Vec<ImageSource>,
    /// Background and object colours
    pub palette: Palette,
    /// Output sizes, processed in order
    pub target_sizes: Vec<Size>,
    /// Seed of the scatter layout and overlay colour
    pub seed: f64,
    /// Overlay and filter parameters
    pub options: RenderOptions,
    /// Cover images for rows and grids
    pub cover_images: Vec<ImageSource>,
    /// Font used for overlay text
    pub font: Option<FontData>,
}

impl RenderRequest {
    /// New request with a fresh random seed and default options
    pub fn new(images: Vec<ImageSource>, palette: Palette, target_sizes: Vec<Size>) -> Self {
        Self {
            images,
            palette,
            target_sizes,
            seed: rand::random::<f64>(),
            options: RenderOptions::default(),
            cover_images: Vec::new(),
            font: None,
        }
    }

    /// Replace the seed
    #[must_use]
    pub const fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the cover images
    #[must_use]
    pub fn with_covers(mut self, covers: Vec<ImageSource>) -> Self {
        self.cover_images = covers;
        self
    }

    /// Set the text font
    #[must_use]
    pub fn with_font(mut self, font: FontData) -> Self {
        self.font = Some(font);
        self
    }

    /// Read every file-backed image into owned buffers
    ///
    /// A request must be self-contained before it crosses into the background
    /// context, which cannot reach the caller's file system. Unreadable files
    /// stay in place as [`ImageSource::Unreadable`] and are skipped at render
    /// time.
    pub async fn materialize(mut self) -> Self {
        let mut images = Vec::with_capacity(self.images.len());
        for source in self.images {
            images.push(source.materialize().await);
        }
        self.images = images;

        let mut covers = Vec::with_capacity(self.cover_images.len());
        for source in self.cover_images {
            covers.push(source.materialize().await);
        }
        self.cover_images = covers;

        self
    }

    /// Whether any image still references the caller's storage
    pub fn has_external_sources(&self) -> bool {
        self.images
            .iter()
            .chain(&self.cover_images)
            .any(ImageSource::is_external)
    }
}

/// A size that produced no output, with the reason
#[derive(Debug)]
pub struct SizeFailure {
    /// Output key that was omitted
    pub size_key: String,
    /// Why the size failed
    pub error: PatternError,
}

/// Encoded outputs of one batch
#[derive(Debug, Default)]
pub struct RenderedPattern {
    /// PNG bytes by size key
    pub outputs: BTreeMap<String, Vec<u8>>,
    /// Sizes omitted because their own rendering or encoding failed
    pub failures: Vec<SizeFailure>,
    /// Indices of motif images that could not be decoded
    pub skipped_images: Vec<usize>,
    /// Indices of cover images that could not be decoded
    pub skipped_covers: Vec<usize>,
    /// Solid panel colour used for each output key
    pub overlay_colors: BTreeMap<String, Rgba>,
}

impl RenderedPattern {
    /// Output keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    /// Whether every requested size produced output
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
