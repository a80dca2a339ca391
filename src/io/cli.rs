//! Command-line interface rendering motif files into PNG artwork

use crate::algorithm::engine::{BackgroundEngine, PatternEngine};
use crate::algorithm::executor::{BatchRenderer, SilentObserver};
use crate::io::configuration::{
    DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT, DEFAULT_OVERLAY_ALPHA, DEFAULT_OVERLAY_TEXT,
    GENRE_PALETTES, genre_palette,
};
use crate::io::error::{Result, file_system_error, invalid_parameter};
use crate::io::image::write_output;
use crate::io::progress::ProgressManager;
use crate::io::request::{
    CoverVariant, FontData, ImageSource, OverlayStyle, Palette, RenderOptions, RenderRequest,
    RenderedPattern, Size,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "patterngen")]
#[command(
    author,
    version,
    about = "Scatter tinted motifs into seeded marketing artwork"
)]
/// Command-line arguments for the artwork generator
pub struct Cli {
    /// Motif image files scattered on the background
    #[arg(value_name = "IMAGES", required = true)]
    pub images: Vec<PathBuf>,

    /// Comma-separated colours; the first is the background
    #[arg(short, long, value_delimiter = ',')]
    pub palette: Vec<String>,

    /// Named genre palette, used when no explicit palette is given
    #[arg(short, long, conflicts_with = "palette")]
    pub genre: Option<String>,

    /// Output size as WIDTHxHEIGHT, repeatable (defaults to every preset)
    #[arg(long = "size", value_name = "WxH")]
    pub sizes: Vec<Size>,

    /// Seed for a reproducible layout (random when omitted)
    #[arg(short, long)]
    pub seed: Option<f64>,

    /// Panel style: none, transparent or solid
    #[arg(long, default_value_t = OverlayStyle::Transparent)]
    pub overlay_style: OverlayStyle,

    /// Opacity of the solid panel
    #[arg(long, default_value_t = DEFAULT_OVERLAY_ALPHA)]
    pub overlay_alpha: f32,

    /// Square layout decoration: text, covers or both
    #[arg(long, default_value_t = CoverVariant::Text)]
    pub variant: CoverVariant,

    /// Overlay text for the square layout
    #[arg(short, long, default_value = DEFAULT_OVERLAY_TEXT)]
    pub text: String,

    /// TrueType or OpenType font used for overlay text
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: f32,

    /// Distance between text baselines in pixels
    #[arg(long, default_value_t = DEFAULT_LINE_HEIGHT)]
    pub line_height: f32,

    /// Blur standard deviation in pixels
    #[arg(long, default_value_t = 0.0)]
    pub blur: f32,

    /// Dither noise strength
    #[arg(long, default_value_t = 0.0)]
    pub dither: f32,

    /// Cover image file, repeatable
    #[arg(short, long = "cover")]
    pub covers: Vec<PathBuf>,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Render on background workers instead of the calling thread
    #[arg(short, long)]
    pub background: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Palette from the explicit colours, the named genre, or the first genre
    ///
    /// # Errors
    ///
    /// Returns [`crate::PatternError::InvalidParameter`] for an unknown genre
    pub fn palette(&self) -> Result<Palette> {
        if !self.palette.is_empty() {
            return Ok(Palette::new(self.palette.iter().cloned()));
        }

        let colors = match &self.genre {
            Some(genre) => genre_palette(genre).ok_or_else(|| {
                invalid_parameter("genre", genre, &"not a known genre palette")
            })?,
            None => GENRE_PALETTES.first().map_or(&[][..], |(_, colors)| *colors),
        };
        Ok(Palette::new(colors.iter().copied()))
    }

    /// Overlay and filter options from the flags
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            overlay_style: self.overlay_style,
            overlay_alpha: self.overlay_alpha,
            cover_variant: self.variant,
            text: self.text.clone(),
            font_size: self.font_size,
            line_height: self.line_height,
            blur_amount: self.blur,
            dither_amount: self.dither,
        }
    }

    /// Assemble the render request
    ///
    /// Image files are referenced, not read; the font file is read eagerly.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The genre is unknown
    /// - The font file cannot be read
    pub fn request(&self) -> Result<RenderRequest> {
        let sizes = if self.sizes.is_empty() {
            Size::presets()
        } else {
            self.sizes.clone()
        };

        let mut request = RenderRequest::new(
            self.images.iter().cloned().map(ImageSource::File).collect(),
            self.palette()?,
            sizes,
        )
        .with_options(self.options())
        .with_covers(self.covers.iter().cloned().map(ImageSource::File).collect());

        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        if let Some(path) = &self.font {
            let bytes = std::fs::read(path).map_err(|e| file_system_error(path, "read font", e))?;
            request = request.with_font(FontData::from(bytes));
        }
        Ok(request)
    }
}

/// Renders the requested artwork and writes every output to disk
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

    /// Render and write every output, returning the written paths
    ///
    /// Sizes that fail are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, no motif can be decoded, or
    /// an output cannot be written
    pub async fn process(&mut self) -> Result<Vec<PathBuf>> {
        let request = self.cli.request()?;
        log::info!(
            "Seed {} with {} motifs and {} covers",
            request.seed,
            request.images.len(),
            request.cover_images.len()
        );

        let rendered = if self.cli.background {
            BackgroundEngine::new()?.render(request).await?
        } else {
            self.render_inline(&request)?
        };

        for index in &rendered.skipped_images {
            log::warn!("Motif {} could not be decoded", self.describe(*index));
        }
        for failure in &rendered.failures {
            log::warn!("No output for {}: {}", failure.size_key, failure.error);
        }

        let mut written = Vec::with_capacity(rendered.outputs.len());
        for (key, bytes) in &rendered.outputs {
            let path = write_output(&self.cli.output, key, bytes)?;
            log::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn render_inline(&mut self, request: &RenderRequest) -> Result<RenderedPattern> {
        let mut renderer = BatchRenderer::new();
        match self.progress_manager.as_mut() {
            Some(progress) => {
                progress.initialize(&request.target_sizes);
                let rendered = renderer.render_observed(request, progress);
                progress.finish();
                rendered
            }
            None => renderer.render_observed(request, &mut SilentObserver),
        }
    }

    fn describe(&self, index: usize) -> String {
        self.cli
            .images
            .get(index)
            .map_or_else(|| format!("#{index}"), |path| path.display().to_string())
    }
}
