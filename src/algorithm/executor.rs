use crate::{
    algorithm::cache::{CompositeKey, RenderCache, SessionFingerprint},
    algorithm::compositor::{CoverArt, OverlayCompositor, pick_overlay_color},
    algorithm::scatter::{plan_scatter, render_master},
    io::error::{PatternError, Result},
    io::image::{SourceImage, encode_png},
    io::request::{
        CoverVariant, DecorationVariant, ImageSource, RenderRequest, RenderedPattern,
        ResolvedPalette, Size, SizeFailure, SourceKey,
    },
    math::color::Rgba,
    raster::filters::post_process,
    raster::tint::{new_surface, to_pixmap},
    spatial::crop::crop,
    spatial::layout::LayoutKind,
};
use std::sync::Arc;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Receives per-size progress of a batch
pub trait BatchObserver {
    /// A size is about to be rendered
    fn size_started(&mut self, _index: usize, _size: &Size, _total: usize) {}

    /// A size finished, successfully or not
    fn size_finished(&mut self, _index: usize, _size: &Size, _succeeded: bool) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {}

/// Inputs of the overlay: palette, covers and the batch overlay colour
///
/// Motifs are not loaded, so an existing background can be decorated without
/// them.
pub struct OverlayInputs {
    /// Parsed palette
    pub palette: ResolvedPalette,
    /// Usable covers, premultiplied
    pub covers: Vec<CoverArt>,
    /// Indices of covers that failed to load
    pub skipped_covers: Vec<usize>,
    /// Solid panel colour of the batch
    pub overlay_color: Rgba,
}

impl OverlayInputs {
    /// Validate the options and palette of `request` and decode its covers
    ///
    /// Covers that fail to load are skipped and reported, not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is out of range or the palette has no
    /// usable colour
    pub fn new(request: &RenderRequest) -> Result<Self> {
        request.options.validate()?;
        let palette = request.palette.resolve()?;

        let (cover_images, mut skipped_covers) = load_all(&request.cover_images, "cover");
        let mut covers = Vec::with_capacity(cover_images.len());
        for (index, image) in cover_images {
            match CoverArt::new(&image) {
                Ok(cover) => covers.push(cover),
                Err(error) => {
                    log::warn!("Skipping cover #{index}: {error}");
                    skipped_covers.push(index);
                }
            }
        }
        skipped_covers.sort_unstable();

        let overlay_color = pick_overlay_color(request.seed, &palette.objects, palette.background);

        Ok(Self {
            palette,
            covers,
            skipped_covers,
            overlay_color,
        })
    }

    /// Compositor drawing these inputs with the options of `request`
    pub fn compositor<'a>(&'a self, request: &'a RenderRequest) -> OverlayCompositor<'a> {
        OverlayCompositor::new(
            &request.options,
            self.overlay_color,
            &self.palette.objects,
            &self.covers,
            request.font.as_ref(),
        )
    }
}

/// Request inputs after validation and decoding
pub struct PreparedRequest {
    /// Palette, covers and overlay colour
    pub overlay: OverlayInputs,
    /// Usable motif images
    pub images: Vec<SourceImage>,
    /// Indices of motifs that failed to load
    pub skipped_images: Vec<usize>,
    fingerprint: SessionFingerprint,
    composite_key: CompositeKey,
}

impl PreparedRequest {
    /// Validate `request` and decode its images
    ///
    /// Images that fail to load are skipped and reported, not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An option is out of range
    /// - The palette has no usable colour
    /// - No motif image could be loaded
    pub fn new(request: &RenderRequest) -> Result<Self> {
        let overlay = OverlayInputs::new(request)?;

        let (images, skipped_images) = load_all(&request.images, "motif");
        if images.is_empty() {
            return Err(PatternError::EmptyInput);
        }

        let fingerprint = SessionFingerprint::new(
            request.seed,
            request.palette.colors().to_vec(),
            request.images.iter().map(ImageSource::key).collect(),
        );
        let composite_key = CompositeKey {
            output_key: String::new(),
            overlay: format!("{:?}", request.options),
            covers: request.cover_images.iter().map(ImageSource::key).collect(),
            font: request
                .font
                .as_ref()
                .map(|font| SourceKey::Bytes(Arc::clone(font))),
        };

        Ok(Self {
            overlay,
            images: images.into_iter().map(|(_, image)| image).collect(),
            skipped_images,
            fingerprint,
            composite_key,
        })
    }

    fn composite_key(&self, output_key: String) -> CompositeKey {
        CompositeKey {
            output_key,
            ..self.composite_key.clone()
        }
    }
}

fn load_all(sources: &[ImageSource], kind: &str) -> (Vec<(usize, SourceImage)>, Vec<usize>) {
    let mut loaded = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();
    for (index, source) in sources.iter().enumerate() {
        match source.load(index) {
            Ok(image) => loaded.push((index, image)),
            Err(error) => {
                log::warn!("Skipping {kind} #{index}: {error}");
                skipped.push(index);
            }
        }
    }
    (loaded, skipped)
}

/// Decoration passes a size expands to, with their output keys
fn passes(
    size: &Size,
    kind: LayoutKind,
    variant: CoverVariant,
) -> Vec<(DecorationVariant, String)> {
    match variant {
        CoverVariant::Both if kind.has_variants() => variant
            .passes()
            .iter()
            .map(|&pass| (pass, size.variant_key(pass)))
            .collect(),
        CoverVariant::Covers => vec![(DecorationVariant::Covers, size.key())],
        CoverVariant::Text | CoverVariant::Both => vec![(DecorationVariant::Text, size.key())],
    }
}

/// Drives requests through scatter, crop, compositing, filtering and encoding
///
/// Keeps backgrounds and encoded outputs between calls while the session
/// fingerprint stays the same.
#[derive(Debug, Default)]
pub struct BatchRenderer {
    cache: RenderCache,
}

impl BatchRenderer {
    /// Create a renderer with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Current caches
    pub const fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Render every size of `request`
    ///
    /// # Errors
    ///
    /// Returns request-level errors; per-size failures land in
    /// [`RenderedPattern::failures`]
    pub fn render(&mut self, request: &RenderRequest) -> Result<RenderedPattern> {
        self.render_observed(request, &mut SilentObserver)
    }

    /// Render every size of `request`, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// Returns request-level errors; per-size failures land in
    /// [`RenderedPattern::failures`]
    pub fn render_observed(
        &mut self,
        request: &RenderRequest,
        observer: &mut dyn BatchObserver,
    ) -> Result<RenderedPattern> {
        let prepared = PreparedRequest::new(request)?;
        self.cache.begin_session(prepared.fingerprint.clone());

        log::info!(
            "Rendering {} sizes from {} motifs with seed {}",
            request.target_sizes.len(),
            prepared.images.len(),
            request.seed
        );

        let compositor = prepared.overlay.compositor(request);
        let overlay_color = prepared.overlay.overlay_color;

        let mut result = RenderedPattern {
            skipped_images: prepared.skipped_images.clone(),
            skipped_covers: prepared.overlay.skipped_covers.clone(),
            ..RenderedPattern::default()
        };
        let mut master = None;
        let total = request.target_sizes.len();

        for (index, size) in request.target_sizes.iter().enumerate() {
            observer.size_started(index, size, total);

            let outcome = self.render_size(request, &prepared, &compositor, size, &mut master);
            let succeeded = outcome.is_ok();
            match outcome {
                Ok(outputs) => {
                    for (key, bytes) in outputs {
                        result.overlay_colors.insert(key.clone(), overlay_color);
                        result.outputs.insert(key, Vec::clone(&bytes));
                    }
                }
                Err(error) if error.is_per_size() => {
                    log::warn!("Omitting {}: {error}", size.key());
                    result.failures.push(SizeFailure {
                        size_key: size.key(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }

            observer.size_finished(index, size, succeeded);
        }

        log::debug!(
            "Background cache {:?}, output cache {:?}",
            self.cache.backgrounds.stats,
            self.cache.composited.stats
        );
        Ok(result)
    }

    /// Cropped, filtered background for one size without any overlay, as PNG
    ///
    /// # Errors
    ///
    /// Returns request-level errors, or the size's own surface or encoding error
    pub fn render_background(&mut self, request: &RenderRequest, size: &Size) -> Result<Vec<u8>> {
        let prepared = PreparedRequest::new(request)?;
        self.cache.begin_session(prepared.fingerprint.clone());

        let mut master = None;
        let background = self.background(request, &prepared, size, &mut master)?;
        let image = post_process(
            &background,
            request.options.blur_amount,
            request.options.dither_amount,
            request.seed.to_bits(),
        )?;
        encode_png(&image, &size.key())
    }

    /// Draw the overlay for `size` on an existing background, as PNG
    ///
    /// A background of different dimensions is stretched to the size first.
    /// Motifs are not needed and not decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if an option or the palette is invalid, or the size's
    /// own surface or encoding error
    pub fn composite(
        request: &RenderRequest,
        size: &Size,
        background: &SourceImage,
        variant: DecorationVariant,
    ) -> Result<Vec<u8>> {
        let overlay = OverlayInputs::new(request)?;
        let mut surface = fit_background(background, size)?;
        overlay.compositor(request).compose(
            &mut surface,
            LayoutKind::for_dimensions(size.width, size.height),
            variant,
        )?;
        encode_png(&post_process(&surface, 0.0, 0.0, 0)?, &size.key())
    }

    fn background(
        &mut self,
        request: &RenderRequest,
        prepared: &PreparedRequest,
        size: &Size,
        master: &mut Option<Pixmap>,
    ) -> Result<Arc<Pixmap>> {
        let background = self
            .cache
            .backgrounds
            .get_or_try_compute((size.width, size.height), || {
                if master.is_none() {
                    let plan = plan_scatter(
                        request.seed,
                        prepared.images.len(),
                        prepared.overlay.palette.objects.len(),
                    );
                    *master = Some(render_master(
                        &plan,
                        &prepared.images,
                        &prepared.overlay.palette,
                    )?);
                }
                let Some(surface) = master.as_ref() else {
                    return Err(PatternError::EmptyInput);
                };
                crop(surface, size.width, size.height).map(Arc::new)
            })?;
        Ok(Arc::clone(background))
    }

    fn render_size(
        &mut self,
        request: &RenderRequest,
        prepared: &PreparedRequest,
        compositor: &OverlayCompositor<'_>,
        size: &Size,
        master: &mut Option<Pixmap>,
    ) -> Result<Vec<(String, Arc<Vec<u8>>)>> {
        let background = self.background(request, prepared, size, master)?;
        let kind = LayoutKind::for_dimensions(size.width, size.height);
        let options = &request.options;

        passes(size, kind, options.cover_variant)
            .into_iter()
            .map(|(variant, output_key)| {
                let key = prepared.composite_key(output_key.clone());
                let bytes = self.cache.composited.get_or_try_compute(key, || {
                    let mut surface = Pixmap::clone(&background);
                    compositor.compose(&mut surface, kind, variant)?;
                    let image = post_process(
                        &surface,
                        options.blur_amount,
                        options.dither_amount,
                        request.seed.to_bits(),
                    )?;
                    encode_png(&image, &output_key).map(Arc::new)
                })?;
                log::debug!("Rendered {output_key} ({} bytes)", bytes.len());
                Ok((output_key, Arc::clone(bytes)))
            })
            .collect()
    }
}

/// Premultiply `background`, stretching it to `size` when dimensions differ
fn fit_background(background: &SourceImage, size: &Size) -> Result<Pixmap> {
    let source = to_pixmap(background.pixels())?;
    if source.width() == size.width && source.height() == size.height {
        return Ok(source);
    }

    let mut surface = new_surface(size.width, size.height)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_scale(
        size.width as f32 / source.width() as f32,
        size.height as f32 / source.height() as f32,
    );
    surface.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Ok(surface)
}
