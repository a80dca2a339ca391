//! Gaussian blur on premultiplied surfaces and noise dithering of finished images

use crate::io::configuration::DITHER_LEVEL_STEP;
use crate::io::error::Result;
use crate::raster::tint::{new_surface, to_rgba_image};
use image::RgbaImage;
use ndarray::{Array3, Axis};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f32::consts::E;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Largest standard deviation blurred with a direct kernel
const DIRECT_KERNEL_MAX_SIGMA: f32 = 2.0;
/// Box passes approximating a large Gaussian
const BOX_PASSES: usize = 3;

/// Normalised Gaussian weights covering three standard deviations each side
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as usize;
    let size = 1 + radius * 2;
    let denominator = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - radius as f32;
            E.powf(-x * x / denominator)
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Widths of the box passes whose sequence approximates a Gaussian of `sigma`
pub fn box_sizes(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as usize;
    if lower % 2 == 0 {
        lower = lower.saturating_sub(1);
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let wl = lower as f32;
    let m = (12.0 * sigma * sigma - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0);
    let m = m.round().max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { lower } else { upper })
        .collect()
}

/// Blur a surface with a Gaussian of standard deviation `sigma`
///
/// Pixels outside the surface count as transparent. A non-positive `sigma`
/// returns an unchanged copy.
///
/// # Errors
///
/// Returns an error if the output surface cannot be allocated
pub fn gaussian_blur(pixmap: &Pixmap, sigma: f32) -> Result<Pixmap> {
    if sigma <= 0.0 {
        return Ok(pixmap.clone());
    }

    let mut buffer = to_buffer(pixmap);
    if sigma <= DIRECT_KERNEL_MAX_SIGMA {
        let kernel = gaussian_kernel(sigma);
        convolve_axis(&mut buffer, Axis(1), &kernel);
        convolve_axis(&mut buffer, Axis(0), &kernel);
    } else {
        for size in box_sizes(sigma, BOX_PASSES) {
            let radius = (size - 1) / 2;
            box_blur_axis(&mut buffer, Axis(1), radius);
            box_blur_axis(&mut buffer, Axis(0), radius);
        }
    }

    from_buffer(&buffer, pixmap.width(), pixmap.height())
}

/// Premultiplied channels as an `(height, width, 4)` float array
fn to_buffer(pixmap: &Pixmap) -> Array3<f32> {
    let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
    let mut buffer = Array3::<f32>::zeros((height, width, 4));
    for (value, &byte) in buffer.iter_mut().zip(pixmap.data()) {
        *value = f32::from(byte);
    }
    buffer
}

fn from_buffer(buffer: &Array3<f32>, width: u32, height: u32) -> Result<Pixmap> {
    let mut pixmap = new_surface(width, height)?;
    let channels: Vec<u8> = buffer
        .iter()
        .map(|&value| value.round().clamp(0.0, 255.0) as u8)
        .collect();

    for (pixel, rgba) in pixmap.pixels_mut().iter_mut().zip(channels.chunks_exact(4)) {
        if let &[r, g, b, a] = rgba {
            // Rounding can push a colour channel past its alpha
            let clamp = |c: u8| c.min(a);
            *pixel = PremultipliedColorU8::from_rgba(clamp(r), clamp(g), clamp(b), a)
                .unwrap_or(PremultipliedColorU8::TRANSPARENT);
        }
    }
    Ok(pixmap)
}

fn convolve_axis(buffer: &mut Array3<f32>, axis: Axis, kernel: &[f32]) {
    let radius = kernel.len() / 2;
    let mut scratch: Vec<f32> = Vec::new();

    for mut lane in buffer.lanes_mut(axis) {
        scratch.clear();
        scratch.extend(lane.iter().copied());

        for (i, out) in lane.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .filter_map(|(k, weight)| {
                    (i + k)
                        .checked_sub(radius)
                        .and_then(|src| scratch.get(src))
                        .map(|value| value * weight)
                })
                .sum();
        }
    }
}

fn box_blur_axis(buffer: &mut Array3<f32>, axis: Axis, radius: usize) {
    let width = (2 * radius + 1) as f32;
    let mut prefix: Vec<f32> = Vec::new();

    for mut lane in buffer.lanes_mut(axis) {
        prefix.clear();
        prefix.push(0.0);
        let mut running = 0.0_f32;
        for value in &lane {
            running += value;
            prefix.push(running);
        }

        let len = lane.len();
        for (i, out) in lane.iter_mut().enumerate() {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(len);
            let upper = prefix.get(hi).copied().unwrap_or(running);
            let lower = prefix.get(lo).copied().unwrap_or(0.0);
            *out = (upper - lower) / width;
        }
    }
}

/// Add uniform noise to each colour channel and quantise to 16 levels
///
/// Alpha is left untouched. The noise stream is seeded so equal seeds give
/// equal output.
pub fn dither(image: &mut RgbaImage, amount: f32, seed: u64) {
    if amount <= 0.0 {
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let amount = f64::from(amount);

    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let noise = (rng.random::<f64>() - 0.5) * 255.0 * amount;
            let value = f64::from(*channel) + noise;
            let quantised = ((value / DITHER_LEVEL_STEP) + 0.5).floor() * DITHER_LEVEL_STEP;
            *channel = quantised.clamp(0.0, 255.0) as u8;
        }
    }
}

/// Apply blur then dither to a composited surface and demultiply it
///
/// With both amounts at zero the result equals the plain conversion of
/// `surface`.
///
/// # Errors
///
/// Returns an error if the blur buffer cannot be allocated
pub fn post_process(
    surface: &Pixmap,
    blur_amount: f32,
    dither_amount: f32,
    seed: u64,
) -> Result<RgbaImage> {
    let mut image = if blur_amount > 0.0 {
        to_rgba_image(&gaussian_blur(surface, blur_amount)?)
    } else {
        to_rgba_image(surface)
    };
    dither(&mut image, dither_amount, seed);
    Ok(image)
}
