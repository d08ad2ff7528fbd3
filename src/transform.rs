use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::LabelError;
use crate::geometry::PhysicalSize;

/// Canvas color for uncovered margins
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

const FILTER: FilterType = FilterType::Lanczos3;

/// How to reconcile a source aspect ratio with the target canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Scale to fit inside the target, centered, white margins
    #[default]
    Fit,
    /// Scale to cover the target, center-crop the excess
    Fill,
    /// Resample to the target ignoring aspect ratio
    Stretch,
}

impl ResizePolicy {
    pub const ALL: [ResizePolicy; 3] =
        [ResizePolicy::Fit, ResizePolicy::Fill, ResizePolicy::Stretch];

    pub fn name(&self) -> &'static str {
        match self {
            ResizePolicy::Fit => "fit",
            ResizePolicy::Fill => "fill",
            ResizePolicy::Stretch => "stretch",
        }
    }
}

impl FromStr for ResizePolicy {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(ResizePolicy::Fit),
            "fill" => Ok(ResizePolicy::Fill),
            "stretch" => Ok(ResizePolicy::Stretch),
            _ => Err(LabelError::InvalidInput(format!(
                "unknown resize policy '{}', expected fit, fill or stretch",
                s
            ))),
        }
    }
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scale `(width, height)` by `scale`, rounded, never below one pixel
fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    (new_width, new_height)
}

/// Scale so the whole source fits, then center on a white canvas
fn fit_into(img: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    let (src_w, src_h) = img.dimensions();
    let scale = (target_w as f64 / src_w as f64).min(target_h as f64 / src_h as f64);
    let (new_w, new_h) = scaled_dimensions(src_w, src_h, scale);
    let (new_w, new_h) = (new_w.min(target_w), new_h.min(target_h));

    debug!(src_w, src_h, new_w, new_h, scale, "Fit: scaled inside target");

    let resized = imageops::resize(img, new_w, new_h, FILTER);
    let mut canvas = RgbImage::from_pixel(target_w, target_h, BACKGROUND);
    let paste_x = (target_w - new_w) / 2;
    let paste_y = (target_h - new_h) / 2;
    imageops::replace(&mut canvas, &resized, paste_x as i64, paste_y as i64);
    canvas
}

/// Centered span of a `src`-pixel axis that still covers `target` pixels after scaling,
/// plus enough context for the filter. Keeps the parity of `src` so the span stays centered.
fn covering_span(src: u32, target: u32, scale: f64) -> (u32, u32) {
    let context = (3.0 / scale.min(1.0)).ceil() as u32;
    let needed = (target as f64 / scale).ceil() as u32 + 2 * context;
    if needed >= src {
        return (0, src);
    }
    let span = needed + (src - needed) % 2;
    ((src - span) / 2, span)
}

/// Scale so the source covers the target, then center-crop.
///
/// Only the part of the source that survives the crop is resampled, so extreme aspect
/// ratios never build an intermediate much larger than the target.
fn fill_into(img: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    let (src_w, src_h) = img.dimensions();
    let scale = (target_w as f64 / src_w as f64).max(target_h as f64 / src_h as f64);

    let (x, window_w) = covering_span(src_w, target_w, scale);
    let (y, window_h) = covering_span(src_h, target_h, scale);
    let window = imageops::crop_imm(img, x, y, window_w, window_h).to_image();

    let (new_w, new_h) = scaled_dimensions(window_w, window_h, scale);
    let (new_w, new_h) = (new_w.max(target_w), new_h.max(target_h));

    debug!(src_w, src_h, window_w, window_h, new_w, new_h, scale, "Fill: scaled over target");

    let resized = imageops::resize(&window, new_w, new_h, FILTER);
    let left = (new_w - target_w) / 2;
    let top = (new_h - target_h) / 2;
    imageops::crop_imm(&resized, left, top, target_w, target_h).to_image()
}

/// Resample `img` onto a canvas of exactly `target` inches at `dpi`.
///
/// The output is always `round(width * dpi)` x `round(height * dpi)` pixels
/// regardless of policy. A zero-sized source yields a blank canvas.
pub fn resize_to_target(
    img: &RgbImage,
    target: PhysicalSize,
    dpi: u32,
    policy: ResizePolicy,
) -> RgbImage {
    let (target_w, target_h) = target.to_pixels(dpi);
    let (src_w, src_h) = img.dimensions();

    if target_w == 0 || target_h == 0 || src_w == 0 || src_h == 0 {
        return RgbImage::from_pixel(target_w, target_h, BACKGROUND);
    }

    let output = match policy {
        ResizePolicy::Stretch => imageops::resize(img, target_w, target_h, FILTER),
        ResizePolicy::Fit => fit_into(img, target_w, target_h),
        ResizePolicy::Fill => fill_into(img, target_w, target_h),
    };

    debug!(
        src_w,
        src_h,
        target_w,
        target_h,
        %policy,
        "Resized label to target"
    );

    output
}
