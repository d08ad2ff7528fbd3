use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::debug;

use crate::config::DetectorConfig;
use crate::geometry::BoundingBox;

/// Fraction of a row/column that must be dark for it to count as border
const BORDER_DARK_FRACTION: f64 = 0.5;

/// ITU-R 601 luma of one pixel in 16.16 fixed point, rounded to nearest
fn luma_601(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0.map(u32::from);
    ((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u8
}

/// Convert an RGB image to luminance using ITU-R 601 weights
pub fn to_luminance(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        gray.put_pixel(x, y, Luma([luma_601(pixel)]));
    }

    gray
}

/// Bounding box of all pixels darker than `dark_threshold`, or `None` if there are none
pub fn find_dark_bounds(gray: &GrayImage, dark_threshold: u8) -> Option<BoundingBox> {
    let (width, height) = gray.dimensions();
    let mut min_x = width;
    let mut max_x = 0;
    let mut min_y = height;
    let mut max_y = 0;

    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] < dark_threshold {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_x <= max_x && min_y <= max_y {
        Some(BoundingBox::new(min_x, min_y, max_x + 1, max_y + 1))
    } else {
        None
    }
}

/// Fraction of dark pixels in row `y`, restricted to the horizontal span of `region`
pub fn row_darkness_ratio(
    gray: &GrayImage,
    region: &BoundingBox,
    y: u32,
    dark_threshold: u8,
) -> f64 {
    let span = region.width();
    if span == 0 {
        return 0.0;
    }
    let dark = (region.left..region.right)
        .filter(|&x| gray.get_pixel(x, y)[0] < dark_threshold)
        .count();
    dark as f64 / span as f64
}

/// Fraction of dark pixels in column `x`, restricted to the vertical span of `region`
pub fn column_darkness_ratio(
    gray: &GrayImage,
    region: &BoundingBox,
    x: u32,
    dark_threshold: u8,
) -> f64 {
    let span = region.height();
    if span == 0 {
        return 0.0;
    }
    let dark = (region.top..region.bottom)
        .filter(|&y| gray.get_pixel(x, y)[0] < dark_threshold)
        .count();
    dark as f64 / span as f64
}

/// First line in `lines` that is not border, or `None` if every scanned line is border
fn first_content_line(
    mut lines: impl Iterator<Item = u32>,
    is_border: impl Fn(u32) -> bool,
) -> Option<u32> {
    lines.find(|&line| !is_border(line))
}

/// Shrink the outer border box to the content inside the black frame
fn inner_content_box(
    gray: &GrayImage,
    outer: &BoundingBox,
    config: &DetectorConfig,
) -> BoundingBox {
    let threshold = config.dark_threshold;
    let row_is_border = |y| row_darkness_ratio(gray, outer, y, threshold) > BORDER_DARK_FRACTION;
    let col_is_border = |x| column_darkness_ratio(gray, outer, x, threshold) > BORDER_DARK_FRACTION;

    let rows = (outer.height() / 2).min(config.max_scan);
    let cols = (outer.width() / 2).min(config.max_scan);

    let top = first_content_line(outer.top..outer.top + rows, row_is_border).unwrap_or(outer.top);
    let bottom = first_content_line((outer.bottom - rows..outer.bottom).rev(), row_is_border)
        .map(|y| y + 1)
        .unwrap_or(outer.bottom);
    let left =
        first_content_line(outer.left..outer.left + cols, col_is_border).unwrap_or(outer.left);
    let right = first_content_line((outer.right - cols..outer.right).rev(), col_is_border)
        .map(|x| x + 1)
        .unwrap_or(outer.right);

    BoundingBox::new(left, top, right.max(left), bottom.max(top))
}

/// Locate the shipping label's black border and return the region to crop to.
///
/// Falls back to the full image when there are no dark pixels or when the dark
/// region covers less than `min_area_ratio` of the image.
pub fn detect_label_region(img: &RgbImage, config: &DetectorConfig) -> BoundingBox {
    let (width, height) = img.dimensions();
    let full = BoundingBox::full(width, height);
    let gray = to_luminance(img);

    let outer = match find_dark_bounds(&gray, config.dark_threshold) {
        Some(b) => b,
        None => {
            debug!(width, height, "No dark pixels found, keeping full image");
            return full;
        }
    };

    let image_area = width as f64 * height as f64;
    if (outer.area() as f64) < image_area * config.min_area_ratio {
        debug!(?outer, "Dark region too small for a label border, keeping full image");
        return full;
    }

    let inner = inner_content_box(&gray, &outer, config);
    let region = inner.expand(config.pad, width, height);

    debug!(?outer, ?inner, ?region, "Detected label border");

    region
}

/// Copy out the `region` of `img`
pub fn crop_to_region(img: &RgbImage, region: &BoundingBox) -> RgbImage {
    if region.is_full(img.width(), img.height()) {
        return img.clone();
    }
    image::imageops::crop_imm(img, region.left, region.top, region.width(), region.height())
        .to_image()
}

/// Detect the label border and crop to it. Always succeeds; a failed detection returns
/// an uncropped copy.
pub fn auto_crop_label(img: &RgbImage, config: &DetectorConfig) -> RgbImage {
    let region = detect_label_region(img, config);
    crop_to_region(img, &region)
}
