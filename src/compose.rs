//! Page composition — lay one or two labels side by side on a landscape page.

use image::{imageops, RgbImage};
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::{LabelError, Result};
use crate::geometry::inches_to_pixels;
use crate::transform::BACKGROUND;

/// Number of label slots on a page
pub const SLOTS_PER_PAGE: usize = 2;

/// Top-left pixel of a label slot within its page.
///
/// Slot 0 is centered in the left half of the page, slot 1 in the right half.
pub fn slot_origin(layout: &LayoutConfig, slot: usize, dpi: u32) -> (u32, u32) {
    let half_width = layout.page_size.width / 2.0;
    let x = slot as f64 * half_width + (half_width - layout.label_size.width) / 2.0;
    let y = (layout.page_size.height - layout.label_size.height) / 2.0;
    (inches_to_pixels(x, dpi), inches_to_pixels(y, dpi))
}

/// Compose up to two label rasters onto a white page of `layout.page_size` at `dpi`.
///
/// Every label must already be exactly `layout.label_size` at `dpi`. A single label
/// takes the left slot and leaves the right half blank; labels past the second are
/// ignored.
pub fn compose_page(labels: &[RgbImage], dpi: u32, layout: &LayoutConfig) -> Result<RgbImage> {
    if labels.is_empty() {
        return Err(LabelError::InvalidInput("no labels to compose".to_string()));
    }
    if labels.len() > SLOTS_PER_PAGE {
        warn!(
            supplied = labels.len(),
            "Only {SLOTS_PER_PAGE} labels fit on a page, ignoring the rest"
        );
    }

    let (page_w, page_h) = layout.page_size.to_pixels(dpi);
    let expected = layout.label_size.to_pixels(dpi);
    let mut page = RgbImage::from_pixel(page_w, page_h, BACKGROUND);

    for (slot, label) in labels.iter().take(SLOTS_PER_PAGE).enumerate() {
        if label.dimensions() != expected {
            return Err(LabelError::InvalidInput(format!(
                "label {} is {}x{} px, expected {}x{} px for {} at {} dpi",
                slot + 1,
                label.width(),
                label.height(),
                expected.0,
                expected.1,
                layout.label_size,
                dpi
            )));
        }

        let (x, y) = slot_origin(layout, slot, dpi);
        debug!(slot, x, y, "Placing label");
        imageops::replace(&mut page, label, x as i64, y as i64);
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const GRAY: Rgb<u8> = Rgb([90, 90, 90]);

    fn label(dpi: u32, color: Rgb<u8>) -> RgbImage {
        let (w, h) = LayoutConfig::default().label_size.to_pixels(dpi);
        RgbImage::from_pixel(w, h, color)
    }

    #[test]
    fn test_two_up_at_300_dpi() {
        let layout = LayoutConfig::default();
        let page = compose_page(&[label(300, BLACK), label(300, GRAY)], 300, &layout).unwrap();
        assert_eq!(page.dimensions(), (3300, 2550));

        let (lx, ly) = slot_origin(&layout, 0, 300);
        let (rx, ry) = slot_origin(&layout, 1, 300);
        assert_eq!((lx, ly), (225, 375));
        assert_eq!((rx, ry), (1875, 375));
        // left slot ends before the right one starts
        assert!(lx + 1200 < rx);

        assert_eq!(*page.get_pixel(225, 375), BLACK);
        assert_eq!(*page.get_pixel(1424, 2174), BLACK);
        assert_eq!(*page.get_pixel(1425, 375), BACKGROUND);
        assert_eq!(*page.get_pixel(224, 375), BACKGROUND);
        assert_eq!(*page.get_pixel(225, 374), BACKGROUND);
        assert_eq!(*page.get_pixel(1650, 1275), BACKGROUND);
        assert_eq!(*page.get_pixel(1875, 375), GRAY);
        assert_eq!(*page.get_pixel(3074, 2174), GRAY);
        assert_eq!(*page.get_pixel(3075, 2174), BACKGROUND);
    }

    #[test]
    fn test_single_label_leaves_right_half_blank() {
        let page = compose_page(&[label(100, BLACK)], 100, &LayoutConfig::default()).unwrap();
        assert_eq!(page.dimensions(), (1100, 850));
        assert!((550..1100).all(|x| (0..850).all(|y| *page.get_pixel(x, y) == BACKGROUND)));
        assert_eq!(*page.get_pixel(75, 125), BLACK);
    }

    #[test]
    fn test_extra_labels_ignored() {
        let labels = [label(50, BLACK), label(50, GRAY), label(50, Rgb([1, 2, 3]))];
        let page = compose_page(&labels, 50, &LayoutConfig::default()).unwrap();
        assert!(page.pixels().all(|p| *p != Rgb([1, 2, 3])));
    }

    #[test]
    fn test_empty_is_invalid() {
        let err = compose_page(&[], 300, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LabelError::InvalidInput(_)));
    }

    #[test]
    fn test_wrong_label_size_is_invalid() {
        let wrong = RgbImage::new(10, 10);
        let err = compose_page(&[wrong], 300, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LabelError::InvalidInput(_)));
    }
}
