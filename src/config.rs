//! Immutable settings passed explicitly through the pipeline.

use crate::geometry::PhysicalSize;
use crate::transform::ResizePolicy;

pub const DEFAULT_DPI: u32 = 300;

/// Landscape US letter
pub const PAGE_SIZE: PhysicalSize = PhysicalSize::new(11.0, 8.5);

/// Standard shipping label
pub const LABEL_SIZE: PhysicalSize = PhysicalSize::new(4.0, 6.0);

pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpeg", "jpg", "png", "tif", "tiff", "webp"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// All accepted extensions, sorted and dotted, for error messages and help text
pub fn supported_extensions() -> String {
    let mut all: Vec<String> = IMAGE_EXTENSIONS
        .iter()
        .chain(PDF_EXTENSIONS)
        .map(|ext| format!(".{ext}"))
        .collect();
    all.sort();
    all.join(", ")
}

/// Page geometry for the two-up layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_size: PhysicalSize,
    pub label_size: PhysicalSize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            label_size: LABEL_SIZE,
        }
    }
}

/// Tuning for the border detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Luminance strictly below this counts as dark
    pub dark_threshold: u8,
    /// Smallest accepted dark-region area as a fraction of the image
    pub min_area_ratio: f64,
    /// Inward scan limit per edge, in pixels
    pub max_scan: u32,
    /// Border sliver kept around the inner content box
    pub pad: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 80,
            min_area_ratio: 0.05,
            max_scan: 100,
            pad: 8,
        }
    }
}

/// Per-run values consumed by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub dpi: u32,
    pub policy: ResizePolicy,
    pub auto_crop: bool,
    /// Zero-indexed page for multi-page sources
    pub page_index: usize,
    pub layout: LayoutConfig,
    pub detector: DetectorConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            policy: ResizePolicy::default(),
            auto_crop: true,
            page_index: 0,
            layout: LayoutConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_listing() {
        assert_eq!(
            supported_extensions(),
            ".bmp, .jpeg, .jpg, .pdf, .png, .tif, .tiff, .webp"
        );
    }

    #[test]
    fn test_labels_fit_their_halves() {
        let layout = LayoutConfig::default();
        assert!(layout.label_size.width < layout.page_size.width / 2.0);
        assert!(layout.label_size.height <= layout.page_size.height);
    }
}
