use std::fmt;
use std::str::FromStr;

/// PDF user space unit: 72 points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// A physical size in inches (width, height)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    pub width: f64,
    pub height: f64,
}

impl PhysicalSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at the given resolution, rounded to the nearest pixel
    pub fn to_pixels(&self, dpi: u32) -> (u32, u32) {
        (inches_to_pixels(self.width, dpi), inches_to_pixels(self.height, dpi))
    }

    /// Size in PDF points
    pub fn to_points(&self) -> (f64, f64) {
        (self.width * POINTS_PER_INCH, self.height * POINTS_PER_INCH)
    }
}

impl fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} in", self.width, self.height)
    }
}

/// Convert a length in inches to whole pixels
pub fn inches_to_pixels(inches: f64, dpi: u32) -> u32 {
    (inches * dpi as f64).round().max(0.0) as u32
}

/// Pixel rectangle, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        debug_assert!(left <= right && top <= bottom);
        Self { left, top, right, bottom }
    }

    /// The box covering a whole `width` x `height` image (no crop)
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// True if this box spans the entire `width` x `height` image
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// Grow every edge by `pad`, clamped to a `width` x `height` image
    pub fn expand(&self, pad: u32, width: u32, height: u32) -> Self {
        Self::new(
            self.left.saturating_sub(pad),
            self.top.saturating_sub(pad),
            self.right.saturating_add(pad).min(width),
            self.bottom.saturating_add(pad).min(height),
        )
    }
}

/// Common label stock sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPreset {
    #[default]
    FourBySix,
    FourByEight,
    TwoBySeven,
    Letter,
}

impl LabelPreset {
    pub const ALL: [LabelPreset; 4] = [
        LabelPreset::FourBySix,
        LabelPreset::FourByEight,
        LabelPreset::TwoBySeven,
        LabelPreset::Letter,
    ];

    pub fn size(&self) -> PhysicalSize {
        match self {
            LabelPreset::FourBySix => PhysicalSize::new(4.0, 6.0),
            LabelPreset::FourByEight => PhysicalSize::new(4.0, 8.0),
            LabelPreset::TwoBySeven => PhysicalSize::new(2.0, 7.0),
            LabelPreset::Letter => PhysicalSize::new(8.5, 11.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LabelPreset::FourBySix => "4x6",
            LabelPreset::FourByEight => "4x8",
            LabelPreset::TwoBySeven => "2x7",
            LabelPreset::Letter => "letter",
        }
    }
}

impl FromStr for LabelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LabelPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = LabelPreset::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown label size '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for LabelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_pixels_at_300_dpi() {
        let label = PhysicalSize::new(4.0, 6.0);
        assert_eq!(label.to_pixels(300), (1200, 1800));
    }

    #[test]
    fn test_pixels_round_to_nearest() {
        // 8.5 * 75 = 637.5
        assert_eq!(PhysicalSize::new(8.5, 0.1).to_pixels(75), (638, 8));
    }

    #[test]
    fn test_points() {
        assert_eq!(PhysicalSize::new(11.0, 8.5).to_points(), (792.0, 612.0));
    }

    #[test]
    fn test_expand_clamps_to_image() {
        let bbox = BoundingBox::new(4, 20, 96, 50);
        assert_eq!(bbox.expand(8, 100, 55), BoundingBox::new(0, 12, 100, 55));
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("4x6".parse::<LabelPreset>().unwrap(), LabelPreset::FourBySix);
        assert_eq!("LETTER".parse::<LabelPreset>().unwrap(), LabelPreset::Letter);
        assert_eq!(LabelPreset::TwoBySeven.size(), PhysicalSize::new(2.0, 7.0));
        assert!("5x5".parse::<LabelPreset>().is_err());
    }
}
