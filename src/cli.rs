use clap::Parser;
use std::path::PathBuf;

use crate::config::{DetectorConfig, PipelineOptions, DEFAULT_DPI};
use crate::geometry::LabelPreset;
use crate::pipeline::default_output_path;
use crate::transform::ResizePolicy;

#[derive(Parser, Debug)]
#[command(name = "label-2up")]
#[command(
    version,
    about = "Resize shipping labels to 4x6 and output a 2-up landscape letter PDF"
)]
pub struct Cli {
    /// First label file (.bmp, .jpeg, .jpg, .pdf, .png, .tif, .tiff, .webp)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Optional second label file for the right side of the page
    pub input2: Option<PathBuf>,

    /// Output PDF path [default: <input>_label.pdf]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DPI,
        value_parser = clap::value_parser!(u32).range(1..=2400)
    )]
    pub dpi: u32,

    /// Resize mode: fit (keep ratio, white margins), fill (keep ratio, crop excess),
    /// stretch (ignore ratio)
    #[arg(short = 'f', long = "fit", default_value = "fit", value_parser = parse_policy)]
    pub policy: ResizePolicy,

    /// For PDF input, page number to extract (0-indexed)
    #[arg(short, long, default_value = "0")]
    pub page: usize,

    /// Disable automatic cropping to the label's black border
    #[arg(long)]
    pub no_crop: bool,

    /// Maximum border thickness in pixels skipped from each edge when auto-cropping
    #[arg(long, default_value = "100")]
    pub max_border_scan: u32,

    /// Write a single label on a page of the label's own size instead of a 2-up sheet
    #[arg(long, conflicts_with = "input2")]
    pub single: bool,

    /// Label stock for --single (4x6, 4x8, 2x7, letter); ignored for 2-up sheets
    #[arg(long, default_value = "4x6")]
    pub label_size: LabelPreset,

    /// Directory containing the pdfium library used to rasterize PDF input
    #[arg(long)]
    pub pdfium_dir: Option<PathBuf>,

    /// Show per-stage details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            dpi: self.dpi,
            policy: self.policy,
            auto_crop: !self.no_crop,
            page_index: self.page,
            detector: DetectorConfig {
                max_scan: self.max_border_scan,
                ..DetectorConfig::default()
            },
            ..PipelineOptions::default()
        }
    }
}

fn parse_policy(s: &str) -> Result<ResizePolicy, String> {
    s.parse().map_err(|err: crate::error::LabelError| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["label-2up", "/tmp/ups.png"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("/tmp/ups_label.pdf"));

        let options = cli.pipeline_options();
        assert_eq!(options, PipelineOptions::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "label-2up", "a.pdf", "b.png", "-o", "out.pdf", "-d", "203", "-f", "fill", "-p", "2",
            "--no-crop", "--max-border-scan", "250",
        ])
        .unwrap();
        assert_eq!(cli.input2, Some(PathBuf::from("b.png")));
        assert_eq!(cli.output_path(), PathBuf::from("out.pdf"));

        let options = cli.pipeline_options();
        assert_eq!(options.dpi, 203);
        assert_eq!(options.policy, ResizePolicy::Fill);
        assert_eq!(options.page_index, 2);
        assert!(!options.auto_crop);
        assert_eq!(options.detector.max_scan, 250);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["label-2up", "a.png", "--fit", "squash"]).is_err());
    }

    #[test]
    fn test_single_label_size() {
        let cli =
            Cli::try_parse_from(["label-2up", "a.png", "--single", "--label-size", "4x8"]).unwrap();
        assert!(cli.single);
        assert_eq!(cli.label_size, LabelPreset::FourByEight);

        assert!(Cli::try_parse_from(["label-2up", "a.png", "b.png", "--single"]).is_err());
    }
}
