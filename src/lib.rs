pub mod cli;
pub mod compose;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod source;
pub mod transform;
pub mod writer;

pub use cli::Cli;
pub use compose::compose_page;
pub use config::{DetectorConfig, LayoutConfig, PipelineOptions};
pub use detection::{auto_crop_label, crop_to_region, detect_label_region};
pub use error::{LabelError, Result};
pub use geometry::{BoundingBox, LabelPreset, PhysicalSize};
pub use pipeline::{prepare_label, produce_label_page, render_label_pdf, render_single_label_pdf};
pub use source::{FileDecoder, RasterDecoder};
pub use transform::{resize_to_target, ResizePolicy};
pub use writer::{PageWriter, PdfPageWriter};
