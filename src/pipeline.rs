//! Orchestration: decode → auto-crop → resize → compose → write.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::compose::{compose_page, SLOTS_PER_PAGE};
use crate::config::PipelineOptions;
use crate::detection::{crop_to_region, detect_label_region};
use crate::error::{LabelError, Result};
use crate::geometry::PhysicalSize;
use crate::source::{ensure_exists, RasterDecoder};
use crate::transform::resize_to_target;
use crate::writer::PageWriter;

/// Decode one source and turn it into a label-sized raster.
///
/// Label chains share nothing, so callers may run two of them in parallel.
pub fn prepare_label<D: RasterDecoder + ?Sized>(
    decoder: &D,
    source: &Path,
    options: &PipelineOptions,
) -> Result<RgbImage> {
    prepare_label_sized(decoder, source, options, options.layout.label_size)
}

fn prepare_label_sized<D: RasterDecoder + ?Sized>(
    decoder: &D,
    source: &Path,
    options: &PipelineOptions,
    label_size: PhysicalSize,
) -> Result<RgbImage> {
    let decoded = decoder.decode(source, options.page_index, options.dpi)?;

    let cropped = if options.auto_crop {
        let region = detect_label_region(&decoded, &options.detector);
        debug!(
            source = %source.display(),
            full = region.is_full(decoded.width(), decoded.height()),
            ?region,
            "Auto-crop region"
        );
        crop_to_region(&decoded, &region)
    } else {
        decoded
    };

    Ok(resize_to_target(&cropped, label_size, options.dpi, options.policy))
}

/// Produce a composed page holding one label per source (at most two).
pub fn produce_label_page<D, P>(
    decoder: &D,
    sources: &[P],
    options: &PipelineOptions,
) -> Result<RgbImage>
where
    D: RasterDecoder + ?Sized,
    P: AsRef<Path>,
{
    if sources.is_empty() {
        return Err(LabelError::InvalidInput(
            "at least one label source is required".to_string(),
        ));
    }

    if sources.len() > SLOTS_PER_PAGE {
        warn!(
            sources = sources.len(),
            "Only {SLOTS_PER_PAGE} labels fit on a page, not reading the rest"
        );
    }

    let labels = sources
        .iter()
        .take(SLOTS_PER_PAGE)
        .map(|source| prepare_label(decoder, source.as_ref(), options))
        .collect::<Result<Vec<_>>>()?;

    compose_page(&labels, options.dpi, &options.layout)
}

/// Default output path: `<stem>_label.pdf` next to `input`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_label.pdf", stem))
}

/// Run the whole two-up job: check inputs, build the page, write it as a PDF.
///
/// Nothing is written unless every label was produced. Returns the output path.
pub fn render_label_pdf<D, W>(
    decoder: &D,
    writer: &W,
    input: &Path,
    input2: Option<&Path>,
    output: Option<&Path>,
    options: &PipelineOptions,
) -> Result<PathBuf>
where
    D: RasterDecoder + ?Sized,
    W: PageWriter + ?Sized,
{
    let sources: Vec<&Path> = std::iter::once(input).chain(input2).collect();
    for source in &sources {
        ensure_exists(source)?;
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    info!(
        labels = sources.len(),
        dpi = options.dpi,
        policy = %options.policy,
        auto_crop = options.auto_crop,
        "Preparing two-up page"
    );

    let page = produce_label_page(decoder, &sources, options)?;
    writer.write_page(&page, options.layout.page_size, &output)?;

    Ok(output)
}

/// Write one label on a page exactly the label's size.
pub fn render_single_label_pdf<D, W>(
    decoder: &D,
    writer: &W,
    input: &Path,
    output: Option<&Path>,
    label_size: PhysicalSize,
    options: &PipelineOptions,
) -> Result<PathBuf>
where
    D: RasterDecoder + ?Sized,
    W: PageWriter + ?Sized,
{
    ensure_exists(input)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    info!(
        size = %label_size,
        dpi = options.dpi,
        policy = %options.policy,
        "Preparing single label"
    );

    let label = prepare_label_sized(decoder, input, options, label_size)?;
    writer.write_page(&label, label_size, &output)?;

    Ok(output)
}
