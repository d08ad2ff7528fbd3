//! Raster sources: image files decoded with `image`, PDF pages rasterized with pdfium.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, RgbImage, RgbaImage};
use pdfium_render::prelude::{PdfRenderConfig, Pdfium, PdfiumError};
use tracing::{debug, info};

use crate::config::{supported_extensions, IMAGE_EXTENSIONS, PDF_EXTENSIONS};
use crate::error::{LabelError, Result};
use crate::geometry::POINTS_PER_INCH;

/// Anything that can turn a path into a three-channel raster
pub trait RasterDecoder {
    /// Decode `path`. `page_index` selects a page of a multi-page source and `dpi` its
    /// rasterization resolution; single-image sources ignore both.
    fn decode(&self, path: &Path, page_index: usize, dpi: u32) -> Result<RgbImage>;
}

/// What a file extension says about how to decode a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Pdf,
}

impl SourceKind {
    /// Classify `path` by its (case-insensitive) extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SourceKind::Image)
        } else if PDF_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SourceKind::Pdf)
        } else {
            Err(LabelError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{extension}")
                },
                supported: supported_extensions(),
            })
        }
    }
}

/// Fail with `NotFound` unless `path` is an existing file
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LabelError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Number of pages in a PDF document
pub fn pdf_page_count(path: &Path) -> Result<usize> {
    let document = lopdf::Document::load(path).map_err(|err| LabelError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(document.get_pages().len())
}

/// Decodes files from disk
#[derive(Debug, Clone, Default)]
pub struct FileDecoder {
    /// Directory holding the pdfium shared library, tried before the working
    /// directory and the system library
    pdfium_dir: Option<PathBuf>,
}

impl FileDecoder {
    pub fn new(pdfium_dir: Option<PathBuf>) -> Self {
        Self { pdfium_dir }
    }

    fn decode_image(&self, path: &Path) -> Result<RgbImage> {
        let decode_error = |message: String| LabelError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let img = ImageReader::open(path)
            .map_err(|err| decode_error(err.to_string()))?
            .with_guessed_format()
            .map_err(|err| decode_error(err.to_string()))?
            .decode()
            .map_err(|err| decode_error(err.to_string()))?;

        Ok(img.to_rgb8())
    }

    fn bind_pdfium(&self) -> Result<Pdfium> {
        let mut candidates = Vec::new();
        if let Some(dir) = &self.pdfium_dir {
            candidates.push(dir.clone());
        }
        candidates.push(PathBuf::from("./"));

        for dir in &candidates {
            let library = Pdfium::pdfium_platform_library_name_at_path(dir);
            if let Ok(bindings) = Pdfium::bind_to_library(&library) {
                debug!(library = %library.display(), "Bound pdfium");
                return Ok(Pdfium::new(bindings));
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| LabelError::Rasterize(format!("pdfium library not available: {err}")))?;
        Ok(Pdfium::new(bindings))
    }

    fn decode_pdf_page(&self, path: &Path, page_index: usize, dpi: u32) -> Result<RgbImage> {
        let count = pdf_page_count(path)?;
        if page_index >= count {
            return Err(LabelError::PageOutOfRange {
                requested: page_index,
                count,
            });
        }

        let rasterize_error = |err: PdfiumError| LabelError::Rasterize(err.to_string());

        let pdfium = self.bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(&path.to_path_buf(), None)
            .map_err(rasterize_error)?;
        let index = page_index
            .try_into()
            .map_err(|_| LabelError::PageOutOfRange {
                requested: page_index,
                count,
            })?;
        let page = document.pages().get(index).map_err(rasterize_error)?;

        let scale = dpi as f32 / POINTS_PER_INCH as f32;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&config).map_err(rasterize_error)?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            LabelError::Rasterize(format!("pdfium returned a short {width}x{height} bitmap"))
        })?;

        info!(page = page_index, pages = count, width, height, "Rasterized PDF page");

        Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }
}

impl RasterDecoder for FileDecoder {
    fn decode(&self, path: &Path, page_index: usize, dpi: u32) -> Result<RgbImage> {
        ensure_exists(path)?;

        let img = match SourceKind::from_path(path)? {
            SourceKind::Image => self.decode_image(path)?,
            SourceKind::Pdf => self.decode_pdf_page(path, page_index, dpi)?,
        };

        debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "Decoded source"
        );

        Ok(img)
    }
}
