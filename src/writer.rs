//! Page output: a composed raster embedded full-bleed in a one-page PDF.

use std::fs;
use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::info;

use crate::error::{LabelError, Result};
use crate::geometry::PhysicalSize;

/// Anything that can serialize a finished page
pub trait PageWriter {
    /// Write `page` as a single physical page of `size` to `path`
    fn write_page(&self, page: &RgbImage, size: PhysicalSize, path: &Path) -> Result<()>;
}

/// Writes pages as PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageWriter;

/// Build a one-page PDF with `page` stretched over a `size` media box
pub fn encode_page_pdf(page: &RgbImage, size: PhysicalSize) -> Result<Vec<u8>> {
    let (width_pt, height_pt) = size.to_points();
    let (width_pt, height_pt) = (width_pt as f32, height_pt as f32);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(page.width()),
            "Height" => i64::from(page.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        page.as_raw().clone(),
    );
    let image_id = doc.add_object(image);

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im0" => image_id,
        },
    });

    // Image space is the unit square; scale it to the whole page
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width_pt.into(),
                    0.into(),
                    0.into(),
                    height_pt.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), width_pt.into(), height_pt.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| LabelError::WritePdf(err.to_string()))?;
    Ok(bytes)
}

impl PageWriter for PdfPageWriter {
    fn write_page(&self, page: &RgbImage, size: PhysicalSize, path: &Path) -> Result<()> {
        let bytes = encode_page_pdf(page, size)?;
        fs::write(path, &bytes).map_err(|source| LabelError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            size = %size,
            bytes = bytes.len(),
            "Wrote PDF page"
        );

        Ok(())
    }
}
