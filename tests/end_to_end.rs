use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use label_2up::{
    produce_label_page, render_label_pdf, FileDecoder, LabelError, PageWriter, PdfPageWriter,
    PhysicalSize, PipelineOptions, ResizePolicy,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A scanned-looking label: white paper margin, thick black frame, some "barcode" bars inside
fn scanned_label() -> RgbImage {
    let mut img = RgbImage::from_pixel(850, 1100, WHITE);
    draw_filled_rect_mut(&mut img, Rect::at(100, 120).of_size(600, 900), BLACK);
    draw_filled_rect_mut(&mut img, Rect::at(112, 132).of_size(576, 876), WHITE);
    for i in 0..20 {
        draw_filled_rect_mut(&mut img, Rect::at(200 + i * 20, 600).of_size(8, 150), BLACK);
    }
    img
}

fn is_white(p: &Rgb<u8>) -> bool {
    p.0.iter().all(|&c| c >= 250)
}

#[test]
fn png_label_lands_in_left_half() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ups.png");
    scanned_label().save(&input).unwrap();

    let options = PipelineOptions {
        dpi: 300,
        policy: ResizePolicy::Fit,
        auto_crop: true,
        ..PipelineOptions::default()
    };
    let page = produce_label_page(&FileDecoder::default(), &[&input], &options).unwrap();

    assert_eq!(page.dimensions(), (3300, 2550));
    for (x, y, p) in page.enumerate_pixels() {
        if x >= 1650 {
            assert!(is_white(p), "non-white pixel at ({x}, {y}) in the right half");
        }
    }
    assert!(page.pixels().any(|p| !is_white(p)), "label content missing");
}

#[test]
fn auto_crop_drops_paper_margin() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ups.png");
    scanned_label().save(&input).unwrap();

    let options = PipelineOptions {
        dpi: 100,
        policy: ResizePolicy::Stretch,
        ..PipelineOptions::default()
    };
    let page = produce_label_page(&FileDecoder::default(), &[&input], &options).unwrap();

    // Cropped to the frame, stretching puts border ink right at the slot corner (75, 125).
    let corner = page.get_pixel(76, 126);
    assert!(corner.0[0] < 128, "expected frame at slot corner, got {corner:?}");
}

#[test]
fn two_up_pdf_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.jpg");
    scanned_label().save(&first).unwrap();
    scanned_label().save(&second).unwrap();

    let options = PipelineOptions {
        dpi: 100,
        ..PipelineOptions::default()
    };
    let output = render_label_pdf(
        &FileDecoder::default(),
        &PdfPageWriter,
        &first,
        Some(second.as_path()),
        None,
        &options,
    )
    .unwrap();

    assert_eq!(output, dir.path().join("first_label.pdf"));
    let doc = lopdf::Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn page_out_of_range_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source_pdf = dir.path().join("carrier.pdf");
    PdfPageWriter
        .write_page(&scanned_label(), PhysicalSize::new(8.5, 11.0), &source_pdf)
        .unwrap();

    let output = dir.path().join("out.pdf");
    let options = PipelineOptions {
        page_index: 1,
        ..PipelineOptions::default()
    };
    let err = render_label_pdf(
        &FileDecoder::default(),
        &PdfPageWriter,
        &source_pdf,
        None,
        Some(output.as_path()),
        &options,
    )
    .unwrap_err();

    assert!(matches!(err, LabelError::PageOutOfRange { requested: 1, count: 1 }));
    assert!(err.to_string().contains("1 page(s)"));
    assert!(!output.exists());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("label.gif");
    std::fs::write(&input, b"GIF89a").unwrap();

    let err = render_label_pdf(
        &FileDecoder::default(),
        &PdfPageWriter,
        &input,
        None,
        None,
        &PipelineOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, LabelError::UnsupportedFormat { .. }));
    assert!(!dir.path().join("label_label.pdf").exists());
}
