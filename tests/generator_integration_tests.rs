//! Integration tests for single-barcode generation
//!
//! These tests verify:
//! - Every symbology renders to every output format
//! - Derived and explicit file names
//! - Error classification for bad input and missing directories

use barcodegen::render::{RenderOptions, raster};
use barcodegen::{AppearanceSettings, BarcodeGenerator, GenerationError, GenerationRequest, OutputFormat, Symbology};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

fn create_output_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, path)
}

/// A valid payload for each symbology
fn sample_text(symbology: Symbology) -> &'static str {
    match symbology {
        Symbology::Code128 => "Hello-128",
        Symbology::Code39 => "CODE39",
        Symbology::Ean13 => "400638133393",
        Symbology::Ean8 => "9638507",
        Symbology::UpcA => "03600029145",
        Symbology::Isbn13 => "978-0-306-40615-7",
        Symbology::Itf => "12345670",
        Symbology::Codabar => "A40156B",
    }
}

#[test]
fn test_every_symbology_as_png_and_svg() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());

    for symbology in Symbology::ALL {
        for format in [OutputFormat::Png, OutputFormat::Svg] {
            let name = format!("{}_{}", symbology.name(), format.extension());
            let request = GenerationRequest::new(sample_text(symbology), symbology, format, &dir)
                .with_filename(name.as_str());

            let path = generator
                .generate(&request)
                .unwrap_or_else(|e| panic!("{} as {}: {}", symbology, format, e));
            assert_eq!(path, dir.join(format!("{}.{}", name, format.extension())));
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }
}

#[test]
fn test_png_output_decodes() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("400638133393", Symbology::Ean13, OutputFormat::Png, &dir)
        .with_filename("ean");

    let path = generator.generate(&request).unwrap();
    let img = image::open(&path).unwrap().into_luma8();

    let encoded = Symbology::Ean13.encode("400638133393").unwrap();
    let expected = raster::render(&encoded, &RenderOptions::default()).unwrap();
    assert_eq!(img.dimensions(), expected.dimensions());
}

#[test]
fn test_svg_contains_human_readable_text() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("03600029145", Symbology::UpcA, OutputFormat::Svg, &dir)
        .with_filename("upc");

    let path = generator.generate(&request).unwrap();
    let svg = fs::read_to_string(path).unwrap();
    assert!(svg.contains("036000291452"));
}

#[test]
fn test_text_is_trimmed_before_encoding() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("  9638507 \n", Symbology::Ean8, OutputFormat::Svg, &dir)
        .with_filename("ean8");

    let path = generator.generate(&request).unwrap();
    assert!(fs::read_to_string(path).unwrap().contains("96385074"));
}

#[test]
fn test_derived_filename_has_timestamp() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("A/B C", Symbology::Code128, OutputFormat::Png, &dir);

    let path = generator.generate(&request).unwrap();
    let stem = path.file_stem().unwrap();

    let timestamp = stem.strip_prefix("barcode_AB C_").unwrap();
    assert_eq!(timestamp.len(), "20240101_120000".len());
    assert!(timestamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
}

#[test]
fn test_rejected_text_is_encoding_error() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());

    for (text, symbology) in [
        ("4006381333930", Symbology::Ean13),
        ("12AB", Symbology::Itf),
        ("lower~", Symbology::Code39),
        ("9770306406157", Symbology::Isbn13),
    ] {
        let request = GenerationRequest::new(text, symbology, OutputFormat::Png, &dir);
        match generator.generate(&request) {
            Err(GenerationError::Encoding { symbology: s, .. }) => assert_eq!(s, symbology),
            other => panic!("{} as {}: expected encoding error, got {:?}", text, symbology, other),
        }
    }
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn test_empty_text_is_invalid_input() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("", Symbology::Code128, OutputFormat::Svg, &dir);

    assert!(matches!(
        generator.generate(&request),
        Err(GenerationError::InvalidInput(_))
    ));
}

#[test]
fn test_zero_geometry_is_invalid_input() {
    let (_temp_dir, dir) = create_output_dir();
    let appearance = AppearanceSettings {
        module_height: 0.0,
        ..AppearanceSettings::default()
    };
    let generator = BarcodeGenerator::new(&appearance);
    let request = GenerationRequest::new("A", Symbology::Code128, OutputFormat::Png, &dir);

    assert!(matches!(
        generator.generate(&request),
        Err(GenerationError::InvalidInput(_))
    ));
}

#[test]
fn test_oversized_geometry_is_invalid_input() {
    let (_temp_dir, dir) = create_output_dir();

    for appearance in [
        AppearanceSettings {
            module_width: 1e12,
            ..AppearanceSettings::default()
        },
        AppearanceSettings {
            font_size: 4_000_000_000,
            ..AppearanceSettings::default()
        },
    ] {
        let generator = BarcodeGenerator::new(&appearance);
        assert!(matches!(
            generator.preview("HELLO", Symbology::Code128),
            Err(GenerationError::InvalidInput(_))
        ));
        for format in [OutputFormat::Png, OutputFormat::Svg] {
            let request = GenerationRequest::new("HELLO", Symbology::Code128, format, &dir);
            assert!(matches!(
                generator.generate(&request),
                Err(GenerationError::InvalidInput(_))
            ));
        }
    }
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn test_output_directory_must_exist() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let missing = dir.join("missing");
    let request = GenerationRequest::new("A", Symbology::Code128, OutputFormat::Png, &missing);

    match generator.generate(&request) {
        Err(GenerationError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

#[cfg(feature = "pdf")]
#[test]
fn test_pdf_is_single_letter_page() {
    let (_temp_dir, dir) = create_output_dir();
    let generator = BarcodeGenerator::new(&AppearanceSettings::default());
    let request = GenerationRequest::new("CODE39", Symbology::Code39, OutputFormat::Pdf, &dir)
        .with_filename("label");

    let path = generator.generate(&request).unwrap();
    assert_eq!(path, dir.join("label.pdf"));

    let doc = lopdf::Document::load(path.as_std_path()).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = *pages.values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[2].as_float().unwrap(), 612.0);
    assert_eq!(media_box[3].as_float().unwrap(), 792.0);
}
