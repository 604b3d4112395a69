use crate::error::{GenerationError, GenerationResult};
use crate::models::{AppearanceSettings, GenerationRequest, OutputFormat};
use crate::render::{RenderOptions, raster, svg};
use crate::symbology::{EncodedBarcode, Symbology};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use image::GrayImage;

/// Keep alphanumerics, space, `-` and `_`, then drop trailing whitespace.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().to_string()
}

/// Default file stem for a single barcode: `barcode_<sanitized text>_<YYYYmmdd_HHMMSS>`
pub fn derive_filename(text: &str, now: DateTime<Local>) -> String {
    format!(
        "barcode_{}_{}",
        sanitize_filename(text),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Service for generating single barcode files
///
/// Holds the render geometry taken from [`AppearanceSettings`] at construction; every
/// other input arrives with the [`GenerationRequest`].
#[derive(Debug, Clone)]
pub struct BarcodeGenerator {
    options: RenderOptions,
}

impl BarcodeGenerator {
    pub fn new(appearance: &AppearanceSettings) -> Self {
        Self {
            options: RenderOptions::from(appearance),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Encode `text`, mapping encoder errors to [`GenerationError::Encoding`]
    pub fn encode(&self, text: &str, symbology: Symbology) -> GenerationResult<EncodedBarcode> {
        symbology
            .encode(text)
            .map_err(|e| GenerationError::encoding(symbology, text, e))
    }

    /// Render a barcode in memory without writing anything to disk
    pub fn preview(&self, text: &str, symbology: Symbology) -> GenerationResult<GrayImage> {
        let text = validate_text(text)?;
        let encoded = self.encode(text, symbology)?;
        raster::render(&encoded, &self.options)
    }

    /// Generate one barcode file and return its path
    ///
    /// # Errors
    /// - [`GenerationError::InvalidInput`] for empty text, or a file name with nothing
    ///   left after [`sanitize_filename`]
    /// - [`GenerationError::Io`] if the output directory is missing or unwritable
    /// - [`GenerationError::Encoding`] if the symbology rejects the text
    /// - [`GenerationError::UnsupportedFeature`] for PDF output without the `pdf` feature
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult<Utf8PathBuf> {
        let text = validate_text(&request.text)?;
        ensure_directory(&request.output_directory)?;

        let stem = match &request.filename {
            Some(name) => {
                let stem = sanitize_filename(name);
                if stem.is_empty() {
                    return Err(GenerationError::InvalidInput(format!(
                        "File name {:?} has no usable characters",
                        name
                    )));
                }
                stem
            }
            None => derive_filename(text, Local::now()),
        };
        let path = request
            .output_directory
            .join(format!("{}.{}", stem, request.output_format.extension()));

        let encoded = self.encode(text, request.symbology)?;

        match request.output_format {
            OutputFormat::Png => raster::save_png(&encoded, &self.options, &path)?,
            OutputFormat::Svg => svg::save_svg(&encoded, &self.options, &path)?,
            OutputFormat::Pdf => self.save_pdf(&encoded, &path)?,
        }

        tracing::info!(
            "Generated {} {} barcode for {:?} at {}",
            request.output_format,
            request.symbology,
            text,
            path
        );
        Ok(path)
    }

    /// Embed the barcode in a single-page Letter document.
    ///
    /// The raster goes through a scoped temp file that is removed on every exit path;
    /// failing to remove it is logged and never fails the operation.
    #[cfg(feature = "pdf")]
    fn save_pdf(&self, encoded: &EncodedBarcode, path: &Utf8Path) -> GenerationResult<()> {
        use crate::render::PageSize;
        use crate::render::pdf::PdfCanvas;
        use std::io::Write;

        const IMAGE_X: f32 = 72.0;
        const IMAGE_Y: f32 = 600.0;
        const IMAGE_WIDTH: f32 = 300.0;
        const IMAGE_HEIGHT: f32 = 100.0;

        let img = raster::render(encoded, &self.options)?;
        let png = raster::encode_png(&img)?;

        let mut temp = tempfile::Builder::new()
            .prefix("barcode_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| GenerationError::io(std::env::temp_dir().to_string_lossy().into_owned(), e))?;
        let temp_path = temp.path().to_string_lossy().into_owned();
        temp.write_all(&png)
            .and_then(|_| temp.flush())
            .map_err(|e| GenerationError::io(temp_path.as_str(), e))?;

        let embedded = image::open(temp.path())?.into_luma8();

        let mut canvas = PdfCanvas::new(PageSize::LETTER);
        canvas.place_image(&embedded, IMAGE_X, IMAGE_Y, IMAGE_WIDTH, IMAGE_HEIGHT);
        canvas.save(path)?;

        if let Err(e) = temp.close() {
            tracing::debug!("Could not remove temp image {}: {}", temp_path, e);
        }
        Ok(())
    }

    #[cfg(not(feature = "pdf"))]
    fn save_pdf(&self, _encoded: &EncodedBarcode, _path: &Utf8Path) -> GenerationResult<()> {
        Err(GenerationError::UnsupportedFeature(
            "PDF output is not available in this build".to_string(),
        ))
    }
}

/// Trimmed text, or `InvalidInput` if nothing is left
pub(crate) fn validate_text(text: &str) -> GenerationResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::InvalidInput(
            "Please enter text for the barcode.".to_string(),
        ));
    }
    Ok(trimmed)
}

/// `Io(NotFound)` unless `dir` is an existing directory
pub(crate) fn ensure_directory(dir: &Utf8Path) -> GenerationResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    Err(GenerationError::io(
        dir,
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "output directory does not exist",
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn temp_output_dir() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c:d*e"), "abcde");
        assert_eq!(sanitize_filename("x_0001_A 1 "), "x_0001_A 1");
        assert_eq!(sanitize_filename("Ünïcode-ok"), "Ünïcode-ok");
        assert_eq!(sanitize_filename("###"), "");
    }

    #[test]
    fn test_derive_filename() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            derive_filename("ABC/123", now),
            "barcode_ABC123_20240309_140507"
        );
    }

    #[test]
    fn test_generate_png_with_filename() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new("HELLO", Symbology::Code128, OutputFormat::Png, &dir)
            .with_filename("hello");

        let path = generator.generate(&request).unwrap();
        assert_eq!(path, dir.join("hello.png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_explicit_filename_stays_in_output_directory() {
        let (_tmp, root) = temp_output_dir();
        let dir = root.join("out");
        std::fs::create_dir(&dir).unwrap();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());

        let request = GenerationRequest::new("HELLO", Symbology::Code128, OutputFormat::Svg, &dir)
            .with_filename("../escaped");
        let path = generator.generate(&request).unwrap();
        assert_eq!(path, dir.join("escaped.svg"));
        assert!(!root.join("escaped.svg").exists());

        let request = GenerationRequest::new("HELLO", Symbology::Code128, OutputFormat::Svg, &dir)
            .with_filename("../");
        assert!(matches!(
            generator.generate(&request),
            Err(GenerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_derives_filename() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new("AB-12", Symbology::Code39, OutputFormat::Svg, &dir);

        let path = generator.generate(&request).unwrap();
        let name = path.file_name().unwrap();
        assert!(name.starts_with("barcode_AB-12_"));
        assert!(name.ends_with(".svg"));
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new("   ", Symbology::Code128, OutputFormat::Png, &dir);

        assert!(matches!(
            generator.generate(&request),
            Err(GenerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new(
            "A",
            Symbology::Code128,
            OutputFormat::Png,
            dir.join("nope"),
        );

        assert!(matches!(
            generator.generate(&request),
            Err(GenerationError::Io { .. })
        ));
    }

    #[test]
    fn test_encoding_failure_leaves_no_file() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new("12345", Symbology::Ean13, OutputFormat::Png, &dir)
            .with_filename("bad");

        assert!(matches!(
            generator.generate(&request),
            Err(GenerationError::Encoding { .. })
        ));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_preview_does_not_touch_disk() {
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let img = generator.preview("9638507", Symbology::Ean8).unwrap();
        assert!(img.width() > 0 && img.height() > 0);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_generate_pdf() {
        let (_tmp, dir) = temp_output_dir();
        let generator = BarcodeGenerator::new(&AppearanceSettings::default());
        let request = GenerationRequest::new("400638133393", Symbology::Ean13, OutputFormat::Pdf, &dir)
            .with_filename("doc");

        let path = generator.generate(&request).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // only the document remains in the output directory
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }
}
