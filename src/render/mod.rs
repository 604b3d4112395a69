//! Renderers that turn an [`EncodedBarcode`](crate::symbology::EncodedBarcode) into output.
//!
//! - [`raster`]: grayscale bitmap via the `image` crate, saved as PNG
//! - [`svg`]: vector markup in millimetre units
//! - [`pdf`]: [`PdfCanvas`](pdf::PdfCanvas) document assembler on top of `lopdf`
//!   (behind the default `pdf` feature)
//!
//! Final files are written through [`write_atomically`], so a failed render never leaves
//! a truncated output behind.

pub mod font;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod raster;
pub mod svg;

use crate::error::{GenerationError, GenerationResult};
use crate::models::AppearanceSettings;
use crate::models::settings::TEXT_DISTANCE_RANGE;
use camino::Utf8Path;
use std::io::Write;

/// Blank margin left and right of the bars, in millimetres
pub const QUIET_ZONE_MM: f64 = 6.5;

/// Resolution used for raster output
pub const RASTER_DPI: u32 = 300;

const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };
}

/// Geometry shared by all renderers, derived from [`AppearanceSettings`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub module_width_mm: f64,
    pub module_height_mm: f64,
    pub quiet_zone_mm: f64,
    pub font_size_pt: u32,
    pub text_distance_mm: f64,
    pub include_text: bool,
    pub dpi: u32,
}

impl From<&AppearanceSettings> for RenderOptions {
    fn from(appearance: &AppearanceSettings) -> Self {
        Self {
            module_width_mm: appearance.module_width,
            module_height_mm: appearance.module_height,
            quiet_zone_mm: QUIET_ZONE_MM,
            font_size_pt: appearance.font_size,
            text_distance_mm: appearance.text_distance as f64,
            include_text: appearance.include_text,
            dpi: RASTER_DPI,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&AppearanceSettings::default())
    }
}

impl RenderOptions {
    /// Millimetres to whole pixels at this resolution, never below one pixel
    pub fn mm_to_px(&self, mm: f64) -> u32 {
        ((mm * self.dpi as f64 / MM_PER_INCH).round() as u32).max(1)
    }

    /// Points to whole pixels at this resolution, never below one pixel
    pub fn pt_to_px(&self, pt: f64) -> u32 {
        ((pt * self.dpi as f64 / PT_PER_INCH).round() as u32).max(1)
    }

    /// Font size converted to millimetres
    pub fn font_size_mm(&self) -> f64 {
        self.font_size_pt as f64 * MM_PER_INCH / PT_PER_INCH
    }

    /// Reject geometry outside the ranges accepted for [`AppearanceSettings`]
    pub(crate) fn validate(&self) -> GenerationResult<()> {
        let appearance = AppearanceSettings {
            module_width: self.module_width_mm,
            module_height: self.module_height_mm,
            font_size: self.font_size_pt,
            include_text: self.include_text,
            text_distance: 0,
        };
        appearance.validate().map_err(GenerationError::InvalidInput)?;

        let text_distance = *TEXT_DISTANCE_RANGE.start() as f64..=*TEXT_DISTANCE_RANGE.end() as f64;
        if !text_distance.contains(&self.text_distance_mm) {
            return Err(GenerationError::InvalidInput(format!(
                "text_distance must be between {} and {} (got {})",
                text_distance.start(),
                text_distance.end(),
                self.text_distance_mm
            )));
        }
        if !(self.quiet_zone_mm >= 0.0 && self.dpi > 0) {
            return Err(GenerationError::InvalidInput(format!(
                "Invalid quiet zone {}mm at {} dpi",
                self.quiet_zone_mm, self.dpi
            )));
        }
        Ok(())
    }
}

/// Write `bytes` to `path` via a sibling temp file that is renamed into place.
pub fn write_atomically(path: &Utf8Path, bytes: &[u8]) -> GenerationResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| GenerationError::io(dir, e))?;
    temp.write_all(bytes)
        .map_err(|e| GenerationError::io(temp.path().to_string_lossy().into_owned(), e))?;
    temp.persist(path)
        .map_err(|e| GenerationError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_unit_conversions() {
        let opts = RenderOptions::default();
        // 0.2mm at 300dpi = 2.36px
        assert_eq!(opts.mm_to_px(0.2), 2);
        // 15mm at 300dpi = 177.2px
        assert_eq!(opts.mm_to_px(15.0), 177);
        // 10pt at 300dpi = 41.7px
        assert_eq!(opts.pt_to_px(10.0), 42);
        assert_eq!(opts.mm_to_px(0.0001), 1);
    }

    #[test]
    fn test_validate_rejects_zero_geometry() {
        let mut opts = RenderOptions::default();
        assert!(opts.validate().is_ok());
        opts.module_width_mm = 0.0;
        assert!(matches!(
            opts.validate(),
            Err(GenerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_geometry() {
        for opts in [
            RenderOptions {
                module_width_mm: 1e12,
                ..RenderOptions::default()
            },
            RenderOptions {
                font_size_pt: 4_000_000_000,
                ..RenderOptions::default()
            },
            RenderOptions {
                text_distance_mm: 1e9,
                ..RenderOptions::default()
            },
            RenderOptions {
                dpi: 0,
                ..RenderOptions::default()
            },
        ] {
            assert!(
                matches!(opts.validate(), Err(GenerationError::InvalidInput(_))),
                "{:?}",
                opts
            );
        }
    }

    #[test]
    fn test_write_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let path = dir.join("out.bin");

        write_atomically(&path, b"hello").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        // only the final file remains
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let path = dir.join("missing").join("out.bin");

        assert!(matches!(
            write_atomically(&path, b"hello"),
            Err(GenerationError::Io { .. })
        ));
    }
}
