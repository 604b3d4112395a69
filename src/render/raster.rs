use super::{RenderOptions, font, write_atomically};
use crate::error::{GenerationError, GenerationResult};
use crate::symbology::EncodedBarcode;
use camino::Utf8Path;
use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

const WHITE: Luma<u8> = Luma([255]);
const BLACK: Luma<u8> = Luma([0]);

/// Largest image, in pixels, a single barcode may rasterize to
pub const MAX_RASTER_PIXELS: u64 = 100_000_000;

/// Pixel layout of a raster barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    pub module_px: u32,
    pub quiet_px: u32,
    pub bar_height_px: u32,
    pub margin_px: u32,
    /// Pixel size of one glyph cell; zero when no text is drawn
    pub glyph_scale: u32,
    pub text_gap_px: u32,
    pub width: u32,
    pub height: u32,
}

impl RasterLayout {
    /// Pixel geometry for `encoded`
    ///
    /// # Errors
    /// [`GenerationError::InvalidInput`] when the image would not fit in
    /// [`MAX_RASTER_PIXELS`].
    pub fn compute(encoded: &EncodedBarcode, opts: &RenderOptions) -> GenerationResult<Self> {
        let module_px = opts.mm_to_px(opts.module_width_mm);
        let quiet_px = opts.mm_to_px(opts.quiet_zone_mm);
        let bar_height_px = opts.mm_to_px(opts.module_height_mm);
        let margin_px = quiet_px / 2;

        let text_chars = encoded.human_readable.chars().count();
        let draw_text = opts.include_text && text_chars > 0;
        let glyph_scale = if draw_text {
            (opts.pt_to_px(opts.font_size_pt as f64) / font::GLYPH_HEIGHT).max(1)
        } else {
            0
        };
        let text_gap_px = if draw_text {
            opts.mm_to_px(opts.text_distance_mm)
        } else {
            0
        };

        let too_large = || {
            GenerationError::InvalidInput(format!(
                "Barcode of {} modules is too large to rasterize at {} dpi",
                encoded.width(),
                opts.dpi
            ))
        };

        let bars_width = u32::try_from(encoded.width())
            .ok()
            .and_then(|modules| modules.checked_mul(module_px))
            .and_then(|w| w.checked_add(quiet_px.checked_mul(2)?))
            .ok_or_else(too_large)?;
        let text_width = font::line_width(text_chars)
            .checked_mul(glyph_scale)
            .and_then(|w| w.checked_add(module_px.checked_mul(2)?))
            .ok_or_else(too_large)?;
        let width = bars_width.max(text_width);
        let height = margin_px
            .checked_mul(2)
            .and_then(|h| h.checked_add(bar_height_px))
            .and_then(|h| h.checked_add(text_gap_px))
            .and_then(|h| h.checked_add(font::GLYPH_HEIGHT.checked_mul(glyph_scale)?))
            .ok_or_else(too_large)?;

        if u64::from(width) * u64::from(height) > MAX_RASTER_PIXELS {
            return Err(too_large());
        }

        Ok(Self {
            module_px,
            quiet_px,
            bar_height_px,
            margin_px,
            glyph_scale,
            text_gap_px,
            width,
            height,
        })
    }
}

/// Draw the barcode into a new grayscale image
pub fn render(encoded: &EncodedBarcode, opts: &RenderOptions) -> GenerationResult<GrayImage> {
    opts.validate()?;
    if encoded.modules.is_empty() {
        return Err(GenerationError::Render("Barcode has no modules".to_string()));
    }

    let layout = RasterLayout::compute(encoded, opts)?;
    let mut img = GrayImage::from_pixel(layout.width, layout.height, WHITE);

    let bars_width = encoded.width() as u32 * layout.module_px;
    let bars_left = (layout.width - bars_width) / 2;
    let bars_top = layout.margin_px;

    for (i, _) in encoded.modules.iter().enumerate().filter(|(_, bar)| **bar) {
        let x0 = bars_left + i as u32 * layout.module_px;
        for x in x0..x0 + layout.module_px {
            for y in bars_top..bars_top + layout.bar_height_px {
                img.put_pixel(x, y, BLACK);
            }
        }
    }

    if layout.glyph_scale > 0 {
        draw_text(&mut img, &encoded.human_readable, &layout);
    }

    Ok(img)
}

fn draw_text(img: &mut GrayImage, text: &str, layout: &RasterLayout) {
    let scale = layout.glyph_scale;
    let text_width = font::line_width(text.chars().count()) * scale;
    let left = (layout.width - text_width) / 2;
    let top = layout.margin_px + layout.bar_height_px + layout.text_gap_px;

    for (n, ch) in text.chars().enumerate() {
        let rows = font::glyph(ch);
        let glyph_left = left + n as u32 * font::GLYPH_ADVANCE * scale;
        for row in 0..font::GLYPH_HEIGHT {
            for col in 0..font::GLYPH_WIDTH {
                if !font::is_set(&rows, col, row) {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(glyph_left + col * scale + dx, top + row * scale + dy, BLACK);
                    }
                }
            }
        }
    }
}

/// Encode the image as PNG bytes
pub fn encode_png(img: &GrayImage) -> GenerationResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

/// Render and write a PNG file
pub fn save_png(
    encoded: &EncodedBarcode,
    opts: &RenderOptions,
    path: &Utf8Path,
) -> GenerationResult<()> {
    let img = render(encoded, opts)?;
    let bytes = encode_png(&img)?;
    write_atomically(path, &bytes)
}
