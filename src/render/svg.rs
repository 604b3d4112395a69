use super::{RenderOptions, write_atomically};
use crate::error::{GenerationError, GenerationResult};
use crate::symbology::EncodedBarcode;
use camino::Utf8Path;
use std::fmt::Write;

/// Render the barcode as an SVG document sized in millimetres
pub fn render(encoded: &EncodedBarcode, opts: &RenderOptions) -> GenerationResult<String> {
    opts.validate()?;
    if encoded.modules.is_empty() {
        return Err(GenerationError::Render("Barcode has no modules".to_string()));
    }

    let module = opts.module_width_mm;
    let quiet = opts.quiet_zone_mm;
    let margin = quiet / 2.0;
    let draw_text = opts.include_text && !encoded.human_readable.is_empty();
    let font_mm = opts.font_size_mm();

    let width = encoded.width() as f64 * module + 2.0 * quiet;
    let mut height = 2.0 * margin + opts.module_height_mm;
    if draw_text {
        height += opts.text_distance_mm + font_mm;
    }

    let mut svg = String::new();
    // writing into a String cannot fail
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w:.3}mm" height="{h:.3}mm" viewBox="0 0 {w:.3} {h:.3}">"#,
        w = width,
        h = height
    );
    let _ = writeln!(
        svg,
        r#"  <rect x="0" y="0" width="{:.3}" height="{:.3}" fill="white"/>"#,
        width, height
    );
    let _ = writeln!(svg, r#"  <g fill="black">"#);

    for (start, len) in bar_runs(&encoded.modules) {
        let _ = writeln!(
            svg,
            r#"    <rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}"/>"#,
            quiet + start as f64 * module,
            margin,
            len as f64 * module,
            opts.module_height_mm
        );
    }
    let _ = writeln!(svg, "  </g>");

    if draw_text {
        let baseline = margin + opts.module_height_mm + opts.text_distance_mm + font_mm;
        let _ = writeln!(
            svg,
            r#"  <text x="{:.3}" y="{:.3}" font-family="monospace" font-size="{}pt" text-anchor="middle" fill="black">{}</text>"#,
            width / 2.0,
            baseline,
            opts.font_size_pt,
            escape_xml(&encoded.human_readable)
        );
    }
    let _ = writeln!(svg, "</svg>");

    Ok(svg)
}

/// Render and write an SVG file
pub fn save_svg(
    encoded: &EncodedBarcode,
    opts: &RenderOptions,
    path: &Utf8Path,
) -> GenerationResult<()> {
    let svg = render(encoded, opts)?;
    write_atomically(path, svg.as_bytes())
}

/// (start module, length) of each run of consecutive bars
fn bar_runs(modules: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &bar) in modules.iter().enumerate() {
        match (bar, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }
    runs
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
