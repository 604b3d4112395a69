use crate::error::GenerationResult;
#[cfg(not(feature = "pdf"))]
use crate::error::GenerationError;
use crate::models::{AppearanceSettings, FailedItem};
use crate::render::PageSize;
use crate::state::ItemStatus;
use crate::symbology::Symbology;
use camino::{Utf8Path, Utf8PathBuf};

/// File name of the combined document, after the prefix
pub const COMBINED_FILE_NAME: &str = "combined_barcodes.pdf";

const MARGIN: f32 = 72.0;
const BOX_WIDTH: f32 = 250.0;
const BOX_HEIGHT: f32 = 80.0;
const SPACING: f32 = 20.0;

/// Where one item lands in the combined document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    /// 0-based page number
    pub page: usize,
    pub row: usize,
    pub col: usize,
    /// Lower-left corner of the box, in points
    pub x: f32,
    pub y: f32,
}

/// Fixed grid of equally sized boxes inside the page margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub page: PageSize,
    pub margin: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub spacing: f32,
    pub items_per_row: usize,
    pub items_per_column: usize,
}

impl GridLayout {
    pub fn new(page: PageSize, margin: f32, box_width: f32, box_height: f32, spacing: f32) -> Self {
        let usable_width = page.width - 2.0 * margin;
        let usable_height = page.height - 2.0 * margin;
        let fit = |usable: f32, step: f32| ((usable / step).floor().max(0.0) as usize).max(1);

        Self {
            page,
            margin,
            box_width,
            box_height,
            spacing,
            items_per_row: fit(usable_width, box_width + spacing),
            items_per_column: fit(usable_height, box_height + spacing),
        }
    }

    /// A4 grid of 250x80 pt boxes with one-inch margins
    pub fn a4() -> Self {
        Self::new(PageSize::A4, MARGIN, BOX_WIDTH, BOX_HEIGHT, SPACING)
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_row * self.items_per_column
    }

    pub fn position(&self, index: usize) -> GridPosition {
        let per_page = self.items_per_page();
        let page_position = index % per_page;
        let row = page_position / self.items_per_row;
        let col = page_position % self.items_per_row;

        GridPosition {
            page: index / per_page,
            row,
            col,
            x: self.margin + col as f32 * (self.box_width + self.spacing),
            y: self.page.height
                - self.margin
                - (row + 1) as f32 * (self.box_height + self.spacing),
        }
    }

    /// Whether a page break follows item `index` in a document of `total` items
    pub fn starts_new_page_after(&self, index: usize, total: usize) -> bool {
        (index + 1) % self.items_per_page() == 0 && index + 1 < total
    }

    /// Pages needed for `total` items; an empty document still has one page
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.items_per_page()).max(1)
    }
}

/// Outcome of assembling a combined document
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedReport {
    pub path: Utf8PathBuf,
    pub placed: usize,
    pub skipped: Vec<FailedItem>,
    pub pages: usize,
}

pub fn combined_path(dir: &Utf8Path, prefix: &str) -> Utf8PathBuf {
    dir.join(format!("{}{}", prefix, COMBINED_FILE_NAME))
}

/// Lay every item out on an A4 grid and save `dir/<prefix>combined_barcodes.pdf`
///
/// Items that fail to encode or render are skipped and leave their box empty; later
/// items keep their positions. `on_item` is called once per item, in input order.
///
/// # Errors
/// Only failures that lose the whole document: building or saving the PDF.
#[cfg(feature = "pdf")]
pub fn assemble_combined(
    items: &[String],
    symbology: Symbology,
    dir: &Utf8Path,
    prefix: &str,
    appearance: &AppearanceSettings,
    on_item: &mut dyn FnMut(&str, ItemStatus),
) -> GenerationResult<CombinedReport> {
    use crate::error::GenerationError;
    use crate::render::pdf::PdfCanvas;
    use crate::render::{RenderOptions, raster};

    let layout = GridLayout::a4();
    let options = RenderOptions::from(appearance);
    let path = combined_path(dir, prefix);
    tracing::debug!(
        "Combined layout: {} per row, {} per column",
        layout.items_per_row,
        layout.items_per_column
    );

    let mut canvas = PdfCanvas::new(layout.page);
    let mut placed = 0;
    let mut skipped = Vec::new();

    for (i, text) in items.iter().enumerate() {
        let rendered = symbology
            .encode(text)
            .map_err(|e| GenerationError::encoding(symbology, text, e))
            .and_then(|encoded| raster::render(&encoded, &options));

        match rendered {
            Ok(img) => {
                let pos = layout.position(i);
                canvas.place_image(&img, pos.x, pos.y, layout.box_width, layout.box_height);
                placed += 1;
                on_item(text, ItemStatus::Generated);
            }
            Err(e) => {
                tracing::warn!("Error processing item {}: {}", text, e);
                let reason = e.to_string();
                skipped.push(FailedItem {
                    text: text.clone(),
                    reason: reason.clone(),
                });
                on_item(text, ItemStatus::Failed(reason));
            }
        }

        if layout.starts_new_page_after(i, items.len()) {
            canvas.new_page()?;
        }
    }

    let pages = canvas.page_count();
    canvas.save(&path)?;
    tracing::info!(
        "Saved combined document {} ({} placed, {} skipped, {} pages)",
        path,
        placed,
        skipped.len(),
        pages
    );

    Ok(CombinedReport {
        path,
        placed,
        skipped,
        pages,
    })
}

#[cfg(not(feature = "pdf"))]
pub fn assemble_combined(
    _items: &[String],
    _symbology: Symbology,
    _dir: &Utf8Path,
    _prefix: &str,
    _appearance: &AppearanceSettings,
    _on_item: &mut dyn FnMut(&str, ItemStatus),
) -> GenerationResult<CombinedReport> {
    Err(GenerationError::UnsupportedFeature(
        "Combined PDF output is not available in this build".to_string(),
    ))
}

/// Build the combined document, returning `true` only if it was saved
pub fn generate_combined(
    items: &[String],
    symbology: Symbology,
    dir: &Utf8Path,
    prefix: &str,
    appearance: &AppearanceSettings,
) -> bool {
    match assemble_combined(items, symbology, dir, prefix, appearance, &mut |_: &str, _: ItemStatus| {}) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Error creating combined PDF: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_a4_layout() {
        let layout = GridLayout::a4();
        assert_eq!(layout.items_per_row, 1);
        assert_eq!(layout.items_per_column, 6);
        assert_eq!(layout.items_per_page(), 6);
    }

    #[test]
    fn test_first_positions() {
        let layout = GridLayout::a4();
        let first = layout.position(0);
        assert_eq!((first.page, first.row, first.col), (0, 0, 0));
        assert_eq!(first.x, 72.0);
        assert!((first.y - (841.8898 - 72.0 - 100.0)).abs() < 1e-3);

        let seventh = layout.position(6);
        assert_eq!((seventh.page, seventh.row, seventh.col), (1, 0, 0));
    }

    #[test]
    fn test_wide_page_fits_several_columns() {
        let page = PageSize {
            width: 1000.0,
            height: 400.0,
        };
        let layout = GridLayout::new(page, 72.0, 250.0, 80.0, 20.0);
        assert_eq!(layout.items_per_row, 3);
        assert_eq!(layout.items_per_column, 2);

        let pos = layout.position(4);
        assert_eq!((pos.row, pos.col), (1, 1));
        assert_eq!(pos.x, 72.0 + 270.0);
    }

    #[test]
    fn test_tiny_page_still_holds_one_item() {
        let page = PageSize {
            width: 100.0,
            height: 100.0,
        };
        let layout = GridLayout::new(page, 72.0, 250.0, 80.0, 20.0);
        assert_eq!(layout.items_per_page(), 1);
    }

    #[test]
    fn test_page_breaks() {
        let layout = GridLayout::a4();
        assert!(!layout.starts_new_page_after(4, 12));
        assert!(layout.starts_new_page_after(5, 12));
        assert!(!layout.starts_new_page_after(11, 12));
        assert!(!layout.starts_new_page_after(5, 6));
        assert_eq!(layout.page_count(12), 2);
        assert_eq!(layout.page_count(13), 3);
        assert_eq!(layout.page_count(0), 1);
    }

    #[test]
    fn test_combined_path() {
        assert_eq!(
            combined_path(Utf8Path::new("out"), "inv_"),
            Utf8PathBuf::from("out/inv_combined_barcodes.pdf")
        );
    }

    proptest! {
        #[test]
        fn prop_next_page_same_cell(
            width in 200.0f32..2000.0,
            height in 200.0f32..2000.0,
            k in 0usize..500,
        ) {
            let layout = GridLayout::new(PageSize { width, height }, 72.0, 250.0, 80.0, 20.0);
            let p = layout.items_per_page();
            let a = layout.position(k);
            let b = layout.position(k + p);
            prop_assert_eq!((a.row, a.col), (b.row, b.col));
            prop_assert_eq!(a.x, b.x);
            prop_assert_eq!(a.y, b.y);
            prop_assert_eq!(a.page + 1, b.page);
        }
    }

    #[cfg(feature = "pdf")]
    mod document {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_gap_policy_keeps_positions() {
            let temp_dir = TempDir::new().unwrap();
            let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
            let items: Vec<String> = ["400638133393", "123", "978030640615", "036000291452"]
                .iter()
                .map(|s| s.to_string())
                .collect();

            let mut seen = Vec::new();
            let report = assemble_combined(
                &items,
                Symbology::Ean13,
                &dir,
                "x_",
                &AppearanceSettings::default(),
                &mut |text: &str, status: ItemStatus| seen.push((text.to_string(), status)),
            )
            .unwrap();

            assert_eq!(report.path, dir.join("x_combined_barcodes.pdf"));
            assert_eq!(report.placed, 3);
            assert_eq!(report.skipped.len(), 1);
            assert_eq!(report.skipped[0].text, "123");
            assert_eq!(report.pages, 1);
            assert_eq!(seen.len(), 4);
            assert!(matches!(seen[1].1, ItemStatus::Failed(_)));
            assert!(report.path.exists());
        }

        #[test]
        fn test_pages_follow_item_count() {
            let temp_dir = TempDir::new().unwrap();
            let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
            let items: Vec<String> = (0..13).map(|i| format!("ITEM{}", i)).collect();

            let report = assemble_combined(
                &items,
                Symbology::Code128,
                &dir,
                "",
                &AppearanceSettings::default(),
                &mut |_: &str, _: ItemStatus| {},
            )
            .unwrap();
            assert_eq!(report.pages, 3);

            let doc = lopdf::Document::load(report.path.as_std_path()).unwrap();
            assert_eq!(doc.get_pages().len(), 3);
        }

        #[test]
        fn test_generate_combined_reports_save_failure() {
            let temp_dir = TempDir::new().unwrap();
            let dir = Utf8PathBuf::try_from(temp_dir.path().join("missing")).unwrap();
            let items = vec!["A".to_string()];
            assert!(!generate_combined(
                &items,
                Symbology::Code128,
                &dir,
                "",
                &AppearanceSettings::default()
            ));
        }
    }
}
