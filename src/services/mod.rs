//! Services module - barcode generation logic with no presentation concerns.
//!
//! # Components
//!
//! - [`BarcodeGenerator`]: encodes one text and writes it as PNG, SVG or a single-page PDF.
//!   Also renders in-memory previews.
//! - [`generate_batch`]: runs a [`BatchJob`](crate::models::BatchJob) item by item, either
//!   one file per item or one combined document, reporting progress through a
//!   [`BatchObserver`](crate::state::BatchObserver).
//! - [`assemble_combined`] / [`generate_combined`]: lays many barcodes out on a grid of
//!   A4 pages.
//! - [`input`]: reads batch records from text files and CSV columns.
//!
//! Services take every input as an explicit parameter, including the appearance
//! settings; nothing here reads configuration or touches global state.
//!
//! # Usage Example
//!
//! ```ignore
//! use barcodegen::models::{AppearanceSettings, GenerationRequest, OutputFormat};
//! use barcodegen::services::BarcodeGenerator;
//! use barcodegen::symbology::Symbology;
//!
//! let generator = BarcodeGenerator::new(&AppearanceSettings::default());
//! let request = GenerationRequest::new("4006381333931", Symbology::Ean13, OutputFormat::Png, "out");
//! let path = generator.generate(&request)?;
//! ```

pub mod batch;
pub mod combined;
pub mod generator;
pub mod input;

pub use batch::{batch_filename, generate_batch};
pub use combined::{CombinedReport, GridLayout, GridPosition, assemble_combined, generate_combined};
pub use generator::{BarcodeGenerator, derive_filename, sanitize_filename};
pub use input::{BatchSource, ColumnSelector, read_csv_column, read_csv_headers, read_records, read_text_records};
