// barcodegen - barcode generation for single items, batches and combined PDFs
//
// This is the library crate containing the encoders, renderers and generation services.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod render;
pub mod services;
pub mod state;
pub mod symbology;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{GenerationError, GenerationResult};
pub use models::{AppSettings, AppearanceSettings, BatchJob, BatchOutput, BatchResult, GenerationRequest, OutputFormat};
pub use services::{BarcodeGenerator, generate_batch, generate_combined};
pub use state::{BatchEvent, BatchObserver};
pub use symbology::{EncodeError, EncodedBarcode, Symbology};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
