//! Data models for barcodegen.
//!
//! - [`AppSettings`]: settings loaded from `barcode_generator_settings.json`, including the
//!   [`AppearanceSettings`] geometry that every render uses
//! - [`GenerationRequest`]: parameters for a single barcode
//! - [`BatchJob`] / [`BatchResult`]: input and aggregate outcome of one batch run
//!
//! None of these live longer than a single operation except the settings, which are
//! persisted by [`ConfigManager`](crate::config::ConfigManager).

pub mod job;
pub mod settings;

pub use job::{BatchJob, BatchOutput, BatchResult, FailedItem, GenerationRequest};
pub use settings::{AppSettings, AppearanceSettings, OutputFormat};
