// CLI Controller - runs parsed commands against the services layer
//
// Owns the loaded settings, the ConfigManager that persists them and the run metrics.
// Every command writes its user-facing output to the writer it is given, so the
// binary passes stdout and tests pass a buffer.

use crate::config::ConfigManager;
use crate::metrics::Metrics;
use crate::models::{AppSettings, BatchJob, BatchOutput, GenerationRequest};
use crate::services::{BarcodeGenerator, BatchSource, generate_batch, read_csv_headers, read_records};
use crate::symbology::Symbology;
use crate::ui::bridge::ProgressBridge;
use crate::ui::{Commands, SettingsAction};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::time::Instant;

/// Failures listed in a batch summary before the rest are counted
const MAX_LISTED_FAILURES: usize = 10;

/// Rows of block characters in a terminal preview
const PREVIEW_ROWS: usize = 4;

pub struct CliController {
    config_manager: ConfigManager,
    settings: AppSettings,
    metrics: Metrics,
}

impl CliController {
    /// Create a controller with the settings currently on disk
    pub fn new(config_manager: ConfigManager) -> Self {
        let settings = config_manager.load_settings();
        Self::with_settings(config_manager, settings)
    }

    pub fn with_settings(config_manager: ConfigManager, settings: AppSettings) -> Self {
        Self {
            config_manager,
            settings,
            metrics: Metrics::new(),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run one command
    ///
    /// # Returns
    /// `Ok(true)` when everything succeeded, `Ok(false)` when a batch finished with
    /// failed items. Setup and single-item failures are errors.
    pub fn run<W: Write>(&mut self, command: Commands, out: &mut W) -> Result<bool> {
        match command {
            Commands::Generate {
                text,
                symbology,
                format,
                output,
                name,
            } => {
                let mut request = GenerationRequest::new(
                    text,
                    symbology.unwrap_or(self.settings.default_barcode_type),
                    format.unwrap_or(self.settings.default_output_format),
                    output.unwrap_or_else(|| self.settings.default_output_dir.clone()),
                );
                request.filename = name;
                self.generate(&request, out)?;
                Ok(true)
            }
            Commands::Preview { text, symbology } => {
                self.preview(&text, symbology.unwrap_or(self.settings.default_barcode_type), out)?;
                Ok(true)
            }
            Commands::Batch {
                input,
                column,
                symbology,
                format,
                output,
                prefix,
            } => {
                let source = BatchSource::from_path(input, column);
                let items = read_records(&source)
                    .with_context(|| format!("Error reading {}", source.path()))?;

                let job = BatchJob {
                    items,
                    symbology: symbology.unwrap_or(self.settings.default_barcode_type),
                    output: format.map(Into::into).unwrap_or(BatchOutput::Individual(
                        self.settings.default_output_format,
                    )),
                    output_directory: output
                        .unwrap_or_else(|| self.settings.default_output_dir.clone()),
                    filename_prefix: prefix,
                };
                self.batch(&job, out)
            }
            Commands::Columns { csv } => {
                let headers = read_csv_headers(&csv)
                    .with_context(|| format!("Error reading CSV file {}", csv))?;
                writeln!(out, "Found {} columns in {}:", headers.len(), csv)?;
                for (i, header) in headers.iter().enumerate() {
                    writeln!(out, "  {:>3}  {}", i, header)?;
                }
                Ok(true)
            }
            Commands::Settings { action } => {
                self.settings_command(action, out)?;
                Ok(true)
            }
            Commands::Symbologies => {
                for symbology in Symbology::ALL {
                    let marker = if symbology == self.settings.default_barcode_type {
                        "*"
                    } else {
                        " "
                    };
                    writeln!(out, "{} {}", marker, symbology)?;
                }
                Ok(true)
            }
        }
    }

    fn generate<W: Write>(&self, request: &GenerationRequest, out: &mut W) -> Result<()> {
        let generator = BarcodeGenerator::new(&self.settings.appearance);
        let started = Instant::now();

        match generator.generate(request) {
            Ok(path) => {
                self.metrics.record_generated();
                self.metrics.record_generation_time(started.elapsed());
                writeln!(out, "Barcode saved to {}", path)?;
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(anyhow!(e).context("Error generating barcode"))
            }
        }
    }

    fn preview<W: Write>(&self, text: &str, symbology: Symbology, out: &mut W) -> Result<()> {
        let generator = BarcodeGenerator::new(&self.settings.appearance);
        let image = generator
            .preview(text, symbology)
            .context("Error generating preview")?;
        let encoded = generator.encode(text.trim(), symbology)?;

        let bars: String = encoded
            .modules
            .iter()
            .map(|&bar| if bar { '█' } else { ' ' })
            .collect();
        for _ in 0..PREVIEW_ROWS {
            writeln!(out, "  {}  ", bars)?;
        }
        if self.settings.appearance.include_text {
            writeln!(out, "  {}", encoded.human_readable)?;
        }
        writeln!(
            out,
            "{} modules, {}x{} px at {} dpi",
            encoded.width(),
            image.width(),
            image.height(),
            generator.options().dpi
        )?;
        Ok(())
    }

    fn batch<W: Write>(&self, job: &BatchJob, out: &mut W) -> Result<bool> {
        let started = Instant::now();
        let mut bridge = ProgressBridge::new(&self.metrics);
        let result = generate_batch(job, &self.settings.appearance, &mut bridge)
            .context("Error processing batch")?;
        self.metrics.record_generation_time(started.elapsed());

        writeln!(out, "{}", result.summary(MAX_LISTED_FAILURES))?;
        Ok(result.is_complete_success())
    }

    fn settings_command<W: Write>(&mut self, action: SettingsAction, out: &mut W) -> Result<()> {
        match action {
            SettingsAction::Show => {
                writeln!(out, "# {}", self.config_manager.settings_path())?;
                writeln!(out, "{}", serde_json::to_string_pretty(&self.settings)?)?;
            }
            SettingsAction::Reset => {
                self.settings = self.config_manager.reset_settings()?;
                writeln!(out, "Settings reset to defaults!")?;
            }
            SettingsAction::Set { key, value } => {
                self.settings
                    .set_value(&key, &value)
                    .map_err(anyhow::Error::msg)?;
                self.config_manager.save_settings(&self.settings)?;
                writeln!(out, "Settings saved successfully!")?;
            }
        }
        Ok(())
    }

    /// Write the current settings back on exit. Failures are logged only.
    pub fn shutdown(&self) {
        self.config_manager.persist_settings(&self.settings);
    }
}
