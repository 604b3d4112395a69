// UI module - command-line front end
//
// This module contains:
// - CommandLine / Commands: clap argument definitions
// - CliController: runs one parsed command against the loaded settings
// - ProgressBridge: BatchObserver that drives an indicatif progress bar

pub mod bridge;
pub mod controller;

use crate::logging::DEFAULT_LOG_DIR;
use crate::models::{BatchOutput, OutputFormat};
use crate::services::ColumnSelector;
use crate::symbology::Symbology;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

pub use bridge::ProgressBridge;
pub use controller::CliController;

#[derive(Parser, Debug)]
#[command(name = "barcodegen", version)]
#[command(about = "Generate barcodes as PNG, SVG or PDF, one at a time or in batches.")]
pub struct CommandLine {
    /// Directory holding barcode_generator_settings.json
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: Utf8PathBuf,

    /// Directory for log files
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    /// Do not mirror log output to the console
    #[arg(long, global = true)]
    pub quiet_console: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a single barcode file
    #[command(alias = "gen")]
    Generate {
        text: String,
        /// Symbology; defaults to the configured barcode type
        #[arg(short, long)]
        symbology: Option<Symbology>,
        /// png, svg or pdf; defaults to the configured format
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Output directory; defaults to the configured directory
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// File name without extension
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Render a barcode in the terminal without writing a file
    Preview {
        text: String,
        #[arg(short, long)]
        symbology: Option<Symbology>,
    },
    /// Generate barcodes for every record of a text or CSV file
    Batch {
        input: Utf8PathBuf,
        /// CSV column: header name, or `#N` for the 0-based position N.
        /// Digits that match no header are also read as a position.
        #[arg(long)]
        column: Option<ColumnSelector>,
        #[arg(short, long)]
        symbology: Option<Symbology>,
        /// Individual png, svg or pdf files, or one combined pdf
        #[arg(short, long, value_enum)]
        format: Option<BatchFormat>,
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// Prefix for every generated file name
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// List the header row of a CSV file
    #[command(alias = "headers")]
    Columns { csv: Utf8PathBuf },
    /// Show or change the saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List supported symbologies
    Symbologies,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    /// Restore and save the defaults
    Reset,
    /// Change one setting, e.g. `set barcode_height 20`
    Set { key: String, value: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BatchFormat {
    Png,
    Svg,
    Pdf,
    Combined,
}

impl From<BatchFormat> for BatchOutput {
    fn from(format: BatchFormat) -> Self {
        match format {
            BatchFormat::Png => BatchOutput::Individual(OutputFormat::Png),
            BatchFormat::Svg => BatchOutput::Individual(OutputFormat::Svg),
            BatchFormat::Pdf => BatchOutput::Individual(OutputFormat::Pdf),
            BatchFormat::Combined => BatchOutput::Combined,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = CommandLine::try_parse_from([
            "barcodegen", "generate", "4006381333931", "-s", "ean13", "-f", "svg", "-n", "label",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                text,
                symbology,
                format,
                output,
                name,
            } => {
                assert_eq!(text, "4006381333931");
                assert_eq!(symbology, Some(Symbology::Ean13));
                assert_eq!(format, Some(OutputFormat::Svg));
                assert_eq!(output, None);
                assert_eq!(name.as_deref(), Some("label"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_with_global_flags() {
        let cli = CommandLine::try_parse_from([
            "barcodegen", "batch", "items.csv", "--column", "code", "-f", "combined", "-p", "inv_",
            "--debug", "--config-dir", "cfg",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.config_dir, Utf8PathBuf::from("cfg"));
        match cli.command {
            Commands::Batch {
                column,
                format,
                prefix,
                ..
            } => {
                assert_eq!(column, Some(ColumnSelector::Name("code".into())));
                assert_eq!(format, Some(BatchFormat::Combined));
                assert_eq!(prefix, "inv_");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_symbology_is_rejected() {
        assert!(CommandLine::try_parse_from(["barcodegen", "generate", "x", "-s", "qr"]).is_err());
    }

    #[test]
    fn test_batch_format_maps_to_output() {
        assert_eq!(BatchOutput::from(BatchFormat::Combined), BatchOutput::Combined);
        assert_eq!(
            BatchOutput::from(BatchFormat::Pdf),
            BatchOutput::Individual(OutputFormat::Pdf)
        );
    }
}
