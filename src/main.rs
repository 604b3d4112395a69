//! barcodegen - command-line barcode generator
//!
//! # Execution Flow
//!
//! 1. Parse arguments ([`CommandLine`])
//! 2. Initialize logging -> `<log-dir>/barcodegen.YYYY-MM-DD`
//! 3. Load `barcode_generator_settings.json` from the config directory ([`ConfigManager`])
//! 4. Run the command through [`CliController`]
//! 5. Save settings and log the run summary
//!
//! Exit status is 0 on success, 1 on an error and 2 when a batch finished with failed
//! items.

use anyhow::Result;
use barcodegen::logging::{LOG_PREFIX, setup_logging_with_console};
use barcodegen::ui::{CliController, CommandLine};
use barcodegen::{APP_NAME, ConfigManager, VERSION};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = CommandLine::parse_args();

    let _guard = setup_logging_with_console(&cli.log_dir, LOG_PREFIX, cli.debug, !cli.quiet_console)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut controller = CliController::new(config_manager);

    let mut stdout = std::io::stdout().lock();
    let outcome = controller.run(cli.command, &mut stdout);

    controller.shutdown();
    controller.metrics().log_summary();

    match outcome {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::from(2)),
        Err(e) => {
            tracing::error!("{:#}", e);
            Err(e)
        }
    }
}
