// ============================================================================
// textmerger - Mixed-Encoding Text Merger
// Main Entry Point
//
// Merges text files and folders into one output file. Each input is read
// with an explicit or auto-detected encoding (Shift_JIS, CP932, UTF-8 with
// or without BOM) and the result is written in a single encoding and line
// ending convention.
// ============================================================================

use clap::Parser; // Command-line argument parsing with derive macros
use log::{error, info};
use std::process::ExitCode;

use textmerger::cli::{Cli, Commands};
use textmerger::commands::CommandHandler;
use textmerger::display;
use textmerger::errors::MergerResult;
use textmerger::logging::Logger;

// ============================================================================
// APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            for line in display::format_error(&e) {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> MergerResult<()> {
    // Log files need the crate's own logger; plain console logging uses env_logger
    if cli.log_file.is_some() || cli.error_log.is_some() {
        Logger::init(
            cli.log_file.as_deref(),
            cli.error_log.as_deref(),
            cli.log_level(),
        )?;
    } else {
        env_logger::builder().filter_level(cli.log_level()).init();
    }

    info!("textmerger starting up");

    match cli.command {
        Commands::Merge(ref args) => {
            info!("Executing merge command");
            CommandHandler::handle_merge(&cli, args.clone()).await?;
        }
        Commands::Detect(ref args) => {
            info!("Executing detect command");
            CommandHandler::handle_detect(args.clone()).await?;
        }
        Commands::Encodings => {
            CommandHandler::handle_encodings().await?;
        }
        Commands::GenerateConfig(ref args) => {
            info!("Executing generate-config command");
            CommandHandler::handle_generate_config(args.clone()).await?;
        }
        Commands::GuidedSetup(ref args) => {
            info!("Executing guided-setup command");
            CommandHandler::handle_guided_setup(args.clone()).await?;
        }
    }

    info!("textmerger operation completed");
    Ok(())
}
