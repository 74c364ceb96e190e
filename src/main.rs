use anyhow::Result;
use clap::Parser;
use log::error;

use termforge::{Cli, CommandHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only show errors unless --verbose was given
    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Error
        })
        .init();

    let mut handler = match CommandHandler::new(&cli) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to initialize termforge: {e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    match handler.dispatch(cli.command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("{}", handler.format_error(&format!("{e:#}")));
            std::process::exit(1);
        }
    }
}
