//! nearshot CLI - find and display a photo taken near your current location.
//!
//! One `find` invocation runs the whole pipeline: obtain a coordinate fix,
//! search the photo provider around it, download the nearest photo, decode
//! it, and present it.
//!
//! # Usage
//!
//! ```bash
//! # Locate via IP and save the nearest photo
//! nearshot find --output nearby.png
//!
//! # Search around an explicit coordinate, with the map plan logged
//! nearshot find --lat 40.0 --lon -105.0 --map
//!
//! # View configuration
//! nearshot config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// nearshot - find and display a photo taken near your current location.
#[derive(Parser, Debug)]
#[command(name = "nearshot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate, search, and present the nearest photo
    Find(cli::find::FindArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match nearshot_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `nearshot config path`."
            );
            nearshot_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("nearshot v{}", nearshot_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Find(args) => cli::find::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
