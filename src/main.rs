use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use expense_tracker::core::TimeRange;
use expense_tracker::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display balance, spending chart, recipients and transactions
    Home {
        /// Chart window: 1D, 5D, 1M, 3M, 6M or 1Y
        #[arg(short, long)]
        range: Option<TimeRange>,

        /// Fetch fresh data after showing the cached snapshot
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => expense_tracker::cli::setup::setup(),
        Some(Commands::Home { range, refresh }) => {
            expense_tracker::run_command(
                expense_tracker::AppCommand::Home { range, refresh },
                cli.config_path.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
