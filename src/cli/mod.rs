//! CLI module for HackHere
//!
//! Provides a command-line view of the event catalog. Without a
//! subcommand the graphical map starts instead.

mod commands;
mod output;
mod shell;

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::catalog::Catalog;

pub use output::{print_error, OutputFormat};

/// HackHere - Brazilian security conference map
#[derive(Parser, Debug)]
#[command(name = "hackhere")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Filters shared by `events` and `show`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only events in this state (two-letter code, e.g. SP)
    #[arg(long)]
    pub state: Option<String>,

    /// Case-insensitive substring of the event name
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List events, optionally filtered
    Events {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show one event from the filtered list
    Show {
        /// Position in the filtered list (as printed by `events`)
        index: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List states that have events
    States,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Interactive shell
    Shell,
}

/// Run the CLI with parsed arguments
pub async fn run(command: Commands, output: &OutputOptions, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let format = output.format();
    let quiet = output.quiet;

    match command {
        Commands::Events { filter } => commands::events::list(&catalog, &filter, format, quiet),
        Commands::Show { index, filter } => commands::events::show(&catalog, &filter, index, format),
        Commands::States => commands::states::run(&catalog, format),
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Shell => shell::run(catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_gui() {
        let cli = Cli::try_parse_from(["hackhere"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_events_filters() {
        let cli = Cli::try_parse_from(["hackhere", "events", "--state", "sp", "--search", "hack", "--json"]).unwrap();
        assert!(cli.output.json);
        match cli.command {
            Some(Commands::Events { filter }) => {
                assert_eq!(filter.state.as_deref(), Some("sp"));
                assert_eq!(filter.search.as_deref(), Some("hack"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_index() {
        let cli = Cli::try_parse_from(["hackhere", "show", "3", "--state", "RJ"]).unwrap();
        match cli.command {
            Some(Commands::Show { index, filter }) => {
                assert_eq!(index, 3);
                assert_eq!(filter.state.as_deref(), Some("RJ"));
                assert!(filter.search.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
