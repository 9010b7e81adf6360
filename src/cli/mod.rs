//! CLI argument definitions for td.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::ItemFilter;

/// Version string with build metadata injected by `build.rs`.
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TD_GIT_COMMIT"),
    " ",
    env!("TD_BUILD_TIMESTAMP"),
    ")"
);

/// td - a todo manager with multiple named lists.
#[derive(Parser, Debug)]
#[command(name = "td")]
#[command(author, version = VERSION, about = "A CLI todo manager with multiple named lists", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Store data in <path> instead of the platform data directory.
    /// Can also be set via the TD_DATA_DIR environment variable.
    #[arg(short = 'd', long = "data-dir", global = true, env = "TD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the storage directory and empty index (idempotent)
    Init,

    /// Show all lists with item counts (shortcut for `list ls`)
    Lists,

    /// List management commands
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Item management commands
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
}

/// List subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a new empty list
    Create {
        /// List name; doubles as the file name under the data directory
        name: String,
    },

    /// Delete a list and all its items
    Delete {
        /// List name
        name: String,

        /// Confirm the deletion (required; there is no interactive prompt)
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Show all lists with item counts
    Ls,
}

/// Item subcommands
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a list
    Add {
        /// List name
        list: String,

        /// Item description
        text: String,
    },

    /// Mark an item completed (idempotent)
    Done {
        /// List name
        list: String,

        /// Item id, or 1-based position when no id matches
        item: u64,
    },

    /// Remove an item from a list (its id is never reused)
    Rm {
        /// List name
        list: String,

        /// Item id, or 1-based position when no id matches
        item: u64,
    },

    /// Show items in a list
    Ls {
        /// List name
        list: String,

        /// Only show items in this completion state
        #[arg(short, long, value_enum, default_value = "all")]
        filter: FilterArg,
    },

    /// Show completed items (same query as `ls --filter completed`)
    Finished {
        /// List name
        list: String,
    },
}

/// Completion-state filter as exposed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterArg {
    #[default]
    All,
    Pending,
    Completed,
}

impl From<FilterArg> for ItemFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => ItemFilter::All,
            FilterArg::Pending => ItemFilter::Pending,
            FilterArg::Completed => ItemFilter::Completed,
        }
    }
}
