//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "romshelf")]
#[command(about = "Locate and verify arcade ROM sets and disk images", long_about = None)]
pub(crate) struct Cli {
    /// MAME -listxml catalog (defaults to the saved setting)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// File listing ROM directories, one per line (defaults to the saved setting)
    #[arg(long, global = true)]
    pub dirlist: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve games and report where each set was found
    Check {
        /// Games to check (default: every game in the catalog)
        games: Vec<String>,

        /// Number of games to resolve concurrently
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Only report games that were not found or failed
        #[arg(long)]
        missing_only: bool,
    },

    /// Resolve one game and print the path of every file it uses
    Locate {
        /// Game name
        game: String,
    },

    /// Show attributes of a virtual path (e.g. /galaga.zip)
    Stat {
        /// Virtual path
        path: String,
    },

    /// Write the contents of a virtual file to stdout
    Cat {
        /// Virtual path
        path: String,
    },

    /// List a virtual directory
    Ls {
        /// Virtual path
        #[arg(default_value = "/")]
        path: String,
    },

    /// Manage saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file
    Show,

    /// Print the settings file path
    Path,

    /// Save the default catalog path
    SetCatalog {
        /// Path to a MAME -listxml file
        path: PathBuf,
    },

    /// Save the default directory list path
    SetDirlist {
        /// Path to a directory list file
        path: PathBuf,
    },
}
