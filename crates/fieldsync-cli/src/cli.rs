use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fieldsync")]
#[command(about = "Stamp offline records and check them for sync conflicts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the conflict config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stamp a server record before caching it offline
    Stamp {
        /// JSON file holding the record
        record: PathBuf,
        /// Record type, used to look up tracked fields in the config
        #[arg(long = "type", value_name = "TYPE")]
        record_type: Option<String>,
        /// Fields to baseline (overrides the config)
        #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
        track: Vec<String>,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Compare an offline record with the server copy
    Detect {
        /// JSON file holding the offline record
        local: PathBuf,
        /// JSON file holding the server record
        server: PathBuf,
        /// Record type, used to look up compare fields in the config
        #[arg(long = "type", value_name = "TYPE")]
        record_type: Option<String>,
        /// Fields to compare (overrides the config)
        #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
        fields: Vec<String>,
        /// Label used in the summary, e.g. "daily report"
        #[arg(long, value_name = "LABEL")]
        entity: Option<String>,
        /// Output the raw report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Produce the reconciled record for a conflict
    Resolve {
        /// JSON file holding the offline record
        local: PathBuf,
        /// JSON file holding the server record
        server: PathBuf,
        /// keep_local, keep_server or merge
        #[arg(long, value_name = "STRATEGY")]
        strategy: String,
        /// Merge winner for a field, e.g. status=local (repeatable)
        #[arg(long, value_name = "FIELD=SIDE")]
        pick: Vec<String>,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Check a queue of pending offline actions for conflicts
    Batch {
        /// JSON file holding an array of `{ "type", "payload" }` actions
        actions: PathBuf,
        /// Directory with server records laid out as TYPE/ID.json
        #[arg(long, value_name = "DIR")]
        server_dir: PathBuf,
        /// Fetches in flight at once (overrides the config)
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the conflict config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
