//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use promptstore::FilterQuery;
use tracing::debug;

use crate::clipboard::{SystemClipboard, is_on_path};

/// Promptboard - teacher prompt-sharing board
#[derive(Parser)]
#[command(
    name = "pb",
    about = "Browse, search, share and copy classroom prompts",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Search and category filters shared by `list`, `render` and `copy`
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title, content and subject
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact school type
    #[arg(long)]
    pub school: Option<String>,

    /// Subject substring
    #[arg(long)]
    pub subject: Option<String>,
}

impl FilterArgs {
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            text: self.search.clone().unwrap_or_default(),
            school_type: self.school.clone().unwrap_or_default(),
            subject: self.subject.clone().unwrap_or_default(),
        }
    }
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List prompts, newest first
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Render the board as a standalone HTML page
    Render {
        #[command(flatten)]
        filters: FilterArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Share a new prompt (stored on this machine only)
    Submit {
        #[arg(long)]
        title: String,

        /// School type, e.g. 小学校
        #[arg(long)]
        school_type: String,

        #[arg(long)]
        subject: String,

        /// Prompt text
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,

        /// Read the prompt text from a file
        #[arg(long, value_name = "FILE")]
        content_file: Option<PathBuf>,

        /// Optional note shown under the prompt
        #[arg(long)]
        description: Option<String>,
    },

    /// Copy a prompt's text to the clipboard
    Copy {
        /// Prompt id (the first card with this id)
        #[arg(required_unless_present = "position")]
        id: Option<String>,

        /// Card position as numbered by `list` with the same filters
        #[arg(short, long, conflicts_with = "id")]
        position: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the school types and subjects in use
    Facets {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Convert a tab-separated catalog into the static JSON collection
    Import {
        /// TSV file with id, title, school, subject, prompt, description columns
        input: PathBuf,

        /// Output file (default: the configured static source)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptboard")
        .join("logs")
        .join("promptboard.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with clipboard tool checks
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Clipboard Tools (first found is used):\n");
    for name in SystemClipboard::new().tool_names() {
        let icon = if is_on_path(name) {
            debug!(name, "generate_after_help: tool available");
            "\u{2705}"
        } else {
            debug!(name, "generate_after_help: tool not available");
            "\u{274C}"
        };
        help.push_str(&format!("  {} {}\n", icon, name));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
