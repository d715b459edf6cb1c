//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "docgen")]
#[command(
    author,
    version,
    about = "Generate a knowledge document from annotated Go enums and SQL comments"
)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a source tree and write the knowledge document
    Generate {
        /// Root directory to scan
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,

        /// Root directory to scan (alias of ROOT)
        #[arg(long = "localpath", value_name = "DIR", conflicts_with = "root")]
        localpath: Option<PathBuf>,

        /// Directory the document is written to [default: docs]
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Document format
        #[arg(short, long, value_enum)]
        format: Option<DocumentFormat>,

        /// SQL dialect used for identifier quoting
        #[arg(short, long)]
        dialect: Option<String>,

        /// Configuration file (defaults to docgen.toml in this or a parent directory)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Report Go files that fail to parse and keep scanning
        #[arg(long)]
        keep_going: bool,

        /// Diagnostic output format
        #[arg(long, default_value = "human", value_enum)]
        message_format: MessageFormat,

        /// Print the document to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Display tables, columns and comments recovered from SQL files
    Schema {
        /// SQL schema files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// SQL dialect
        #[arg(short, long, default_value = "postgresql")]
        dialect: String,
    },

    /// Print the statements extracted from a SQL file (for debugging)
    Statements {
        /// SQL file to split
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum DocumentFormat {
    /// Markdown document
    #[default]
    Markdown,
    /// JSON document
    Json,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Markdown => "md",
            DocumentFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(DocumentFormat::Markdown),
            "json" => Ok(DocumentFormat::Json),
            _ => Err(format!("Unknown document format: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum MessageFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
}
