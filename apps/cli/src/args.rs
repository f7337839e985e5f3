//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rosetta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Maintain and query the Rosetta translation catalogue cache")]
pub(crate) struct Cli {
    /// Configuration file; `rosetta.toml` in the working directory is used when present
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Strategy to activate instead of the configured one
    #[arg(short, long, global = true)]
    pub(crate) strategy: Option<String>,

    /// JSON file seeding the translation repository (`locale -> domain -> id -> text`)
    #[arg(long, global = true)]
    pub(crate) database: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Compile the catalogues of every locale of the active strategy
    Warmup,
    /// Delete the compiled catalogues of the active strategy
    ClearCache,
    /// Rebuild the catalogues of every strategy and swap them in
    RebuildCache,
    /// Translate a message id
    Trans {
        id: String,
        #[arg(short, long)]
        locale: Option<String>,
        #[arg(short, long)]
        domain: Option<String>,
        /// Placeholder replacement given as `key=value`, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Value of `%count%` for plural messages
        #[arg(long)]
        count: Option<i64>,
    },
    /// Print the merged messages of a locale as JSON
    Dump {
        #[arg(short, long)]
        locale: Option<String>,
        /// Only these domains, repeatable
        #[arg(short, long = "domain")]
        domains: Vec<String>,
    },
    /// Print translation metrics read from a JSON export of the translation service
    Metrics {
        source: PathBuf,
        /// Only this language code
        #[arg(long)]
        code: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}
