use crate::format::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tgcalls-docs")]
#[command(about = "Index and query the PyTgCalls / NTgCalls documentation", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./tgcalls-docs.toml, then the user config dir)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the record snapshot from the page map and reference source
    Build {
        /// Page map source (file path or URL)
        #[arg(long)]
        map: Option<String>,
        /// Reference source (file path or URL)
        #[arg(long)]
        config: Option<String>,
        /// Snapshot output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search the snapshot by keyword
    Search {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Search the raw page markup instead of the snapshot
        #[arg(long)]
        raw: bool,
        /// Include RAISES sections
        #[arg(long)]
        errors: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show one page by path
    Show {
        path: String,
        /// Include RAISES sections
        #[arg(long)]
        errors: bool,
        /// Summarize the raw page markup instead of the snapshot record
        #[arg(long)]
        raw: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Serve the documentation tools over MCP on stdio
    Serve {
        /// Also load the page map for the search_markup tool
        #[arg(long)]
        markup: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn parses_search_flags() {
        let cli = Cli::parse_from(["tgcalls-docs", "search", "play", "-n", "3", "--errors", "--format", "html"]);
        let_assert!(Commands::Search { query, limit, raw, errors, format } = cli.command);
        check!(query == "play");
        check!(limit == Some(3));
        check!(!raw);
        check!(errors);
        check!(format == OutputFormat::Html);
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::parse_from(["tgcalls-docs", "serve", "--markup", "--json-logs"]);
        check!(cli.json_logs);
        check!(matches!(cli.command, Commands::Serve { markup: true }));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
