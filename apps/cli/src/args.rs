use std::path::PathBuf;

use clap::{Parser, Subcommand};
use llmsh_core::UsageMethod;

#[derive(Debug, Parser)]
#[command(name = "llmsh")]
#[command(about = "LLM-powered shell command prediction, completion and generation")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (default: ~/.llmsh/config.toml)
    #[arg(long, global = true, env = "LLMSH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print `{error}` for provider failures instead of staying silent
    #[arg(long, global = true)]
    pub report_errors: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict the next command from a JSON context on stdin
    Predict,
    /// Complete a partial command from a JSON context on stdin
    Complete,
    /// Turn a natural-language description on stdin into a command
    Nl2cmd,
    /// Show token usage statistics
    Stats {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Maintain the prediction cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Remove the debug log and cache database
    Clean {
        /// Also remove token tracking data (the config is kept)
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Print the configuration file
    Show,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum CacheAction {
    /// Drop expired entries and enforce the size limit
    Prune,
    /// Remove every cached prediction
    Clear,
}

impl Commands {
    /// The request kind for commands that read JSON from stdin.
    pub fn method(&self) -> Option<UsageMethod> {
        match self {
            Self::Predict => Some(UsageMethod::Predict),
            Self::Complete => Some(UsageMethod::Complete),
            Self::Nl2cmd => Some(UsageMethod::Nl2cmd),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["llmsh", "predict", "--report-errors", "--config", "/tmp/c.toml"])
            .expect("parse");
        assert!(cli.report_errors);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.command.method(), Some(UsageMethod::Predict));
    }

    #[test]
    fn parses_maintenance_commands() {
        let cli = Cli::try_parse_from(["llmsh", "clean", "-a"]).expect("parse");
        assert!(matches!(cli.command, Commands::Clean { all: true }));
        assert_eq!(cli.command.method(), None);

        let cli = Cli::try_parse_from(["llmsh", "cache", "prune"]).expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Prune
            }
        ));

        let cli = Cli::try_parse_from(["llmsh", "stats", "--json"]).expect("parse");
        assert!(matches!(cli.command, Commands::Stats { json: true }));
    }
}
