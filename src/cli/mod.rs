// src/cli/mod.rs

use crate::config;
use anyhow::{Context, Result};
use clap::Parser;
use std::{io, path::PathBuf};

/// Demo commands and the `Console` they write to.
pub mod builtins;
/// Usage text rendered from descriptor metadata.
pub mod help;
/// The line-reading loop.
pub mod shell;

use builtins::Console;
use shell::Shell;

/// verbline: a line-oriented command shell with typed commands and nested verbs.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to a config file. Defaults to `<config dir>/verbline/config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Execute LINE and exit. May be repeated; lines run in order.
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,
}

/// Loads the config, builds the registry and runs either the given lines or
/// an interactive loop on stdin.
pub fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let registry = builtins::build_registry(config.dispatch, Console::Stdout)
        .context("Failed to register the built-in commands")?;
    let shell = Shell::new(registry, Console::Stdout, config.prompt);

    if cli.commands.is_empty() {
        shell.run_interactive(io::stdin().lock(), io::stdout())
    } else {
        shell.run_batch(&cli.commands)
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_repeated_commands() {
        let cli = Cli::try_parse_from(["verbline", "-c", "say a", "--command", "sum 1 2"]).unwrap();
        assert_eq!(cli.commands, vec!["say a", "sum 1 2"]);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_with_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dispatch]\nempty_line = \"error\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "verbline",
            "--config",
            path.to_str().unwrap(),
            "-c",
            "   ",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(format!("{:#}", err).contains("No command given."));
    }
}
