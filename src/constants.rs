// src/constants.rs

/// The name of the directory holding verbline configuration (inside the user config dir).
pub const APP_DIR_NAME: &str = "verbline";

/// The name of the shell configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Prompt used when the config file does not set one.
pub const DEFAULT_PROMPT: &str = "> ";

/// Words that end the interactive loop. Handled by the shell, never dispatched.
pub const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// Host-level help command; it reads descriptor metadata instead of dispatching.
pub const HELP_COMMAND: &str = "help";

/// Name of the single raw parameter a verb descriptor carries.
pub const VERB_PARAMETER: &str = "subcommand";
