// src/core/dispatcher.rs

use crate::{
    core::{
        lexer::{self, ParseError},
        registry::{Invoker, Registry},
    },
    models::BoxError,
};
use serde::Deserialize;
use thiserror::Error;

// --- DISPATCH POLICY ---

/// What `execute` does with a line that is empty after trimming.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyLinePolicy {
    /// Treat it as a no-op.
    #[default]
    Ignore,
    /// Fail with `DispatchError::NoCommand`.
    Error,
}

/// Dispatch behavior shared by a registry and all of its verbs.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchOptions {
    /// What to do with blank lines.
    pub empty_line: EmptyLinePolicy,
}

// --- ERRORS ---

/// Every way a single `execute` call can end without running the handler
/// to completion. None of them are retried.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum DispatchError {
    /// The line was blank and the policy is `EmptyLinePolicy::Error`.
    #[error("No command given.")]
    NoCommand,

    #[error("Command '{name}' does not exist.")]
    NonExistentCommand { name: String },

    /// The arguments could not be tokenized. The offset counts from the
    /// start of the line given to the outermost `execute`.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Command '{command}': missing argument #{param_index} ({parameter}).")]
    MissingArgument {
        command: String,
        param_index: usize,
        parameter: String,
    },

    /// The argument at `param_index` failed its conversion; `cause` is the
    /// conversion's own error.
    #[error("Command '{command}': invalid argument #{param_index}: {cause}")]
    InvalidArgument {
        command: String,
        param_index: usize,
        #[source]
        cause: BoxError,
    },

    /// More arguments than a fixed-arity signature takes.
    #[error("Command '{command}' takes at most {expected} argument(s) but {given} were given.")]
    TooManyArguments {
        command: String,
        expected: usize,
        given: usize,
    },

    /// The handler itself failed.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

// --- EXECUTE ---

impl Registry {
    /// Executes one line: the first word names the command, the rest of the
    /// line becomes its arguments.
    ///
    /// Raw commands get the remainder verbatim, verbs forward it to their
    /// child registry, everything else goes through the lexer and the
    /// command's compiled converter. Errors are returned unchanged, except
    /// that parse offsets are moved to count from the start of `line`.
    pub fn execute(&self, line: &str) -> Result<(), DispatchError> {
        let leading = line.len() - line.trim_start().len();
        let line = line.trim();
        if line.is_empty() {
            return match self.options.empty_line {
                EmptyLinePolicy::Ignore => Ok(()),
                EmptyLinePolicy::Error => Err(DispatchError::NoCommand),
            };
        }

        let (head, rest) = split_head(line);
        // Where the remainder starts in the caller's line.
        let rest_offset = leading + line.len() - rest.map_or(0, str::len);
        let descriptor = self
            .lookup(head)
            .ok_or_else(|| DispatchError::NonExistentCommand {
                name: head.to_string(),
            })?;

        match &descriptor.invoker {
            Invoker::Verb(child) => {
                log::debug!("Forwarding to verb '{}': {:?}", head, rest);
                child
                    .execute(rest.unwrap_or_default())
                    .map_err(|e| match e {
                        DispatchError::Parse(err) => {
                            DispatchError::Parse(err.shifted(rest_offset))
                        }
                        other => other,
                    })
            }
            Invoker::Compiled(convert) if descriptor.is_raw() => {
                log::debug!("Invoking raw command '{}'", head);
                convert(head, vec![rest.unwrap_or_default().to_string()])
            }
            Invoker::Compiled(convert) => {
                let tokens = match rest {
                    Some(rest) => {
                        lexer::tokenize(rest).map_err(|e| e.shifted(rest_offset))?
                    }
                    None => Vec::new(),
                };
                log::debug!("Invoking '{}' with {} argument(s)", head, tokens.len());
                convert(head, tokens)
            }
        }
    }
}

/// Splits a trimmed line at its first whitespace run.
fn split_head(line: &str) -> (&str, Option<&str>) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim_start())),
        None => (line, None),
    }
}

// MARK: --- UNIT TESTS ---
