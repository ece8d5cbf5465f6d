// src/cli/shell.rs

use crate::{
    cli::{builtins::Console, help},
    constants::{EXIT_WORDS, HELP_COMMAND},
    core::registry::Registry,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

/// Whether the shell should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// An exit word was entered.
    Exit,
}

/// Feeds lines into a registry. Exit words and `help` are handled here,
/// everything else goes to `Registry::execute`.
#[derive(Debug)]
pub struct Shell {
    registry: Registry,
    console: Console,
    prompt: String,
}

impl Shell {
    /// A shell over `registry` that writes help to `console`.
    pub fn new(registry: Registry, console: Console, prompt: impl Into<String>) -> Self {
        Self {
            registry,
            console,
            prompt: prompt.into(),
        }
    }

    /// The registry lines are dispatched to.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handles one line and reports whether to keep going.
    pub fn run_line(&self, line: &str) -> Result<Flow> {
        let trimmed = line.trim();
        if EXIT_WORDS.contains(&trimmed) {
            return Ok(Flow::Exit);
        }

        let mut words = trimmed.split_whitespace();
        // A registered `help` command shadows the built-in one.
        if words.next() == Some(HELP_COMMAND) && !self.registry.contains(HELP_COMMAND) {
            let path: Vec<&str> = words.collect();
            let styled = matches!(self.console, Console::Stdout);
            self.console
                .line(help::render_help(&self.registry, &path, styled)?);
            return Ok(Flow::Continue);
        }

        self.registry.execute(line)?;
        Ok(Flow::Continue)
    }

    /// Runs each line in order, stopping at the first error or exit word.
    pub fn run_batch<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        for line in lines {
            let line = line.as_ref();
            let flow = self
                .run_line(line)
                .with_context(|| format!("Failed to execute '{}'", line))?;
            if flow == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Reads lines until end of input or an exit word. Errors are reported
    /// on stderr and do not stop the loop.
    pub fn run_interactive<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line).context("Failed to read input")? == 0 {
                writeln!(output)?;
                return Ok(());
            }

            match self.run_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
            }
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::builtins::build_registry;
    use crate::core::dispatcher::DispatchOptions;
    use crate::models::CommandSpec;
    use std::io::Cursor;

    fn shell() -> (Shell, Console) {
        let console = Console::captured();
        let registry = build_registry(DispatchOptions::default(), console.clone()).unwrap();
        (Shell::new(registry, console.clone(), "$ "), console)
    }

    #[test]
    fn test_exit_words_stop() {
        let (shell, _) = shell();
        assert_eq!(shell.run_line("  quit ").unwrap(), Flow::Exit);
        assert_eq!(shell.run_line("exit").unwrap(), Flow::Exit);
        assert_eq!(shell.run_line("").unwrap(), Flow::Continue);
    }

    #[test]
    fn test_help_is_handled_by_the_shell() {
        let (shell, console) = shell();
        shell.run_line("help math").unwrap();
        let output = console.lines();
        assert_eq!(output.len(), 1);
        assert!(output[0].starts_with("Commands of 'math':"));
        assert!(shell.run_line("help nothing").is_err());
    }

    #[test]
    fn test_registered_help_shadows_builtin() {
        let console = Console::captured();
        let out = console.clone();
        let mut registry = Registry::new();
        registry
            .register(CommandSpec::new(["help"], move |_| {
                out.line("custom");
                Ok(())
            }))
            .unwrap();
        let shell = Shell::new(registry, console.clone(), "> ");
        shell.run_line("help").unwrap();
        assert_eq!(console.lines(), vec!["custom"]);
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        let (shell, console) = shell();
        let err = shell
            .run_batch(&["say one", "nope", "say two"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to execute 'nope'");
        assert_eq!(console.lines(), vec!["one"]);
    }

    #[test]
    fn test_batch_stops_at_exit_word() {
        let (shell, console) = shell();
        shell.run_batch(&["say a", "exit", "say b"]).unwrap();
        assert_eq!(console.lines(), vec!["a"]);
    }

    #[test]
    fn test_interactive_loop_continues_after_errors() {
        let (shell, console) = shell();
        let input = Cursor::new("say first\nmath div 1 0\nsay second\nquit\nsay never\n");
        let mut prompts = Vec::new();
        shell.run_interactive(input, &mut prompts).unwrap();

        assert_eq!(console.lines(), vec!["first", "second"]);
        assert_eq!(String::from_utf8(prompts).unwrap(), "$ $ $ $ ");
    }

    #[test]
    fn test_interactive_loop_ends_at_eof() {
        let (shell, console) = shell();
        let mut prompts = Vec::new();
        shell
            .run_interactive(Cursor::new("sum 1 2"), &mut prompts)
            .unwrap();
        assert_eq!(console.lines(), vec!["3"]);
        assert_eq!(String::from_utf8(prompts).unwrap(), "$ $ \n");
    }
}
