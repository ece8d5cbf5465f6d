// src/cli/builtins.rs

// The demo command set shipped with the `verbline` binary.

use crate::{
    arg_enum,
    core::{
        dispatcher::DispatchOptions,
        registry::{CommandSource, DefinitionError, Registry},
    },
    models::{CommandSpec, ParameterDescriptor, VerbSpec},
};
use anyhow::{Result, bail};
use colored::Colorize;
use std::sync::{Arc, Mutex, PoisonError};

/// Where command output goes. `Captured` collects lines so they can be inspected.
#[derive(Debug, Clone, Default)]
pub enum Console {
    /// Prints each line.
    #[default]
    Stdout,
    /// Keeps each line in memory.
    Captured(Arc<Mutex<Vec<String>>>),
}

impl Console {
    /// A new, empty capturing console.
    pub fn captured() -> Self {
        Self::Captured(Arc::new(Mutex::new(Vec::new())))
    }

    /// Writes one line of output.
    pub fn line(&self, text: impl Into<String>) {
        match self {
            Self::Stdout => println!("{}", text.into()),
            Self::Captured(lines) => lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(text.into()),
        }
    }

    /// Everything written so far; always empty for `Stdout`.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Stdout => Vec::new(),
            Self::Captured(lines) => lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

/// Largest output `repeat` will build, in bytes.
pub const MAX_REPEAT_BYTES: usize = 1 << 20;

arg_enum! {
    /// Colors accepted by `paint`.
    #[allow(missing_docs)]
    pub enum Color { Red, Green, Yellow, Blue, Magenta, Cyan }
}

impl From<Color> for colored::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => Self::Red,
            Color::Green => Self::Green,
            Color::Yellow => Self::Yellow,
            Color::Blue => Self::Blue,
            Color::Magenta => Self::Magenta,
            Color::Cyan => Self::Cyan,
        }
    }
}

// --- Core Commands ---

/// `echo`, `say`, `sum`, `repeat` and `paint`.
#[derive(Debug)]
pub struct CoreCommands {
    console: Console,
}

impl CommandSource for CoreCommands {
    fn name(&self) -> &str {
        "core"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let out = self.console.clone();
        let echo = CommandSpec::raw(["echo"], "text", move |text| {
            out.line(text);
            Ok(())
        })
        .description("Prints the rest of the line exactly as typed.");

        let out = self.console.clone();
        let say = CommandSpec::new(["say"], move |args| {
            out.line(args.get::<String>(0)?);
            Ok(())
        })
        .param(ParameterDescriptor::string("words").join_rest())
        .description("Prints its arguments joined by single spaces.");

        let out = self.console.clone();
        let sum = CommandSpec::new(["sum"], move |args| {
            let values = args.get_ref::<Vec<f64>>(0)?;
            out.line(values.iter().sum::<f64>().to_string());
            Ok(())
        })
        .param(ParameterDescriptor::new::<f64>("values").params())
        .description("Adds up any number of values.");

        let out = self.console.clone();
        let repeat = CommandSpec::new(["repeat"], move |args| {
            let count = usize::try_from(args.get::<u32>(0)?)?;
            let text = args.get_ref::<String>(1)?;
            let sep = args.get_ref::<String>(2)?;
            let size = text
                .len()
                .checked_add(sep.len())
                .and_then(|n| n.checked_mul(count));
            if size.is_none_or(|size| size > MAX_REPEAT_BYTES) {
                bail!("Output of repeat would exceed {} bytes.", MAX_REPEAT_BYTES);
            }
            let parts = vec![text.as_str(); count];
            out.line(parts.join(sep.as_str()));
            Ok(())
        })
        .arg::<u32>("count")
        .arg::<String>("text")
        .param(ParameterDescriptor::string("sep").optional(" ".to_string()))
        .description("Repeats a text, separated by `sep`.");

        let out = self.console.clone();
        let paint = CommandSpec::new(["paint"], move |args| {
            let color = args.get::<Color>(0)?;
            let text = args.get_ref::<String>(1)?;
            out.line(text.as_str().color(color).to_string());
            Ok(())
        })
        .param(ParameterDescriptor::enumeration::<Color>("color"))
        .param(ParameterDescriptor::string("text").join_rest())
        .description("Prints a text in color.");

        vec![echo, say, sum, repeat, paint]
    }
}

// --- Math Verb ---

/// `add`, `mul` and `div` on two numbers.
#[derive(Debug)]
pub struct MathCommands {
    console: Console,
}

impl MathCommands {
    fn binary<F>(&self, name: &str, description: &str, op: F) -> CommandSpec
    where
        F: Fn(f64, f64) -> Result<f64> + Send + Sync + 'static,
    {
        let out = self.console.clone();
        CommandSpec::new([name], move |args| {
            let value = op(args.get::<f64>(0)?, args.get::<f64>(1)?)?;
            out.line(value.to_string());
            Ok(())
        })
        .arg::<f64>("a")
        .arg::<f64>("b")
        .description(description)
    }
}

impl CommandSource for MathCommands {
    fn name(&self) -> &str {
        "math"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            self.binary("add", "Adds two numbers.", |a, b| Ok(a + b)),
            self.binary("mul", "Multiplies two numbers.", |a, b| Ok(a * b)),
            self.binary("div", "Divides a by b.", |a, b| {
                if b == 0.0 {
                    bail!("Division by zero.");
                }
                Ok(a / b)
            }),
        ]
    }
}

// --- Remote Verb ---

type RemoteTable = Arc<Mutex<Vec<(String, String)>>>;

/// An in-memory list of named URLs, shared by the `remote` subcommands.
#[derive(Debug)]
pub struct RemoteCommands {
    console: Console,
    remotes: RemoteTable,
}

impl CommandSource for RemoteCommands {
    fn name(&self) -> &str {
        "remote"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let remotes = self.remotes.clone();
        let add = CommandSpec::new(["add"], move |args| {
            let name = args.get::<String>(0)?;
            let url = args.get::<String>(1)?;
            let mut table = remotes.lock().unwrap_or_else(PoisonError::into_inner);
            if table.iter().any(|(existing, _)| *existing == name) {
                bail!("Remote '{}' already exists.", name);
            }
            log::debug!("Adding remote '{}' -> {}", name, url);
            table.push((name, url));
            Ok(())
        })
        .arg::<String>("name")
        .arg::<String>("url")
        .description("Adds a named remote.");

        let (out, remotes) = (self.console.clone(), self.remotes.clone());
        let list = CommandSpec::new(["list", "ls"], move |_| {
            let table = remotes.lock().unwrap_or_else(PoisonError::into_inner);
            for (name, url) in table.iter() {
                out.line(format!("{}\t{}", name, url));
            }
            Ok(())
        })
        .description("Lists remotes in the order they were added.");

        let remotes = self.remotes.clone();
        let remove = CommandSpec::new(["remove", "rm"], move |args| {
            let name = args.get_ref::<String>(0)?;
            let mut table = remotes.lock().unwrap_or_else(PoisonError::into_inner);
            let before = table.len();
            table.retain(|(existing, _)| existing != name);
            if table.len() == before {
                bail!("No such remote: '{}'.", name);
            }
            Ok(())
        })
        .arg::<String>("name")
        .description("Removes a remote.");

        vec![add, list, remove]
    }
}

/// Builds the registry used by the binary: the core commands plus the
/// `math` and `remote` verbs.
pub fn build_registry(
    options: DispatchOptions,
    console: Console,
) -> Result<Registry, DefinitionError> {
    let mut registry = Registry::with_options(options);
    registry.load(&CoreCommands {
        console: console.clone(),
    })?;

    registry
        .add_verb_with(VerbSpec::new(["math"]).description("Arithmetic on two numbers."))?
        .load(&MathCommands {
            console: console.clone(),
        })?;

    registry
        .add_verb_with(VerbSpec::new(["remote"]).description("Manages a list of named URLs."))?
        .load(&RemoteCommands {
            console,
            remotes: RemoteTable::default(),
        })?;

    Ok(registry)
}

// MARK: --- UNIT TESTS ---
