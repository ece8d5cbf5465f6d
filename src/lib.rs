//! # verbline
//!
//! Turns a line of text into a call of a registered, typed command handler.
//!
//! Commands are registered once into a [`Registry`], which compiles each
//! signature into a converter. [`Registry::execute`] then splits off the
//! command name, tokenizes the rest with the [`Lexer`] and hands the typed
//! arguments to the handler. Verbs nest registries for git-style subcommands.
//!
//! ```rust
//! use verbline::{CommandSpec, ParameterDescriptor, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         CommandSpec::new(["sum"], |args| {
//!             let values = args.get_ref::<Vec<f64>>(0)?;
//!             println!("{}", values.iter().sum::<f64>());
//!             Ok(())
//!         })
//!         .param(ParameterDescriptor::new::<f64>("values").params()),
//!     )
//!     .unwrap();
//!
//! registry.execute("sum 1 2 3.5").unwrap();
//! ```

/// The `verbline` binary's surface: arguments, demo commands, help and the shell loop.
pub mod cli;
/// Shell configuration loaded from `config.toml`.
pub mod config;
/// Shared constants.
pub mod constants;
/// Lexer, converter compiler, registry and dispatcher.
pub mod core;
/// Parameter metadata, command records and handler arguments.
pub mod models;

pub use crate::core::{
    dispatcher::{DispatchError, DispatchOptions, EmptyLinePolicy},
    lexer::{Lexer, ParseError, ParseErrorKind, tokenize},
    registry::{CommandDescriptor, CommandSource, DefinitionError, Registry, SignatureError},
};
pub use crate::models::{
    ArgAccessError, ArgEnum, Args, CommandSpec, DefaultValue, Modifier, ParameterDescriptor,
    TypeTag, UnknownMember, VerbSpec,
};
