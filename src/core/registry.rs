// src/core/registry.rs

use crate::{
    constants::VERB_PARAMETER,
    core::{
        converter::{self, Converter},
        dispatcher::DispatchOptions,
    },
    models::{CommandSpec, Modifier, ParameterDescriptor, TypeTag, VerbSpec},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashMap, fmt};
use thiserror::Error;

lazy_static! {
    // A command name is one token: no whitespace, and it cannot open a quote.
    static ref COMMAND_NAME_RE: Regex =
        Regex::new(r#"^[^\s'"]\S*$"#).expect("command name pattern is valid");
}

/// Why a signature was rejected at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SignatureError {
    #[error("a command needs at least one name")]
    NoNames,
    /// Empty, containing whitespace, or starting with a quote.
    #[error("'{0}' is not a valid command name")]
    InvalidName(String),
    #[error("a raw command takes exactly one required string parameter")]
    RawSignature,
    #[error("only one params or join-rest parameter is allowed")]
    MultipleRest,
    #[error("parameter #{index} ({modifier}) must be the last parameter")]
    RestNotLast { index: usize, modifier: Modifier },
    #[error("optional parameter #{index} has no default value")]
    MissingDefault { index: usize },
    #[error("required parameter #{index} cannot carry a default value")]
    UnexpectedDefault { index: usize },
    #[error("required parameter #{index} follows an optional parameter")]
    RequiredAfterOptional { index: usize },
    /// The default is not the element type (or `Vec` of it for `Params`).
    #[error("default for parameter #{index} is a {found}, expected {expected}")]
    DefaultTypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("parameter #{index} is a nested sequence")]
    NestedSequence { index: usize },
    #[error("sequence parameter #{index} must use the params modifier")]
    SequenceWithoutParams { index: usize },
    #[error("params parameter #{index} must have a sequence type")]
    ParamsWithoutSequence { index: usize },
}

/// Load-time registration failures. The registry is left untouched when one is returned.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The signature breaks one of the rules in [`SignatureError`].
    #[error("Invalid definition for command '{command}': {reason}")]
    InvalidSignature {
        /// Primary name of the rejected command.
        command: String,
        #[source]
        reason: SignatureError,
    },
    /// The name is taken and the record did not ask to overwrite.
    #[error("Command name '{name}' is already registered by '{existing_owner}'.")]
    DuplicateName {
        /// The colliding name.
        name: String,
        /// Owner label of the command that holds the name.
        existing_owner: String,
    },
}

/// Supplies command records to [`Registry::load`].
pub trait CommandSource {
    /// Recorded as the owner of every command that does not name its own.
    fn name(&self) -> &str;
    /// The records to register, in order.
    fn commands(&self) -> Vec<CommandSpec>;
}

pub(crate) enum Invoker {
    Compiled(Converter),
    /// Forwards the remainder of the line to a nested registry.
    Verb(Registry),
}

/// A registered command: immutable metadata plus its compiled converter
/// (or the child registry of a verb).
pub struct CommandDescriptor {
    names: Vec<String>,
    parameters: Vec<ParameterDescriptor>,
    raw: bool,
    owner: Option<String>,
    description: Option<String>,
    pub(crate) invoker: Invoker,
}

impl CommandDescriptor {
    /// Every name the command answers to, primary name first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The first name; used in help and in duplicate-name reports.
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Every name but the primary one.
    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or_default()
    }

    /// The signature, in argument order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Raw commands (and verbs) receive the remainder of the line unparsed.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// True when the descriptor forwards to a child registry.
    pub fn is_verb(&self) -> bool {
        matches!(self.invoker, Invoker::Verb(_))
    }

    /// The nested registry, if this descriptor is a verb.
    pub fn verb(&self) -> Option<&Registry> {
        match &self.invoker {
            Invoker::Verb(child) => Some(child),
            Invoker::Compiled(_) => None,
        }
    }

    /// The source label given at registration.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// One-line description for help listings.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn owner_label(&self) -> String {
        self.owner
            .clone()
            .unwrap_or_else(|| self.primary_name().to_string())
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("names", &self.names)
            .field("parameters", &self.parameters)
            .field("raw", &self.raw)
            .field("owner", &self.owner)
            .field("verb", &self.verb())
            .finish()
    }
}

/// A table of named commands. Built during a single-threaded load phase,
/// then only read; `execute` takes `&self` so a loaded registry can be
/// shared across threads.
#[derive(Default)]
pub struct Registry {
    pub(crate) options: DispatchOptions,
    descriptors: Vec<CommandDescriptor>,
    lookup: HashMap<String, usize>,
}

impl Registry {
    /// An empty registry with default dispatch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with the given dispatch options.
    pub fn with_options(options: DispatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options `execute` applies.
    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    /// Validates, compiles and stores one command.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::InvalidSignature` for a malformed signature and
    /// `DefinitionError::DuplicateName` when a name is taken and the record does
    /// not ask to overwrite.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), DefinitionError> {
        let CommandSpec {
            names,
            parameters,
            raw,
            owner,
            description,
            overwrite,
            handler,
        } = spec;
        let names = dedupe(names);

        validate_signature(&names, &parameters, raw).map_err(|reason| {
            DefinitionError::InvalidSignature {
                command: names.first().cloned().unwrap_or_default(),
                reason,
            }
        })?;
        self.check_collisions(&names, overwrite)?;

        let invoker = Invoker::Compiled(converter::compile(&parameters, handler));
        log::debug!(
            "Registered command {:?} with {} parameter(s){}",
            names,
            parameters.len(),
            if raw { " (raw)" } else { "" }
        );
        self.insert(CommandDescriptor {
            names,
            parameters,
            raw,
            owner,
            description,
            invoker,
        });
        Ok(())
    }

    /// Creates a nested registry reachable under `name`.
    pub fn add_verb(&mut self, name: &str) -> Result<&mut Self, DefinitionError> {
        self.add_verb_with(VerbSpec::new([name]))
    }

    /// Like [`add_verb`](Self::add_verb), with aliases, owner and description.
    /// The child inherits this registry's dispatch options.
    pub fn add_verb_with(&mut self, spec: VerbSpec) -> Result<&mut Self, DefinitionError> {
        let VerbSpec {
            names,
            owner,
            description,
            overwrite,
        } = spec;
        let names = dedupe(names);
        let parameters = vec![ParameterDescriptor::string(VERB_PARAMETER)];

        validate_signature(&names, &parameters, true).map_err(|reason| {
            DefinitionError::InvalidSignature {
                command: names.first().cloned().unwrap_or_default(),
                reason,
            }
        })?;
        self.check_collisions(&names, overwrite)?;

        log::debug!("Registered verb {:?}", names);
        let child = Self::with_options(self.options);
        let index = self.insert(CommandDescriptor {
            names,
            parameters,
            raw: true,
            owner,
            description,
            invoker: Invoker::Verb(child),
        });
        match self.descriptors.get_mut(index).map(|d| &mut d.invoker) {
            Some(Invoker::Verb(child)) => Ok(child),
            _ => unreachable!("verb descriptor was just inserted"),
        }
    }

    /// Registers every command a source provides, stopping at the first error.
    /// Returns how many commands were registered.
    pub fn load(&mut self, source: &dyn CommandSource) -> Result<usize, DefinitionError> {
        let mut count = 0;
        for mut spec in source.commands() {
            if spec.owner.is_none() {
                spec.owner = Some(source.name().to_string());
            }
            self.register(spec)?;
            count += 1;
        }
        log::debug!("Loaded {} command(s) from '{}'", count, source.name());
        Ok(count)
    }

    /// Finds the command registered under `name` (primary name or alias).
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.lookup
            .get(name)
            .and_then(|&index| self.descriptors.get(index))
    }

    /// True when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// The child registry of the verb registered under `name`.
    pub fn verb(&self, name: &str) -> Option<&Self> {
        self.lookup(name).and_then(CommandDescriptor::verb)
    }

    /// Mutable access to a verb's child registry, for registering into it later.
    pub fn verb_mut(&mut self, name: &str) -> Option<&mut Self> {
        let index = *self.lookup.get(name)?;
        match &mut self.descriptors.get_mut(index)?.invoker {
            Invoker::Verb(child) => Some(child),
            Invoker::Compiled(_) => None,
        }
    }

    /// Registered commands and verbs, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter()
    }

    /// Number of distinct commands (aliases are not counted).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Checks every name before anything is inserted, so a failed
    /// registration never leaves a partial entry behind.
    fn check_collisions(&self, names: &[String], overwrite: bool) -> Result<(), DefinitionError> {
        if overwrite {
            return Ok(());
        }
        match names.iter().find_map(|name| Some((name, self.lookup(name)?))) {
            Some((name, existing)) => Err(DefinitionError::DuplicateName {
                name: name.clone(),
                existing_owner: existing.owner_label(),
            }),
            None => Ok(()),
        }
    }

    /// Stores a descriptor and returns its index. Descriptors that lose
    /// their last name to it are dropped.
    fn insert(&mut self, descriptor: CommandDescriptor) -> usize {
        let mut index = self.descriptors.len();
        let mut replaced = Vec::new();
        for name in &descriptor.names {
            if let Some(previous) = self.lookup.insert(name.clone(), index) {
                log::debug!("Command name '{}' overwritten", name);
                replaced.push(previous);
            }
        }
        self.descriptors.push(descriptor);

        replaced.sort_unstable();
        replaced.dedup();
        for previous in replaced.into_iter().rev() {
            if !self.is_live(previous) {
                self.descriptors.remove(previous);
                for slot in self.lookup.values_mut() {
                    if *slot > previous {
                        *slot -= 1;
                    }
                }
                index -= 1;
            }
        }
        index
    }

    fn is_live(&self, index: usize) -> bool {
        self.descriptors.get(index).is_some_and(|descriptor| {
            descriptor
                .names
                .iter()
                .any(|name| self.lookup.get(name) == Some(&index))
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("commands", &self.commands().collect::<Vec<_>>())
            .finish()
    }
}

fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

/// Checks a signature against the rules every compiled converter relies on.
pub fn validate_signature(
    names: &[String],
    parameters: &[ParameterDescriptor],
    raw: bool,
) -> Result<(), SignatureError> {
    if names.is_empty() {
        return Err(SignatureError::NoNames);
    }
    if let Some(bad) = names.iter().find(|name| !COMMAND_NAME_RE.is_match(name)) {
        return Err(SignatureError::InvalidName(bad.clone()));
    }

    if raw {
        return match parameters {
            [only]
                if only.type_tag() == &TypeTag::String
                    && only.modifier() == Modifier::Required
                    && only.default_value().is_none() =>
            {
                Ok(())
            }
            _ => Err(SignatureError::RawSignature),
        };
    }

    let last = parameters.len().saturating_sub(1);
    let mut seen_rest = false;
    let mut seen_optional = false;

    for (index, param) in parameters.iter().enumerate() {
        let modifier = param.modifier();

        if modifier.is_rest() {
            if seen_rest {
                return Err(SignatureError::MultipleRest);
            }
            seen_rest = true;
            if index != last {
                return Err(SignatureError::RestNotLast { index, modifier });
            }
        }

        match (modifier, param.default_value()) {
            (Modifier::Optional, None) => return Err(SignatureError::MissingDefault { index }),
            (Modifier::Required, Some(_)) => {
                return Err(SignatureError::UnexpectedDefault { index });
            }
            (Modifier::Required, None) if seen_optional => {
                return Err(SignatureError::RequiredAfterOptional { index });
            }
            _ => {}
        }
        seen_optional |= modifier == Modifier::Optional;

        match param.type_tag() {
            TypeTag::SequenceOf(inner) if inner.is_sequence() => {
                return Err(SignatureError::NestedSequence { index });
            }
            TypeTag::SequenceOf(_) if modifier != Modifier::Params => {
                return Err(SignatureError::SequenceWithoutParams { index });
            }
            tag if modifier == Modifier::Params && !tag.is_sequence() => {
                return Err(SignatureError::ParamsWithoutSequence { index });
            }
            _ => {}
        }

        if let Some(default) = param.default_value() {
            let (expected_id, expected) = param.conversion().expected_default(modifier);
            if default.type_id() != expected_id {
                return Err(SignatureError::DefaultTypeMismatch {
                    index,
                    expected,
                    found: default.type_name(),
                });
            }
        }
    }
    Ok(())
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(names: &[&str]) -> CommandSpec {
        CommandSpec::new(names.iter().copied(), |_| Ok(()))
    }

    fn reason(result: Result<(), DefinitionError>) -> SignatureError {
        match result {
            Err(DefinitionError::InvalidSignature { reason, .. }) => reason,
            other => panic!("expected an invalid signature, got {other:?}"),
        }
    }

    struct Source;

    impl CommandSource for Source {
        fn name(&self) -> &str {
            "tools"
        }

        fn commands(&self) -> Vec<CommandSpec> {
            vec![
                noop(&["build", "b"]),
                noop(&["clean"]).owner("janitor"),
            ]
        }
    }

    // --- Registration ---

    #[test]
    fn test_register_and_lookup_with_aliases() {
        let mut registry = Registry::new();
        registry
            .register(noop(&["list", "ls"]).description("Lists things"))
            .unwrap();
        let by_alias = registry.lookup("ls").unwrap();
        assert_eq!(by_alias.primary_name(), "list");
        assert_eq!(by_alias.aliases(), ["ls".to_string()]);
        assert_eq!(by_alias.description(), Some("Lists things"));
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register(noop(&["go"]).owner("first")).unwrap();
        let err = registry.register(noop(&["go"])).unwrap_err();
        match err {
            DefinitionError::DuplicateName {
                name,
                existing_owner,
            } => {
                assert_eq!(name, "go");
                assert_eq!(existing_owner, "first");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_owner_defaults_to_primary_name() {
        let mut registry = Registry::new();
        registry.register(noop(&["status", "st"])).unwrap();
        let err = registry.register(noop(&["st"])).unwrap_err();
        assert!(err.to_string().contains("registered by 'status'"));
    }

    #[test]
    fn test_failed_registration_leaves_no_partial_entry() {
        let mut registry = Registry::new();
        registry.register(noop(&["taken"])).unwrap();
        assert!(registry.register(noop(&["fresh", "taken"])).is_err());
        assert!(!registry.contains("fresh"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_overwrite_last_registration_wins() {
        let mut registry = Registry::new();
        registry.register(noop(&["run"]).description("old")).unwrap();
        registry
            .register(noop(&["run"]).description("new").overwrite())
            .unwrap();
        assert_eq!(registry.lookup("run").unwrap().description(), Some("new"));
        let listed: Vec<_> = registry.commands().map(|c| c.description()).collect();
        assert_eq!(listed, vec![Some("new")]);
    }

    #[test]
    fn test_fully_overwritten_descriptor_is_dropped() {
        let mut registry = Registry::new();
        registry.register(noop(&["a"])).unwrap();
        registry.register(noop(&["run", "r"])).unwrap();
        registry.register(noop(&["z"])).unwrap();
        for round in 0..5 {
            registry
                .register(noop(&["run", "r"]).description(format!("v{round}")).overwrite())
                .unwrap();
        }
        assert_eq!(registry.descriptors.len(), 3);
        let names: Vec<_> = registry.commands().map(|c| c.primary_name()).collect();
        assert_eq!(names, vec!["a", "z", "run"]);
        assert_eq!(registry.lookup("r").unwrap().description(), Some("v4"));
        assert_eq!(registry.lookup("a").unwrap().primary_name(), "a");
        assert_eq!(registry.lookup("z").unwrap().primary_name(), "z");
    }

    #[test]
    fn test_overwritten_verb_returns_new_child() {
        let mut registry = Registry::new();
        registry.register(noop(&["first"])).unwrap();
        registry.add_verb("db").unwrap().register(noop(&["old"])).unwrap();
        let child = registry
            .add_verb_with(VerbSpec::new(["db"]).overwrite())
            .unwrap();
        child.register(noop(&["new"])).unwrap();
        let db = registry.verb("db").unwrap();
        assert!(db.contains("new"));
        assert!(!db.contains("old"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_partially_overwritten_command_stays_listed() {
        let mut registry = Registry::new();
        registry.register(noop(&["remove", "rm"])).unwrap();
        registry.register(noop(&["rm"]).overwrite()).unwrap();
        assert_eq!(registry.lookup("remove").unwrap().primary_name(), "remove");
        assert_eq!(registry.lookup("rm").unwrap().primary_name(), "rm");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_load_sets_owner_from_source() {
        let mut registry = Registry::new();
        assert_eq!(registry.load(&Source).unwrap(), 2);
        assert_eq!(registry.lookup("b").unwrap().owner(), Some("tools"));
        assert_eq!(registry.lookup("clean").unwrap().owner(), Some("janitor"));
    }

    // --- Signature Validation ---

    #[test]
    fn test_invalid_names() {
        let mut registry = Registry::new();
        let empty: [&str; 0] = [];
        assert_eq!(reason(registry.register(noop(&empty))), SignatureError::NoNames);
        assert_eq!(
            reason(registry.register(noop(&["two words"]))),
            SignatureError::InvalidName("two words".to_string())
        );
        assert_eq!(
            reason(registry.register(noop(&["'quoted"]))),
            SignatureError::InvalidName("'quoted".to_string())
        );
        assert_eq!(
            reason(registry.register(noop(&[""]))),
            SignatureError::InvalidName(String::new())
        );
    }

    #[test]
    fn test_rest_parameter_must_be_last() {
        let mut registry = Registry::new();
        let spec = noop(&["c"])
            .param(ParameterDescriptor::new::<i32>("xs").params())
            .arg::<i32>("after");
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::RestNotLast {
                index: 0,
                modifier: Modifier::Params
            }
        );
    }

    #[test]
    fn test_only_one_rest_parameter() {
        let mut registry = Registry::new();
        let spec = noop(&["c"])
            .param(ParameterDescriptor::string("a").join_rest())
            .param(ParameterDescriptor::string("b").join_rest());
        assert_eq!(reason(registry.register(spec)), SignatureError::MultipleRest);
    }

    #[test]
    fn test_optional_requires_default() {
        let mut registry = Registry::new();
        let spec = noop(&["c"])
            .param(ParameterDescriptor::new::<i32>("n").with_modifier(Modifier::Optional));
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::MissingDefault { index: 0 }
        );
    }

    #[test]
    fn test_required_cannot_follow_optional() {
        let mut registry = Registry::new();
        let spec = noop(&["c"])
            .param(ParameterDescriptor::new::<i32>("a").optional(1))
            .arg::<i32>("b");
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::RequiredAfterOptional { index: 1 }
        );
    }

    #[test]
    fn test_default_type_must_match() {
        let mut registry = Registry::new();
        let spec = noop(&["c"]).param(ParameterDescriptor::new::<i32>("a").optional(1_i64));
        assert!(matches!(
            reason(registry.register(spec)),
            SignatureError::DefaultTypeMismatch { index: 0, .. }
        ));

        let spec = noop(&["d"]).param(ParameterDescriptor::new::<i32>("xs").params().with_default(3));
        assert!(matches!(
            reason(registry.register(spec)),
            SignatureError::DefaultTypeMismatch { index: 0, .. }
        ));
    }

    #[test]
    fn test_nested_sequence_is_rejected() {
        let mut registry = Registry::new();
        let spec = noop(&["c"]).param(ParameterDescriptor::new::<i32>("grid").params().params());
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::NestedSequence { index: 0 }
        );
    }

    #[test]
    fn test_params_modifier_requires_sequence_type() {
        let mut registry = Registry::new();
        let spec = noop(&["c"])
            .param(ParameterDescriptor::new::<i32>("xs").with_modifier(Modifier::Params));
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::ParamsWithoutSequence { index: 0 }
        );
        assert!(!registry.contains("c"));
    }

    #[test]
    fn test_sequence_requires_params_modifier() {
        let mut registry = Registry::new();
        let spec = noop(&["c"]).param(
            ParameterDescriptor::new::<i32>("xs")
                .params()
                .with_modifier(Modifier::Required),
        );
        assert_eq!(
            reason(registry.register(spec)),
            SignatureError::SequenceWithoutParams { index: 0 }
        );
    }

    #[test]
    fn test_raw_command_needs_single_string_parameter() {
        let mut registry = Registry::new();
        let spec = noop(&["c"]).arg::<i32>("n").with_raw(true);
        assert_eq!(reason(registry.register(spec)), SignatureError::RawSignature);

        let spec = noop(&["d"]).arg::<String>("a").arg::<String>("b").with_raw(true);
        assert_eq!(reason(registry.register(spec)), SignatureError::RawSignature);

        registry
            .register(CommandSpec::raw(["echo"], "text", |_| Ok(())))
            .unwrap();
        assert!(registry.lookup("echo").unwrap().is_raw());
    }

    // --- Verbs ---

    #[test]
    fn test_add_verb_creates_child_registry() {
        let mut registry = Registry::new();
        let child = registry.add_verb("remote").unwrap();
        child.register(noop(&["add"])).unwrap();

        let descriptor = registry.lookup("remote").unwrap();
        assert!(descriptor.is_verb());
        assert!(descriptor.is_raw());
        assert!(registry.verb("remote").unwrap().contains("add"));
        assert!(registry.verb_mut("remote").is_some());
    }

    #[test]
    fn test_verb_name_collides_with_command() {
        let mut registry = Registry::new();
        registry.register(noop(&["remote"])).unwrap();
        assert!(matches!(
            registry.add_verb("remote"),
            Err(DefinitionError::DuplicateName { .. })
        ));
        assert!(registry.verb("remote").is_none());
        assert!(registry.verb_mut("remote").is_none());
    }

    #[test]
    fn test_child_inherits_options() {
        use crate::core::dispatcher::EmptyLinePolicy;
        let mut registry = Registry::with_options(DispatchOptions {
            empty_line: EmptyLinePolicy::Error,
        });
        let child = registry.add_verb_with(VerbSpec::new(["db"])).unwrap();
        assert_eq!(child.options().empty_line, EmptyLinePolicy::Error);
    }
}
