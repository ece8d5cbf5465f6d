// src/models.rs

use crate::core::converter::{self, ElementConversion};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error used for conversion causes coming from arbitrary `FromStr` impls.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A converted argument, type-erased until the handler asks for it by type.
pub type Value = Box<dyn Any + Send>;

/// The handler signature every compiled command ends up calling.
pub type HandlerFn = Arc<dyn Fn(&Args) -> anyhow::Result<()> + Send + Sync>;

// --- PARAMETER METADATA ---

/// Describes the type of a parameter, as exposed to help renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// Passed through without conversion.
    String,
    /// Any other `FromStr` type, identified by its short type name.
    Primitive(&'static str),
    /// A closed set of members matched case-insensitively by name.
    Enum {
        /// The enum's type name.
        name: &'static str,
        /// Member names, in declaration order.
        members: Vec<&'static str>,
    },
    /// The element type of a `Params` parameter.
    SequenceOf(Box<Self>),
}

impl TypeTag {
    /// True for `SequenceOf`.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::SequenceOf(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Primitive(name) => write!(f, "{}", name),
            Self::Enum { members, .. } => write!(f, "{}", members.join("|")),
            Self::SequenceOf(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// How a parameter claims arguments from the token array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Takes exactly one argument.
    Required,
    /// Falls back to the parameter's default value when no argument is left.
    Optional,
    /// Converts every remaining argument independently into a sequence.
    Params,
    /// Joins every remaining argument with a single space, then converts once.
    JoinRest,
}

impl Modifier {
    /// `Params` and `JoinRest` both consume the rest of the arguments.
    pub fn is_rest(self) -> bool {
        matches!(self, Self::Params | Self::JoinRest)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Params => "params",
            Self::JoinRest => "join-rest",
        };
        write!(f, "{}", label)
    }
}

/// A typed default value, cloned into every invocation that needs it.
#[derive(Clone)]
pub struct DefaultValue {
    make: Arc<dyn Fn() -> Value + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
    repr: String,
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValue")
            .field("type_name", &self.type_name)
            .field("repr", &self.repr)
            .finish_non_exhaustive()
    }
}

impl DefaultValue {
    fn new<D>(value: D) -> Self
    where
        D: Clone + fmt::Debug + Send + Sync + 'static,
    {
        let repr = format!("{:?}", value);
        Self {
            make: Arc::new(move || Box::new(value.clone()) as Value),
            type_id: TypeId::of::<D>(),
            type_name: type_name::<D>(),
            repr,
        }
    }

    pub(crate) fn make(&self) -> Value {
        (self.make)()
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The `Debug` rendering of the default, for usage text.
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

/// Declares one parameter of a command signature together with the
/// conversion that turns an argument string into its typed value.
///
/// ```rust
/// use verbline::ParameterDescriptor;
///
/// let count = ParameterDescriptor::new::<u32>("count");
/// let sep = ParameterDescriptor::new::<String>("sep").optional(" ".to_string());
/// let values = ParameterDescriptor::new::<f64>("values").params();
/// # let _ = (count, sep, values);
/// ```
#[derive(Clone)]
pub struct ParameterDescriptor {
    name: String,
    type_tag: TypeTag,
    modifier: Modifier,
    default: Option<DefaultValue>,
    conversion: ElementConversion,
}

impl ParameterDescriptor {
    /// A required parameter converted through `T`'s `FromStr` implementation.
    /// `String` parameters are passed through unchanged.
    pub fn new<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Send + 'static,
        T::Err: Into<BoxError>,
    {
        let (type_tag, conversion) = if TypeId::of::<T>() == TypeId::of::<String>() {
            (TypeTag::String, converter::passthrough())
        } else {
            (
                TypeTag::Primitive(short_type_name::<T>()),
                converter::from_str_conversion::<T>(),
            )
        };
        Self {
            name: name.into(),
            type_tag,
            modifier: Modifier::Required,
            default: None,
            conversion,
        }
    }

    /// Shorthand for `ParameterDescriptor::new::<String>(name)`.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new::<String>(name)
    }

    /// A required parameter matched by name against the members of `E`.
    pub fn enumeration<E: ArgEnum>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: TypeTag::Enum {
                name: E::NAME,
                members: E::MEMBERS.iter().map(|(member, _)| *member).collect(),
            },
            modifier: Modifier::Required,
            default: None,
            conversion: converter::enum_conversion::<E>(),
        }
    }

    /// Marks the parameter optional, falling back to `default`.
    pub fn optional<D>(self, default: D) -> Self
    where
        D: Clone + fmt::Debug + Send + Sync + 'static,
    {
        self.with_modifier(Modifier::Optional).with_default(default)
    }

    /// Turns the parameter into a variadic sequence of its current type.
    pub fn params(mut self) -> Self {
        self.type_tag = TypeTag::SequenceOf(Box::new(self.type_tag));
        self.modifier = Modifier::Params;
        self
    }

    /// Joins every remaining argument before converting them as one value.
    pub fn join_rest(self) -> Self {
        self.with_modifier(Modifier::JoinRest)
    }

    /// Sets the modifier without touching the type tag or the default.
    /// Meant for handler sources that carry modifiers as plain metadata;
    /// the signature is checked again when the command is registered, so
    /// `Params` still needs a sequence tag from [`params`](Self::params).
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Attaches a default without changing the modifier. For `Params`
    /// parameters the default must be a `Vec` of the element type.
    pub fn with_default<D>(mut self, default: D) -> Self
    where
        D: Clone + fmt::Debug + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::new(default));
        self
    }

    /// The parameter name shown in usage text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    /// How the parameter claims arguments.
    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    /// The fallback used when no argument is left, if any.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub(crate) fn conversion(&self) -> &ElementConversion {
        &self.conversion
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("modifier", &self.modifier)
            .field("default", &self.default.as_ref().map(DefaultValue::repr))
            .finish()
    }
}

/// Strips the module path from `type_name`, keeping generic types intact.
fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

// --- ENUM CONTRACT ---

/// A closed set of named members usable as a parameter type.
/// Usually implemented through [`arg_enum!`](crate::arg_enum).
pub trait ArgEnum: Sized + Clone + Send + Sync + 'static {
    /// Type name shown in error messages.
    const NAME: &'static str;
    /// Every member with the name it is matched by.
    const MEMBERS: &'static [(&'static str, Self)];
}

/// The argument matched none of the enum's members.
#[derive(Error, Debug)]
#[error("'{value}' is not a valid {name} (expected one of: {})", .expected.join(", "))]
pub struct UnknownMember {
    /// The enum's type name.
    pub name: &'static str,
    /// The argument as typed.
    pub value: String,
    /// The member names that would have matched.
    pub expected: Vec<&'static str>,
}

/// Declares a fieldless enum and implements [`ArgEnum`] for it.
/// The enum derives `Debug`, `Clone`, `Copy`, `PartialEq` and `Eq`.
///
/// ```rust
/// verbline::arg_enum! {
///     pub enum Color { Red, Green, Blue }
/// }
/// ```
#[macro_export]
macro_rules! arg_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::models::ArgEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MEMBERS: &'static [(&'static str, Self)] =
                &[$((stringify!($variant), $name::$variant)),+];
        }
    };
}

// --- HANDLER SOURCE RECORDS ---

/// One record from a handler source: everything `Registry::register` needs
/// to validate, compile and store a command.
pub struct CommandSpec {
    pub(crate) names: Vec<String>,
    pub(crate) parameters: Vec<ParameterDescriptor>,
    pub(crate) raw: bool,
    pub(crate) owner: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) overwrite: bool,
    pub(crate) handler: HandlerFn,
}

impl CommandSpec {
    /// A command reachable under `names`; the first name is the primary one.
    pub fn new<I, S, F>(names: I, handler: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            parameters: Vec::new(),
            raw: false,
            owner: None,
            description: None,
            overwrite: false,
            handler: Arc::new(handler),
        }
    }

    /// A raw command: the handler receives the unparsed remainder of the line.
    pub fn raw<I, S, F>(names: I, parameter: impl Into<String>, handler: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(names, move |args: &Args| handler(args.get_ref::<String>(0)?))
            .param(ParameterDescriptor::string(parameter))
            .with_raw(true)
    }

    /// Appends a parameter to the signature.
    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Shorthand for a required `FromStr` parameter.
    pub fn arg<T>(self, name: impl Into<String>) -> Self
    where
        T: FromStr + Send + 'static,
        T::Err: Into<BoxError>,
    {
        self.param(ParameterDescriptor::new::<T>(name))
    }

    /// Sets the raw flag directly, for metadata-driven sources.
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Labels the command with the source that provided it.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// One-line description for help listings.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Lets this registration replace existing commands with the same names.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("names", &self.names)
            .field("parameters", &self.parameters)
            .field("raw", &self.raw)
            .field("owner", &self.owner)
            .field("overwrite", &self.overwrite)
            .finish_non_exhaustive()
    }
}

/// Record describing a verb: a named entry point to a nested registry.
#[derive(Debug, Clone)]
pub struct VerbSpec {
    pub(crate) names: Vec<String>,
    pub(crate) owner: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) overwrite: bool,
}

impl VerbSpec {
    /// A verb reachable under `names`; the first name is the primary one.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            owner: None,
            description: None,
            overwrite: false,
        }
    }

    /// Labels the verb with the source that provided it.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// One-line description for help listings.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Lets this verb replace existing commands with the same names.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

// --- HANDLER ARGUMENTS ---

/// A handler asked for an argument that is not there, or not of that type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgAccessError {
    /// `index` is past the last argument.
    #[error("argument #{index} requested but the command only has {len}")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Number of arguments the command has.
        len: usize,
    },
    /// The argument holds a different type.
    #[error("argument #{index} is not a {expected}")]
    TypeMismatch {
        /// Requested position.
        index: usize,
        /// The type that was asked for.
        expected: &'static str,
    },
}

/// The converted arguments of one invocation, in parameter order.
/// `Params` parameters hold a `Vec` of their element type.
pub struct Args {
    command: String,
    values: Vec<Value>,
}

impl Args {
    pub(crate) fn new(command: &str, values: Vec<Value>) -> Self {
        Self {
            command: command.to_string(),
            values,
        }
    }

    /// The name the command was invoked under (may be an alias).
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Number of converted arguments, one per parameter.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the command takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrows argument `index` as a `T`.
    pub fn get_ref<T: 'static>(&self, index: usize) -> Result<&T, ArgAccessError> {
        let value = self.values.get(index).ok_or(ArgAccessError::OutOfRange {
            index,
            len: self.values.len(),
        })?;
        value
            .downcast_ref::<T>()
            .ok_or(ArgAccessError::TypeMismatch {
                index,
                expected: type_name::<T>(),
            })
    }

    /// Clones argument `index` out as a `T`.
    pub fn get<T: Clone + 'static>(&self, index: usize) -> Result<T, ArgAccessError> {
        self.get_ref::<T>(index).cloned()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("command", &self.command)
            .field("len", &self.values.len())
            .finish()
    }
}

// MARK: --- UNIT TESTS ---
