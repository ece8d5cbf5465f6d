//! # Argument Conversion Compiler
//!
//! Turns a parameter signature into a single converter closure, built once when
//! the command is registered. At dispatch time the converter only runs the
//! per-argument string conversions it selected up front:
//!
//! - string passthrough, enum-by-name, or `FromStr` parsing for each element,
//! - applied once per argument, once to the joined rest (`JoinRest`),
//!   or to every remaining argument (`Params`).

use crate::core::dispatcher::DispatchError;
use crate::models::{
    ArgEnum, Args, BoxError, DefaultValue, HandlerFn, Modifier, ParameterDescriptor,
    UnknownMember, Value,
};
use std::any::{TypeId, type_name};
use std::str::FromStr;
use std::sync::Arc;

/// The compiled form of a command signature: `(invoked name, arguments) -> result`.
pub type Converter = Box<dyn Fn(&str, Vec<String>) -> Result<(), DispatchError> + Send + Sync>;

type SingleFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;
type SequenceFn = Arc<dyn Fn(&[String]) -> Result<Value, BoxError> + Send + Sync>;

/// How one element type is converted, alone or as a sequence.
#[derive(Clone)]
pub struct ElementConversion {
    single: SingleFn,
    sequence: SequenceFn,
    element_type: (TypeId, &'static str),
    sequence_type: (TypeId, &'static str),
}

impl std::fmt::Debug for ElementConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementConversion")
            .field("element_type", &self.element_type.1)
            .finish_non_exhaustive()
    }
}

impl ElementConversion {
    fn of<T: Send + 'static>(parse: fn(&str) -> Result<T, BoxError>) -> Self {
        Self {
            single: Arc::new(move |arg: &str| parse(arg).map(|v| Box::new(v) as Value)),
            sequence: Arc::new(move |items: &[String]| {
                items
                    .iter()
                    .map(|arg| parse(arg))
                    .collect::<Result<Vec<T>, _>>()
                    .map(|v| Box::new(v) as Value)
            }),
            element_type: (TypeId::of::<T>(), type_name::<T>()),
            sequence_type: (TypeId::of::<Vec<T>>(), type_name::<Vec<T>>()),
        }
    }

    /// The type a default value must have for a parameter with this modifier.
    pub(crate) fn expected_default(&self, modifier: Modifier) -> (TypeId, &'static str) {
        match modifier {
            Modifier::Params => self.sequence_type,
            _ => self.element_type,
        }
    }
}

pub(crate) fn passthrough() -> ElementConversion {
    ElementConversion::of::<String>(|arg| Ok(arg.to_string()))
}

pub(crate) fn from_str_conversion<T>() -> ElementConversion
where
    T: FromStr + Send + 'static,
    T::Err: Into<BoxError>,
{
    ElementConversion::of::<T>(|arg| arg.parse::<T>().map_err(Into::into))
}

pub(crate) fn enum_conversion<E: ArgEnum>() -> ElementConversion {
    ElementConversion::of::<E>(|arg| {
        E::MEMBERS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(arg))
            .map(|(_, member)| member.clone())
            .ok_or_else(|| {
                Box::new(UnknownMember {
                    name: E::NAME,
                    value: arg.to_string(),
                    expected: E::MEMBERS.iter().map(|(name, _)| *name).collect(),
                }) as BoxError
            })
    })
}

// --- COMPILATION ---

/// One parameter's step: receives the arguments from its own index onwards.
type Step = Box<dyn Fn(&str, &[String]) -> Result<Value, DispatchError> + Send + Sync>;

/// Compiles `parameters` into a converter that calls `handler` with typed arguments.
///
/// The signature is expected to have passed registry validation already;
/// this function only selects and composes the conversion steps.
pub fn compile(parameters: &[ParameterDescriptor], handler: HandlerFn) -> Converter {
    let steps: Vec<Step> = parameters
        .iter()
        .enumerate()
        .map(|(index, param)| compile_step(index, param))
        .collect();
    let arity = parameters.len();
    let variadic = parameters.last().is_some_and(|p| p.modifier().is_rest());

    Box::new(move |command: &str, args: Vec<String>| {
        if !variadic && args.len() > arity {
            return Err(DispatchError::TooManyArguments {
                command: command.to_string(),
                expected: arity,
                given: args.len(),
            });
        }
        log::trace!("Converting {} argument(s) for '{}'", args.len(), command);

        let values = steps
            .iter()
            .enumerate()
            .map(|(index, step)| step(command, args.get(index..).unwrap_or(&[])))
            .collect::<Result<Vec<_>, _>>()?;

        handler(&Args::new(command, values)).map_err(DispatchError::Handler)
    })
}

fn compile_step(index: usize, param: &ParameterDescriptor) -> Step {
    let conversion = param.conversion().clone();
    let name = param.name().to_string();
    let default = param.default_value().cloned();

    match param.modifier() {
        Modifier::Params => Box::new(move |command: &str, remaining: &[String]| {
            if remaining.is_empty()
                && let Some(default) = &default
            {
                return Ok(default.make());
            }
            (conversion.sequence)(remaining).map_err(|cause| invalid(command, index, cause))
        }),
        Modifier::JoinRest => Box::new(move |command: &str, remaining: &[String]| {
            if remaining.is_empty() {
                return fallback(command, index, &name, default.as_ref());
            }
            let joined = remaining.join(" ");
            (conversion.single)(&joined).map_err(|cause| invalid(command, index, cause))
        }),
        Modifier::Required | Modifier::Optional => {
            Box::new(move |command: &str, remaining: &[String]| match remaining.first() {
                Some(arg) => {
                    (conversion.single)(arg).map_err(|cause| invalid(command, index, cause))
                }
                None => fallback(command, index, &name, default.as_ref()),
            })
        }
    }
}

/// Availability rule for a parameter whose argument was not supplied.
fn fallback(
    command: &str,
    index: usize,
    parameter: &str,
    default: Option<&DefaultValue>,
) -> Result<Value, DispatchError> {
    default
        .map(DefaultValue::make)
        .ok_or_else(|| DispatchError::MissingArgument {
            command: command.to_string(),
            param_index: index,
            parameter: parameter.to_string(),
        })
}

fn invalid(command: &str, index: usize, cause: BoxError) -> DispatchError {
    DispatchError::InvalidArgument {
        command: command.to_string(),
        param_index: index,
        cause,
    }
}

// MARK: --- UNIT TESTS ---
