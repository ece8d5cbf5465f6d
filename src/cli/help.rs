// src/cli/help.rs

// Renders usage text from descriptor metadata. The registry itself never formats anything.

use crate::{
    core::registry::{CommandDescriptor, Registry},
    models::{Modifier, ParameterDescriptor, TypeTag},
};
use anyhow::{Result, anyhow};
use colored::Colorize;
use std::fmt::Write;

/// One-line usage for a command, e.g. `repeat <count:u32> <text:string> [sep:string=" "]`.
pub fn usage(descriptor: &CommandDescriptor) -> String {
    let mut line = descriptor.primary_name().to_string();
    if descriptor.is_verb() {
        line.push_str(" <subcommand> ...");
        return line;
    }
    for param in descriptor.parameters() {
        line.push(' ');
        if descriptor.is_raw() {
            line.push_str(&format!("<{}...>", param.name()));
        } else {
            line.push_str(&parameter_usage(param));
        }
    }
    line
}

fn parameter_usage(param: &ParameterDescriptor) -> String {
    let name = param.name();
    match param.modifier() {
        Modifier::Required => format!("<{}:{}>", name, param.type_tag()),
        Modifier::Optional => match param.default_value() {
            Some(default) => format!("[{}:{}={}]", name, param.type_tag(), default.repr()),
            None => format!("[{}:{}]", name, param.type_tag()),
        },
        Modifier::Params => {
            let element = match param.type_tag() {
                TypeTag::SequenceOf(inner) => inner.as_ref(),
                other => other,
            };
            format!("[{}:{}]...", name, element)
        }
        Modifier::JoinRest => format!("<{}:{}...>", name, param.type_tag()),
    }
}

/// Lists the commands of `registry`, or of the verb reached by following `path`.
pub fn render_help(registry: &Registry, path: &[&str], styled: bool) -> Result<String> {
    let mut current = registry;
    for (depth, name) in path.iter().enumerate() {
        current = current.verb(name).ok_or_else(|| {
            let walked: Vec<&str> = path.iter().take(depth + 1).copied().collect();
            anyhow!("'{}' is not a command group.", walked.join(" "))
        })?;
    }

    let rows: Vec<(String, String)> = current
        .commands()
        .map(|descriptor| (usage(descriptor), summary(descriptor)))
        .collect();
    let width = rows.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

    let header = if path.is_empty() {
        "Commands:".to_string()
    } else {
        format!("Commands of '{}':", path.join(" "))
    };

    let mut out = String::new();
    if styled {
        writeln!(out, "{}", header.yellow().bold())?;
    } else {
        writeln!(out, "{}", header)?;
    }
    for (usage, summary) in rows {
        let padded = format!("{:<width$}", usage, width = width);
        let padded = if styled {
            padded.cyan().to_string()
        } else {
            padded
        };
        writeln!(out, "  {}  {}", padded, summary)?;
    }
    Ok(out.trim_end().to_string())
}

fn summary(descriptor: &CommandDescriptor) -> String {
    let description = descriptor.description().unwrap_or_default();
    match descriptor.aliases() {
        [] => description.to_string(),
        aliases => format!("{} (aliases: {})", description, aliases.join(", "))
            .trim_start()
            .to_string(),
    }
}

// MARK: --- UNIT TESTS ---
