// ABOUTME: Schema introspection that classifies declared rules into parameter descriptors
// ABOUTME: Derives destination keys, parameter kinds, and requiredness from each rule

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

use super::descriptor::{ParameterDescriptor, ParameterKind};
use super::error::{Result, SchemaError};
use super::rule::{ArgumentRule, ModuleSchema, Nargs, RuleAction, ValueType};
use super::SchemaProvider;
use crate::args::ArgValue;

/// Invoke a provider and describe the schema it returns.
/// A provider that panics is reported as a failed provider.
pub fn describe(provider: &dyn SchemaProvider) -> Result<Vec<ParameterDescriptor>> {
    let schema = panic::catch_unwind(AssertUnwindSafe(|| provider.schema())).map_err(|payload| {
        SchemaError::ProviderFailed {
            message: format!("schema provider panicked: {}", panic_message(payload.as_ref())),
        }
    })??;
    describe_schema(&schema)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Describe a provider, treating a schema error as "no declared parameters"
pub fn describe_or_empty(module_name: &str, provider: &dyn SchemaProvider) -> Vec<ParameterDescriptor> {
    match describe(provider) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            warn!(
                "Schema for module '{}' could not be described, assuming no parameters: {}",
                module_name, e
            );
            Vec::new()
        }
    }
}

/// Walk the declared rules in order and classify each one
pub fn describe_schema(schema: &ModuleSchema) -> Result<Vec<ParameterDescriptor>> {
    let mut descriptors = Vec::with_capacity(schema.rules.len());
    let mut names = HashSet::new();
    let mut spellings = HashSet::new();

    for rule in &schema.rules {
        for option in &rule.option_strings {
            if !is_valid_option(option) {
                return Err(SchemaError::InvalidOptionString {
                    option: option.clone(),
                });
            }
            if !spellings.insert(option.clone()) {
                return Err(SchemaError::DuplicateOption {
                    option: option.clone(),
                });
            }
        }

        let descriptor = classify(rule)?;
        if !names.insert(descriptor.name.clone()) {
            return Err(SchemaError::DuplicateDestination {
                name: descriptor.name,
            });
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

fn classify(rule: &ArgumentRule) -> Result<ParameterDescriptor> {
    let positional = rule.option_strings.is_empty();
    let name = match &rule.dest {
        Some(dest) => dest.clone(),
        None => destination_from_options(&rule.option_strings),
    };

    if name.is_empty() {
        return Err(SchemaError::InvalidRule {
            name: rule.option_strings.join("/"),
            reason: "cannot derive a destination name".to_string(),
        });
    }

    let (kind, default) = match rule.action {
        RuleAction::StoreTrue => {
            if positional {
                return Err(invalid(&name, "a flag needs at least one option spelling"));
            }
            if rule.nargs != Nargs::Single || rule.value_type.is_some() || rule.choices.is_some() {
                return Err(invalid(&name, "a flag takes no value"));
            }
            let default = rule.default.clone().unwrap_or(ArgValue::Bool(false));
            (ParameterKind::Flag, Some(default))
        }
        RuleAction::Store => {
            let element = rule.value_type.unwrap_or(ValueType::String);
            let kind = ParameterKind::from_value_type(element, rule.nargs.is_variadic());
            (kind, rule.default.clone())
        }
    };

    if let (Some(choices), Some(element)) = (&rule.choices, kind.element_type()) {
        for choice in choices {
            if !choice_matches_type(choice, element) {
                return Err(SchemaError::ChoiceTypeMismatch {
                    name: name.clone(),
                    choice: choice.to_string(),
                    expected: format!("{:?}", element).to_lowercase(),
                });
            }
        }
    }

    let required = if positional {
        rule.nargs.min_values() > 0
    } else {
        rule.required
    };

    Ok(ParameterDescriptor {
        name,
        kind,
        positional,
        option_strings: rule.option_strings.clone(),
        choices: rule.choices.clone(),
        default,
        required,
        nargs: rule.nargs,
        help: rule.help.clone(),
    })
}

/// Prefer the first long spelling, strip leading dashes, normalize separators
fn destination_from_options(options: &[String]) -> String {
    let chosen = options
        .iter()
        .find(|o| o.starts_with("--"))
        .or_else(|| options.first());

    chosen
        .map(|o| o.trim_start_matches('-').replace('-', "_"))
        .unwrap_or_default()
}

fn is_valid_option(option: &str) -> bool {
    option.starts_with('-') && !option.trim_start_matches('-').is_empty() && !option.contains('=')
}

fn choice_matches_type(choice: &ArgValue, element: ValueType) -> bool {
    match element {
        ValueType::String => matches!(choice, ArgValue::Str(_)),
        ValueType::Int => matches!(choice, ArgValue::Int(_)),
        ValueType::Float => matches!(choice, ArgValue::Int(_) | ArgValue::Float(_)),
    }
}

fn invalid(name: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidRule {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
