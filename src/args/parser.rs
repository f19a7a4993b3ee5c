// ABOUTME: Module-level argument parsing of invocation tokens against parameter descriptors
// ABOUTME: Handles option spellings, arity, positional allotment, type conversion, and choices

use std::collections::HashMap;

use super::error::{ArgumentError, Result};
use super::parsed::ParsedArgs;
use super::value::ArgValue;
use crate::schema::{Nargs, ParameterDescriptor, ValueType};

pub struct ArgumentParser<'a> {
    descriptors: &'a [ParameterDescriptor],
}

enum Seen {
    Flag,
    Values(Vec<String>),
}

impl<'a> ArgumentParser<'a> {
    pub fn new(descriptors: &'a [ParameterDescriptor]) -> Self {
        Self { descriptors }
    }

    /// Parse tokens into a resolved argument bundle
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedArgs> {
        let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        let mut named: HashMap<&str, Seen> = HashMap::new();
        let mut positional_tokens: Vec<String> = Vec::new();
        let mut unrecognized: Vec<String> = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            i += 1;

            if token == "--" {
                positional_tokens.extend(tokens[i..].iter().map(|t| t.to_string()));
                break;
            }

            let Some((descriptor, inline)) = self.match_option(token) else {
                if looks_like_option(token) {
                    unrecognized.push(token.to_string());
                } else {
                    positional_tokens.push(token.to_string());
                }
                continue;
            };

            if descriptor.kind.is_flag() {
                if let Some(value) = inline {
                    return Err(ArgumentError::InvalidValue {
                        name: descriptor.name.clone(),
                        value: value.to_string(),
                        expected: "no value for a flag".to_string(),
                    });
                }
                named.insert(descriptor.name.as_str(), Seen::Flag);
                continue;
            }

            let mut values: Vec<String> = inline.map(|v| vec![v.to_string()]).unwrap_or_default();
            if descriptor.kind.is_list() {
                while i < tokens.len() && tokens[i] != "--" && self.match_option(tokens[i]).is_none() {
                    values.push(tokens[i].to_string());
                    i += 1;
                }
                if descriptor.nargs == Nargs::OneOrMore && values.is_empty() {
                    return Err(ArgumentError::TooFewValues {
                        name: descriptor.name.clone(),
                    });
                }
            } else if values.is_empty() {
                match tokens.get(i) {
                    Some(next) if self.match_option(next).is_none() => {
                        values.push(next.to_string());
                        i += 1;
                    }
                    _ if descriptor.nargs == Nargs::ZeroOrOne => {}
                    _ => {
                        return Err(ArgumentError::MissingValue {
                            option: token.to_string(),
                        })
                    }
                }
            }
            named.insert(descriptor.name.as_str(), Seen::Values(values));
        }

        let (positional_values, leftover) = self.allot_positionals(positional_tokens);
        unrecognized.extend(leftover);
        if !unrecognized.is_empty() {
            return Err(ArgumentError::UnrecognizedArguments {
                tokens: unrecognized,
            });
        }

        let mut parsed = ParsedArgs::new();
        let mut missing = Vec::new();

        for descriptor in self.descriptors {
            let seen = if descriptor.positional {
                positional_values.get(descriptor.name.as_str()).cloned().map(Seen::Values)
            } else {
                named.remove(descriptor.name.as_str())
            };

            let value = match seen {
                Some(Seen::Flag) => ArgValue::Bool(true),
                Some(Seen::Values(values)) => self.convert(descriptor, &values)?,
                None => {
                    if descriptor.required {
                        missing.push(descriptor.display_name());
                    }
                    descriptor.default.clone().unwrap_or(ArgValue::Null)
                }
            };
            parsed.set(descriptor.name.clone(), value);
        }

        if !missing.is_empty() {
            return Err(ArgumentError::MissingRequired { names: missing });
        }

        Ok(parsed)
    }

    /// Exact spelling or `--option=value`
    fn match_option<'t>(&self, token: &'t str) -> Option<(&'a ParameterDescriptor, Option<&'t str>)> {
        if !token.starts_with('-') {
            return None;
        }
        let named = || self.descriptors.iter().filter(|d| !d.positional);

        if let Some(descriptor) = named().find(|d| d.accepts_option(token)) {
            return Some((descriptor, None));
        }

        let (spelling, value) = token.split_once('=')?;
        named()
            .find(|d| d.accepts_option(spelling))
            .map(|descriptor| (descriptor, Some(value)))
    }

    /// Hand tokens to positionals in declaration order, reserving minimums for later ones.
    /// Positionals that receive nothing are left out of the returned map.
    fn allot_positionals(&self, tokens: Vec<String>) -> (HashMap<&'a str, Vec<String>>, Vec<String>) {
        let positionals: Vec<&ParameterDescriptor> =
            self.descriptors.iter().filter(|d| d.positional).collect();
        let mut allotted = HashMap::new();
        let mut cursor = 0;

        for (index, descriptor) in positionals.iter().enumerate() {
            let reserved: usize = positionals[index + 1..]
                .iter()
                .map(|p| p.nargs.min_values())
                .sum();
            let available = tokens.len().saturating_sub(cursor).saturating_sub(reserved);

            let take = match descriptor.nargs {
                Nargs::Single | Nargs::ZeroOrOne => available.min(1),
                Nargs::ZeroOrMore | Nargs::OneOrMore => available,
            };

            if take == 0 && (descriptor.nargs != Nargs::ZeroOrMore || descriptor.default.is_some()) {
                continue;
            }
            allotted.insert(descriptor.name.as_str(), tokens[cursor..cursor + take].to_vec());
            cursor += take;
        }

        (allotted, tokens[cursor..].to_vec())
    }

    fn convert(&self, descriptor: &ParameterDescriptor, raw: &[String]) -> Result<ArgValue> {
        let element = descriptor.kind.element_type().unwrap_or(ValueType::String);
        let values = raw
            .iter()
            .map(|token| {
                let value = convert_token(&descriptor.name, token, element)?;
                check_choice(descriptor, &value)?;
                Ok(value)
            })
            .collect::<Result<Vec<_>>>()?;

        if descriptor.kind.is_list() {
            return Ok(ArgValue::List(values));
        }
        Ok(values
            .into_iter()
            .next()
            .or_else(|| descriptor.default.clone())
            .unwrap_or(ArgValue::Null))
    }
}

fn convert_token(name: &str, token: &str, element: ValueType) -> Result<ArgValue> {
    let invalid = |expected: &str| ArgumentError::InvalidValue {
        name: name.to_string(),
        value: token.to_string(),
        expected: expected.to_string(),
    };

    match element {
        ValueType::String => Ok(ArgValue::Str(token.to_string())),
        ValueType::Int => token
            .parse::<i64>()
            .map(ArgValue::Int)
            .map_err(|_| invalid("an integer")),
        ValueType::Float => token
            .parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|_| invalid("a number")),
    }
}

fn check_choice(descriptor: &ParameterDescriptor, value: &ArgValue) -> Result<()> {
    let Some(choices) = &descriptor.choices else {
        return Ok(());
    };
    if choices.iter().any(|choice| value.matches_choice(choice)) {
        return Ok(());
    }
    let rendered: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
    Err(ArgumentError::InvalidChoice {
        name: descriptor.name.clone(),
        value: value.to_string(),
        choices: rendered.join(", "),
    })
}

/// Dash-prefixed tokens that are not negative numbers
fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{describe_schema, ArgumentRule, ModuleSchema};

    fn calculator() -> Vec<ParameterDescriptor> {
        describe_schema(
            &ModuleSchema::new("calculator")
                .argument(
                    ArgumentRule::positional("numbers")
                        .nargs(Nargs::OneOrMore)
                        .value_type(ValueType::Float),
                )
                .argument(
                    ArgumentRule::option(&["--operation", "-op"])
                        .choices(["add", "multiply", "average"])
                        .default_value("add"),
                )
                .argument(ArgumentRule::option(&["--show-details", "-d"]).flag()),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_positionals_options_and_flags() {
        let descriptors = calculator();
        let parsed = ArgumentParser::new(&descriptors)
            .parse(&["1", "-2.5", "3", "-op", "multiply", "-d"])
            .unwrap();

        assert_eq!(parsed.floats("numbers"), vec![1.0, -2.5, 3.0]);
        assert_eq!(parsed.string("operation"), Some("multiply"));
        assert!(parsed.flag("show_details"));
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let descriptors = calculator();
        let parsed = ArgumentParser::new(&descriptors).parse(&["4"]).unwrap();
        assert_eq!(parsed.string("operation"), Some("add"));
        assert!(!parsed.flag("show_details"));
    }

    #[test]
    fn test_inline_option_value() {
        let descriptors = calculator();
        let parsed = ArgumentParser::new(&descriptors)
            .parse(&["--operation=average", "1", "2"])
            .unwrap();
        assert_eq!(parsed.string("operation"), Some("average"));
        assert_eq!(parsed.floats("numbers"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_invalid_choice() {
        let descriptors = calculator();
        let err = ArgumentParser::new(&descriptors)
            .parse(&["1", "--operation", "divide"])
            .unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidChoice { ref name, .. } if name == "operation"));
    }

    #[test]
    fn test_missing_required_positional() {
        let descriptors = calculator();
        let err = ArgumentParser::new(&descriptors).parse(&["-d"]).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::MissingRequired {
                names: vec!["numbers".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_option_is_unrecognized() {
        let descriptors = calculator();
        let err = ArgumentParser::new(&descriptors)
            .parse(&["1", "--precision", "2"])
            .unwrap_err();
        assert!(matches!(err, ArgumentError::UnrecognizedArguments { .. }));
    }

    #[test]
    fn test_positional_allotment_reserves_trailing_minimum() {
        let descriptors = describe_schema(
            &ModuleSchema::new("copy")
                .argument(ArgumentRule::positional("sources").nargs(Nargs::OneOrMore))
                .argument(ArgumentRule::positional("target")),
        )
        .unwrap();
        let parsed = ArgumentParser::new(&descriptors)
            .parse(&["a", "b", "c"])
            .unwrap();
        assert_eq!(parsed.strings("sources"), vec!["a", "b"]);
        assert_eq!(parsed.string("target"), Some("c"));
    }

    #[test]
    fn test_zero_or_more_option_stops_at_next_option() {
        let descriptors = describe_schema(
            &ModuleSchema::new("demo")
                .argument(ArgumentRule::option(&["--items"]).nargs(Nargs::ZeroOrMore))
                .argument(ArgumentRule::option(&["--verbose", "-v"]).flag()),
        )
        .unwrap();
        let parsed = ArgumentParser::new(&descriptors)
            .parse(&["--items", "a", "b", "-v"])
            .unwrap();
        assert_eq!(parsed.strings("items"), vec!["a", "b"]);
        assert!(parsed.flag("verbose"));

        let empty = ArgumentParser::new(&descriptors).parse(&["--items"]).unwrap();
        assert_eq!(empty.get("items"), Some(&ArgValue::List(Vec::new())));
    }

    #[test]
    fn test_int_conversion_failure_names_parameter() {
        let descriptors = describe_schema(
            &ModuleSchema::new("x").argument(ArgumentRule::option(&["--count"]).value_type(ValueType::Int)),
        )
        .unwrap();
        let err = ArgumentParser::new(&descriptors)
            .parse(&["--count", "1.5"])
            .unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidValue { ref name, .. } if name == "count"));
    }
}
