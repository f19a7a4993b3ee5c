// ABOUTME: Converts stored declarative parameter maps into ordered invocation tokens
// ABOUTME: Positionals follow schema order, named values follow stored order, flags emit only when set

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use super::error::{ArgumentError, Result};
use crate::schema::{ParameterDescriptor, ValueType};

/// Reserved key holding the sub-map of positional values
pub const POSITIONAL_KEY: &str = "_positional_args";

/// Shorter spelling of the reserved positional key, accepted when reading
pub const POSITIONAL_KEY_ALIAS: &str = "_positional";

pub fn is_positional_key(key: &str) -> bool {
    key == POSITIONAL_KEY || key == POSITIONAL_KEY_ALIAS
}

/// Materialize stored parameters into the token list a module parses
pub fn materialize(
    descriptors: &[ParameterDescriptor],
    params: &IndexMap<String, JsonValue>,
) -> Result<Vec<String>> {
    let mut tokens = Vec::new();

    let positional_values = positional_section(params)?;
    for key in positional_values.keys() {
        if !descriptors.iter().any(|d| d.positional && d.name == *key) {
            return Err(ArgumentError::UnknownParameter { name: key.clone() });
        }
    }

    for descriptor in descriptors.iter().filter(|d| d.positional) {
        match positional_values.get(&descriptor.name) {
            Some(value) if !value.is_null() => tokens.extend(value_tokens(descriptor, value)?),
            _ => {
                if let Some(default) = &descriptor.default {
                    tokens.extend(default.tokens());
                }
            }
        }
    }

    for (key, value) in params {
        if is_positional_key(key) {
            continue;
        }

        let descriptor = descriptors
            .iter()
            .find(|d| d.name == *key)
            .ok_or_else(|| ArgumentError::UnknownParameter { name: key.clone() })?;

        let spelling = match descriptor.primary_option() {
            Some(spelling) if !descriptor.positional => spelling,
            _ => {
                return Err(ArgumentError::MisplacedPositional {
                    name: key.clone(),
                    key: POSITIONAL_KEY.to_string(),
                })
            }
        };

        if value.is_null() {
            continue;
        }

        if descriptor.kind.is_flag() {
            if is_truthy(descriptor, value)? {
                tokens.push(spelling.to_string());
            }
            continue;
        }

        tokens.push(spelling.to_string());
        tokens.extend(value_tokens(descriptor, value)?);
    }

    debug!("Materialized arguments: {:?}", tokens);
    Ok(tokens)
}

fn positional_section(params: &IndexMap<String, JsonValue>) -> Result<JsonMap<String, JsonValue>> {
    let mut merged = JsonMap::new();
    for key in [POSITIONAL_KEY_ALIAS, POSITIONAL_KEY] {
        match params.get(key) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(values)) => {
                merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Some(_) => {
                return Err(ArgumentError::InvalidPositionalSection {
                    key: key.to_string(),
                })
            }
        }
    }
    Ok(merged)
}

fn value_tokens(descriptor: &ParameterDescriptor, value: &JsonValue) -> Result<Vec<String>> {
    let element = descriptor.kind.element_type().unwrap_or(ValueType::String);

    match value {
        JsonValue::Array(items) if descriptor.kind.is_list() => items
            .iter()
            .map(|item| convert_element(&descriptor.name, item, element))
            .collect(),
        JsonValue::Array(_) => Err(ArgumentError::InvalidValue {
            name: descriptor.name.clone(),
            value: value.to_string(),
            expected: "a single value".to_string(),
        }),
        scalar => Ok(vec![convert_element(&descriptor.name, scalar, element)?]),
    }
}

fn convert_element(name: &str, value: &JsonValue, element: ValueType) -> Result<String> {
    let invalid = |expected: &str| ArgumentError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    };

    match element {
        ValueType::String => match value {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            _ => Err(invalid("a string")),
        },
        ValueType::Int => match value {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| is_whole_i64(*f)).map(|f| f as i64))
                .map(|i| i.to_string())
                .ok_or_else(|| invalid("an integer")),
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| i.to_string())
                .map_err(|_| invalid("an integer")),
            _ => Err(invalid("an integer")),
        },
        ValueType::Float => match value {
            JsonValue::Number(n) => n
                .as_f64()
                .map(|f| f.to_string())
                .ok_or_else(|| invalid("a number")),
            JsonValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|f| f.to_string())
                .map_err(|_| invalid("a number")),
            _ => Err(invalid("a number")),
        },
    }
}

/// Whole floats inside the i64 range; `i64::MAX as f64` rounds up to 2^63 so the upper bound is exclusive
fn is_whole_i64(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn is_truthy(descriptor: &ParameterDescriptor, value: &JsonValue) -> Result<bool> {
    match value {
        JsonValue::Null => Ok(false),
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        JsonValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            _ => Err(ArgumentError::InvalidValue {
                name: descriptor.name.clone(),
                value: value.to_string(),
                expected: "a boolean".to_string(),
            }),
        },
        _ => Err(ArgumentError::InvalidValue {
            name: descriptor.name.clone(),
            value: value.to_string(),
            expected: "a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{describe_schema, ArgumentRule, ModuleSchema, Nargs};
    use serde_json::json;

    fn params(value: JsonValue) -> IndexMap<String, JsonValue> {
        serde_json::from_value(value).unwrap()
    }

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
    fn test_positionals_then_named_in_stored_order() {
        let stored = params(json!({
            "show_details": true,
            "_positional_args": {"numbers": [1, 2.5, 3]},
            "operation": "multiply"
        }));
        let tokens = materialize(&calculator(), &stored).unwrap();
        assert_eq!(
            tokens,
            vec!["1", "2.5", "3", "--show-details", "--operation", "multiply"]
        );
    }

    #[test]
    fn test_false_flag_is_omitted() {
        let stored = params(json!({"_positional_args": {"numbers": [1]}, "show_details": false}));
        let tokens = materialize(&calculator(), &stored).unwrap();
        assert_eq!(tokens, vec!["1"]);
    }

    #[test]
    fn test_true_flag_emits_exactly_first_spelling() {
        let stored = params(json!({"show_details": true}));
        let tokens = materialize(&calculator(), &stored).unwrap();
        assert_eq!(tokens.iter().filter(|t| t.starts_with('-')).count(), 1);
        assert_eq!(tokens, vec!["--show-details"]);
    }

    #[test]
    fn test_int_list_round_trip() {
        let descriptors = describe_schema(
            &ModuleSchema::new("x").argument(
                ArgumentRule::option(&["--ids"])
                    .nargs(Nargs::OneOrMore)
                    .value_type(ValueType::Int),
            ),
        )
        .unwrap();
        let tokens = materialize(&descriptors, &params(json!({"ids": [1, 2, 3]}))).unwrap();
        assert_eq!(tokens, vec!["--ids", "1", "2", "3"]);
    }

    #[test]
    fn test_missing_positional_falls_back_to_default() {
        let descriptors = describe_schema(
            &ModuleSchema::new("x")
                .argument(ArgumentRule::positional("source").default_value("in.txt"))
                .argument(ArgumentRule::positional("target").nargs(Nargs::ZeroOrOne)),
        )
        .unwrap();
        let tokens = materialize(&descriptors, &IndexMap::new()).unwrap();
        assert_eq!(tokens, vec!["in.txt"]);
    }

    #[test]
    fn test_positional_alias_key_is_accepted() {
        let stored = params(json!({"_positional": {"numbers": [2]}, "operation": "multiply"}));
        let tokens = materialize(&calculator(), &stored).unwrap();
        assert_eq!(tokens, vec!["2", "--operation", "multiply"]);
    }

    #[test]
    fn test_unparseable_int_names_parameter() {
        let descriptors = describe_schema(
            &ModuleSchema::new("x").argument(ArgumentRule::option(&["--count"]).value_type(ValueType::Int)),
        )
        .unwrap();
        let err = materialize(&descriptors, &params(json!({"count": "many"}))).unwrap_err();
        match err {
            ArgumentError::InvalidValue { name, .. } => assert_eq!(name, "count"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_int_is_rejected() {
        let descriptors = describe_schema(
            &ModuleSchema::new("x").argument(ArgumentRule::option(&["--count"]).value_type(ValueType::Int)),
        )
        .unwrap();
        for stored in [json!(1e20), json!(-1e20)] {
            let err = materialize(&descriptors, &params(json!({ "count": stored }))).unwrap_err();
            match err {
                ArgumentError::InvalidValue { name, expected, .. } => {
                    assert_eq!(name, "count");
                    assert_eq!(expected, "an integer");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        let tokens = materialize(&descriptors, &params(json!({"count": 4.0}))).unwrap();
        assert_eq!(tokens, vec!["--count", "4"]);
    }

    #[test]
    fn test_unknown_named_parameter() {
        let err = materialize(&calculator(), &params(json!({"precision": 2}))).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::UnknownParameter {
                name: "precision".to_string()
            }
        );
    }

    #[test]
    fn test_positional_stored_as_named_is_rejected() {
        let err = materialize(&calculator(), &params(json!({"numbers": [1]}))).unwrap_err();
        assert!(matches!(err, ArgumentError::MisplacedPositional { .. }));
    }
}
