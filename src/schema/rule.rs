// ABOUTME: Declarative parameter rules that task modules author to describe their inputs
// ABOUTME: Uses command-line vocabulary: flags, typed scalars, variable arity lists, choices

use serde::{Deserialize, Serialize};

use crate::args::ArgValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
}

/// How many values a rule consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Nargs {
    #[default]
    Single,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    #[default]
    Store,
    StoreTrue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentRule {
    pub option_strings: Vec<String>,
    pub dest: Option<String>,
    pub action: RuleAction,
    pub value_type: Option<ValueType>,
    pub nargs: Nargs,
    pub choices: Option<Vec<ArgValue>>,
    pub default: Option<ArgValue>,
    pub required: bool,
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleSchema {
    pub description: String,
    pub rules: Vec<ArgumentRule>,
}

impl Nargs {
    pub fn is_variadic(&self) -> bool {
        matches!(self, Nargs::ZeroOrMore | Nargs::OneOrMore)
    }

    pub fn min_values(&self) -> usize {
        match self {
            Nargs::Single | Nargs::OneOrMore => 1,
            Nargs::ZeroOrOne | Nargs::ZeroOrMore => 0,
        }
    }
}

impl ArgumentRule {
    fn empty() -> Self {
        Self {
            option_strings: Vec::new(),
            dest: None,
            action: RuleAction::Store,
            value_type: None,
            nargs: Nargs::Single,
            choices: None,
            default: None,
            required: false,
            help: String::new(),
        }
    }

    /// A value consumed by position
    pub fn positional(dest: &str) -> Self {
        Self {
            dest: Some(dest.to_string()),
            ..Self::empty()
        }
    }

    /// A named option accepted under any of the given spellings
    pub fn option<S: AsRef<str>>(spellings: &[S]) -> Self {
        Self {
            option_strings: spellings.iter().map(|s| s.as_ref().to_string()).collect(),
            ..Self::empty()
        }
    }

    /// Binary presence switch
    pub fn flag(mut self) -> Self {
        self.action = RuleAction::StoreTrue;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = nargs;
        self
    }

    pub fn choices<T: Into<ArgValue>>(mut self, choices: impl IntoIterator<Item = T>) -> Self {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, default: impl Into<ArgValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn dest(mut self, dest: &str) -> Self {
        self.dest = Some(dest.to_string());
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }
}

impl ModuleSchema {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn argument(mut self, rule: ArgumentRule) -> Self {
        self.rules.push(rule);
        self
    }
}
