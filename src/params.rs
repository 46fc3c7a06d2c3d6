//! Per-checker parameters given as `checker.param=value`.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ParamValue {
    /// `true`/`false` become `Bool`, integers `Int`, anything else `Str`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map_or_else(|_| Self::Str(raw.to_string()), Self::Int),
        }
    }

    const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("malformed parameter `{0}`, expected `checker.param=value`")]
    Malformed(String),

    #[error("parameter `{checker}.{param}` expects a {expected} value, got {found} `{value}`")]
    Type {
        checker: String,
        param: String,
        expected: &'static str,
        found: &'static str,
        value: String,
    },

    #[error("unknown parameter `{checker}.{param}`")]
    Unknown { checker: String, param: String },
}

/// Parameter values keyed by checker name, then parameter name.
#[derive(Debug, Clone, Default)]
pub struct CheckerParams {
    values: FxHashMap<String, FxHashMap<String, ParamValue>>,
}

impl CheckerParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses entries of the form `checker.param=value`.
    pub fn parse<I, S>(entries: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for entry in entries {
            let entry = entry.as_ref();
            let malformed = || ParamError::Malformed(entry.to_string());
            let (key, value) = entry.split_once('=').ok_or_else(malformed)?;
            let (checker, param) = key.trim().split_once('.').ok_or_else(malformed)?;
            if checker.is_empty() || param.is_empty() {
                return Err(malformed());
            }
            params.set(checker, param, ParamValue::parse(value.trim()));
        }
        Ok(params)
    }

    pub fn set(&mut self, checker: &str, param: &str, value: ParamValue) {
        self.values
            .entry(checker.to_string())
            .or_default()
            .insert(param.to_string(), value);
    }

    pub fn get(&self, checker: &str, param: &str) -> Option<&ParamValue> {
        self.values.get(checker)?.get(param)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|m| m.is_empty())
    }

    /// `(checker, param)` pairs that were set.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().flat_map(|(checker, params)| {
            params
                .keys()
                .map(move |param| (checker.as_str(), param.as_str()))
        })
    }

    pub fn bool_param(&self, checker: &str, param: &str, default: bool) -> Result<bool, ParamError> {
        match self.get(checker, param) {
            None => Ok(default),
            Some(ParamValue::Bool(b)) => Ok(*b),
            Some(other) => Err(type_error(checker, param, "bool", other)),
        }
    }
}

fn type_error(checker: &str, param: &str, expected: &'static str, found: &ParamValue) -> ParamError {
    ParamError::Type {
        checker: checker.to_string(),
        param: param.to_string(),
        expected,
        found: found.kind_name(),
        value: found.to_string(),
    }
}
