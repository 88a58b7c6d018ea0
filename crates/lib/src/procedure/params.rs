//! Procedure parameters and their coercion into stored strings.
//!
//! Parameters arrive as a name → [`ParamValue`] map. Handlers never store a
//! `ParamValue` directly; each value is coerced into the stored encoding of the
//! field it targets:
//!
//! | Field kind | Accepted values | Stored as |
//! |---|---|---|
//! | text | `Text`, `Int`, `Null` | the text, `""` for `Null` |
//! | flag | `Bool`, `Int` 0/1, `Text` `0`/`1`/`true`/`false` | `"0"` or `"1"` |
//! | counter | non-negative `Int`, decimal `Text`, `Null`/`""` | decimal, `"0"` when unset |
//! | timestamp | `Timestamp`, RFC3339 `Text`, `Null`/`""` | RFC3339 UTC, `""` when unset |

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{Operation, ProcedureError};
use crate::store::{FieldKind, encode_flag, format_timestamp, parse_timestamp};

/// A single loosely-typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

impl ParamValue {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Text(_) => "text",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Timestamp(_) => "timestamp",
        }
    }

    /// Text view of the value. Integers are rendered in decimal.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ParamValue::Text(s) => Some(Cow::Borrowed(s)),
            ParamValue::Int(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Boolean view of the value, if it has one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Int(0) => Some(false),
            ParamValue::Int(1) => Some(true),
            ParamValue::Text(s) => match s.as_str() {
                "1" => Some(true),
                "0" => Some(false),
                s if s.eq_ignore_ascii_case("true") => Some(true),
                s if s.eq_ignore_ascii_case("false") => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Coerces the value into the stored encoding for a field kind.
    ///
    /// Returns the rejection reason when the value has no encoding in that kind.
    pub fn encode(&self, kind: FieldKind) -> std::result::Result<String, String> {
        match kind {
            FieldKind::Text => match self {
                ParamValue::Null => Ok(String::new()),
                other => other
                    .as_text()
                    .map(Cow::into_owned)
                    .ok_or_else(|| format!("expected text, got {}", other.type_name())),
            },
            FieldKind::Flag => self
                .as_flag()
                .map(|b| encode_flag(b).to_string())
                .ok_or_else(|| format!("expected a boolean, got {}", self.describe())),
            FieldKind::Counter => match self {
                ParamValue::Null => Ok("0".to_string()),
                ParamValue::Int(n) => u32::try_from(*n)
                    .map(|n| n.to_string())
                    .map_err(|_| format!("expected a non-negative integer, got {n}")),
                ParamValue::Text(s) if s.is_empty() => Ok("0".to_string()),
                ParamValue::Text(s) => s
                    .parse::<u32>()
                    .map(|n| n.to_string())
                    .map_err(|_| format!("expected a non-negative integer, got '{s}'")),
                other => Err(format!(
                    "expected a non-negative integer, got {}",
                    other.describe()
                )),
            },
            FieldKind::Timestamp => match self {
                ParamValue::Null => Ok(String::new()),
                ParamValue::Text(s) if s.is_empty() => Ok(String::new()),
                ParamValue::Timestamp(t) => Ok(format_timestamp(t)),
                ParamValue::Text(s) => parse_timestamp(s)
                    .map(|t| format_timestamp(&t))
                    .ok_or_else(|| format!("expected an RFC3339 timestamp, got '{s}'")),
                other => Err(format!("expected a timestamp, got {}", other.type_name())),
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            ParamValue::Text(s) => format!("'{s}'"),
            ParamValue::Int(n) => n.to_string(),
            other => other.type_name().to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// The named parameter set passed to a procedure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Parameters::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Validating view of a parameter set for one operation.
///
/// Every rejection is reported as `ProcedureError::InvalidParameters` naming
/// the operation and parameter.
pub(crate) struct ParamReader<'a> {
    operation: Operation,
    params: &'a Parameters,
}

impl<'a> ParamReader<'a> {
    pub(crate) fn new(operation: Operation, params: &'a Parameters) -> Self {
        Self { operation, params }
    }

    /// A text parameter that must be present and non-empty.
    pub(crate) fn required_text(&self, name: &str) -> Result<String, ProcedureError> {
        let value = self.present(name)?;
        let text = value.as_text().ok_or_else(|| {
            self.invalid(name, format!("expected text, got {}", value.type_name()))
        })?;
        if text.is_empty() {
            return Err(self.invalid(name, "must not be empty"));
        }
        Ok(text.into_owned())
    }

    /// A parameter that must be present, coerced to the stored form of `kind`.
    pub(crate) fn required_field(
        &self,
        name: &str,
        kind: FieldKind,
    ) -> Result<String, ProcedureError> {
        let value = self.present(name)?;
        value.encode(kind).map_err(|reason| self.invalid(name, reason))
    }

    /// A parameter that may be absent, in which case it encodes as `Null`.
    pub(crate) fn optional_field(
        &self,
        name: &str,
        kind: FieldKind,
    ) -> Result<String, ProcedureError> {
        self.params
            .get(name)
            .unwrap_or(&ParamValue::Null)
            .encode(kind)
            .map_err(|reason| self.invalid(name, reason))
    }

    fn present(&self, name: &str) -> Result<&'a ParamValue, ProcedureError> {
        self.params
            .get(name)
            .ok_or_else(|| self.invalid(name, "missing"))
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> ProcedureError {
        ProcedureError::InvalidParameters {
            operation: self.operation.as_str().to_string(),
            parameter: name.to_string(),
            reason: reason.into(),
        }
    }
}
