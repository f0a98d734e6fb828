//! Entity data shapes exchanged verbatim with the backend, plus the form and
//! validation seams the update screens use.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod job;
pub mod sales;

pub use job::Job;
pub use sales::Sales;

/// A persisted record type exposed through the REST API.
///
/// `Default` is the empty, not-yet-persisted entity a "new" route starts from.
pub trait Entity:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// REST resource path relative to the server endpoint, e.g. `api/jobs`.
    const RESOURCE_PATH: &'static str;
    /// Route segment of the entity feature, e.g. `job`.
    const ROUTE: &'static str;
    const PAGE_TITLE: &'static str;

    /// Server-assigned identifier; `None` means the entity was never saved.
    fn id(&self) -> Option<i64>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
}

/// One failed constraint on one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Required => write!(f, "{} is required", self.field),
            ViolationKind::MinLength { min, actual } => write!(
                f,
                "{} must be at least {} characters (got {})",
                self.field, min, actual
            ),
            ViolationKind::MaxLength { max, actual } => write!(
                f,
                "{} cannot be longer than {} characters (got {})",
                self.field, max, actual
            ),
        }
    }
}

/// Pure field-level validation. An empty result means the form may be submitted.
pub trait Validate {
    fn validate(&self) -> Vec<FieldViolation>;
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Translates raw user input into the typed entity.
///
/// `None` and the empty string both clear a field.
pub trait Form {
    const FIELDS: &'static [&'static str];

    fn set_field(&mut self, field: &str, value: Option<&str>) -> Result<(), FormError>;
}

/// Parses an identifier field; blank input clears it.
pub(crate) fn parse_id_field(field: &str, value: Option<&str>) -> Result<Option<i64>, FormError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| FormError::InvalidValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Parses a `field=value` pair as typed on the command line.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('=').map(|(k, v)| (k.trim(), v))
}
