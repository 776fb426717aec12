//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use pagination::{SortDirection, SortDirectionParseError};
use serde_json::json;

use crate::domain::{Error, SortFieldParseError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    BlankField,
    InvalidSortField,
    InvalidSortOrder,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BlankField => "blank_field",
            ErrorCode::InvalidSortField => "invalid_sort_field",
            ErrorCode::InvalidSortOrder => "invalid_sort_order",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn blank_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be blank"))
        .with_code(ErrorCode::BlankField)
}

/// Parse an optional sort field query value.
///
/// Absent or blank values fall back to the listing's default column.
pub(crate) fn parse_sort_field<F>(value: Option<&str>, field: FieldName) -> Result<F, Error>
where
    F: FromStr<Err = SortFieldParseError> + Default,
{
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(F::default());
    };
    raw.parse().map_err(|error: SortFieldParseError| {
        ValidationError::new(field.as_str(), error.to_string())
            .with_value(ErrorCode::InvalidSortField, raw)
    })
}

/// Parse an optional sort order query value, defaulting to ascending.
pub(crate) fn parse_sort_order(
    value: Option<&str>,
    field: FieldName,
) -> Result<SortDirection, Error> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(SortDirection::default());
    };
    raw.parse().map_err(|error: SortDirectionParseError| {
        ValidationError::new(field.as_str(), error.to_string())
            .with_value(ErrorCode::InvalidSortOrder, raw)
    })
}
