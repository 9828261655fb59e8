//! Binding error types
//!
//! Binding is fail-fast: the first failing field stops the walk and its error
//! is returned as-is. Field-level failures always carry the field's external
//! name so they can be shown to the caller without leaking the declared
//! identifier.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::num::ParseIntError;

use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::file::ProviderError;
use crate::value::FieldKind;

/// Binding result type
pub type ParamsResult<T> = Result<T, ParamsError>;

// ============================================================================
// Top-level Error
// ============================================================================

/// Errors returned by [`Binder::parse`](crate::Binder::parse)
#[derive(Error, Debug)]
pub enum ParamsError {
    /// Malformed field metadata
    #[error("invalid metadata on field {field}: {source}")]
    Config {
        field: &'static str,
        #[source]
        source: ConfigError,
    },

    /// The field has no `from` source
    #[error("no source set for field {0}")]
    NoSourceConfigured(&'static str),

    /// The field's `from` source is not part of the source map
    #[error("source {source_name} for field {field} does not exist")]
    UnknownSource {
        field: &'static str,
        source_name: String,
    },

    /// The field cannot be written by the binder
    #[error("field {0} could not be set")]
    FieldNotSettable(&'static str),

    /// A file field is declared with a shape that cannot hold a file
    #[error("invalid type {found} for field {field}: the only accepted type for a file is {}", FieldKind::File)]
    WrongType {
        field: &'static str,
        found: FieldKind,
    },

    /// A single field failed validation or conversion
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The record-level validation hook rejected the record
    #[error(transparent)]
    Record(#[from] InvalidRecord),

    /// The file provider failed for a reason other than a missing file
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Reading or seeking an uploaded stream failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParamsError {
    /// External name of the field a validation error is attributed to
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Field(err) => Some(&err.field),
            Self::Record(err) => Some(&err.field),
            _ => None,
        }
    }

    /// Validation kind, for field-level failures
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Field(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Returns true if the error comes from user input rather than from the
    /// record definition or the transport
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Field(_) | Self::Record(_))
    }
}

// ============================================================================
// Metadata Errors
// ============================================================================

/// A numeric metadata option that is present but not a valid integer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value {value:?} for {option}: {source}")]
pub struct ConfigError {
    /// Metadata key (`maxlen`, `min_int`, `max_int`)
    pub option: &'static str,
    /// Raw value found in the metadata
    pub value: String,
    #[source]
    pub source: ParseIntError,
}

// ============================================================================
// Field Errors
// ============================================================================

/// Validation or conversion failure attributed to one field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {kind}")]
pub struct FieldError {
    /// External name of the field
    pub field: String,
    /// What went wrong
    pub kind: ErrorKind,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 3)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("error_type", self.kind.code())?;
        state.serialize_field("message", &self.kind.to_string())?;
        state.end()
    }
}

/// Classification of field failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    MissingParameter,
    EmptyParameter,
    MaxLenExceeded,
    EnumViolation,
    InvalidUuid,
    InvalidSlug,
    InvalidSlugOrUuid,
    InvalidEmail,
    InvalidUrl,
    InvalidInteger,
    IntegerTooSmall,
    IntegerTooBig,
    InvalidBoolean,
    InvalidImage,
    EmptyFile,
    UnsupportedImageFormat,
    /// A parseable type rejected the value; holds the type's own message
    Parse(String),
}

impl ErrorKind {
    /// Stable snake-case code, suitable for API payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::EmptyParameter => "empty_parameter",
            Self::MaxLenExceeded => "max_len_exceeded",
            Self::EnumViolation => "enum_violation",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidSlug => "invalid_slug",
            Self::InvalidSlugOrUuid => "invalid_slug_or_uuid",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidUrl => "invalid_url",
            Self::InvalidInteger => "invalid_integer",
            Self::IntegerTooSmall => "integer_too_small",
            Self::IntegerTooBig => "integer_too_big",
            Self::InvalidBoolean => "invalid_boolean",
            Self::InvalidImage => "invalid_image",
            Self::EmptyFile => "empty_file",
            Self::UnsupportedImageFormat => "unsupported_image_format",
            Self::Parse(_) => "parse_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingParameter => "parameter missing",
            Self::EmptyParameter => "parameter can be omitted but not empty",
            Self::MaxLenExceeded => "too many chars",
            Self::EnumViolation => "not a valid value",
            Self::InvalidUuid => "not a valid uuid",
            Self::InvalidSlug => "not a valid slug",
            Self::InvalidSlugOrUuid => "not a valid slug nor a valid uuid",
            Self::InvalidEmail => "not a valid email",
            Self::InvalidUrl => "not a valid url",
            Self::InvalidInteger => "not a valid integer",
            Self::IntegerTooSmall => "value too small",
            Self::IntegerTooBig => "value too big",
            Self::InvalidBoolean => "not a valid boolean",
            Self::InvalidImage => "not a valid image",
            Self::EmptyFile => "file is empty",
            Self::UnsupportedImageFormat => "format not supported",
            Self::Parse(message) => message,
        };
        f.write_str(message)
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// ============================================================================
// Record Errors
// ============================================================================

/// Rejection returned by a record-level [`Validate`](crate::Validate) hook
#[derive(Error, Debug)]
#[error("{field}: {cause}")]
pub struct InvalidRecord {
    /// External name of the field the failure is reported on
    pub field: String,
    /// Why the record is invalid
    #[source]
    pub cause: Box<dyn StdError + Send + Sync>,
}

impl InvalidRecord {
    /// Create a new record rejection
    pub fn new(
        field: impl Into<String>,
        cause: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            field: field.into(),
            cause: cause.into(),
        }
    }
}

// ============================================================================
// File Content Errors
// ============================================================================

/// Failure while checking the content of an uploaded stream
///
/// I/O failures are kept untouched; content failures are not yet attributed
/// to a field.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Invalid(ErrorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("field_name", ErrorKind::MaxLenExceeded);
        assert_eq!(err.to_string(), "field_name: too many chars");
    }

    #[test]
    fn test_structural_error_display() {
        assert_eq!(
            ParamsError::NoSourceConfigured("ID").to_string(),
            "no source set for field ID"
        );
        assert_eq!(
            ParamsError::UnknownSource {
                field: "ID",
                source_name: "somewhere".to_string(),
            }
            .to_string(),
            "source somewhere for field ID does not exist"
        );
        assert_eq!(
            ParamsError::FieldNotSettable("id").to_string(),
            "field id could not be set"
        );
    }

    #[test]
    fn test_parse_kind_keeps_message() {
        let kind = ErrorKind::Parse("invalid date format".to_string());
        assert_eq!(kind.to_string(), "invalid date format");
        assert_eq!(kind.code(), "parse_error");
    }

    #[test]
    fn test_accessors() {
        let err: ParamsError = FieldError::new("id", ErrorKind::InvalidUuid).into();
        assert_eq!(err.field(), Some("id"));
        assert_eq!(err.kind(), Some(&ErrorKind::InvalidUuid));
        assert!(err.is_validation());

        let err = ParamsError::NoSourceConfigured("ID");
        assert_eq!(err.field(), None);
        assert!(!err.is_validation());
    }

    #[test]
    fn test_record_error_display() {
        let err = InvalidRecord::new("true_to_fail", "cannot be set to true");
        assert_eq!(err.to_string(), "true_to_fail: cannot be set to true");
    }

    #[test]
    fn test_content_error_display() {
        let err = ContentError::Invalid(ErrorKind::InvalidImage);
        assert_eq!(err.to_string(), "not a valid image");
    }
}
