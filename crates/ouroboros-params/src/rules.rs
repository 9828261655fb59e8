//! Per-field rule sets
//!
//! A [`RuleSet`] is the normalized form of the validation and transformation
//! options declared in a field's metadata:
//!
//! | key        | meaning                                                  |
//! |------------|----------------------------------------------------------|
//! | `json`     | external name, `-` to ignore the field                   |
//! | `maxlen`   | maximum length in characters                             |
//! | `enum`     | comma separated list of accepted values                  |
//! | `params`   | flags: `required,noempty,trim,uuid,slug,slugOrUUID,...`  |
//! | `min_int`  | inclusive lower bound for integer values                 |
//! | `max_int`  | inclusive upper bound for integer values                 |
//!
//! # Example
//!
//! ```
//! use ouroboros_params::{ErrorKind, RuleSet, Tag};
//!
//! let rules = RuleSet::parse(&Tag::new(r#"json:"field_name" maxlen:"3""#)).unwrap();
//! let err = rules.validate("too many chars", true).unwrap_err();
//! assert_eq!(err.field, "field_name");
//! assert_eq!(err.kind, ErrorKind::MaxLenExceeded);
//! ```

use std::io::{Read, Seek};

use image::ImageFormat;
use tracing::debug;

use crate::errors::{ConfigError, ContentError, ErrorKind, FieldError};
use crate::filetype;
use crate::formats;
use crate::tag::Tag;

/// Parsed validation and transformation options of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Skip the field entirely
    pub ignore: bool,
    /// External name; `None` when not declared
    pub name: Option<String>,
    /// Omit zero values on extraction
    pub omit_empty: bool,
    /// Maximum length, in characters
    pub max_len: Option<usize>,
    /// Accepted values; empty means any value
    pub allowed_values: Vec<String>,
    /// The value must be present and non-empty
    pub required: bool,
    /// The value may be omitted but cannot be empty
    pub no_empty: bool,
    /// Strip surrounding whitespace before validation
    pub trim: bool,
    pub validate_uuid: bool,
    pub validate_slug: bool,
    pub validate_slug_or_uuid: bool,
    pub validate_email: bool,
    pub validate_url: bool,
    pub validate_image: bool,
    /// Inclusive lower bound for integer values
    pub min_int: Option<i64>,
    /// Inclusive upper bound for integer values
    pub max_int: Option<i64>,
}

impl RuleSet {
    /// Parse the options declared in `tag`.
    ///
    /// Options that are absent or empty are left unset. Only a numeric option
    /// that is present but not an integer is an error.
    pub fn parse(tag: &Tag) -> Result<Self, ConfigError> {
        let mut rules = RuleSet::naming(tag);

        rules.max_len = parse_number(tag, "maxlen")?;
        rules.min_int = parse_number(tag, "min_int")?;
        rules.max_int = parse_number(tag, "max_int")?;

        if let Some(values) = tag.get("enum") {
            for value in values.split(',').filter(|v| !v.is_empty()) {
                if !rules.allowed_values.iter().any(|v| v == value) {
                    rules.allowed_values.push(value.to_string());
                }
            }
        }

        if let Some(flags) = tag.get("params") {
            for flag in flags.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match flag {
                    "ignore" => rules.ignore = true,
                    "required" => rules.required = true,
                    "noempty" => rules.no_empty = true,
                    "trim" => rules.trim = true,
                    "uuid" => rules.validate_uuid = true,
                    "email" => rules.validate_email = true,
                    "url" => rules.validate_url = true,
                    "slug" => rules.validate_slug = true,
                    "slugOrUUID" | "slugOrUuid" => rules.validate_slug_or_uuid = true,
                    "image" => rules.validate_image = true,
                    unknown => debug!("ignoring unknown params flag {:?}", unknown),
                }
            }
        }

        Ok(rules)
    }

    /// Parse only the naming options (`json` and the `ignore` flag).
    ///
    /// Never fails; used where the validation options do not matter.
    pub fn naming(tag: &Tag) -> Self {
        let mut rules = RuleSet::default();

        if let Some(json) = tag.get("json") {
            let mut parts = json.split(',');
            let name = parts.next().unwrap_or_default();
            if name == "-" {
                rules.ignore = true;
            } else if !name.is_empty() {
                rules.name = Some(name.to_string());
            }
            rules.omit_empty = parts.any(|opt| opt == "omitempty");
        }

        if let Some(flags) = tag.get("params") {
            if flags.split(',').any(|flag| flag.trim() == "ignore") {
                rules.ignore = true;
            }
        }

        rules
    }

    /// Name used to attribute errors
    pub fn field_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Apply the declared transformations to a raw value
    pub fn apply_transformations(&self, value: &str) -> String {
        if self.trim {
            value.trim().to_string()
        } else {
            value.to_string()
        }
    }

    /// Validate a raw value.
    ///
    /// `was_provided` tells whether the value came from the input rather than
    /// being absent. Checks run in a fixed order and the first failure wins.
    /// Format checks never run on an empty value.
    pub fn validate(&self, value: &str, was_provided: bool) -> Result<(), FieldError> {
        self.check(value, was_provided)
            .map_err(|kind| FieldError::new(self.field_name(), kind))
    }

    fn check(&self, value: &str, was_provided: bool) -> Result<(), ErrorKind> {
        if self.required && (!was_provided || value.is_empty()) {
            return Err(ErrorKind::MissingParameter);
        }

        if self.no_empty && was_provided && value.is_empty() {
            return Err(ErrorKind::EmptyParameter);
        }

        if value.is_empty() {
            return Ok(());
        }

        if let Some(max_len) = self.max_len {
            if value.chars().count() > max_len {
                return Err(ErrorKind::MaxLenExceeded);
            }
        }

        if !self.allowed_values.is_empty() && !self.allowed_values.iter().any(|v| v == value) {
            return Err(ErrorKind::EnumViolation);
        }

        if self.validate_uuid && !formats::is_uuid(value) {
            return Err(ErrorKind::InvalidUuid);
        }

        if self.validate_slug && !formats::is_slug(value) {
            return Err(ErrorKind::InvalidSlug);
        }

        if self.validate_slug_or_uuid && !formats::is_slug_or_uuid(value) {
            return Err(ErrorKind::InvalidSlugOrUuid);
        }

        if self.validate_email && !formats::is_email(value) {
            return Err(ErrorKind::InvalidEmail);
        }

        if self.validate_url && !formats::is_url(value) {
            return Err(ErrorKind::InvalidUrl);
        }

        if self.min_int.is_some() || self.max_int.is_some() {
            let number: i128 = value.parse().map_err(|_| ErrorKind::InvalidInteger)?;
            self.check_bounds(number)?;
        }

        Ok(())
    }

    /// Enforce `min_int` / `max_int` on an integer value
    pub fn check_bounds(&self, number: i128) -> Result<(), ErrorKind> {
        if let Some(min) = self.min_int {
            if number < i128::from(min) {
                return Err(ErrorKind::IntegerTooSmall);
            }
        }
        if let Some(max) = self.max_int {
            if number > i128::from(max) {
                return Err(ErrorKind::IntegerTooBig);
            }
        }
        Ok(())
    }

    /// Check the content of an uploaded stream against the default image
    /// formats. See [`RuleSet::validate_file_content_with`].
    pub fn validate_file_content<R>(&self, stream: &mut R) -> Result<String, ContentError>
    where
        R: Read + Seek + ?Sized,
    {
        self.validate_file_content_with(stream, filetype::DEFAULT_IMAGE_FORMATS)
    }

    /// Check the content of an uploaded stream.
    ///
    /// Without the `image` flag nothing is read and the returned mime type is
    /// empty. With it, the stream must hold an image in one of `formats`; the
    /// detected mime type is returned and the stream is left at its start.
    pub fn validate_file_content_with<R>(
        &self,
        stream: &mut R,
        formats: &[ImageFormat],
    ) -> Result<String, ContentError>
    where
        R: Read + Seek + ?Sized,
    {
        if !self.validate_image {
            return Ok(String::new());
        }
        filetype::image_mime_type(stream, formats)
    }
}

/// Parse an optional numeric option; empty counts as unset
fn parse_number<T>(tag: &Tag, option: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match tag.get(option) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|source| ConfigError {
            option,
            value: raw,
            source,
        }),
    }
}
