//! Typed field values
//!
//! A bindable field is one of a closed set of shapes built over a scalar
//! leaf type `T`:
//!
//! | shape               | [`FieldKind`]                      |
//! |---------------------|------------------------------------|
//! | `T`                 | `Scalar`                           |
//! | `Option<T>`         | `Optional(Scalar)`                 |
//! | `Vec<T>`            | `Sequence(Scalar)`                 |
//! | `Option<Vec<T>>`    | `Optional(Sequence(Scalar))`       |
//! | `Vec<Option<T>>`    | `Sequence(Optional(Scalar))`       |
//! | `Option<FormFile>`  | `File`                             |
//!
//! Leaf types implement [`Scalar`]. Strings, booleans and every integer width
//! are built in; any `FromStr + Display` type can be opted in with
//! [`parseable!`](crate::parseable).
//!
//! An empty raw value means "absent" for every leaf kind except strings:
//! a scalar keeps its current value, an optional becomes `None`, and an
//! element of `Vec<Option<T>>` is `None`. Elements of `Vec<T>` and
//! `Option<Vec<T>>` have no absent form; an empty one must convert like any
//! other value.

use std::fmt;

use crate::errors::ErrorKind;
use crate::file::FormFile;
use crate::rules::RuleSet;

// ============================================================================
// Kinds
// ============================================================================

/// Leaf value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Bool,
    String,
    /// Type with its own string conversion; holds the type name
    Parseable(&'static str),
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("integer"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("String"),
            Self::Parseable(name) => f.write_str(name),
        }
    }
}

/// Shape of a bindable field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Optional(Box<FieldKind>),
    Sequence(Box<FieldKind>),
    /// Optional uploaded file
    File,
}

impl FieldKind {
    /// Whether the field holds several values
    pub fn is_sequence(&self) -> bool {
        match self {
            Self::Sequence(_) => true,
            Self::Optional(inner) => inner.is_sequence(),
            Self::Scalar(_) | Self::File => false,
        }
    }

    /// Leaf kind, `None` for files
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Optional(inner) | Self::Sequence(inner) => inner.scalar(),
            Self::File => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::Optional(inner) => write!(f, "Option<{}>", inner),
            Self::Sequence(inner) => write!(f, "Vec<{}>", inner),
            Self::File => f.write_str("Option<FormFile>"),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Leaf type convertible to and from one raw string
pub trait Scalar: Sized {
    fn scalar_kind() -> ScalarKind;

    /// Convert one raw value. `rules` carries the integer bounds.
    fn parse_raw(raw: &str, rules: &RuleSet) -> Result<Self, ErrorKind>;

    /// Raw representation, the inverse of [`Scalar::parse_raw`]
    fn to_raw(&self) -> String;

    /// Whether the value is its type's zero value
    fn is_zero_value(&self) -> bool {
        false
    }
}

/// Type-erased access to one record field
///
/// Implemented for every supported shape; see the module documentation.
pub trait Bindable {
    fn kind(&self) -> FieldKind;

    /// Replace the field's value with the converted raw values.
    ///
    /// Sequences are converted all-or-nothing: on error the field keeps its
    /// previous value.
    fn assign(&mut self, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind>;

    /// Raw representation of the current value; `None` when absent
    fn render(&self) -> Option<Vec<String>>;

    /// Whether the value is its shape's zero value
    fn is_zero(&self) -> bool;

    /// The file slot, for the file shape only
    fn as_file_mut(&mut self) -> Option<&mut Option<FormFile>> {
        None
    }

    /// The uploaded file, if this is a file field holding one
    fn as_file(&self) -> Option<&FormFile> {
        None
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// An empty raw value stands for "no value" except for strings
fn is_absent<T: Scalar>(raw: &str) -> bool {
    raw.is_empty() && T::scalar_kind() != ScalarKind::String
}

fn parse_element<T: Scalar>(raw: &str, rules: &RuleSet) -> Result<Option<T>, ErrorKind> {
    if is_absent::<T>(raw) {
        return Ok(None);
    }
    T::parse_raw(raw, rules).map(Some)
}

fn parse_all<T: Scalar>(raw: &[String], rules: &RuleSet) -> Result<Vec<T>, ErrorKind> {
    raw.iter().map(|value| T::parse_raw(value, rules)).collect()
}

#[doc(hidden)]
pub fn assign_scalar<T: Scalar>(slot: &mut T, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind> {
    if let Some(first) = raw.first() {
        if let Some(value) = parse_element(first, rules)? {
            *slot = value;
        }
    }
    Ok(())
}

#[doc(hidden)]
pub fn render_scalar<T: Scalar>(value: &T) -> Option<Vec<String>> {
    Some(vec![value.to_raw()])
}

impl<T: Scalar> Bindable for Option<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Optional(Box::new(FieldKind::Scalar(T::scalar_kind())))
    }

    fn assign(&mut self, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind> {
        if let Some(first) = raw.first() {
            *self = parse_element(first, rules)?;
        }
        Ok(())
    }

    fn render(&self) -> Option<Vec<String>> {
        self.as_ref().map(|value| vec![value.to_raw()])
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: Scalar> Bindable for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence(Box::new(FieldKind::Scalar(T::scalar_kind())))
    }

    fn assign(&mut self, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind> {
        *self = parse_all(raw, rules)?;
        Ok(())
    }

    fn render(&self) -> Option<Vec<String>> {
        Some(self.iter().map(Scalar::to_raw).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Scalar> Bindable for Option<Vec<T>> {
    fn kind(&self) -> FieldKind {
        FieldKind::Optional(Box::new(FieldKind::Sequence(Box::new(FieldKind::Scalar(
            T::scalar_kind(),
        )))))
    }

    fn assign(&mut self, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind> {
        *self = Some(parse_all(raw, rules)?);
        Ok(())
    }

    fn render(&self) -> Option<Vec<String>> {
        self.as_ref()
            .map(|values| values.iter().map(Scalar::to_raw).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: Scalar> Bindable for Vec<Option<T>> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence(Box::new(FieldKind::Optional(Box::new(FieldKind::Scalar(
            T::scalar_kind(),
        )))))
    }

    fn assign(&mut self, raw: &[String], rules: &RuleSet) -> Result<(), ErrorKind> {
        *self = raw
            .iter()
            .map(|value| parse_element(value, rules))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    // Absent elements render as "", except for strings where "" is a value
    fn render(&self) -> Option<Vec<String>> {
        let keep_absent = T::scalar_kind() != ScalarKind::String;
        Some(
            self.iter()
                .filter_map(|value| match value {
                    Some(value) => Some(value.to_raw()),
                    None => keep_absent.then(String::new),
                })
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Bindable for Option<FormFile> {
    fn kind(&self) -> FieldKind {
        FieldKind::File
    }

    // Files never come from a source map
    fn assign(&mut self, _raw: &[String], _rules: &RuleSet) -> Result<(), ErrorKind> {
        Ok(())
    }

    fn render(&self) -> Option<Vec<String>> {
        None
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn as_file_mut(&mut self) -> Option<&mut Option<FormFile>> {
        Some(self)
    }

    fn as_file(&self) -> Option<&FormFile> {
        self.as_ref()
    }
}

// ============================================================================
// Macros
// ============================================================================

/// Implement [`Bindable`] for a bare [`Scalar`] type
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_bindable {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::Bindable for $t {
            fn kind(&self) -> $crate::FieldKind {
                $crate::FieldKind::Scalar(<$t as $crate::Scalar>::scalar_kind())
            }

            fn assign(
                &mut self,
                raw: &[::std::string::String],
                rules: &$crate::RuleSet,
            ) -> ::std::result::Result<(), $crate::ErrorKind> {
                $crate::value::assign_scalar(self, raw, rules)
            }

            fn render(&self) -> ::std::option::Option<::std::vec::Vec<::std::string::String>> {
                $crate::value::render_scalar(self)
            }

            fn is_zero(&self) -> bool {
                <$t as $crate::Scalar>::is_zero_value(self)
            }
        }
    )+};
}

/// Make `FromStr + Display` types bindable.
///
/// Parse errors are reported with the type's own message.
///
/// # Example
///
/// ```
/// use std::fmt;
/// use std::str::FromStr;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Version(u32, u32);
///
/// impl FromStr for Version {
///     type Err = String;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         let (major, minor) = s.split_once('.').ok_or("missing dot")?;
///         let major = major.parse().map_err(|_| "bad major")?;
///         let minor = minor.parse().map_err(|_| "bad minor")?;
///         Ok(Version(major, minor))
///     }
/// }
///
/// impl fmt::Display for Version {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}.{}", self.0, self.1)
///     }
/// }
///
/// ouroboros_params::parseable!(Version);
///
/// use ouroboros_params::{Bindable, RuleSet};
///
/// let mut version: Option<Version> = None;
/// version.assign(&["1.2".to_string()], &RuleSet::default()).unwrap();
/// assert_eq!(version, Some(Version(1, 2)));
/// ```
#[macro_export]
macro_rules! parseable {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::Scalar for $t {
            fn scalar_kind() -> $crate::ScalarKind {
                $crate::ScalarKind::Parseable(::std::stringify!($t))
            }

            fn parse_raw(
                raw: &str,
                _rules: &$crate::RuleSet,
            ) -> ::std::result::Result<Self, $crate::ErrorKind> {
                <$t as ::std::str::FromStr>::from_str(raw)
                    .map_err(|err| $crate::ErrorKind::Parse(::std::string::ToString::to_string(&err)))
            }

            fn to_raw(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(self)
            }
        }

        $crate::__impl_bindable!($t);
    )+};
}

// ============================================================================
// Built-in scalars
// ============================================================================

impl Scalar for String {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::String
    }

    fn parse_raw(raw: &str, _rules: &RuleSet) -> Result<Self, ErrorKind> {
        Ok(raw.to_string())
    }

    fn to_raw(&self) -> String {
        self.clone()
    }

    fn is_zero_value(&self) -> bool {
        self.is_empty()
    }
}

impl Scalar for bool {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::Bool
    }

    fn parse_raw(raw: &str, _rules: &RuleSet) -> Result<Self, ErrorKind> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ErrorKind::InvalidBoolean),
        }
    }

    fn to_raw(&self) -> String {
        self.to_string()
    }

    fn is_zero_value(&self) -> bool {
        !*self
    }
}

macro_rules! int_scalar {
    ($($t:ty),+) => {$(
        impl Scalar for $t {
            fn scalar_kind() -> ScalarKind {
                ScalarKind::Int
            }

            fn parse_raw(raw: &str, rules: &RuleSet) -> Result<Self, ErrorKind> {
                let number: i128 = raw.parse().map_err(|_| ErrorKind::InvalidInteger)?;
                rules.check_bounds(number)?;
                <$t>::try_from(number).map_err(|_| ErrorKind::InvalidInteger)
            }

            fn to_raw(&self) -> String {
                self.to_string()
            }

            fn is_zero_value(&self) -> bool {
                *self == 0
            }
        }
    )+};
}

int_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

crate::__impl_bindable!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($t:ty),+) => {$(
        impl Scalar for $t {
            fn scalar_kind() -> ScalarKind {
                ScalarKind::Parseable(stringify!($t))
            }

            fn parse_raw(raw: &str, _rules: &RuleSet) -> Result<Self, ErrorKind> {
                raw.parse().map_err(|err: std::num::ParseFloatError| ErrorKind::Parse(err.to_string()))
            }

            fn to_raw(&self) -> String {
                self.to_string()
            }

            fn is_zero_value(&self) -> bool {
                *self == 0.0
            }
        }
    )+};
}

float_scalar!(f32, f64);

crate::__impl_bindable!(f32, f64);
