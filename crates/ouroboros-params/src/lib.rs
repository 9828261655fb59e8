//! Ouroboros Params
//!
//! Request parameter binding for the Ouroboros framework.
//!
//! Raw values arrive grouped by source (`url`, `query`, `form`, ...) and are
//! bound into a typed record. Each field declares where it comes from and how
//! it is checked, in struct-tag style metadata:
//!
//! ```text
//! from:"query" json:"per_page,omitempty" params:"required,trim" maxlen:"3" default:"20"
//! ```
//!
//! Binding runs, per field: default substitution, transformation (`trim`),
//! validation, then conversion to the field's type. The reverse operation,
//! [`extract`], turns a record back into its sources.
//!
//! # Features
//!
//! - **derive** (default): `#[derive(Params)]` to list a record's fields
//!
//! # Example
//!
//! ```rust
//! use ouroboros_params::{Binder, ErrorKind, Params, SourceMap, Values};
//!
//! #[derive(Params, Default)]
//! struct UpdateUser {
//!     #[param(from = "url", name = "id", rules = "uuid,required")]
//!     id: String,
//!     #[param(from = "form", name = "email", rules = "email")]
//!     email: Option<String>,
//!     #[param(from = "form", name = "tags", maxlen = 16)]
//!     tags: Vec<String>,
//! }
//!
//! let mut sources = SourceMap::new();
//! sources.insert("url".to_string(), Values::parse_urlencoded("id=not-a-uuid"));
//! sources.insert("form".to_string(), Values::parse_urlencoded("tags=a&tags=b"));
//!
//! let mut params = UpdateUser::default();
//! let err = Binder::new(&mut params).parse(&sources, None).unwrap_err();
//! assert_eq!(err.field(), Some("id"));
//! assert_eq!(err.kind(), Some(&ErrorKind::InvalidUuid));
//! ```

// Public modules
pub mod binder;
pub mod config;
pub mod errors;
pub mod extract;
pub mod field;
pub mod file;
pub mod filetype;
pub mod formats;
pub mod record;
pub mod rules;
pub mod tag;
pub mod value;
pub mod values;

// Re-export commonly used types
pub use binder::Binder;
pub use config::{BindConfig, DEFAULT_FILE_SOURCE};
pub use errors::{
    ConfigError, ContentError, ErrorKind, FieldError, InvalidRecord, ParamsError, ParamsResult,
};
pub use extract::{extract, extract_with_config, FileMap};
pub use field::{FieldDescriptor, FieldMut, FieldRef, TargetMut, TargetRef, ValueSlot};
pub use file::{FileHeader, FileProvider, FileSlot, FormFile, ProviderError, ReadSeek};
pub use record::{Params, Validate};
pub use rules::RuleSet;
pub use tag::Tag;
pub use value::{Bindable, FieldKind, Scalar, ScalarKind};
pub use values::{SourceMap, Values};

// Accepted image formats are configured with the `image` crate's type
pub use image::ImageFormat;

#[cfg(feature = "derive")]
pub use ouroboros_params_derive::Params;
