//! Bindable records
//!
//! A record lists its fields, in declaration order, through [`Params`].
//! The list is usually generated with `#[derive(Params)]`:
//!
//! ```
//! use ouroboros_params::{Binder, Params, SourceMap, Values};
//!
//! #[derive(Params, Default)]
//! struct ListUsers {
//!     #[param(from = "query", name = "page", default = "1", min_int = 1)]
//!     page: u32,
//!     #[param(from = "query", name = "q", rules = "trim")]
//!     search: Option<String>,
//! }
//!
//! let mut sources = SourceMap::new();
//! sources.insert("query".to_string(), Values::parse_urlencoded("q=+rust+"));
//!
//! let mut params = ListUsers::default();
//! Binder::new(&mut params).parse(&sources, None).unwrap();
//! assert_eq!(params.page, 1);
//! assert_eq!(params.search.as_deref(), Some("rust"));
//! ```

use crate::errors::InvalidRecord;
use crate::field::{FieldMut, FieldRef};

/// A record whose fields can be bound from a source map and extracted back
pub trait Params {
    /// Writable view of the fields, in declaration order
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;

    /// Read-only view of the fields, in declaration order
    fn fields(&self) -> Vec<FieldRef<'_>>;

    /// Record-level validation hook, run once every field is bound
    fn validator(&self) -> Option<&dyn Validate> {
        None
    }
}

/// Record-level validation
///
/// Use it for rules that span several fields. The error names the external
/// name of the field it should be reported on.
pub trait Validate {
    fn is_valid(&self) -> Result<(), InvalidRecord>;
}
