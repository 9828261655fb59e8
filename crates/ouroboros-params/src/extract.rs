//! Reverse binding
//!
//! Extraction turns a bound record back into the raw sources it could have
//! been bound from, which makes it possible to forward or replay a request.
//!
//! - absent values (`None`, a `None` sequence) are omitted
//! - an empty sequence is kept as a key with no value
//! - with `omitempty`, zero values are omitted as well
//! - files are collected in a separate map, keyed by external name

use std::collections::HashMap;

use tracing::trace;

use crate::config::BindConfig;
use crate::field::{FieldDescriptor, TargetRef};
use crate::file::FormFile;
use crate::record::Params;
use crate::values::SourceMap;

/// External name → uploaded file
pub type FileMap<'a> = HashMap<String, &'a FormFile>;

/// Extract a record with the default configuration.
///
/// A `None` record yields empty maps.
///
/// # Example
///
/// ```
/// use ouroboros_params::{extract, Params};
///
/// #[derive(Params)]
/// struct Search {
///     #[param(from = "query", name = "q")]
///     query: String,
///     #[param(from = "query", name = "page")]
///     page: Option<u32>,
/// }
///
/// let search = Search { query: "rust".to_string(), page: None };
/// let (sources, files) = extract(Some(&search));
/// assert_eq!(sources["query"].encode(), "q=rust");
/// assert!(files.is_empty());
/// ```
pub fn extract<P: Params>(record: Option<&P>) -> (SourceMap, FileMap<'_>) {
    extract_with_config(record.map(|record| record as &dyn Params), &BindConfig::default())
}

/// Extract a record using the file source of `config`
pub fn extract_with_config<'a>(
    record: Option<&'a dyn Params>,
    config: &BindConfig,
) -> (SourceMap, FileMap<'a>) {
    let mut sources = SourceMap::new();
    let mut files = FileMap::new();

    if let Some(record) = record {
        extract_record(record, config, &mut sources, &mut files);
    }

    (sources, files)
}

fn extract_record<'a>(
    record: &'a dyn Params,
    config: &BindConfig,
    sources: &mut SourceMap,
    files: &mut FileMap<'a>,
) {
    for field in record.fields() {
        let value = match field.target {
            TargetRef::Value(value) => value,
            TargetRef::Embedded(embedded) => {
                extract_record(embedded, config, sources, files);
                continue;
            }
            TargetRef::ReadOnly => continue,
        };

        let descriptor = FieldDescriptor::naming(field.name, &field.tag, value.kind());
        if descriptor.is_ignored() {
            continue;
        }
        let key = descriptor.key();

        if descriptor.is_file(&config.file_source) {
            if let Some(file) = value.as_file() {
                files.insert(key.to_string(), file);
            }
            continue;
        }

        let Some(raw) = value.render() else {
            trace!(field = key, "omitting absent value");
            continue;
        };
        if descriptor.omit_empty && value.is_zero() {
            trace!(field = key, "omitting empty value");
            continue;
        }

        // Without a source the value is grouped under its own name
        let source = descriptor.source.as_deref().unwrap_or(key);
        sources
            .entry(source.to_string())
            .or_default()
            .set_all(key, raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldRef;
    use crate::tag::Tag;

    struct Pair {
        left: Option<i32>,
        right: Vec<String>,
    }

    impl Params for Pair {
        fn fields_mut(&mut self) -> Vec<crate::field::FieldMut<'_>> {
            Vec::new()
        }

        fn fields(&self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::value("left", Tag::new(r#"from:"query" json:"left""#), &self.left),
                FieldRef::value("right", Tag::new(r#"from:"query" json:"right""#), &self.right),
            ]
        }
    }

    #[test]
    fn test_extract_none() {
        let (sources, files) = extract::<Pair>(None);
        assert!(sources.is_empty());
        assert!(files.is_empty());
    }

    #[test]
    fn test_absent_and_empty() {
        let pair = Pair {
            left: None,
            right: Vec::new(),
        };
        let (sources, _) = extract(Some(&pair));
        let query = &sources["query"];
        assert!(!query.contains("left"));
        assert!(query.contains("right"));
        assert_eq!(query.get_all("right").unwrap().len(), 0);
    }
}
