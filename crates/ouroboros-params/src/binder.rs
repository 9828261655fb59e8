//! Record binding
//!
//! The [`Binder`] walks a record's fields in declaration order, recursing
//! into embedded sub-records, and binds each one from its declared source.
//! It stops at the first error. Once every field is bound, the validation
//! hooks run: embedded sub-records first, then the record itself.

use tracing::{debug, trace};

use crate::config::BindConfig;
use crate::errors::{InvalidRecord, ParamsError, ParamsResult};
use crate::field::{FieldDescriptor, FieldMut, TargetMut, TargetRef, ValueSlot};
use crate::file::{FileProvider, FileSlot};
use crate::record::Params;
use crate::rules::RuleSet;
use crate::values::SourceMap;

/// Binds raw input into a record
pub struct Binder<'r> {
    record: &'r mut dyn Params,
    config: BindConfig,
}

impl<'r> Binder<'r> {
    /// Create a binder with the default configuration
    pub fn new<P: Params>(record: &'r mut P) -> Self {
        Self::with_config(record, BindConfig::default())
    }

    /// Create a binder with a custom configuration
    pub fn with_config(record: &'r mut dyn Params, config: BindConfig) -> Self {
        Self { record, config }
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Bind `sources` and the files of `files` into the record.
    ///
    /// Fields declared `from` the configured file source, and fields of the
    /// file shape, are resolved through `files`. Every other field must name
    /// a source present in `sources`.
    ///
    /// On error the record may be partially bound.
    pub fn parse(
        &mut self,
        sources: &SourceMap,
        files: Option<&dyn FileProvider>,
    ) -> ParamsResult<()> {
        bind_record(&mut *self.record, sources, files, &self.config)?;
        run_hooks(&*self.record)?;
        Ok(())
    }
}

fn bind_record(
    record: &mut dyn Params,
    sources: &SourceMap,
    files: Option<&dyn FileProvider>,
    config: &BindConfig,
) -> ParamsResult<()> {
    for field in record.fields_mut() {
        bind_field(field, sources, files, config)?;
    }
    Ok(())
}

fn bind_field(
    field: FieldMut<'_>,
    sources: &SourceMap,
    files: Option<&dyn FileProvider>,
    config: &BindConfig,
) -> ParamsResult<()> {
    let FieldMut { name, tag, target } = field;

    let target = match target {
        TargetMut::Value(target) => target,
        TargetMut::Embedded(record) => {
            trace!(field = name, "binding embedded record");
            return bind_record(record, sources, files, config);
        }
        TargetMut::ReadOnly => {
            let rules = RuleSet::parse(&tag)
                .map_err(|source| ParamsError::Config { field: name, source })?;
            if rules.ignore {
                return Ok(());
            }
            return Err(ParamsError::FieldNotSettable(name));
        }
    };

    let descriptor = FieldDescriptor::resolve(name, &tag, target.kind())
        .map_err(|source| ParamsError::Config { field: name, source })?;

    if descriptor.is_file(&config.file_source) {
        return FileSlot::new(&descriptor, target).set_file(files, &config.image_formats);
    }

    if descriptor.is_ignored() {
        trace!(field = name, "skipping ignored field");
        return Ok(());
    }

    let source = descriptor
        .source
        .as_deref()
        .ok_or(ParamsError::NoSourceConfigured(name))?;
    let values = sources.get(source).ok_or_else(|| ParamsError::UnknownSource {
        field: name,
        source_name: source.to_string(),
    })?;

    ValueSlot::new(&descriptor, target).set_value(values)?;
    debug!(field = %descriptor.key(), source, "bound field");
    Ok(())
}

fn run_hooks(record: &dyn Params) -> Result<(), InvalidRecord> {
    for field in record.fields() {
        if let TargetRef::Embedded(embedded) = field.target {
            run_hooks(embedded)?;
        }
    }

    if let Some(validator) = record.validator() {
        validator.is_valid()?;
    }
    Ok(())
}
