//! Field entries, descriptors and value slots

use tracing::trace;

use crate::errors::{ConfigError, FieldError};
use crate::record::Params;
use crate::rules::RuleSet;
use crate::tag::Tag;
use crate::value::{Bindable, FieldKind};
use crate::values::Values;

// ============================================================================
// Field Entries
// ============================================================================

/// Writable target of a field entry
pub enum TargetMut<'a> {
    /// A bindable value
    Value(&'a mut dyn Bindable),
    /// An embedded sub-record whose fields are bound in place
    Embedded(&'a mut dyn Params),
    /// A field the binder may not write
    ReadOnly,
}

/// Read-only target of a field entry
pub enum TargetRef<'a> {
    Value(&'a dyn Bindable),
    Embedded(&'a dyn Params),
    ReadOnly,
}

/// One field of a record, borrowed mutably
pub struct FieldMut<'a> {
    /// Declared identifier
    pub name: &'static str,
    pub tag: Tag,
    pub target: TargetMut<'a>,
}

impl<'a> FieldMut<'a> {
    pub fn value(name: &'static str, tag: Tag, value: &'a mut dyn Bindable) -> Self {
        Self {
            name,
            tag,
            target: TargetMut::Value(value),
        }
    }

    pub fn embedded(name: &'static str, record: &'a mut dyn Params) -> Self {
        Self {
            name,
            tag: Tag::empty(),
            target: TargetMut::Embedded(record),
        }
    }

    pub fn read_only(name: &'static str, tag: Tag) -> Self {
        Self {
            name,
            tag,
            target: TargetMut::ReadOnly,
        }
    }
}

/// One field of a record, borrowed immutably
pub struct FieldRef<'a> {
    /// Declared identifier
    pub name: &'static str,
    pub tag: Tag,
    pub target: TargetRef<'a>,
}

impl<'a> FieldRef<'a> {
    pub fn value(name: &'static str, tag: Tag, value: &'a dyn Bindable) -> Self {
        Self {
            name,
            tag,
            target: TargetRef::Value(value),
        }
    }

    pub fn embedded(name: &'static str, record: &'a dyn Params) -> Self {
        Self {
            name,
            tag: Tag::empty(),
            target: TargetRef::Embedded(record),
        }
    }

    pub fn read_only(name: &'static str, tag: Tag) -> Self {
        Self {
            name,
            tag,
            target: TargetRef::ReadOnly,
        }
    }
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// Resolved metadata and shape of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared identifier
    pub name: &'static str,
    /// Name used in the input; `None` when the field is ignored
    pub external_name: Option<String>,
    /// Source the field is read from (`from`)
    pub source: Option<String>,
    /// Raw value used when the input does not have the key
    pub default: Option<String>,
    /// Omit the zero value on extraction
    pub omit_empty: bool,
    pub rules: RuleSet,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Resolve a field's metadata.
    ///
    /// The external name is the declared `json` name or, when unset, the
    /// declared identifier. Errors are always attributed to it.
    pub fn resolve(name: &'static str, tag: &Tag, kind: FieldKind) -> Result<Self, ConfigError> {
        let rules = RuleSet::parse(tag)?;
        Ok(Self::with_rules(name, tag, kind, rules))
    }

    /// Resolve only the naming part of a field's metadata. Never fails.
    pub fn naming(name: &'static str, tag: &Tag, kind: FieldKind) -> Self {
        Self::with_rules(name, tag, kind, RuleSet::naming(tag))
    }

    fn with_rules(name: &'static str, tag: &Tag, kind: FieldKind, mut rules: RuleSet) -> Self {
        let external_name = if rules.ignore {
            None
        } else {
            Some(rules.name.clone().unwrap_or_else(|| name.to_string()))
        };
        if external_name.is_some() {
            rules.name = external_name.clone();
        }

        Self {
            name,
            external_name,
            source: tag.get("from").filter(|source| !source.is_empty()),
            default: tag.get("default"),
            omit_empty: rules.omit_empty,
            rules,
            kind,
        }
    }

    /// Key of the field in its source; the declared identifier when ignored
    pub fn key(&self) -> &str {
        self.external_name.as_deref().unwrap_or(self.name)
    }

    pub fn is_ignored(&self) -> bool {
        self.rules.ignore
    }

    /// Whether the field is bound from the file provider
    pub fn is_file(&self, file_source: &str) -> bool {
        self.kind == FieldKind::File || self.source.as_deref() == Some(file_source)
    }
}

// ============================================================================
// Value Slot
// ============================================================================

/// Binds raw values to a non-file field
pub struct ValueSlot<'a> {
    descriptor: &'a FieldDescriptor,
    target: &'a mut dyn Bindable,
}

impl<'a> ValueSlot<'a> {
    pub fn new(descriptor: &'a FieldDescriptor, target: &'a mut dyn Bindable) -> Self {
        Self { descriptor, target }
    }

    /// Bind the field from the raw values of its source.
    ///
    /// When the key is absent the declared default is used; sequence defaults
    /// are split on `,`. Values are transformed, then validated, then
    /// converted. A field with neither a value nor a default is left as is.
    pub fn set_value(&mut self, values: &Values) -> Result<(), FieldError> {
        let descriptor = self.descriptor;
        if descriptor.is_ignored() {
            return Ok(());
        }

        let rules = &descriptor.rules;
        let key = descriptor.key();
        let provided = values.contains(key);
        let is_sequence = descriptor.kind.is_sequence();

        let raw: Vec<String> = match (values.get_all(key), &descriptor.default) {
            (Some(raw), _) => raw.iter().map(|v| rules.apply_transformations(v)).collect(),
            (None, Some(default)) => {
                trace!("using default {:?} for field {}", default, key);
                if is_sequence {
                    default.split(',').map(|v| rules.apply_transformations(v)).collect()
                } else {
                    vec![rules.apply_transformations(default)]
                }
            }
            (None, None) => Vec::new(),
        };

        match raw.as_slice() {
            [] => rules.validate("", provided)?,
            [first, ..] if !is_sequence => rules.validate(first, provided)?,
            all => {
                for value in all {
                    rules.validate(value, provided)?;
                }
            }
        }

        if !provided && descriptor.default.is_none() {
            return Ok(());
        }

        self.target
            .assign(&raw, rules)
            .map_err(|kind| FieldError::new(key, kind))
    }
}
