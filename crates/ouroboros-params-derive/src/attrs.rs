//! `#[param(...)]` and `#[params(...)]` attribute parsing

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, ExprUnary, Lit, LitStr, UnOp};

// ============================================================================
// RECORD ATTRIBUTES
// ============================================================================

/// Struct-level options
#[derive(Debug, Default)]
pub struct RecordAttrs {
    /// The record implements `Validate` and wires it as its hook
    pub validate: bool,
}

impl RecordAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = RecordAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("params")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("validate") {
                    out.validate = true;
                    return Ok(());
                }
                Err(meta.error("unsupported params attribute, expected `validate`"))
            })?;
        }
        Ok(out)
    }
}

// ============================================================================
// FIELD ATTRIBUTES
// ============================================================================

/// How a field is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Value,
    /// Sub-record bound in place
    Embedded,
    /// Listed but never written
    ReadOnly,
    /// Not listed at all
    Skip,
}

/// Field-level options, mapped onto struct-tag metadata
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub mode: FieldMode,
    pub from: Option<String>,
    pub name: Option<String>,
    pub ignore: bool,
    pub omit_empty: bool,
    pub rules: Option<String>,
    pub maxlen: Option<String>,
    pub one_of: Option<String>,
    pub default: Option<String>,
    pub min_int: Option<String>,
    pub max_int: Option<String>,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("param")) {
            attr.parse_nested_meta(|meta| out.parse_entry(&meta))?;
        }
        Ok(out)
    }

    fn parse_entry(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        let key = meta
            .path
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();

        match key.as_str() {
            "from" => self.from = Some(string_value(meta)?),
            "name" => self.name = Some(string_value(meta)?),
            "rules" => self.rules = Some(string_value(meta)?),
            "one_of" => self.one_of = Some(string_value(meta)?),
            "default" => self.default = Some(literal_value(meta)?),
            "maxlen" => self.maxlen = Some(literal_value(meta)?),
            "min_int" => self.min_int = Some(literal_value(meta)?),
            "max_int" => self.max_int = Some(literal_value(meta)?),
            "ignore" => self.ignore = true,
            "omitempty" => self.omit_empty = true,
            "embed" => self.set_mode(meta, FieldMode::Embedded)?,
            "readonly" => self.set_mode(meta, FieldMode::ReadOnly)?,
            "skip" => self.set_mode(meta, FieldMode::Skip)?,
            _ => return Err(meta.error("unsupported param attribute")),
        }
        Ok(())
    }

    fn set_mode(&mut self, meta: &ParseNestedMeta<'_>, mode: FieldMode) -> syn::Result<()> {
        if self.mode != FieldMode::Value {
            return Err(meta.error("`embed`, `readonly` and `skip` are mutually exclusive"));
        }
        self.mode = mode;
        Ok(())
    }

    /// Struct-tag metadata string for the field
    pub fn tag(&self) -> String {
        let mut pairs = Vec::new();

        let json = if self.ignore {
            Some("-".to_string())
        } else if self.name.is_some() || self.omit_empty {
            let mut json = self.name.clone().unwrap_or_default();
            if self.omit_empty {
                json.push_str(",omitempty");
            }
            Some(json)
        } else {
            None
        };

        let entries = [
            ("json", json.as_ref()),
            ("from", self.from.as_ref()),
            ("params", self.rules.as_ref()),
            ("maxlen", self.maxlen.as_ref()),
            ("enum", self.one_of.as_ref()),
            ("default", self.default.as_ref()),
            ("min_int", self.min_int.as_ref()),
            ("max_int", self.max_int.as_ref()),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                pairs.push(format!("{}:\"{}\"", key, escape(value)));
            }
        }

        pairs.join(" ")
    }
}

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// A string, integer or negative integer literal
fn literal_value(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let expr: Expr = meta.value()?.parse()?;
    match &expr {
        Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Ok(lit.value()),
        Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }) => Ok(lit.base10_digits().to_string()),
        Expr::Unary(ExprUnary { op: UnOp::Neg(_), expr: inner, .. }) => match inner.as_ref() {
            Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }) => Ok(format!("-{}", lit.base10_digits())),
            _ => Err(syn::Error::new_spanned(&expr, "expected an integer literal")),
        },
        _ => Err(syn::Error::new_spanned(&expr, "expected a string or integer literal")),
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
