//! Derive macro for `ouroboros-params` records
//!
//! `#[derive(Params)]` lists a struct's fields, in declaration order, with
//! the metadata declared in `#[param(...)]` attributes.
//!
//! # Field attributes
//!
//! - `from = "query"` - source the field is read from
//! - `name = "per_page"` - external name (defaults to the field name)
//! - `rules = "required,trim,uuid"` - `params` flags
//! - `maxlen = 32`, `min_int = -1`, `max_int = 10` - numeric options
//! - `one_of = "asc,desc"` - accepted values
//! - `default = "20"` - raw value used when the key is absent
//! - `ignore` - never bound nor extracted
//! - `omitempty` - omit zero values on extraction
//! - `embed` - the field is a sub-record bound in place
//! - `readonly` - the field is listed but may not be bound
//! - `skip` - the field is not listed at all
//!
//! # Record attributes
//!
//! - `#[params(validate)]` - run the record's `Validate` impl after binding
//!
//! ```rust,ignore
//! #[derive(Params, Default)]
//! #[params(validate)]
//! struct CreateUser {
//!     #[param(from = "form", name = "email", rules = "required,email")]
//!     email: String,
//!     #[param(from = "file", name = "avatar", rules = "image")]
//!     avatar: Option<FormFile>,
//!     #[param(embed)]
//!     paging: Paging,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{FieldAttrs, FieldMode, RecordAttrs};

// ============================================================================
// PARAMS DERIVE
// ============================================================================

/// Derives `ouroboros_params::Params` for a struct with named fields.
#[proc_macro_derive(Params, attributes(param, params))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Params can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Params can only be derived for structs",
            ))
        }
    };

    let record = RecordAttrs::parse(&input.attrs)?;

    let mut entries_mut = Vec::new();
    let mut entries_ref = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.unraw().to_string();
        let tag = attrs.tag();

        match attrs.mode {
            FieldMode::Value => {
                entries_mut.push(quote! {
                    ::ouroboros_params::FieldMut::value(#name, ::ouroboros_params::Tag::new(#tag), &mut self.#ident)
                });
                entries_ref.push(quote! {
                    ::ouroboros_params::FieldRef::value(#name, ::ouroboros_params::Tag::new(#tag), &self.#ident)
                });
            }
            FieldMode::Embedded => {
                entries_mut.push(quote! {
                    ::ouroboros_params::FieldMut::embedded(#name, &mut self.#ident)
                });
                entries_ref.push(quote! {
                    ::ouroboros_params::FieldRef::embedded(#name, &self.#ident)
                });
            }
            FieldMode::ReadOnly => {
                entries_mut.push(quote! {
                    ::ouroboros_params::FieldMut::read_only(#name, ::ouroboros_params::Tag::new(#tag))
                });
                entries_ref.push(quote! {
                    ::ouroboros_params::FieldRef::read_only(#name, ::ouroboros_params::Tag::new(#tag))
                });
            }
            FieldMode::Skip => {}
        }
    }

    let validator = if record.validate {
        quote! {
            fn validator(&self) -> ::std::option::Option<&dyn ::ouroboros_params::Validate> {
                ::std::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::ouroboros_params::Params for #ident #ty_generics #where_clause {
            fn fields_mut(&mut self) -> ::std::vec::Vec<::ouroboros_params::FieldMut<'_>> {
                ::std::vec![#(#entries_mut),*]
            }

            fn fields(&self) -> ::std::vec::Vec<::ouroboros_params::FieldRef<'_>> {
                ::std::vec![#(#entries_ref),*]
            }

            #validator
        }
    })
}
