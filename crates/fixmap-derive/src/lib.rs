//! # fixmap-derive
//!
//! `#[derive(Record)]` for named-field structs. Each mapped field carries a
//! `#[fixmap(...)]` attribute:
//!
//! - `#[fixmap(range = "0,20")]`: built-in coercion
//! - `#[fixmap(range = "20,28", custom)]`: the field type implements `Unmarshal`
//!   (an `Option<T>` field uses `T`'s impl and stays `None` when blank)
//! - `#[fixmap(range = "0,-1", nested)]`: the field type is itself a `Record`
//!   decoded from the whole line
//!
//! `Option` detection is syntactic: the last path segment of the field type
//! must be `Option`. A `custom` field whose type is an alias of `Option<T>`
//! is treated as non-optional and fails to compile because `Option<T>` does not
//! implement `Unmarshal`; spell the type as `Option<T>` instead. An optional
//! custom type must also implement `Default` and `PartialEq`.
//!
//! Fields without the attribute are not mapped. Range strings are validated when
//! the schema is first built, not at compile time, so they produce the same
//! `InvalidRangeDeclaration` error as hand-written schemas. A record-level
//! `#[fixmap(name = "...")]` overrides the name used in error messages.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Type};

/// Derives `fixmap::Record` from `#[fixmap(...)]` field attributes.
#[proc_macro_derive(Record, attributes(fixmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How a mapped field is filled
enum Mode {
    Builtin,
    Custom,
    Nested,
}

struct MappedField {
    ident: syn::Ident,
    range: LitStr,
    mode: Mode,
    optional: bool,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "Record requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let ident = &input.ident;
    let record_name = record_name(&input)?.unwrap_or_else(|| ident.to_string());

    let mut mapped = Vec::new();
    for field in fields {
        if let Some(parsed) = parse_field(field)? {
            mapped.push(parsed);
        }
    }

    let calls = mapped.iter().map(|field| {
        let field_ident = &field.ident;
        let name = field_ident.to_string();
        let range = &field.range;
        let method = match (&field.mode, field.optional) {
            (Mode::Builtin, _) => quote!(field),
            (Mode::Custom, false) => quote!(custom),
            (Mode::Custom, true) => quote!(custom_optional),
            (Mode::Nested, _) => quote!(nested),
        };
        quote! {
            .#method(#name, #range, |record: &mut Self| &mut record.#field_ident)
        }
    });

    Ok(quote! {
        impl ::fixmap::Record for #ident {
            fn schema() -> ::fixmap::Result<::fixmap::Schema<Self>> {
                ::fixmap::Schema::builder(#record_name)
                    #(#calls)*
                    .build()
            }
        }
    })
}

/// Reads `#[fixmap(name = "...")]` on the struct itself
fn record_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("fixmap")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

fn parse_field(field: &syn::Field) -> syn::Result<Option<MappedField>> {
    let Some(ident) = field.ident.clone() else {
        return Ok(None);
    };

    let mut range = None;
    let mut custom = false;
    let mut nested = false;
    let mut seen = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("fixmap")) {
        seen = true;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("range") {
                range = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else if meta.path.is_ident("custom") {
                custom = true;
                Ok(())
            } else if meta.path.is_ident("nested") {
                nested = true;
                Ok(())
            } else {
                Err(meta.error("expected `range = \"...\"`, `custom` or `nested`"))
            }
        })?;
    }

    if !seen {
        return Ok(None);
    }

    let Some(range) = range else {
        return Err(syn::Error::new(
            ident.span(),
            "mapped field needs `range = \"<start>,<end>\"`",
        ));
    };

    let mode = match (custom, nested) {
        (true, true) => {
            return Err(syn::Error::new(
                ident.span(),
                "`custom` and `nested` are mutually exclusive",
            ))
        }
        (true, false) => Mode::Custom,
        (false, true) => Mode::Nested,
        (false, false) => Mode::Builtin,
    };

    Ok(Some(MappedField {
        ident,
        range,
        mode,
        optional: is_option(&field.ty),
    }))
}

/// Syntactic check for `Option<_>`, `std::option::Option<_>` and friends
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}
