use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro describing the CSV columns a record serializes to.
///
/// Each named field becomes one column:
/// - name: the field name, or `#[serde(rename = "...")]` when present
/// - optional: true when the field type is `Option<T>`
/// - description: the field's doc comment
///
/// Fields marked `#[serde(skip)]` or `#[serde(skip_serializing)]` are left out.
///
/// Generates `fn csv_columns() -> &'static [CsvColumn]`; the `CsvColumn` type
/// must be in scope where the derive is used.
#[proc_macro_derive(CsvColumns, attributes(serde))]
pub fn derive_csv_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvColumns needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let columns = fields
        .iter()
        .filter(|field| !serde_flag(&field.attrs, "skip") && !serde_flag(&field.attrs, "skip_serializing"))
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let column = serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string());
            let optional = is_option(&field.ty);
            let description = doc_comment(&field.attrs);
            Some(quote! {
                CsvColumn {
                    name: #column,
                    optional: #optional,
                    description: #description,
                }
            })
        });

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[
                    #(#columns),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_tokens(attrs: &[Attribute]) -> impl Iterator<Item = String> + '_ {
    attrs.iter().filter_map(|attr| {
        if !attr.path().is_ident("serde") {
            return None;
        }
        match &attr.meta {
            Meta::List(list) => Some(list.tokens.to_string()),
            _ => None,
        }
    })
}

fn serde_flag(attrs: &[Attribute], flag: &str) -> bool {
    serde_tokens(attrs).any(|tokens| {
        tokens
            .split(',')
            .any(|part| part.trim() == flag)
    })
}

fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    serde_tokens(attrs).find_map(|tokens| {
        let start = tokens.find("rename")?;
        let rest = &tokens[start + "rename".len()..];
        // `rename_all` applies to containers, not fields
        if rest.starts_with('_') {
            return None;
        }
        let after_eq = rest[rest.find('=')? + 1..].trim();
        let quoted = after_eq.strip_prefix('"')?;
        Some(quoted[..quoted.find('"')?].to_string())
    })
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
