use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro that documents the fields of an input document struct.
///
/// For each field, extracts:
/// - Field name as it appears in the document (respects `#[serde(rename = "...")]`
///   and a container level `#[serde(rename_all = "camelCase")]`)
/// - Required (false for `Option<T>` and fields marked `#[serde(default)]`)
/// - Description (from doc comments)
///
/// Generates a `field_schema() -> &'static [SchemaField]` method. `SchemaField`
/// must be in scope where the derive is used.
#[proc_macro_derive(FieldSchema, attributes(serde))]
pub fn derive_field_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let rename_all = container_rename_all(&input.attrs);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("FieldSchema only supports structs with named fields"),
        },
        _ => panic!("FieldSchema only supports structs"),
    };

    let field_info: Vec<_> = fields
        .iter()
        .map(|field| {
            let rust_name = field.ident.as_ref().unwrap().to_string();
            let serde = field_serde_attrs(&field.attrs);

            let doc_name = serde.rename.unwrap_or_else(|| match rename_all.as_deref() {
                Some("camelCase") => to_camel_case(&rust_name),
                _ => rust_name,
            });
            let required = !serde.has_default && !is_option_type(&field.ty);
            let doc = get_doc_comment(&field.attrs);

            (doc_name, required, doc)
        })
        .collect();

    let field_entries = field_info.iter().map(|(name, required, desc)| {
        quote! {
            SchemaField {
                name: #name,
                required: #required,
                description: #desc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn field_schema() -> &'static [SchemaField] {
                static SCHEMA: &[SchemaField] = &[
                    #(#field_entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeFieldAttrs {
    rename: Option<String>,
    has_default: bool,
}

fn field_serde_attrs(attrs: &[Attribute]) -> SerdeFieldAttrs {
    let mut out = SerdeFieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        // Unknown keys are skipped so that any serde attribute can sit alongside.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
            } else if meta.path.is_ident("default") {
                out.has_default = true;
                if meta.input.peek(syn::Token![=]) {
                    let _: LitStr = meta.value()?.parse()?;
                }
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    out
}

fn container_rename_all(attrs: &[Attribute]) -> Option<String> {
    let mut rename_all = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                rename_all = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    rename_all
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn get_doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
