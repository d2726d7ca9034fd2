//! Field-level documentation of the input document format.

pub use finplan_derive::FieldSchema;

/// One documented field of an input document, generated by `#[derive(FieldSchema)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}
