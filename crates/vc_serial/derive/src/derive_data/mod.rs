//! Parsed form of the input of `#[derive(Record)]`.

mod field_attributes;
mod record;
mod type_attributes;

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use record::{RecordDef, RecordField};
pub(crate) use type_attributes::{SerialMetaAttr, TypeAttributes};

/// `#[serializable(...)]`, type level.
pub(crate) static SERIALIZABLE_ATTRIBUTE_NAME: &str = "serializable";

/// `#[serial(...)]`, type and field level.
pub(crate) static SERIAL_ATTRIBUTE_NAME: &str = "serial";

/// Parse `name` or `name = bool`.
pub(crate) fn parse_bool_flag(meta: &syn::meta::ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}
