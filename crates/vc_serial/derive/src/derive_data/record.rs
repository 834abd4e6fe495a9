use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Type};

use super::{FieldAttributes, TypeAttributes};

/// A field of the derived struct.
pub(crate) struct RecordField<'a> {
    pub ident: &'a Ident,
    /// The serialized name, without `r#`.
    pub name: String,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

/// The derived struct.
pub(crate) struct RecordDef<'a> {
    pub ident: &'a Ident,
    pub attrs: TypeAttributes,
    pub fields: Vec<RecordField<'a>>,
    pub parent: Option<RecordField<'a>>,
}

impl<'a> RecordDef<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        let ident = &ast.ident;

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`Record` cannot be derived for generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        "`Record` can only be derived for structs with named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Record` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Record` cannot be derived for unions",
                ));
            }
        };

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut fields = Vec::with_capacity(named.named.len());
        let mut parent: Option<RecordField<'a>> = None;

        for field in &named.named {
            let Some(field_ident) = &field.ident else {
                continue;
            };
            let record_field = RecordField {
                ident: field_ident,
                name: field_ident.unraw().to_string(),
                ty: &field.ty,
                attrs: FieldAttributes::parse_attrs(&field.attrs)?,
            };

            if let Some(span) = record_field.attrs.parent {
                if parent.is_some() {
                    return Err(syn::Error::new(span, "a record can have only one `parent`"));
                }
                parent = Some(record_field);
            } else {
                fields.push(record_field);
            }
        }

        Ok(Self {
            ident,
            attrs,
            fields,
            parent,
        })
    }
}
