use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitInt, Meta, Token};

use super::{SERIAL_ATTRIBUTE_NAME, SERIALIZABLE_ATTRIBUTE_NAME, parse_bool_flag};

/// Options of `#[serializable(...)]`. `None` keeps the default.
#[derive(Debug, Default)]
pub(crate) struct SerialMetaAttr {
    pub version: Option<i32>,
    pub embed_version: Option<bool>,
    pub default_exclude: Option<bool>,
}

/// Type-level attributes.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    /// `None` if the type is not marked `#[serializable]`.
    pub serializable: Option<SerialMetaAttr>,
    /// `#[serial(default)]`: construct with `Default`.
    pub default: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if attr.path().is_ident(SERIALIZABLE_ATTRIBUTE_NAME) {
                if out.serializable.is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "duplicate `#[serializable]` attribute",
                    ));
                }
                out.serializable = Some(parse_serializable(attr)?);
            } else if attr.path().is_ident(SERIAL_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("default") {
                        out.default = Some(meta.path.span());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported type attribute, expected `default`"))
                    }
                })?;
            }
        }

        Ok(out)
    }
}

fn parse_serializable(attr: &Attribute) -> syn::Result<SerialMetaAttr> {
    let mut meta_attr = SerialMetaAttr::default();

    if let Meta::Path(_) = attr.meta {
        return Ok(meta_attr);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("version") {
            let input = meta.value()?;
            let negative = input.parse::<Option<Token![-]>>()?.is_some();
            let lit: LitInt = input.parse()?;
            let value: i64 = lit.base10_parse()?;
            let value = if negative { -value } else { value };
            let version = i32::try_from(value)
                .map_err(|_| syn::Error::new(lit.span(), "version must fit in an `i32`"))?;
            meta_attr.version = Some(version);
        } else if meta.path.is_ident("embed_version") {
            meta_attr.embed_version = Some(parse_bool_flag(&meta)?);
        } else if meta.path.is_ident("default_exclude") {
            meta_attr.default_exclude = Some(parse_bool_flag(&meta)?);
        } else {
            return Err(meta.error(
                "unsupported option, expected `version`, `embed_version` or `default_exclude`",
            ));
        }
        Ok(())
    })?;

    Ok(meta_attr)
}
