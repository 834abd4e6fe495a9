use proc_macro2::Span;
use syn::Attribute;
use syn::spanned::Spanned;

use super::SERIAL_ATTRIBUTE_NAME;

/// Field-level attributes, `#[serial(...)]`.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub ignore: Option<Span>,
    pub keep: Option<Span>,
    pub transient: Option<Span>,
    pub constant: Option<Span>,
    pub shared: Option<Span>,
    pub parent: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(SERIAL_ATTRIBUTE_NAME) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("ignore") {
                    &mut out.ignore
                } else if meta.path.is_ident("keep") {
                    &mut out.keep
                } else if meta.path.is_ident("transient") {
                    &mut out.transient
                } else if meta.path.is_ident("constant") {
                    &mut out.constant
                } else if meta.path.is_ident("shared") {
                    &mut out.shared
                } else if meta.path.is_ident("parent") {
                    &mut out.parent
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected one of \
                         `ignore`, `keep`, `transient`, `constant`, `shared`, `parent`",
                    ));
                };
                *slot = Some(meta.path.span());
                Ok(())
            })?;
        }

        if let Some(span) = out.parent
            && (out.ignore.is_some()
                || out.keep.is_some()
                || out.transient.is_some()
                || out.constant.is_some()
                || out.shared.is_some())
        {
            return Err(syn::Error::new(
                span,
                "`parent` cannot be combined with other field attributes",
            ));
        }

        Ok(out)
    }

    /// Mirrors `FieldFlags::is_never_included`.
    pub fn is_never_included(&self) -> bool {
        self.constant.is_some()
            || self.shared.is_some()
            || self.transient.is_some()
            || (self.ignore.is_some() && self.keep.is_none())
    }
}
