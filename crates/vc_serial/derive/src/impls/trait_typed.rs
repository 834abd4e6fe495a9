use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{RecordDef, RecordField, SerialMetaAttr};
use crate::path;

pub(crate) fn impl_trait_typed(def: &RecordDef, vc_serial_path: &syn::Path) -> TokenStream {
    let ident = def.ident;
    let info_ = path::info_(vc_serial_path);

    let fields = def
        .fields
        .iter()
        .map(|field| field_info_expression(field, &info_));

    let with_serializable = def
        .attrs
        .serializable
        .as_ref()
        .map(|meta| serial_meta_expression(meta, &info_));

    let with_parent = def.parent.as_ref().map(|parent| {
        let member = parent.ident;
        let name = &parent.name;
        let ty = parent.ty;
        quote! {
            .with_parent(#info_::ParentInfo::new::<Self, #ty>(
                #name,
                |this| &this.#member,
                |this| &mut this.#member,
            ))
        }
    });

    let with_constructor = if def.attrs.default.is_some() {
        quote! { .with_default::<Self>() }
    } else {
        quote! { .with_empty::<Self>() }
    };

    quote! {
        impl #info_::Typed for #ident {
            fn record_info() -> &'static #info_::RecordInfo {
                static CELL: #info_::RecordInfoCell = #info_::RecordInfoCell::new();
                CELL.get_or_init(|| {
                    #info_::RecordInfo::new::<Self>(::std::vec![#(#fields,)*])
                        #with_serializable
                        #with_parent
                        #with_constructor
                })
            }
        }
    }
}

/// `FieldInfo::new::<Self, T>(...)` or `FieldInfo::skipped(...)`.
fn field_info_expression(field: &RecordField, info_: &TokenStream) -> TokenStream {
    let member = field.ident;
    let name = &field.name;
    let ty = field.ty;
    let attrs = &field.attrs;

    let flags = [
        (attrs.constant.is_some(), quote! { CONSTANT }),
        (attrs.shared.is_some(), quote! { SHARED }),
        (attrs.transient.is_some(), quote! { TRANSIENT }),
        (attrs.ignore.is_some(), quote! { IGNORE }),
        (attrs.keep.is_some(), quote! { KEEP }),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, flag)| quote! { #info_::FieldFlags::#flag })
    .collect::<Vec<_>>();

    let flags_expr = if flags.is_empty() {
        quote! { #info_::FieldFlags::empty() }
    } else {
        quote! { #(#flags)|* }
    };

    if attrs.is_never_included() {
        quote! { #info_::FieldInfo::skipped(#name, #flags_expr) }
    } else if flags.is_empty() {
        quote! {
            #info_::FieldInfo::new::<Self, #ty>(#name, |this| &this.#member, |this| &mut this.#member)
        }
    } else {
        quote! {
            #info_::FieldInfo::new::<Self, #ty>(#name, |this| &this.#member, |this| &mut this.#member)
                .with_flags(#flags_expr)
        }
    }
}

/// `.with_serializable(SerialMeta::new()...)`.
fn serial_meta_expression(meta: &SerialMetaAttr, info_: &TokenStream) -> TokenStream {
    let version = meta.version.map(|v| quote! { .with_version(#v) });
    let embed_version = meta
        .embed_version
        .map(|v| quote! { .with_embed_version(#v) });
    let default_exclude = meta
        .default_exclude
        .map(|v| quote! { .with_default_exclude(#v) });

    quote! {
        .with_serializable(
            #info_::SerialMeta::new()
                #version
                #embed_version
                #default_exclude
        )
    }
}
