use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::RecordDef;
use crate::path;

pub(crate) fn impl_trait_field(def: &RecordDef, vc_serial_path: &syn::Path) -> TokenStream {
    let ident = def.ident;
    let info_ = path::info_(vc_serial_path);
    let result_ = path::result_();
    let default_ = path::default_();

    let empty_body = if def.attrs.default.is_some() {
        quote! { <Self as #default_>::default() }
    } else {
        let values = def.fields.iter().chain(def.parent.as_ref()).map(|field| {
            let member = field.ident;
            let ty = field.ty;
            if field.attrs.is_never_included() {
                quote! { #member: <#ty as #default_>::default() }
            } else {
                quote! { #member: <#ty as #vc_serial_path::Field>::empty() }
            }
        });
        quote! { Self { #(#values,)* } }
    };

    quote! {
        impl #vc_serial_path::Field for #ident {
            #[inline]
            fn field_type() -> #info_::FieldType {
                #info_::FieldType::record::<Self>()
            }

            #[inline]
            fn from_field(
                value: #vc_serial_path::FieldValue,
            ) -> #result_<Self, #vc_serial_path::SerialError> {
                value.into_record::<Self>()
            }

            fn empty() -> Self {
                #empty_body
            }
        }
    }
}
