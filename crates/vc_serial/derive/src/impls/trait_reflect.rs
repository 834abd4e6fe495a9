use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::RecordDef;
use crate::path;

pub(crate) fn impl_trait_reflect(def: &RecordDef, vc_serial_path: &syn::Path) -> TokenStream {
    let ident = def.ident;
    let info_ = path::info_(vc_serial_path);
    let any_ = path::any_();
    let box_ = path::box_();
    let option_ = path::option_();
    let result_ = path::result_();

    quote! {
        impl #vc_serial_path::Reflect for #ident {
            #[inline]
            fn reflect_type_path(&self) -> &'static str {
                ::core::any::type_name::<Self>()
            }

            #[inline]
            fn reflect_record_info(&self) -> #option_<&'static #info_::RecordInfo> {
                #option_::Some(<Self as #info_::Typed>::record_info())
            }

            #[inline]
            fn reflect_ref(&self) -> #vc_serial_path::ReflectRef<'_> {
                #vc_serial_path::ReflectRef::Record(self)
            }

            #[inline]
            fn apply(
                &mut self,
                value: #vc_serial_path::FieldValue,
            ) -> #result_<(), #vc_serial_path::SerialError> {
                *self = value.into_record::<Self>()?;
                #result_::Ok(())
            }

            #[inline]
            fn as_any(&self) -> &dyn #any_ {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn #any_ {
                self
            }

            #[inline]
            fn into_any(self: #box_<Self>) -> #box_<dyn #any_> {
                self
            }
        }
    }
}
