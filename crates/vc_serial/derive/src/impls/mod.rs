//! Code generation of `#[derive(Record)]`.

mod trait_field;
mod trait_reflect;
mod trait_typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::RecordDef;

/// Generates `Reflect`, `Field` and `Typed` for the record.
pub(crate) fn impl_record(def: &RecordDef) -> TokenStream {
    let vc_serial_path = crate::path::vc_serial();

    let reflect_impl = trait_reflect::impl_trait_reflect(def, &vc_serial_path);
    let field_impl = trait_field::impl_trait_field(def, &vc_serial_path);
    let typed_impl = trait_typed::impl_trait_typed(def, &vc_serial_path);

    quote! {
        const _: () = {
            #reflect_impl

            #field_impl

            #typed_impl
        };
    }
}
