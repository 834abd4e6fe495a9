//! Paths of the items referenced by the generated code.
//!
//! The only special case is the path of `vc_serial` itself, see
//! [`vc_serial`].

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_serial` crate.
///
/// 1. For crates that depend on `vc_serial`, `::vc_serial` is returned.
/// 2. For crates that depend on `vc_persist`, `::vc_persist::serial` is returned.
/// 3. Otherwise `::vc_serial` is returned, which is also what `vc_serial`
///    uses for itself through `extern crate self as vc_serial`.
///
/// Reading the manifest is relatively expensive, call it once per derive.
pub(crate) fn vc_serial() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_serial"))
}

#[inline(always)]
pub(crate) fn info_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! { #vc_serial_path::info }
}

#[inline(always)]
pub(crate) fn any_() -> TokenStream {
    quote! { ::core::any::Any }
}

#[inline(always)]
pub(crate) fn box_() -> TokenStream {
    quote! { ::std::boxed::Box }
}

#[inline(always)]
pub(crate) fn option_() -> TokenStream {
    quote! { ::core::option::Option }
}

#[inline(always)]
pub(crate) fn result_() -> TokenStream {
    quote! { ::core::result::Result }
}

#[inline(always)]
pub(crate) fn default_() -> TokenStream {
    quote! { ::core::default::Default }
}
