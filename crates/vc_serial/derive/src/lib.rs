//! See [`Record`].
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements the following traits for a struct with
/// named fields:
///
/// - `Reflect`
/// - `Field`
/// - `Typed`
///
/// Enums, unions, tuple structs, unit structs and generic structs are
/// rejected.
///
/// ## Serializable Types
///
/// Without `#[serializable]`, the type is reflected but the engine reports
/// it as not serializable.
///
/// ```rust, ignore
/// #[derive(Record)]
/// #[serializable]
/// struct A { /* ... */ }
///
/// #[derive(Record)]
/// #[serializable(version = 2, embed_version = false, default_exclude)]
/// struct B { /* ... */ }
/// ```
///
/// | option            | default |
/// |-------------------|---------|
/// | `version`         | `0`     |
/// | `embed_version`   | `true`  |
/// | `default_exclude` | `false` |
///
/// A bare `embed_version` or `default_exclude` means `true`.
///
/// ## Field Attributes
///
/// - `#[serial(ignore)]`: excluded when the type includes fields by default.
/// - `#[serial(keep)]`: included when the type excludes fields by default.
/// - `#[serial(transient)]`, `#[serial(constant)]`, `#[serial(shared)]`:
///   never serialized.
/// - `#[serial(parent)]`: the field is the embedded supertype. Its fields
///   are merged into the fields of the record, and a field of the record
///   shadows a parent field with the same name. At most one per record.
///
/// Fields that are never serialized only need to implement `Default`, the
/// other ones must implement `Field`. A parent must implement `Typed`.
///
/// ```rust, ignore
/// #[derive(Record)]
/// #[serializable(version = 1)]
/// struct Node {
///     #[serial(parent)]
///     base: Base,
///     label: String,
///     #[serial(transient)]
///     cache: HashMap<u64, String>,
/// }
/// ```
///
/// ## Construction
///
/// Decoding starts from a fresh instance. By default every field is created
/// with `Field::empty` (or `Default::default` for fields that are never
/// serialized). Use `#[serial(default)]` to start from the `Default` impl
/// of the type instead:
///
/// ```rust, ignore
/// #[derive(Record, Default)]
/// #[serializable]
/// #[serial(default)]
/// struct Settings { /* ... */ }
/// ```
#[proc_macro_derive(Record, attributes(serializable, serial))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::RecordDef::parse(&ast) {
        Ok(def) => impls::impl_record(&def).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
