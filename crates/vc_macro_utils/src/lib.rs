//! Tools for the proc-macro crates of the workspace.
//!
//! - [`Manifest`]: resolve the path of a workspace crate as seen from the
//!   crate invoking the macro.

// -----------------------------------------------------------------------------
// Modules

mod manifest;

// -----------------------------------------------------------------------------
// Exports

pub use manifest::Manifest;
