#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::vc_serial`, which must also resolve inside the
// crate itself (unit tests and doc tests).
extern crate self as vc_serial;

// -----------------------------------------------------------------------------
// Modules

mod backend;
mod engine;
mod error;
mod impls;
mod reflection;

pub mod descriptor;
pub mod hash;
pub mod info;
pub mod scalar;
pub mod tree;

#[cfg(feature = "json")]
pub mod json;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use backend::Backend;
pub use engine::{Engine, VERSION_KEY};
pub use error::SerialError;
pub use reflection::{Field, FieldValue, Reflect, ReflectRef};
pub use scalar::{Scalar, ScalarType};

pub use vc_serial_derive as derive;
