//! [`Reflect`](crate::Reflect) and [`Field`](crate::Field) for foreign types.
//!
//! - the scalar set: `bool`, `i8`..`i64`, `f32`, `f64`, `char`, `String`;
//! - other numeric types, which are opaque: they are classified as records
//!   but carry no record information;
//! - arrays: `Vec<T>`, `[T; N]` and `Box<[T]>`.

mod array;
mod scalar;
