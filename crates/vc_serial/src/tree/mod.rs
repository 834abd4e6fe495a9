//! The in-memory data tree and its loss-free backend.
//!
//! [`TreeBackend`] stores every scalar exactly as read from the record, so a
//! round trip through a [`DataTree`] never needs a scalar conversion. It is
//! the reference [`Backend`](crate::Backend) of this crate.
//!
//! With the `serde` feature, [`DataTree`] implements `serde::Serialize` and
//! can be printed with any serde format.

mod backend;
mod data;

#[cfg(feature = "serde")]
mod serde;

pub use backend::TreeBackend;
pub use data::{DataTree, Node};
