//! Static reflection information of record types and their fields.
//!
//! - [`FieldType`] and [`FieldKind`]: declared types and how they are stored.
//! - [`FieldInfo`] and [`FieldFlags`]: one declared field.
//! - [`RecordInfo`], [`SerialMeta`] and [`ParentInfo`]: one record type.
//! - [`Typed`] and [`RecordInfoCell`]: static access to the above.

mod cell;
mod field_info;
mod field_type;
mod record_info;

pub use cell::RecordInfoCell;
pub(crate) use field_info::FieldAccessor;
pub use field_info::{FieldFlags, FieldInfo};
pub use field_type::{ArrayType, FieldKind, FieldType, RecordType};
pub use record_info::{ParentInfo, RecordInfo, SerialMeta, Typed};
