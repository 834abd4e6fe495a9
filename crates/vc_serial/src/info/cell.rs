//! Static storage of record information.
//!
//! Record types are non-generic, so one `static` per type is enough; the
//! cell is a thin wrapper around [`OnceLock`].

use std::sync::OnceLock;

use crate::info::RecordInfo;

/// Container for static storage of a [`RecordInfo`].
///
/// This is usually used to implement [`Typed`](crate::info::Typed).
///
/// ## Example
///
/// ```
/// use vc_serial::info::{FieldInfo, RecordInfo, RecordInfoCell, SerialMeta, Typed};
/// use vc_serial::{Field, FieldValue, Reflect, ReflectRef, SerialError};
///
/// #[derive(Default)]
/// struct Meters {
///     value: f64,
/// }
///
/// impl Typed for Meters {
///     fn record_info() -> &'static RecordInfo {
///         static CELL: RecordInfoCell = RecordInfoCell::new();
///         CELL.get_or_init(|| {
///             RecordInfo::new::<Meters>(vec![FieldInfo::new::<Meters, f64>(
///                 "value",
///                 |this| &this.value,
///                 |this| &mut this.value,
///             )])
///             .with_serializable(SerialMeta::new())
///             .with_default::<Meters>()
///         })
///     }
/// }
/// # impl Reflect for Meters {
/// #     fn reflect_type_path(&self) -> &'static str { "Meters" }
/// #     fn reflect_record_info(&self) -> Option<&'static RecordInfo> { Some(Self::record_info()) }
/// #     fn reflect_ref(&self) -> ReflectRef<'_> { ReflectRef::Record(self) }
/// #     fn apply(&mut self, value: FieldValue) -> Result<(), SerialError> {
/// #         *self = value.into_record::<Self>()?;
/// #         Ok(())
/// #     }
/// #     fn as_any(&self) -> &dyn core::any::Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn core::any::Any { self }
/// #     fn into_any(self: Box<Self>) -> Box<dyn core::any::Any> { self }
/// # }
/// # impl Field for Meters {
/// #     fn field_type() -> vc_serial::info::FieldType { vc_serial::info::FieldType::record::<Self>() }
/// #     fn from_field(value: FieldValue) -> Result<Self, SerialError> { value.into_record() }
/// #     fn empty() -> Self { Self::default() }
/// # }
///
/// let info = Meters::record_info();
/// assert_eq!(info.field("value").unwrap().name(), "value");
/// assert!(core::ptr::eq(info, Meters::record_info()));
/// ```
pub struct RecordInfoCell(OnceLock<RecordInfo>);

impl RecordInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the info stored in the cell.
    ///
    /// If the cell is empty, it is initialized with the given function.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &RecordInfo
    where
        F: FnOnce() -> RecordInfo,
    {
        self.0.get_or_init(f)
    }
}
