use core::any::{Any, type_name};
use core::fmt;

use crate::info::{FieldKind, FieldType, RecordInfo};
use crate::{Scalar, SerialError};

// -----------------------------------------------------------------------------
// Reflect

/// The object-safe side of every value the engine can read or assign.
///
/// Implemented by [`#[derive(Record)]`](crate::derive::Record) for records,
/// and by this crate for the scalar set, opaque numeric types and arrays.
///
/// # Examples
///
/// ```
/// use vc_serial::{Reflect, ReflectRef, Scalar};
///
/// let value: &dyn Reflect = &7_i32;
///
/// assert_eq!(value.reflect_type_path(), "i32");
/// assert!(value.reflect_record_info().is_none());
/// assert!(matches!(value.reflect_ref(), ReflectRef::Scalar(Scalar::I32(7))));
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Returns the type path of the underlying type.
    fn reflect_type_path(&self) -> &'static str;

    /// Returns the record information, `None` if the value is not a record.
    fn reflect_record_info(&self) -> Option<&'static RecordInfo>;

    /// Returns a read view of the value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Overwrites the value with a decoded one.
    fn apply(&mut self, value: FieldValue) -> Result<(), SerialError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Takes the value out of the box as type `T`.
    ///
    /// ```
    /// use vc_serial::Reflect;
    ///
    /// let boxed: Box<dyn Reflect> = Box::new(String::from("text"));
    /// assert_eq!(boxed.take::<String>().unwrap(), "text");
    ///
    /// let boxed: Box<dyn Reflect> = Box::new(1_i64);
    /// assert!(boxed.take::<i32>().is_err());
    /// ```
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, SerialError> {
        let from = self.reflect_type_path();
        self.into_any()
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| {
                SerialError::reflection(format!(
                    "cannot take `{from}` as `{}`",
                    type_name::<T>()
                ))
            })
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reflect_ref() {
            ReflectRef::Scalar(scalar) => fmt::Debug::fmt(&scalar, f),
            ReflectRef::Record(_) => write!(f, "Record({})", self.reflect_type_path()),
            ReflectRef::Array(items) => f.debug_list().entries(items).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Field

/// The static side of a field type.
///
/// [`FieldInfo::new`](crate::info::FieldInfo::new) reads the [`FieldType`]
/// from here, and decoded [`FieldValue`]s are turned back into the concrete
/// type through [`from_field`](Field::from_field).
pub trait Field: Reflect + Sized {
    /// The declared type, used by the field classifier.
    fn field_type() -> FieldType;

    /// Converts a decoded value into `Self`.
    fn from_field(value: FieldValue) -> Result<Self, SerialError>;

    /// The default-constructed value of the type.
    ///
    /// A freshly constructed record holds this value in every field the data
    /// does not mention.
    fn empty() -> Self;
}

// -----------------------------------------------------------------------------
// ReflectRef

/// A read view of a reflected value.
pub enum ReflectRef<'a> {
    Scalar(Scalar),
    Record(&'a dyn Reflect),
    Array(Vec<&'a dyn Reflect>),
}

impl ReflectRef<'_> {
    /// Returns a short name of the variant, used in error messages.
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Record(_) => "record",
            Self::Array(_) => "array",
        }
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// An owned value returned by the load operations of a backend.
pub enum FieldValue {
    Scalar(Scalar),
    Record(Box<dyn Reflect>),
    ScalarArray(Vec<Scalar>),
    RecordArray(Vec<Box<dyn Reflect>>),
}

impl FieldValue {
    /// Returns the [`FieldKind`] this value was loaded as.
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Scalar(_) => FieldKind::Scalar,
            Self::Record(_) => FieldKind::Record,
            Self::ScalarArray(_) => FieldKind::ScalarArray,
            Self::RecordArray(_) => FieldKind::RecordArray,
        }
    }

    /// Returns the contained scalar.
    pub fn into_scalar(self) -> Result<Scalar, SerialError> {
        match self {
            Self::Scalar(scalar) => Ok(scalar),
            other => Err(other.mismatch(FieldKind::Scalar)),
        }
    }

    /// Returns the contained record as type `T`.
    pub fn into_record<T: Any>(self) -> Result<T, SerialError> {
        match self {
            Self::Record(boxed) => boxed.take::<T>(),
            other => Err(other.mismatch(FieldKind::Record)),
        }
    }

    #[cold]
    fn mismatch(&self, expected: FieldKind) -> SerialError {
        SerialError::reflection(format!(
            "expected a {expected:?} value, found a {:?} value",
            self.kind()
        ))
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::ScalarArray(items) => f.debug_tuple("ScalarArray").field(items).finish(),
            Self::RecordArray(items) => f.debug_tuple("RecordArray").field(items).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Implements the `Any` casts of [`Reflect`].
macro_rules! impl_reflect_cast_fn {
    () => {
        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(self: Box<Self>) -> Box<dyn ::core::any::Any> {
            self
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
