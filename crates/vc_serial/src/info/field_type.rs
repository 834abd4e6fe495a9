use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::ScalarType;
use crate::info::{RecordInfo, Typed};

// -----------------------------------------------------------------------------
// FieldKind

/// The four ways a field is handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    Record,
    ScalarArray,
    RecordArray,
}

impl FieldKind {
    /// Classifies a declared field type.
    ///
    /// - an array whose element is a scalar is a [`ScalarArray`](FieldKind::ScalarArray);
    /// - any other array is a [`RecordArray`](FieldKind::RecordArray),
    ///   including arrays of arrays;
    /// - a scalar is a [`Scalar`](FieldKind::Scalar);
    /// - anything else is a [`Record`](FieldKind::Record), whether or not the
    ///   type is actually serializable.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::{Field, info::FieldKind};
    ///
    /// assert_eq!(FieldKind::classify(&i32::field_type()), FieldKind::Scalar);
    /// assert_eq!(FieldKind::classify(&<Vec<String>>::field_type()), FieldKind::ScalarArray);
    /// assert_eq!(FieldKind::classify(&<[Vec<i8>; 2]>::field_type()), FieldKind::RecordArray);
    /// assert_eq!(FieldKind::classify(&u32::field_type()), FieldKind::Record);
    /// ```
    pub fn classify(ty: &FieldType) -> FieldKind {
        match ty {
            FieldType::Scalar(_) => FieldKind::Scalar,
            FieldType::Record(_) => FieldKind::Record,
            FieldType::Array(array) => match array.element() {
                FieldType::Scalar(_) => FieldKind::ScalarArray,
                _ => FieldKind::RecordArray,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// FieldType

/// The declared (static) type of a field.
#[derive(Clone, Debug)]
pub enum FieldType {
    Scalar(ScalarType),
    Record(RecordType),
    Array(ArrayType),
}

impl FieldType {
    /// Creates the type of a record field.
    #[inline]
    pub fn record<T: Typed>() -> Self {
        Self::Record(RecordType::of::<T>())
    }

    /// Returns the type path.
    pub fn type_path(&self) -> &'static str {
        match self {
            Self::Scalar(ty) => ty.type_path(),
            Self::Record(ty) => ty.type_path(),
            Self::Array(ty) => ty.type_path(),
        }
    }

    /// Returns the [`FieldKind`] of this type.
    #[inline]
    pub fn kind(&self) -> FieldKind {
        FieldKind::classify(self)
    }

    /// Returns the scalar type, if this is a scalar.
    #[inline]
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(ty) => Some(*ty),
            _ => None,
        }
    }

    /// Returns the element type, if this is an array.
    #[inline]
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            Self::Array(array) => Some(array.element()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path())
    }
}

// -----------------------------------------------------------------------------
// RecordType

/// A lazy handle to a non-scalar, non-array type.
///
/// `RecordInfo` is created on first access; holding a function pointer
/// delays it, so recursive types never recurse while building their info.
#[derive(Clone, Copy)]
pub struct RecordType {
    ty_id: TypeId,
    type_path: &'static str,
    record_info: fn() -> Option<&'static RecordInfo>,
}

impl RecordType {
    /// Creates the handle of a reflected record type.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        fn info<T: Typed>() -> Option<&'static RecordInfo> {
            Some(T::record_info())
        }

        Self {
            ty_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            record_info: info::<T>,
        }
    }

    /// Creates the handle of a type without record information.
    ///
    /// Such a type classifies as a record, but the engine reports it as
    /// not serializable when it reaches it.
    #[inline]
    pub fn opaque<T: Any>() -> Self {
        fn none() -> Option<&'static RecordInfo> {
            None
        }

        Self {
            ty_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            record_info: none,
        }
    }

    /// Returns the `TypeId`.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the type path.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the record information, `None` for opaque types.
    #[inline]
    pub fn record_info(&self) -> Option<&'static RecordInfo> {
        (self.record_info)()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.type_path).finish()
    }
}

// -----------------------------------------------------------------------------
// ArrayType

/// The declared type of an array field: its own path plus its element type.
///
/// Multidimensional arrays are a single array whose element is another array.
#[derive(Clone, Debug)]
pub struct ArrayType {
    type_path: &'static str,
    element: Box<FieldType>,
}

impl ArrayType {
    /// Creates the array type `T` with the given element type.
    #[inline]
    pub fn new<T: Any>(element: FieldType) -> Self {
        Self {
            type_path: type_name::<T>(),
            element: Box::new(element),
        }
    }

    /// Returns the type path.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the element type.
    #[inline]
    pub fn element(&self) -> &FieldType {
        &self.element
    }
}
