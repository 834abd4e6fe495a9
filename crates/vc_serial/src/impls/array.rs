use core::any::type_name;

use crate::info::{ArrayType, FieldType, RecordInfo};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Field, FieldValue, Reflect, ReflectRef, SerialError};

/// Converts a decoded array into its elements.
fn elements<T: Field>(value: FieldValue) -> Result<Vec<T>, SerialError> {
    match value {
        FieldValue::ScalarArray(items) => items
            .into_iter()
            .map(|item| T::from_field(FieldValue::Scalar(item)))
            .collect(),
        FieldValue::RecordArray(items) => items
            .into_iter()
            .map(|item| T::from_field(FieldValue::Record(item)))
            .collect(),
        other => Err(SerialError::reflection(format!(
            "expected an array of `{}`, found a {:?} value",
            type_name::<T>(),
            other.kind()
        ))),
    }
}

macro_rules! impl_array_reflect {
    () => {
        #[inline]
        fn reflect_type_path(&self) -> &'static str {
            type_name::<Self>()
        }

        #[inline]
        fn reflect_record_info(&self) -> Option<&'static RecordInfo> {
            None
        }

        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Array(self.iter().map(|item| item as &dyn Reflect).collect())
        }

        fn apply(&mut self, value: FieldValue) -> Result<(), SerialError> {
            *self = <Self as Field>::from_field(value)?;
            Ok(())
        }

        impl_reflect_cast_fn!();
    };
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Field> Reflect for Vec<T> {
    impl_array_reflect!();
}

impl<T: Field> Field for Vec<T> {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Array(ArrayType::new::<Self>(T::field_type()))
    }

    #[inline]
    fn from_field(value: FieldValue) -> Result<Self, SerialError> {
        elements(value)
    }

    #[inline]
    fn empty() -> Self {
        Vec::new()
    }
}

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: Field> Reflect for Box<[T]> {
    impl_array_reflect!();
}

impl<T: Field> Field for Box<[T]> {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Array(ArrayType::new::<Self>(T::field_type()))
    }

    #[inline]
    fn from_field(value: FieldValue) -> Result<Self, SerialError> {
        elements(value).map(Vec::into_boxed_slice)
    }

    #[inline]
    fn empty() -> Self {
        Box::default()
    }
}

// -----------------------------------------------------------------------------
// [T; N]

impl<T: Field, const N: usize> Reflect for [T; N] {
    impl_array_reflect!();
}

impl<T: Field, const N: usize> Field for [T; N] {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Array(ArrayType::new::<Self>(T::field_type()))
    }

    fn from_field(value: FieldValue) -> Result<Self, SerialError> {
        let items = elements::<T>(value)?;
        let len = items.len();
        <[T; N]>::try_from(items).map_err(|_| {
            SerialError::malformed(format!(
                "expected {N} elements for `{}`, found {len}",
                type_name::<Self>()
            ))
        })
    }

    #[inline]
    fn empty() -> Self {
        core::array::from_fn(|_| T::empty())
    }
}

// -----------------------------------------------------------------------------
// Tests
