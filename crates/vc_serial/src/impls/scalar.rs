use core::any::type_name;

use crate::info::{FieldType, RecordInfo, RecordType};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Field, FieldValue, Reflect, ReflectRef, Scalar, ScalarType, SerialError};

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_scalar {
    ($ty:ty => $variant:ident, |$this:ident| $read:expr) => {
        impl Reflect for $ty {
            #[inline]
            fn reflect_type_path(&self) -> &'static str {
                ScalarType::$variant.type_path()
            }

            #[inline]
            fn reflect_record_info(&self) -> Option<&'static RecordInfo> {
                None
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Scalar(Scalar::$variant($read))
            }

            #[inline]
            fn apply(&mut self, value: FieldValue) -> Result<(), SerialError> {
                *self = <Self as Field>::from_field(value)?;
                Ok(())
            }

            impl_reflect_cast_fn!();
        }

        impl Field for $ty {
            #[inline]
            fn field_type() -> FieldType {
                FieldType::Scalar(ScalarType::$variant)
            }

            fn from_field(value: FieldValue) -> Result<Self, SerialError> {
                match value.into_scalar()?.cast(ScalarType::$variant)? {
                    Scalar::$variant(v) => Ok(v),
                    other => Err(SerialError::reflection(format!(
                        "scalar `{}` cannot be assigned to `{}`",
                        other.ty(),
                        type_name::<Self>()
                    ))),
                }
            }

            #[inline]
            fn empty() -> Self {
                Default::default()
            }
        }
    };
}

impl_scalar!(bool => Bool, |this| *this);
impl_scalar!(i8 => I8, |this| *this);
impl_scalar!(i16 => I16, |this| *this);
impl_scalar!(i32 => I32, |this| *this);
impl_scalar!(i64 => I64, |this| *this);
impl_scalar!(f32 => F32, |this| *this);
impl_scalar!(f64 => F64, |this| *this);
impl_scalar!(char => Char, |this| *this);
impl_scalar!(String => String, |this| this.clone());

// -----------------------------------------------------------------------------
// Opaque numbers

macro_rules! impl_opaque {
    ($($ty:ident)*) => {$(
        impl Reflect for $ty {
            #[inline]
            fn reflect_type_path(&self) -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn reflect_record_info(&self) -> Option<&'static RecordInfo> {
                None
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Record(self)
            }

            #[inline]
            fn apply(&mut self, value: FieldValue) -> Result<(), SerialError> {
                *self = <Self as Field>::from_field(value)?;
                Ok(())
            }

            impl_reflect_cast_fn!();
        }

        impl Field for $ty {
            #[inline]
            fn field_type() -> FieldType {
                FieldType::Record(RecordType::opaque::<Self>())
            }

            #[inline]
            fn from_field(value: FieldValue) -> Result<Self, SerialError> {
                value.into_record::<Self>()
            }

            #[inline]
            fn empty() -> Self {
                0
            }
        }
    )*};
}

impl_opaque!(u8 u16 u32 u64 u128 usize i128 isize);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::{FieldKind, FieldType};
    use crate::{Field, FieldValue, Reflect, ReflectRef, Scalar};

    #[test]
    fn scalar_views() {
        let text = String::from("abc");
        assert!(matches!(text.reflect_ref(), ReflectRef::Scalar(Scalar::String(s)) if s == "abc"));
        assert_eq!(<String as Reflect>::reflect_type_path(&text), core::any::type_name::<String>());
        assert!(matches!(2.5_f32.reflect_ref(), ReflectRef::Scalar(Scalar::F32(v)) if v == 2.5));
    }

    #[test]
    fn apply_casts() {
        let mut value = 0_i16;
        value.apply(FieldValue::Scalar(Scalar::I64(-300))).unwrap();
        assert_eq!(value, -300);

        assert!(value.apply(FieldValue::Scalar(Scalar::I64(1 << 20))).is_err());
        assert!(value.apply(FieldValue::ScalarArray(vec![])).is_err());
        assert_eq!(value, -300);

        let mut c = 'a';
        c.apply(FieldValue::Scalar(Scalar::String("b".into()))).unwrap();
        assert_eq!(c, 'b');
    }

    #[test]
    fn opaque_numbers() {
        assert!(matches!(u64::field_type(), FieldType::Record(_)));
        assert_eq!(usize::field_type().kind(), FieldKind::Record);
        assert!(u8::field_type().kind() != FieldKind::Scalar);
        assert_eq!(7_u32.reflect_type_path(), "u32");

        let FieldType::Record(record) = u16::field_type() else {
            unreachable!()
        };
        assert!(record.type_is::<u16>());
        assert!(record.record_info().is_none());
    }
}
