//! The closed set of scalar values.
//!
//! A field whose static type is one of `bool`, `i8`, `i16`, `i32`, `i64`,
//! `f32`, `f64`, `char` or `String` is stored by the backend directly as a
//! [`Scalar`]. Every other type is either a record or an array of them.

use core::fmt;

use crate::SerialError;

// -----------------------------------------------------------------------------
// ScalarType

/// The static type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
}

impl ScalarType {
    /// Returns the type path of the rust type this scalar type stands for.
    pub const fn type_path(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "alloc::string::String",
        }
    }

    /// Returns `true` for the signed integer types.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns `true` for `f32` and `f64`.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path())
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A scalar value, as read from a field or produced by a backend.
///
/// # Examples
///
/// ```
/// use vc_serial::{Scalar, ScalarType};
///
/// // Backends that only know 64-bit integers hand them back as `I64`.
/// let loaded = Scalar::I64(-4);
/// assert_eq!(loaded.cast(ScalarType::I32).unwrap(), Scalar::I32(-4));
///
/// assert!(Scalar::I64(1 << 40).cast(ScalarType::I32).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
}

impl Scalar {
    /// Returns the [`ScalarType`] of this value.
    pub const fn ty(&self) -> ScalarType {
        match self {
            Self::Bool(_) => ScalarType::Bool,
            Self::I8(_) => ScalarType::I8,
            Self::I16(_) => ScalarType::I16,
            Self::I32(_) => ScalarType::I32,
            Self::I64(_) => ScalarType::I64,
            Self::F32(_) => ScalarType::F32,
            Self::F64(_) => ScalarType::F64,
            Self::Char(_) => ScalarType::Char,
            Self::String(_) => ScalarType::String,
        }
    }

    /// Returns the value as `i64` if it is an integer.
    pub const fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(v as i64),
            Self::I16(v) => Some(v as i64),
            Self::I32(v) => Some(v as i64),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is a float.
    pub const fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v as f64),
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the value into `ty`.
    ///
    /// Accepted conversions:
    /// - between integer widths, if the value fits;
    /// - integer to float;
    /// - float to integer, if the value is integral and fits;
    /// - between float widths;
    /// - a one-character string to `char`, and `char` to string.
    ///
    /// Everything else is [`SerialError::MalformedData`].
    pub fn cast(self, ty: ScalarType) -> Result<Scalar, SerialError> {
        if self.ty() == ty {
            return Ok(self);
        }

        if let Some(v) = self.as_i64() {
            if ty.is_integer() {
                return Self::from_i64(v, ty);
            }
            match ty {
                ScalarType::F32 => return Ok(Self::F32(v as f32)),
                ScalarType::F64 => return Ok(Self::F64(v as f64)),
                _ => {}
            }
        }

        if let Some(v) = self.as_f64() {
            match ty {
                ScalarType::F32 => return Ok(Self::F32(v as f32)),
                ScalarType::F64 => return Ok(Self::F64(v)),
                _ if ty.is_integer() => {
                    // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
                    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                        return Self::from_i64(v as i64, ty);
                    }
                    return Err(SerialError::malformed(format!(
                        "float {v} cannot be read as `{ty}`"
                    )));
                }
                _ => {}
            }
        }

        match (self, ty) {
            (Self::String(s), ScalarType::Char) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(SerialError::malformed(format!(
                        "string {s:?} cannot be read as `char`"
                    ))),
                }
            }
            (Self::Char(c), ScalarType::String) => Ok(Self::String(c.to_string())),
            (other, ty) => Err(SerialError::malformed(format!(
                "scalar `{}` cannot be read as `{ty}`",
                other.ty()
            ))),
        }
    }

    fn from_i64(v: i64, ty: ScalarType) -> Result<Scalar, SerialError> {
        let out_of_range =
            || SerialError::malformed(format!("integer {v} is out of range for `{ty}`"));
        Ok(match ty {
            ScalarType::I8 => Self::I8(i8::try_from(v).map_err(|_| out_of_range())?),
            ScalarType::I16 => Self::I16(i16::try_from(v).map_err(|_| out_of_range())?),
            ScalarType::I32 => Self::I32(i32::try_from(v).map_err(|_| out_of_range())?),
            ScalarType::I64 => Self::I64(v),
            _ => return Err(out_of_range()),
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::I8(v) => fmt::Display::fmt(v, f),
            Self::I16(v) => fmt::Display::fmt(v, f),
            Self::I32(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::F32(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Debug::fmt(v, f),
            Self::String(v) => fmt::Debug::fmt(v, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Serialize

#[cfg(feature = "serde")]
impl serde_core::Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde_core::Serializer,
    {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::I8(v) => serializer.serialize_i8(*v),
            Self::I16(v) => serializer.serialize_i16(*v),
            Self::I32(v) => serializer.serialize_i32(*v),
            Self::I64(v) => serializer.serialize_i64(*v),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::Char(v) => serializer.serialize_char(*v),
            Self::String(v) => serializer.serialize_str(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Scalar, ScalarType};
    use crate::SerialError;

    #[test]
    fn integer_widths() {
        assert_eq!(Scalar::I64(127).cast(ScalarType::I8), Ok(Scalar::I8(127)));
        assert_eq!(Scalar::I8(-3).cast(ScalarType::I64), Ok(Scalar::I64(-3)));
        assert!(matches!(
            Scalar::I64(128).cast(ScalarType::I8),
            Err(SerialError::MalformedData(_))
        ));
    }

    #[test]
    fn floats_and_integers() {
        assert_eq!(Scalar::F64(3.0).cast(ScalarType::I32), Ok(Scalar::I32(3)));
        assert!(Scalar::F64(3.5).cast(ScalarType::I32).is_err());
        assert_eq!(Scalar::I64(2).cast(ScalarType::F64), Ok(Scalar::F64(2.0)));
        assert_eq!(Scalar::F64(0.5).cast(ScalarType::F32), Ok(Scalar::F32(0.5)));
    }

    #[test]
    fn chars_and_strings() {
        assert_eq!(
            Scalar::String("x".into()).cast(ScalarType::Char),
            Ok(Scalar::Char('x'))
        );
        assert!(Scalar::String("xy".into()).cast(ScalarType::Char).is_err());
        assert!(Scalar::String(String::new()).cast(ScalarType::Char).is_err());
        assert_eq!(
            Scalar::Char('z').cast(ScalarType::String),
            Ok(Scalar::String("z".into()))
        );
    }

    #[test]
    fn unrelated_types() {
        assert!(Scalar::Bool(true).cast(ScalarType::I32).is_err());
        assert!(Scalar::I32(1).cast(ScalarType::Bool).is_err());
        assert!(Scalar::String("1".into()).cast(ScalarType::I32).is_err());
    }
}
