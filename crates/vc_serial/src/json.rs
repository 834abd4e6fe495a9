//! A [`Backend`] storing records as JSON objects.
//!
//! Scalars become JSON values: integers and floats are numbers, `char` is a
//! one-character string, and non-finite floats are `null`. Nested records
//! are objects and arrays are JSON arrays.
//!
//! Loads coerce the JSON value to the declared scalar type through
//! [`Scalar::cast`], so `3.0` reads as an `i32` and `7` as an `f64`.
//! A `null` reads as NaN for float fields.

use serde_json::{Map, Number, Value};

use crate::info::FieldType;
use crate::{Backend, Engine, Reflect, Scalar, ScalarType, SerialError};

/// An encoded record.
pub type JsonObject = Map<String, Value>;

// -----------------------------------------------------------------------------
// JsonBackend

/// A [`Backend`] producing [`JsonObject`]s.
///
/// # Examples
///
/// ```
/// use vc_serial::Engine;
/// use vc_serial::derive::Record;
/// use vc_serial::json::JsonObject;
///
/// #[derive(Record, Debug, PartialEq)]
/// #[serializable(version = 1)]
/// struct Size {
///     w: f32,
///     h: f32,
/// }
///
/// let engine = Engine::<JsonObject>::default();
/// let object = engine.serialize(&Size { w: 2.0, h: 0.5 }).unwrap();
///
/// let text = serde_json::to_string(&object).unwrap();
/// assert_eq!(text, r#"{"h":0.5,"serial_version":1,"w":2.0}"#);
///
/// let parsed: JsonObject = serde_json::from_str(&text).unwrap();
/// assert_eq!(engine.deserialize::<Size>(&parsed), Ok(Size { w: 2.0, h: 0.5 }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Default for Engine<JsonObject> {
    #[inline]
    fn default() -> Self {
        Engine::new(JsonBackend)
    }
}

fn to_value(scalar: Scalar) -> Value {
    match scalar {
        Scalar::Bool(v) => Value::Bool(v),
        Scalar::I8(v) => Value::from(v),
        Scalar::I16(v) => Value::from(v),
        Scalar::I32(v) => Value::from(v),
        Scalar::I64(v) => Value::from(v),
        Scalar::F32(v) => float(f64::from(v)),
        Scalar::F64(v) => float(v),
        Scalar::Char(v) => Value::String(v.to_string()),
        Scalar::String(v) => Value::String(v),
    }
}

#[inline]
fn float(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn from_value(key: &str, value: &Value, ty: ScalarType) -> Result<Scalar, SerialError> {
    let scalar = match value {
        Value::Bool(v) => Scalar::Bool(*v),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(v), _) => Scalar::I64(v),
            (None, Some(v)) if n.is_f64() => Scalar::F64(v),
            _ => {
                return Err(SerialError::malformed(format!(
                    "number {n} under `{key}` is out of range"
                )));
            }
        },
        Value::String(v) => Scalar::String(v.clone()),
        Value::Null if ty.is_float() => Scalar::F64(f64::NAN),
        other => return Err(unexpected(key, "scalar", other)),
    };
    scalar.cast(ty)
}

#[inline]
fn entry<'a>(data: &'a JsonObject, key: &str) -> Result<&'a Value, SerialError> {
    data.get(key)
        .ok_or_else(|| SerialError::malformed(format!("missing key `{key}`")))
}

#[inline]
fn elements<'a>(data: &'a JsonObject, key: &str) -> Result<&'a [Value], SerialError> {
    match entry(data, key)? {
        Value::Array(items) => Ok(items),
        other => Err(unexpected(key, "array", other)),
    }
}

#[cold]
fn unexpected(key: &str, expected: &str, value: &Value) -> SerialError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    SerialError::malformed(format!("expected `{expected}` under `{key}`, found `{found}`"))
}

impl Backend<JsonObject> for JsonBackend {
    #[inline]
    fn new_data(&self) -> JsonObject {
        Map::new()
    }

    #[inline]
    fn store_scalar(&self, data: &mut JsonObject, key: &str, value: Scalar) {
        data.insert(key.to_owned(), to_value(value));
    }

    fn store_record(
        &self,
        data: &mut JsonObject,
        key: &str,
        value: &dyn Reflect,
        engine: &Engine<JsonObject>,
    ) -> Result<(), SerialError> {
        let object = engine.serialize(value)?;
        data.insert(key.to_owned(), Value::Object(object));
        Ok(())
    }

    fn store_scalar_array(&self, data: &mut JsonObject, key: &str, array: Vec<Scalar>) {
        let items = array.into_iter().map(to_value).collect();
        data.insert(key.to_owned(), Value::Array(items));
    }

    fn store_record_array(
        &self,
        data: &mut JsonObject,
        key: &str,
        array: &[&dyn Reflect],
        engine: &Engine<JsonObject>,
    ) -> Result<(), SerialError> {
        let items = array
            .iter()
            .map(|item| engine.serialize(*item).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        data.insert(key.to_owned(), Value::Array(items));
        Ok(())
    }

    fn keys<'a>(&self, data: &'a JsonObject) -> Vec<&'a str> {
        data.keys().map(String::as_str).collect()
    }

    fn load_scalar(
        &self,
        data: &JsonObject,
        key: &str,
        ty: ScalarType,
    ) -> Result<Scalar, SerialError> {
        from_value(key, entry(data, key)?, ty)
    }

    fn load_record(
        &self,
        data: &JsonObject,
        key: &str,
        engine: &Engine<JsonObject>,
        ty: &FieldType,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        match entry(data, key)? {
            Value::Object(object) => engine.deserialize_type(ty, object),
            other => Err(unexpected(key, "object", other)),
        }
    }

    fn load_scalar_array(
        &self,
        data: &JsonObject,
        key: &str,
        element: ScalarType,
    ) -> Result<Vec<Scalar>, SerialError> {
        elements(data, key)?
            .iter()
            .map(|item| from_value(key, item, element))
            .collect()
    }

    fn load_record_array(
        &self,
        data: &JsonObject,
        key: &str,
        engine: &Engine<JsonObject>,
        element: &FieldType,
    ) -> Result<Vec<Box<dyn Reflect>>, SerialError> {
        elements(data, key)?
            .iter()
            .map(|item| match item {
                Value::Object(object) => engine.deserialize_type(element, object),
                other => Err(unexpected(key, "object", other)),
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::JsonObject;
    use crate::derive::Record;
    use crate::{Engine, SerialError};

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 3)]
    struct Layer {
        name: String,
        glyph: char,
        opacity: f64,
        hidden: bool,
        depth: i8,
        outline: Vec<Point>,
        offsets: [i64; 2],
    }

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            _ => unreachable!(),
        }
    }

    fn layer() -> Layer {
        Layer {
            name: "base".into(),
            glyph: '#',
            opacity: 0.75,
            hidden: false,
            depth: -2,
            outline: vec![Point { x: 0, y: 1 }, Point { x: 2, y: 3 }],
            offsets: [10, -10],
        }
    }

    #[test]
    fn encoded_form() {
        let engine = Engine::<JsonObject>::default();
        let encoded = engine.serialize(&layer()).unwrap();

        assert_eq!(
            Value::Object(encoded),
            json!({
                "serial_version": 3,
                "name": "base",
                "glyph": "#",
                "opacity": 0.75,
                "hidden": false,
                "depth": -2,
                "outline": [
                    { "serial_version": 0, "x": 0, "y": 1 },
                    { "serial_version": 0, "x": 2, "y": 3 },
                ],
                "offsets": [10, -10],
            })
        );
    }

    #[test]
    fn text_round_trip() {
        let engine = Engine::<JsonObject>::default();
        let text = serde_json::to_string(&engine.serialize(&layer()).unwrap()).unwrap();
        let parsed: JsonObject = serde_json::from_str(&text).unwrap();

        assert_eq!(engine.deserialize::<Layer>(&parsed), Ok(layer()));
    }

    #[test]
    fn coerced_numbers() {
        let engine = Engine::<JsonObject>::default();
        let data = object(json!({ "serial_version": 0.0, "x": 4.0, "y": -1 }));
        assert_eq!(engine.deserialize::<Point>(&data), Ok(Point { x: 4, y: -1 }));

        let data = object(json!({ "serial_version": 0, "x": 4.5 }));
        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));

        let data = object(json!({ "serial_version": 0, "x": 1_u64 << 40 }));
        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));
    }

    #[test]
    fn non_finite_floats() {
        let engine = Engine::<JsonObject>::default();
        let mut value = layer();
        value.opacity = f64::INFINITY;

        let encoded = engine.serialize(&value).unwrap();
        assert_eq!(encoded.get("opacity"), Some(&Value::Null));

        let decoded = engine.deserialize::<Layer>(&encoded).unwrap();
        assert!(decoded.opacity.is_nan());
    }

    #[test]
    fn mistyped_values() {
        let engine = Engine::<JsonObject>::default();

        let data = object(json!({ "serial_version": 0, "x": "4" }));
        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));

        let mut data = engine.serialize(&layer()).unwrap();
        data.insert("outline".into(), json!([1, 2]));
        assert!(matches!(
            engine.deserialize::<Layer>(&data),
            Err(SerialError::MalformedData(_))
        ));

        let mut data = engine.serialize(&layer()).unwrap();
        data.insert("glyph".into(), json!("##"));
        assert!(engine.try_deserialize::<Layer>(&data).is_none());
    }

    #[test]
    fn mismatch_messages() {
        let engine = Engine::<JsonObject>::default();
        let data = object(json!({ "serial_version": 0, "x": [1], "y": 0 }));

        assert_eq!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(
                "expected `scalar` under `x`, found `array`".into()
            ))
        );
    }

    #[test]
    fn version_guard() {
        let engine = Engine::<JsonObject>::default();
        let data = object(json!({ "serial_version": 1, "x": 0, "y": 0 }));

        assert_eq!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::VersionMismatch {
                expected: 0,
                actual: 1
            })
        );
    }
}
