use crate::info::FieldType;
use crate::{Engine, Reflect, Scalar, ScalarType, SerialError};

/// A wire-format plug-in producing and consuming data trees of type `D`.
///
/// The engine walks the descriptor of a record and calls one store (or load)
/// operation per field. Nested records are serialized by calling back into
/// the [`Engine`] passed to the recursive operations.
///
/// A backend must give back, at decode time, every key it was given at
/// encode time, with a value equivalent to what was stored.
///
/// Store operations on scalars cannot fail. Every other operation returns
/// the failure of the nested engine call, or [`SerialError::MalformedData`]
/// when the data does not have the expected structure.
///
/// See [`TreeBackend`](crate::tree::TreeBackend) for a reference
/// implementation.
pub trait Backend<D> {
    /// Creates a fresh empty container.
    fn new_data(&self) -> D;

    /// Writes a scalar under `key`.
    fn store_scalar(&self, data: &mut D, key: &str, value: Scalar);

    /// Serializes `value` through `engine` and writes the result under `key`.
    fn store_record(
        &self,
        data: &mut D,
        key: &str,
        value: &dyn Reflect,
        engine: &Engine<D>,
    ) -> Result<(), SerialError>;

    /// Writes a positional sequence of scalars under `key`.
    fn store_scalar_array(&self, data: &mut D, key: &str, array: Vec<Scalar>);

    /// Serializes every element through `engine` and writes the results under `key`.
    fn store_record_array(
        &self,
        data: &mut D,
        key: &str,
        array: &[&dyn Reflect],
        engine: &Engine<D>,
    ) -> Result<(), SerialError>;

    /// Returns the top-level keys, including `serial_version` if present.
    fn keys<'a>(&self, data: &'a D) -> Vec<&'a str>;

    /// Reads the scalar under `key` as type `ty`.
    fn load_scalar(&self, data: &D, key: &str, ty: ScalarType) -> Result<Scalar, SerialError>;

    /// Reads the record under `key` as the declared type `ty`.
    fn load_record(
        &self,
        data: &D,
        key: &str,
        engine: &Engine<D>,
        ty: &FieldType,
    ) -> Result<Box<dyn Reflect>, SerialError>;

    /// Reads the scalar array under `key`, with elements of type `element`.
    fn load_scalar_array(
        &self,
        data: &D,
        key: &str,
        element: ScalarType,
    ) -> Result<Vec<Scalar>, SerialError>;

    /// Reads the record array under `key`, with elements of the declared type `element`.
    fn load_record_array(
        &self,
        data: &D,
        key: &str,
        engine: &Engine<D>,
        element: &FieldType,
    ) -> Result<Vec<Box<dyn Reflect>>, SerialError>;
}
