use core::any::type_name;
use core::fmt;

use log::{debug, error};

use crate::descriptor::FieldDescriptor;
use crate::info::{FieldKind, FieldType, RecordInfo};
use crate::{Backend, Field, FieldValue, Reflect, ReflectRef, Scalar, ScalarType, SerialError};

/// The reserved key holding the schema version of an encoded record.
pub const VERSION_KEY: &str = "serial_version";

// -----------------------------------------------------------------------------
// Engine

/// Encodes records into data trees of type `D` and restores them.
///
/// The engine walks the [`TypeDescriptor`](crate::descriptor::TypeDescriptor)
/// of a record and hands each field to its [`Backend`]. It holds no state
/// besides the backend and can be reused sequentially.
///
/// # Examples
///
/// ```
/// use vc_serial::Engine;
/// use vc_serial::derive::Record;
/// use vc_serial::tree::DataTree;
///
/// #[derive(Record, Debug, PartialEq)]
/// #[serializable]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let engine = Engine::<DataTree>::default();
///
/// let data = engine.serialize(&Point { x: 3, y: -4 }).unwrap();
/// assert_eq!(data.keys().collect::<Vec<_>>(), ["serial_version", "x", "y"]);
///
/// let point: Point = engine.deserialize(&data).unwrap();
/// assert_eq!(point, Point { x: 3, y: -4 });
/// ```
pub struct Engine<D> {
    backend: Box<dyn Backend<D> + Send + Sync>,
}

impl<D> Engine<D> {
    /// Creates an engine using the given backend.
    #[inline]
    pub fn new(backend: impl Backend<D> + Send + Sync + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    #[inline]
    pub fn backend(&self) -> &dyn Backend<D> {
        &*self.backend
    }

    // -------------------------------------------------------------------------
    // Encode

    /// Encodes a record into a fresh data tree.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NotSerializable`] if `value`, or a record nested in
    ///   it, is not a serializable record.
    /// - Any failure of the backend, which aborts the whole operation.
    pub fn serialize(&self, value: &dyn Reflect) -> Result<D, SerialError> {
        let info = value
            .reflect_record_info()
            .ok_or(SerialError::NotSerializable(value.reflect_type_path()))?;
        let descriptor = info.descriptor()?;

        let mut data = self.backend.new_data();

        if descriptor.embed_version() {
            self.backend
                .store_scalar(&mut data, VERSION_KEY, Scalar::I32(descriptor.version()));
        }

        for field in descriptor.fields() {
            let x = field.get(value)?;
            self.store_field(&mut data, field, x)?;
        }

        Ok(data)
    }

    /// Same as [`serialize`](Self::serialize), logging the error and
    /// returning `None` on failure.
    pub fn try_serialize(&self, value: &dyn Reflect) -> Option<D> {
        match self.serialize(value) {
            Ok(data) => Some(data),
            Err(err) => {
                error!("failed to serialize `{}`: {err}", value.reflect_type_path());
                None
            }
        }
    }

    fn store_field(
        &self,
        data: &mut D,
        field: &FieldDescriptor,
        value: &dyn Reflect,
    ) -> Result<(), SerialError> {
        let backend = &*self.backend;
        let key = field.name();

        match (field.kind(), value.reflect_ref()) {
            (FieldKind::Scalar, ReflectRef::Scalar(scalar)) => {
                backend.store_scalar(data, key, scalar);
                Ok(())
            }
            (FieldKind::Record, _) => backend.store_record(data, key, value, self),
            (FieldKind::ScalarArray, ReflectRef::Array(items)) => {
                let array = items
                    .into_iter()
                    .map(|item| match item.reflect_ref() {
                        ReflectRef::Scalar(scalar) => Ok(scalar),
                        other => Err(shape_mismatch(field, other.shape())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                backend.store_scalar_array(data, key, array);
                Ok(())
            }
            (FieldKind::RecordArray, ReflectRef::Array(items)) => {
                backend.store_record_array(data, key, &items, self)
            }
            (_, other) => Err(shape_mismatch(field, other.shape())),
        }
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Decodes a record of type `T`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NotSerializable`] if `T`, or the type of a nested
    ///   field, is not a serializable record.
    /// - [`SerialError::VersionMismatch`] if the embedded version differs.
    /// - [`SerialError::MalformedData`] if `serial_version` is missing or the
    ///   backend cannot read a field as its declared type.
    /// - [`SerialError::UnknownField`] if the data holds a key no field matches.
    /// - [`SerialError::Reflection`] if the record cannot be constructed.
    pub fn deserialize<T: Field>(&self, data: &D) -> Result<T, SerialError> {
        self.deserialize_type(&T::field_type(), data)?.take::<T>()
    }

    /// Same as [`deserialize`](Self::deserialize), logging the error and
    /// returning `None` on failure.
    pub fn try_deserialize<T: Field>(&self, data: &D) -> Option<T> {
        match self.deserialize(data) {
            Ok(value) => Some(value),
            Err(err) => {
                error!("failed to deserialize `{}`: {err}", type_name::<T>());
                None
            }
        }
    }

    /// Decodes a record of the declared type `ty`.
    ///
    /// Backends call this to restore nested records.
    pub fn deserialize_type(
        &self,
        ty: &FieldType,
        data: &D,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        match ty {
            FieldType::Record(record) => {
                let info = record
                    .record_info()
                    .ok_or(SerialError::NotSerializable(record.type_path()))?;
                self.deserialize_record(info, data)
            }
            other => Err(SerialError::NotSerializable(other.type_path())),
        }
    }

    /// Decodes the record described by `info`.
    pub fn deserialize_record(
        &self,
        info: &'static RecordInfo,
        data: &D,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let descriptor = info.descriptor()?;
        let backend = &*self.backend;
        let keys = backend.keys(data);

        if descriptor.embed_version() {
            if !keys.contains(&VERSION_KEY) {
                return Err(SerialError::malformed(format!(
                    "missing `{VERSION_KEY}` in data of `{}`",
                    info.type_path()
                )));
            }

            let actual = match backend
                .load_scalar(data, VERSION_KEY, ScalarType::I32)?
                .cast(ScalarType::I32)?
            {
                Scalar::I32(version) => version,
                other => {
                    return Err(SerialError::malformed(format!(
                        "`{VERSION_KEY}` holds a `{}`",
                        other.ty()
                    )));
                }
            };

            if actual != descriptor.version() {
                return Err(SerialError::VersionMismatch {
                    expected: descriptor.version(),
                    actual,
                });
            }
        }

        let mut instance = info.construct()?;

        for key in keys {
            if key == VERSION_KEY {
                if !descriptor.embed_version() {
                    debug!("ignoring `{VERSION_KEY}` in data of `{}`", info.type_path());
                }
                continue;
            }

            let field = descriptor.get(key).ok_or_else(|| SerialError::UnknownField {
                ty: info.type_path(),
                field: key.to_owned(),
            })?;

            let value = self.load_field(data, field)?;
            field.get_mut(&mut *instance)?.apply(value)?;
        }

        Ok(instance)
    }

    fn load_field(&self, data: &D, field: &FieldDescriptor) -> Result<FieldValue, SerialError> {
        let backend = &*self.backend;
        let key = field.name();
        let ty = field.field_type();

        Ok(match field.kind() {
            FieldKind::Scalar => {
                let scalar = ty.as_scalar().ok_or_else(|| shape_mismatch(field, "record"))?;
                FieldValue::Scalar(backend.load_scalar(data, key, scalar)?)
            }
            FieldKind::Record => FieldValue::Record(backend.load_record(data, key, self, ty)?),
            FieldKind::ScalarArray => {
                let element = ty
                    .element()
                    .and_then(FieldType::as_scalar)
                    .ok_or_else(|| shape_mismatch(field, "record"))?;
                FieldValue::ScalarArray(backend.load_scalar_array(data, key, element)?)
            }
            FieldKind::RecordArray => {
                let element = ty.element().ok_or_else(|| shape_mismatch(field, "record"))?;
                FieldValue::RecordArray(backend.load_record_array(data, key, self, element)?)
            }
        })
    }
}

impl<D> fmt::Debug for Engine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("data", &type_name::<D>())
            .finish_non_exhaustive()
    }
}

#[cold]
fn shape_mismatch(field: &FieldDescriptor, found: &str) -> SerialError {
    SerialError::reflection(format!(
        "field `{}` of `{}` is declared as {:?}, found `{found}`",
        field.name(),
        field.owner(),
        field.kind()
    ))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::derive::Record;
    use crate::info::{RecordInfo, SerialMeta, Typed};
    use crate::tree::{DataTree, Node};
    use crate::{Engine, Scalar, SerialError, VERSION_KEY};

    #[derive(Record, Debug, Clone, PartialEq)]
    #[serializable(version = 0, embed_version = true, default_exclude = false)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Crate {
        sizes: Vec<i32>,
        origin: Point,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Boxed {
        w: i32,
        #[serial(ignore)]
        debug: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(default_exclude)]
    struct Thin {
        #[serial(keep)]
        kept: i32,
        dropped: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 1)]
    struct PathV1 {
        len: i64,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 2)]
    struct PathV2 {
        len: i64,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 5, embed_version = false)]
    struct Unversioned {
        len: i64,
    }

    #[derive(Record, Debug, PartialEq)]
    struct Unannotated {
        value: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Cache {
        hits: i64,
        #[serial(transient)]
        scratch: Vec<u8>,
        #[serial(constant)]
        limit: u32,
        #[serial(shared)]
        counter: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Shape {
        name: String,
        corner: char,
        scale: f32,
        visible: bool,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 4)]
    struct Polygon {
        #[serial(parent)]
        shape: Shape,
        points: Vec<Point>,
        name: String,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Counter {
        count: u32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Grid {
        cells: Vec<Vec<i32>>,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Holder {
        inner: Unannotated,
    }

    fn engine() -> Engine<DataTree> {
        Engine::default()
    }

    // -------------------------------------------------------------------------
    // Scenarios

    #[test]
    fn point_round_trip() {
        let engine = engine();
        let data = engine.serialize(&Point { x: 3, y: -4 }).unwrap();

        let expected: DataTree = [
            (VERSION_KEY, Node::Scalar(Scalar::I32(0))),
            ("x", Node::Scalar(Scalar::I32(3))),
            ("y", Node::Scalar(Scalar::I32(-4))),
        ]
        .into_iter()
        .collect();
        assert_eq!(data, expected);

        let point: Point = engine.deserialize(&data).unwrap();
        assert_eq!(point, Point { x: 3, y: -4 });
    }

    #[test]
    fn nested_round_trip() {
        let engine = engine();
        let value = Crate {
            sizes: vec![10, 20, 30],
            origin: Point { x: 1, y: 2 },
        };

        let data = engine.serialize(&value).unwrap();
        assert!(matches!(data.get("sizes"), Some(Node::ScalarArray(items)) if items.len() == 3));
        assert!(matches!(data.get("origin"), Some(Node::Tree(_))));

        let decoded: Crate = engine.deserialize(&data).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn ignored_field() {
        let engine = engine();
        let data = engine.serialize(&Boxed { w: 5, debug: 99 }).unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), [VERSION_KEY, "w"]);

        let decoded: Boxed = engine.deserialize(&data).unwrap();
        assert_eq!(decoded, Boxed { w: 5, debug: 0 });
    }

    #[test]
    fn kept_field() {
        let engine = engine();
        let data = engine.serialize(&Thin { kept: 1, dropped: 2 }).unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), ["kept", VERSION_KEY]);

        let decoded: Thin = engine.deserialize(&data).unwrap();
        assert_eq!(decoded, Thin { kept: 1, dropped: 0 });
    }

    #[test]
    fn version_mismatch() {
        let engine = engine();
        let data = engine.serialize(&PathV1 { len: 8 }).unwrap();

        assert_eq!(
            engine.deserialize::<PathV2>(&data),
            Err(SerialError::VersionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(engine.try_deserialize::<PathV2>(&data), None);
        assert_eq!(engine.deserialize::<PathV1>(&data), Ok(PathV1 { len: 8 }));
    }

    #[test]
    fn unannotated_type() {
        let engine = engine();
        let ty = Unannotated::record_info().type_path();

        assert_eq!(
            engine.serialize(&Unannotated { value: 1 }).unwrap_err(),
            SerialError::NotSerializable(ty)
        );
        assert!(engine.try_serialize(&Unannotated { value: 1 }).is_none());
        assert_eq!(
            engine.deserialize::<Unannotated>(&DataTree::new()).unwrap_err(),
            SerialError::NotSerializable(ty)
        );

        // Values that are no records at all.
        assert_eq!(
            engine.serialize(&1_i32).unwrap_err(),
            SerialError::NotSerializable("i32")
        );
        assert!(matches!(
            engine.deserialize::<i32>(&DataTree::new()),
            Err(SerialError::NotSerializable("i32"))
        ));
    }

    // -------------------------------------------------------------------------
    // Version guard

    #[test]
    fn unversioned_records() {
        let engine = engine();
        let data = engine.serialize(&Unversioned { len: 3 }).unwrap();
        assert!(!data.contains_key(VERSION_KEY));

        // An unexpected version entry is ignored.
        let mut tagged = data.clone();
        tagged.insert(VERSION_KEY, Node::Scalar(Scalar::I32(42)));
        assert_eq!(
            engine.deserialize::<Unversioned>(&tagged),
            Ok(Unversioned { len: 3 })
        );
    }

    #[test]
    fn missing_version() {
        let engine = engine();
        let mut data = engine.serialize(&Point { x: 1, y: 1 }).unwrap();
        data.remove(VERSION_KEY);

        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));

        data.insert(VERSION_KEY, Node::Scalar(Scalar::String("0".into())));
        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Keys

    #[test]
    fn unknown_key() {
        let engine = engine();
        let mut data = engine.serialize(&Point { x: 1, y: 1 }).unwrap();
        data.insert("z", Node::Scalar(Scalar::I32(0)));

        assert_eq!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::UnknownField {
                ty: Point::record_info().type_path(),
                field: "z".into(),
            })
        );
    }

    #[test]
    fn absent_keys_keep_defaults() {
        let engine = engine();
        let data: DataTree = [
            (VERSION_KEY, Node::Scalar(Scalar::I32(0))),
            ("y", Node::Scalar(Scalar::I32(9))),
        ]
        .into_iter()
        .collect();

        assert_eq!(engine.deserialize::<Point>(&data), Ok(Point { x: 0, y: 9 }));
    }

    #[test]
    fn mistyped_entries() {
        let engine = engine();
        let mut data = engine.serialize(&Point { x: 1, y: 1 }).unwrap();
        data.insert("x", Node::Tree(DataTree::new()));

        assert!(matches!(
            engine.deserialize::<Point>(&data),
            Err(SerialError::MalformedData(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Fields

    #[test]
    fn ineligible_fields() {
        let engine = engine();
        let value = Cache {
            hits: 12,
            scratch: vec![1, 2],
            limit: 100,
            counter: 7,
        };

        let data = engine.serialize(&value).unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), ["hits", VERSION_KEY]);

        let decoded: Cache = engine.deserialize(&data).unwrap();
        assert_eq!(
            decoded,
            Cache {
                hits: 12,
                scratch: vec![],
                limit: 0,
                counter: 0,
            }
        );
    }

    #[test]
    fn inherited_fields() {
        let engine = engine();
        let value = Polygon {
            shape: Shape {
                name: "hidden".into(),
                corner: 'a',
                scale: 0.5,
                visible: true,
            },
            points: vec![Point { x: 0, y: 0 }, Point { x: 4, y: 2 }],
            name: "triangle".into(),
        };

        let data = engine.serialize(&value).unwrap();
        assert_eq!(
            data.keys().collect::<Vec<_>>(),
            ["corner", "name", "points", "scale", VERSION_KEY, "visible"]
        );
        assert_eq!(data.get(VERSION_KEY), Some(&Node::Scalar(Scalar::I32(4))));
        assert_eq!(
            data.get("name"),
            Some(&Node::Scalar(Scalar::String("triangle".into())))
        );

        let decoded: Polygon = engine.deserialize(&data).unwrap();
        assert_eq!(decoded.points, value.points);
        assert_eq!(decoded.name, "triangle");
        assert_eq!(decoded.shape.corner, 'a');
        assert_eq!(decoded.shape.scale, 0.5);
        assert!(decoded.shape.visible);
        // The shadowed parent field is not serialized.
        assert_eq!(decoded.shape.name, "");
    }

    #[test]
    fn opaque_fields() {
        let engine = engine();

        assert!(matches!(
            engine.serialize(&Counter { count: 1 }),
            Err(SerialError::NotSerializable("u32"))
        ));

        let tree: DataTree = [
            (VERSION_KEY, Node::Scalar(Scalar::I32(0))),
            ("count", Node::Tree(DataTree::new())),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            engine.deserialize::<Counter>(&tree),
            Err(SerialError::NotSerializable("u32"))
        ));
    }

    #[test]
    fn nested_failures_abort() {
        let engine = engine();

        let grid = Grid {
            cells: vec![vec![1, 2], vec![3]],
        };
        assert!(matches!(
            engine.serialize(&grid),
            Err(SerialError::NotSerializable(_))
        ));

        let holder = Holder {
            inner: Unannotated { value: 1 },
        };
        assert_eq!(
            engine.serialize(&holder).unwrap_err(),
            SerialError::NotSerializable(Unannotated::record_info().type_path())
        );
        assert!(engine.try_serialize(&holder).is_none());
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    #[serial(default)]
    struct Settings {
        volume: i32,
        title: String,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                volume: 80,
                title: "untitled".into(),
            }
        }
    }

    #[test]
    fn default_construction() {
        let data: DataTree = [
            (VERSION_KEY, Node::Scalar(Scalar::I32(0))),
            ("title", Node::Scalar(Scalar::String("menu".into()))),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            engine().deserialize::<Settings>(&data),
            Ok(Settings {
                volume: 80,
                title: "menu".into(),
            })
        );
    }

    #[test]
    fn missing_constructor() {
        let info: &'static RecordInfo = Box::leak(Box::new(
            RecordInfo::new::<Point>(vec![]).with_serializable(SerialMeta::new()),
        ));
        let data: DataTree = [(VERSION_KEY, Node::Scalar(Scalar::I32(0)))]
            .into_iter()
            .collect();

        assert!(matches!(
            engine().deserialize_record(info, &data),
            Err(SerialError::Reflection(_))
        ));
    }

    #[derive(Record, Debug, Clone, PartialEq)]
    #[serializable(version = 7)]
    struct Marker {
        id: i64,
        label: String,
    }

    #[test]
    fn shared_across_threads() {
        fn assert_shareable<T: Send + Sync>(_: &T) {}

        let engine = engine();
        assert_shareable(&engine);

        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|i| {
                    let engine = &engine;
                    scope.spawn(move || {
                        let marker = Marker {
                            id: i,
                            label: format!("worker {i}"),
                        };
                        let data = engine.serialize(&marker).unwrap();
                        assert_eq!(data.get(VERSION_KEY), Some(&Node::Scalar(Scalar::I32(7))));
                        engine.deserialize::<Marker>(&data)
                    })
                })
                .collect();

            for (i, worker) in (0..).zip(workers) {
                let decoded = worker.join().unwrap().unwrap();
                assert_eq!(decoded.id, i);
            }
        });

        let first = Marker::record_info().descriptor().unwrap();
        let second = Marker::record_info().descriptor().unwrap();
        assert!(core::ptr::eq(first, second));
    }

    #[test]
    fn sequential_reuse() {
        let engine = engine();
        for i in 0..4 {
            let point = Point { x: i, y: -i };
            let data = engine.serialize(&point).unwrap();
            assert_eq!(engine.deserialize::<Point>(&data), Ok(point));
        }
    }
}
