//! Resolved serialization metadata of record types.
//!
//! A [`TypeDescriptor`] is computed once per record type from its
//! [`RecordInfo`] and the chain of embedded parents, see
//! [`RecordInfo::descriptor`].

mod field;

pub use field::FieldDescriptor;

use core::any::TypeId;
use std::sync::Arc;

use log::{debug, trace};

use crate::hash::HashMap;
use crate::info::{FieldAccessor, RecordInfo, SerialMeta};
use crate::{SerialError, VERSION_KEY};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The resolved metadata of a serializable record type.
///
/// Contains the version policy, the inclusion policy, and the merged table of
/// serialized fields across the record and its ancestors.
///
/// # Examples
///
/// ```
/// use vc_serial::derive::Record;
/// use vc_serial::info::Typed;
///
/// #[derive(Record)]
/// #[serializable(version = 3)]
/// struct Sample {
///     id: i64,
///     #[serial(ignore)]
///     cursor: i32,
/// }
///
/// let descriptor = Sample::record_info().descriptor().unwrap();
///
/// assert_eq!(descriptor.version(), 3);
/// assert!(descriptor.embed_version());
/// assert!(descriptor.get("id").is_some());
/// assert!(descriptor.get("cursor").is_none());
/// ```
#[derive(Debug)]
pub struct TypeDescriptor {
    type_path: &'static str,
    meta: SerialMeta,
    fields: Box<[FieldDescriptor]>,
    index: HashMap<&'static str, usize>,
}

impl TypeDescriptor {
    /// Resolves the descriptor of `info`.
    ///
    /// Prefer [`RecordInfo::descriptor`], which caches the result.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NotSerializable`] if the record has no [`SerialMeta`].
    /// - [`SerialError::Reflection`] if the field table is invalid: a name
    ///   declared twice on one record, an included field named
    ///   `serial_version`, an included field without accessor, or a parent
    ///   chain that loops.
    pub fn resolve(info: &'static RecordInfo) -> Result<Self, SerialError> {
        let meta = *info
            .meta()
            .ok_or(SerialError::NotSerializable(info.type_path()))?;
        let default_exclude = meta.default_exclude();

        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut index: HashMap<&'static str, usize> = HashMap::default();

        let mut visited: Vec<TypeId> = Vec::new();
        let mut path: Vec<Arc<dyn FieldAccessor>> = Vec::new();
        let mut level = Some(info);

        while let Some(record) = level {
            if visited.contains(&record.ty_id()) {
                return Err(SerialError::reflection(format!(
                    "parent chain of `{}` loops at `{}`",
                    info.type_path(),
                    record.type_path()
                )));
            }
            visited.push(record.ty_id());

            let shared_path: Arc<[Arc<dyn FieldAccessor>]> = path.as_slice().into();
            let declared = record.fields();

            for (position, field) in declared.iter().enumerate() {
                let name = field.name();

                if declared[..position].iter().any(|other| other.name() == name) {
                    return Err(SerialError::reflection(format!(
                        "field `{name}` is declared twice in `{}`",
                        record.type_path()
                    )));
                }

                if !field.flags().is_included(default_exclude) {
                    trace!("`{}`: field `{name}` is excluded", record.type_path());
                    continue;
                }

                if name == VERSION_KEY {
                    return Err(SerialError::reflection(format!(
                        "field `{name}` of `{}` uses the reserved key",
                        record.type_path()
                    )));
                }

                if index.contains_key(name) {
                    trace!(
                        "`{}`: field `{name}` is shadowed in `{}`",
                        record.type_path(),
                        info.type_path()
                    );
                    continue;
                }

                let (Some(ty), Some(accessor)) = (field.field_type(), field.accessor()) else {
                    return Err(SerialError::reflection(format!(
                        "field `{name}` of `{}` is included but cannot be accessed",
                        record.type_path()
                    )));
                };

                index.insert(name, fields.len());
                fields.push(FieldDescriptor::new(
                    name,
                    record.type_path(),
                    field.flags(),
                    ty.clone(),
                    shared_path.clone(),
                    accessor.clone(),
                ));
            }

            level = record.parent().map(|parent| {
                path.push(parent.accessor().clone());
                parent.record_info()
            });
        }

        debug!(
            "resolved descriptor of `{}`: {} field(s), version {}",
            info.type_path(),
            fields.len(),
            meta.version()
        );

        Ok(Self {
            type_path: info.type_path(),
            meta,
            fields: fields.into_boxed_slice(),
            index,
        })
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn meta(&self) -> &SerialMeta {
        &self.meta
    }

    #[inline]
    pub const fn version(&self) -> i32 {
        self.meta.version()
    }

    #[inline]
    pub const fn embed_version(&self) -> bool {
        self.meta.embed_version()
    }

    #[inline]
    pub const fn default_exclude(&self) -> bool {
        self.meta.default_exclude()
    }

    /// Returns the field with the given name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Returns the serialized fields: own fields first, then ancestors.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns an iterator over the names of the serialized fields.
    #[inline]
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::SerialError;
    use crate::derive::Record;
    use crate::info::{FieldFlags, FieldInfo, FieldKind, RecordInfo, SerialMeta, Typed};

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 1)]
    struct Base {
        id: i64,
        label: String,
        #[serial(ignore)]
        scratch: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(default_exclude)]
    struct Derived {
        #[serial(parent)]
        base: Base,
        #[serial(keep)]
        label: String,
        #[serial(keep)]
        samples: Vec<f64>,
        dropped: i32,
    }

    #[derive(Record)]
    struct Plain {
        value: i32,
    }

    fn leak(info: RecordInfo) -> &'static RecordInfo {
        Box::leak(Box::new(info))
    }

    #[test]
    fn classify_and_policy() {
        let descriptor = Base::record_info().descriptor().unwrap();
        assert_eq!(descriptor.type_path(), Base::record_info().type_path());
        assert_eq!(descriptor.field_names().collect::<Vec<_>>(), ["id", "label"]);
        assert_eq!(descriptor.get("id").unwrap().kind(), FieldKind::Scalar);
        assert!(descriptor.get("scratch").is_none());
    }

    #[test]
    fn subtype_shadows_parent() {
        let descriptor = Derived::record_info().descriptor().unwrap();
        assert!(descriptor.default_exclude());
        assert_eq!(
            descriptor.field_names().collect::<Vec<_>>(),
            ["label", "samples"]
        );

        // The parent fields are not kept under the policy of the child.
        assert!(descriptor.get("id").is_none());

        let label = descriptor.get("label").unwrap();
        assert!(!label.is_inherited());
        assert_eq!(label.owner(), Derived::record_info().type_path());
        assert_eq!(descriptor.get("samples").unwrap().kind(), FieldKind::ScalarArray);
    }

    #[test]
    fn inherited_access() {
        let info = leak(
            RecordInfo::new::<Derived>(vec![])
                .with_serializable(SerialMeta::new())
                .with_parent(crate::info::ParentInfo::new::<Derived, Base>(
                    "base",
                    |this| &this.base,
                    |this| &mut this.base,
                )),
        );
        let descriptor = info.descriptor().unwrap();
        let id = descriptor.get("id").unwrap();
        assert!(id.is_inherited());

        let mut value = Derived {
            base: Base {
                id: 7,
                label: "base".into(),
                scratch: 0,
            },
            label: "derived".into(),
            samples: vec![],
            dropped: 0,
        };

        let read = id.get(&value).unwrap();
        assert_eq!(read.downcast_ref::<i64>(), Some(&7));

        *id.get_mut(&mut value).unwrap().downcast_mut::<i64>().unwrap() = 9;
        assert_eq!(value.base.id, 9);

        // Accessors reject records of another type.
        assert!(matches!(id.get(&1_i32), Err(SerialError::Reflection(_))));
    }

    #[test]
    fn missing_metadata() {
        assert_eq!(
            Plain::record_info().descriptor().unwrap_err(),
            SerialError::NotSerializable(Plain::record_info().type_path())
        );
    }

    #[test]
    fn invalid_tables() {
        let twice = leak(
            RecordInfo::new::<Plain>(vec![
                FieldInfo::new::<Plain, i32>("value", |p| &p.value, |p| &mut p.value),
                FieldInfo::new::<Plain, i32>("value", |p| &p.value, |p| &mut p.value),
            ])
            .with_serializable(SerialMeta::new()),
        );
        assert!(matches!(twice.descriptor(), Err(SerialError::Reflection(_))));

        let reserved = leak(
            RecordInfo::new::<Plain>(vec![FieldInfo::new::<Plain, i32>(
                "serial_version",
                |p| &p.value,
                |p| &mut p.value,
            )])
            .with_serializable(SerialMeta::new()),
        );
        assert!(matches!(reserved.descriptor(), Err(SerialError::Reflection(_))));

        let hidden = leak(
            RecordInfo::new::<Plain>(vec![FieldInfo::skipped("value", FieldFlags::KEEP)])
                .with_serializable(SerialMeta::new()),
        );
        assert!(matches!(hidden.descriptor(), Err(SerialError::Reflection(_))));

        // A skipped field that is excluded anyway is fine.
        let transient = leak(
            RecordInfo::new::<Plain>(vec![FieldInfo::skipped("value", FieldFlags::TRANSIENT)])
                .with_serializable(SerialMeta::new()),
        );
        assert!(transient.descriptor().unwrap().is_empty());
    }
}
