use core::any::{Any, TypeId, type_name};
use core::fmt;
use std::sync::{Arc, OnceLock};

use crate::descriptor::TypeDescriptor;
use crate::info::field_info::{FieldAccessor, accessor};
use crate::info::FieldInfo;
use crate::{Field, Reflect, SerialError};

// -----------------------------------------------------------------------------
// SerialMeta

/// Type-level serialization metadata.
///
/// A record without it is reflected but not serializable.
///
/// | option            | default | meaning                                        |
/// |-------------------|---------|------------------------------------------------|
/// | `version`         | `0`     | schema tag checked on decode                   |
/// | `embed_version`   | `true`  | store `version` under `serial_version`         |
/// | `default_exclude` | `false` | exclude fields unless marked [`KEEP`]          |
///
/// [`KEEP`]: crate::info::FieldFlags::KEEP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialMeta {
    version: i32,
    embed_version: bool,
    default_exclude: bool,
}

impl SerialMeta {
    /// Creates the default metadata.
    #[inline]
    pub const fn new() -> Self {
        Self {
            version: 0,
            embed_version: true,
            default_exclude: false,
        }
    }

    #[inline]
    pub const fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    #[inline]
    pub const fn with_embed_version(mut self, embed_version: bool) -> Self {
        self.embed_version = embed_version;
        self
    }

    #[inline]
    pub const fn with_default_exclude(mut self, default_exclude: bool) -> Self {
        self.default_exclude = default_exclude;
        self
    }

    #[inline]
    pub const fn version(&self) -> i32 {
        self.version
    }

    #[inline]
    pub const fn embed_version(&self) -> bool {
        self.embed_version
    }

    #[inline]
    pub const fn default_exclude(&self) -> bool {
        self.default_exclude
    }
}

impl Default for SerialMeta {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// ParentInfo

/// The embedded supertype of a record.
///
/// Fields of the parent are merged into the descriptor of the child, and
/// are read and written through the embedded value.
#[derive(Clone)]
pub struct ParentInfo {
    name: &'static str,
    info: fn() -> &'static RecordInfo,
    accessor: Arc<dyn FieldAccessor>,
}

impl ParentInfo {
    /// Creates the parent `P`, embedded in record `T` as field `name`.
    pub fn new<T: Any, P: Typed>(
        name: &'static str,
        get: fn(&T) -> &P,
        get_mut: fn(&mut T) -> &mut P,
    ) -> Self {
        Self {
            name,
            info: P::record_info,
            accessor: accessor(get, get_mut),
        }
    }

    /// Returns the name of the embedding field.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the record information of the parent type.
    #[inline]
    pub fn record_info(&self) -> &'static RecordInfo {
        (self.info)()
    }

    #[inline]
    pub(crate) fn accessor(&self) -> &Arc<dyn FieldAccessor> {
        &self.accessor
    }
}

impl fmt::Debug for ParentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentInfo")
            .field("name", &self.name)
            .field("ty", &self.record_info().type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// RecordInfo

type Constructor = fn() -> Box<dyn Reflect>;

/// Reflection information of a record type.
///
/// Usually generated by [`#[derive(Record)]`](crate::derive::Record) and
/// stored in a [`RecordInfoCell`](crate::info::RecordInfoCell).
pub struct RecordInfo {
    type_path: &'static str,
    ty_id: TypeId,
    meta: Option<SerialMeta>,
    fields: Box<[FieldInfo]>,
    parent: Option<ParentInfo>,
    default_ctor: Option<Constructor>,
    fallback_ctor: Option<Constructor>,
    descriptor: OnceLock<Result<TypeDescriptor, SerialError>>,
}

impl RecordInfo {
    /// Creates the information of record `T` with its declared fields.
    ///
    /// The result has no metadata, no parent and no construction path.
    pub fn new<T: Reflect>(fields: Vec<FieldInfo>) -> Self {
        Self {
            type_path: type_name::<T>(),
            ty_id: TypeId::of::<T>(),
            meta: None,
            fields: fields.into_boxed_slice(),
            parent: None,
            default_ctor: None,
            fallback_ctor: None,
            descriptor: OnceLock::new(),
        }
    }

    /// Marks the record as serializable.
    #[inline]
    pub fn with_serializable(mut self, meta: SerialMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Sets the embedded supertype.
    #[inline]
    pub fn with_parent(mut self, parent: ParentInfo) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Uses `T::default` as the no-argument construction path.
    #[inline]
    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        fn construct<T: Reflect + Default>() -> Box<dyn Reflect> {
            Box::new(T::default())
        }
        self.default_ctor = Some(construct::<T>);
        self
    }

    /// Sets the construction path used when there is no `Default` one.
    #[inline]
    pub fn with_constructor(mut self, ctor: Constructor) -> Self {
        self.fallback_ctor = Some(ctor);
        self
    }

    /// Uses [`Field::empty`] as the fallback construction path.
    #[inline]
    pub fn with_empty<T: Field>(self) -> Self {
        fn construct<T: Field>() -> Box<dyn Reflect> {
            Box::new(T::empty())
        }
        self.with_constructor(construct::<T>)
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the serialization metadata, `None` if not serializable.
    #[inline]
    pub const fn meta(&self) -> Option<&SerialMeta> {
        self.meta.as_ref()
    }

    /// Returns the declared fields, without those of the parent.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the declared field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[inline]
    pub const fn parent(&self) -> Option<&ParentInfo> {
        self.parent.as_ref()
    }

    /// Constructs an empty instance.
    ///
    /// The `Default` path is tried first, then the fallback one.
    pub fn construct(&self) -> Result<Box<dyn Reflect>, SerialError> {
        let ctor = self
            .default_ctor
            .or(self.fallback_ctor)
            .ok_or_else(|| {
                SerialError::reflection(format!("type `{}` cannot be constructed", self.type_path))
            })?;

        let value = ctor();
        if value.as_any().type_id() != self.ty_id {
            return Err(SerialError::reflection(format!(
                "constructor of `{}` produced a `{}`",
                self.type_path,
                value.reflect_type_path()
            )));
        }
        Ok(value)
    }

    /// Returns the resolved descriptor, resolving it on first call.
    ///
    /// A failed resolution is cached as well.
    pub fn descriptor(&'static self) -> Result<&'static TypeDescriptor, SerialError> {
        self.descriptor
            .get_or_init(|| TypeDescriptor::resolve(self))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("type_path", &self.type_path)
            .field("meta", &self.meta)
            .field("fields", &self.fields)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Typed

/// A record type with static [`RecordInfo`].
///
/// Implemented by [`#[derive(Record)]`](crate::derive::Record). See
/// [`RecordInfoCell`](crate::info::RecordInfoCell) for a manual
/// implementation.
pub trait Typed: Field {
    /// Returns the record information, created on first access.
    fn record_info() -> &'static RecordInfo;
}
