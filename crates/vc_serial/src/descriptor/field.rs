use core::fmt;
use std::sync::Arc;

use crate::info::{FieldAccessor, FieldFlags, FieldKind, FieldType};
use crate::{Reflect, SerialError};

/// A resolved field of a [`TypeDescriptor`](super::TypeDescriptor).
///
/// Fields inherited from a parent record are reached through the chain of
/// embedded values leading to the record that declares them.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    owner: &'static str,
    flags: FieldFlags,
    kind: FieldKind,
    ty: FieldType,
    path: Arc<[Arc<dyn FieldAccessor>]>,
    accessor: Arc<dyn FieldAccessor>,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: &'static str,
        owner: &'static str,
        flags: FieldFlags,
        ty: FieldType,
        path: Arc<[Arc<dyn FieldAccessor>]>,
        accessor: Arc<dyn FieldAccessor>,
    ) -> Self {
        Self {
            name,
            owner,
            flags,
            kind: FieldKind::classify(&ty),
            ty,
            path,
            accessor,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type path of the record declaring the field.
    #[inline]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the declared type.
    #[inline]
    pub const fn field_type(&self) -> &FieldType {
        &self.ty
    }

    /// Returns `true` if the field is declared by an ancestor.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        !self.path.is_empty()
    }

    /// Reads the field from `record`.
    pub fn get<'a>(&self, record: &'a dyn Reflect) -> Result<&'a dyn Reflect, SerialError> {
        let mut current = record;
        for parent in self.path.iter() {
            current = parent
                .get(current.as_any())
                .ok_or_else(|| self.inaccessible(record.reflect_type_path()))?;
        }
        self.accessor
            .get(current.as_any())
            .ok_or_else(|| self.inaccessible(record.reflect_type_path()))
    }

    /// Reads the field from `record` by mutable reference.
    pub fn get_mut<'a>(
        &self,
        record: &'a mut dyn Reflect,
    ) -> Result<&'a mut dyn Reflect, SerialError> {
        let ty = record.reflect_type_path();
        let mut current = record;
        for parent in self.path.iter() {
            current = parent
                .get_mut(current.as_any_mut())
                .ok_or_else(|| self.inaccessible(ty))?;
        }
        self.accessor
            .get_mut(current.as_any_mut())
            .ok_or_else(|| self.inaccessible(ty))
    }

    #[cold]
    fn inaccessible(&self, ty: &'static str) -> SerialError {
        SerialError::reflection(format!(
            "field `{}` of `{}` cannot be accessed on a `{ty}`",
            self.name, self.owner
        ))
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("ty", &self.ty.type_path())
            .finish()
    }
}
