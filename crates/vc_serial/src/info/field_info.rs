use core::any::Any;
use core::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::info::{FieldKind, FieldType};
use crate::{Field, Reflect};

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Modifiers and policy markers of a field.
    ///
    /// `CONSTANT`, `SHARED` and `TRANSIENT` make a field ineligible: it is
    /// never serialized, whatever the policy of the record.
    ///
    /// `IGNORE` drops a field from a record that includes by default, `KEEP`
    /// adds one to a record that excludes by default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Not mutable after construction.
        const CONSTANT = 1;
        /// Shared by every instance of the type.
        const SHARED = 1 << 1;
        /// Explicitly transient.
        const TRANSIENT = 1 << 2;
        /// Excluded under the include-by-default policy.
        const IGNORE = 1 << 3;
        /// Included under the exclude-by-default policy.
        const KEEP = 1 << 4;
    }
}

impl FieldFlags {
    /// Flags that make a field ineligible.
    pub const INELIGIBLE: Self = Self::CONSTANT.union(Self::SHARED).union(Self::TRANSIENT);

    /// Returns `true` if no modifier prevents serialization.
    #[inline]
    pub const fn is_eligible(self) -> bool {
        !self.intersects(Self::INELIGIBLE)
    }

    /// Applies the inclusion policy of a record to an eligible field.
    #[inline]
    pub const fn is_included(self, default_exclude: bool) -> bool {
        self.is_eligible()
            && if default_exclude {
                self.contains(Self::KEEP)
            } else {
                !self.contains(Self::IGNORE)
            }
    }

    /// Returns `true` if the field is excluded under both policies.
    #[inline]
    pub const fn is_never_included(self) -> bool {
        !self.is_included(false) && !self.is_included(true)
    }
}

// -----------------------------------------------------------------------------
// FieldAccessor

/// Type-erased access to one field of a record.
pub(crate) trait FieldAccessor: Send + Sync + 'static {
    fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Reflect>;

    fn get_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Reflect>;
}

struct Accessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: Any, F: Reflect> FieldAccessor for Accessor<T, F> {
    #[inline]
    fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Reflect> {
        let record = record.downcast_ref::<T>()?;
        Some((self.get)(record))
    }

    #[inline]
    fn get_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Reflect> {
        let record = record.downcast_mut::<T>()?;
        Some((self.get_mut)(record))
    }
}

/// Creates the shared accessor of field `F` in record `T`.
pub(crate) fn accessor<T: Any, F: Reflect>(
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
) -> Arc<dyn FieldAccessor> {
    Arc::new(Accessor { get, get_mut })
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Information for a named record field.
///
/// Fields that can be serialized carry their declared [`FieldType`] and an
/// accessor. Fields that are never serialized (see
/// [`FieldFlags::is_never_included`]) may be described without either.
///
/// # Examples
///
/// ```
/// use vc_serial::info::{FieldFlags, FieldInfo, FieldKind};
///
/// struct Frame {
///     index: i64,
///     scratch: Vec<u8>,
/// }
///
/// let index = FieldInfo::new::<Frame, i64>("index", |f| &f.index, |f| &mut f.index);
/// let scratch = FieldInfo::skipped("scratch", FieldFlags::TRANSIENT);
///
/// assert_eq!(index.kind(), Some(FieldKind::Scalar));
/// assert!(scratch.field_type().is_none());
/// ```
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    flags: FieldFlags,
    access: Option<FieldAccess>,
}

#[derive(Clone)]
struct FieldAccess {
    ty: FieldType,
    accessor: Arc<dyn FieldAccessor>,
}

impl FieldInfo {
    /// Creates a field `name` of type `F` in record `T`.
    pub fn new<T: Any, F: Field>(
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            name,
            flags: FieldFlags::empty(),
            access: Some(FieldAccess {
                ty: F::field_type(),
                accessor: accessor(get, get_mut),
            }),
        }
    }

    /// Creates a field that is never serialized.
    #[inline]
    pub const fn skipped(name: &'static str, flags: FieldFlags) -> Self {
        Self {
            name,
            flags,
            access: None,
        }
    }

    /// Adds flags to the field.
    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns the field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the flags.
    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Returns the declared type, `None` for a skipped field.
    #[inline]
    pub fn field_type(&self) -> Option<&FieldType> {
        self.access.as_ref().map(|access| &access.ty)
    }

    /// Returns the classified kind, `None` for a skipped field.
    #[inline]
    pub fn kind(&self) -> Option<FieldKind> {
        self.field_type().map(FieldType::kind)
    }

    #[inline]
    pub(crate) fn accessor(&self) -> Option<&Arc<dyn FieldAccessor>> {
        self.access.as_ref().map(|access| &access.accessor)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("ty", &self.field_type())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FieldFlags;

    #[test]
    fn inclusion_policy() {
        let plain = FieldFlags::empty();
        assert!(plain.is_included(false));
        assert!(!plain.is_included(true));

        assert!(!FieldFlags::IGNORE.is_included(false));
        assert!(FieldFlags::KEEP.is_included(true));
        assert!(FieldFlags::KEEP.is_included(false));

        let both = FieldFlags::IGNORE | FieldFlags::KEEP;
        assert!(!both.is_included(false));
        assert!(both.is_included(true));
    }

    #[test]
    fn ineligible_modifiers() {
        for flag in [FieldFlags::CONSTANT, FieldFlags::SHARED, FieldFlags::TRANSIENT] {
            assert!(!flag.is_eligible());
            assert!(!(flag | FieldFlags::KEEP).is_included(true));
            assert!(flag.is_never_included());
        }
        assert!(FieldFlags::IGNORE.is_never_included());
        assert!(!FieldFlags::empty().is_never_included());
    }
}
