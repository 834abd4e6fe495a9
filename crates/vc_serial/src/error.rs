use std::borrow::Cow;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SerialError

/// Failures produced while encoding or decoding a record.
///
/// The strict engine operations return this error, the `try_*` variants log
/// it and return `None`. A failure inside a nested record aborts the whole
/// operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SerialError {
    /// The type carries no serialization metadata, or a value that is not a
    /// record reached a record dispatch.
    #[error("type `{0}` is not serializable")]
    NotSerializable(&'static str),

    /// The embedded `serial_version` differs from the descriptor version.
    #[error("received data with version {actual}, while the current version is {expected}")]
    VersionMismatch { expected: i32, actual: i32 },

    /// The data tree does not have the expected structure.
    #[error("malformed data: {0}")]
    MalformedData(Cow<'static, str>),

    /// A decoded key has no matching field in the descriptor.
    #[error("unknown field `{field}` for type `{ty}`")]
    UnknownField { ty: &'static str, field: String },

    /// Type introspection failed, e.g. the record cannot be constructed.
    #[error("reflection failure: {0}")]
    Reflection(Cow<'static, str>),
}

impl SerialError {
    #[inline]
    pub(crate) fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedData(msg.into())
    }

    #[inline]
    pub(crate) fn reflection(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Reflection(msg.into())
    }
}
