use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::Context;
use crate::error::CodecResult;

/// The encode/decode capability shared by serializers and decorators.
///
/// Implementations must satisfy these invariants:
/// - Stateless with respect to call history. Configuration is fixed at
///   construction and never mutated by a call.
/// - `decode` accepts exactly the bytes `encode` produces; chains must be
///   decoded with the same stages in the same order they were encoded with.
/// - `decode` with a `None` destination is [`CodecError::InvalidInput`].
/// - Failures are returned to the caller, never swallowed or retried, and no
///   partial output is produced on error.
///
/// `Send + Sync` so one codec can serve concurrent callers without locking.
///
/// [`CodecError::InvalidInput`]: crate::CodecError::InvalidInput
pub trait Codec: Send + Sync {
    /// Encode `value` into bytes.
    ///
    /// How `None` is handled is up to the implementation and documented on
    /// each one.
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized;

    /// Decode `data` into `dest`.
    ///
    /// Zero-length `data` must leave `dest` untouched when the implementation
    /// treats it as "nothing to decode".
    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned;

    /// Encode a value that is known to be present.
    fn encode_value<T>(&self, ctx: &Context, value: &T) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        self.encode(ctx, Some(value))
    }

    /// Decode into a fresh value, starting from `T::default()`.
    ///
    /// Empty input yields the default.
    fn decode_value<T>(&self, ctx: &Context, data: &[u8]) -> CodecResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let mut out = T::default();
        self.decode(ctx, data, Some(&mut out))?;
        Ok(out)
    }
}

impl<C: Codec> Codec for &C {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        (**self).encode(ctx, value)
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        (**self).decode(ctx, data, dest)
    }
}

impl<C: Codec> Codec for Arc<C> {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        (**self).encode(ctx, value)
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        (**self).decode(ctx, data, dest)
    }
}

impl<C: Codec> Codec for Box<C> {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        (**self).encode(ctx, value)
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        (**self).decode(ctx, data, dest)
    }
}
