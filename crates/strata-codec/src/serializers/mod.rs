//! Bundled serializers.
//!
//! | Serializer | Format | `encode(None)` |
//! |------------|--------|----------------|
//! | [`JsonCodec`] | JSON (`serde_json`) | `InvalidInput` |
//! | [`MessagePackCodec`] | MessagePack, named fields (`rmp-serde`) | empty bytes |
//! | [`BincodeCodec`] | bincode 1 | `InvalidInput` |
//! | [`YamlCodec`] | YAML (`serde_yaml`) | empty bytes |
//!
//! The `None` handling differs on purpose and is part of each serializer's
//! contract. All of them reject a `None` destination, treat empty input as
//! "nothing to decode", and report malformed bytes as
//! [`CodecError::Format`](crate::CodecError::Format).

pub mod binary;
pub mod json;
pub mod msgpack;
pub mod yaml;

pub use binary::BincodeCodec;
pub use json::JsonCodec;
pub use msgpack::MessagePackCodec;
pub use yaml::YamlCodec;

use tracing::debug;

use crate::context::Context;
use crate::error::{CodecError, CodecResult};

pub(crate) const NONE_VALUE: &str = "value cannot be None";

/// Common decode preamble.
///
/// Returns `Ok(None)` when `data` is empty and there is nothing to decode.
pub(crate) fn decode_target<'a, T>(
    ctx: &Context,
    data: &[u8],
    dest: Option<&'a mut T>,
) -> CodecResult<Option<&'a mut T>> {
    ctx.ensure_active()?;
    let dest = dest.ok_or_else(|| CodecError::InvalidInput(NONE_VALUE.into()))?;
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(dest))
}

/// Wrap a serializer failure as [`CodecError::Format`].
pub(crate) fn format_error<E>(format: &'static str, err: E) -> CodecError
where
    E: std::error::Error + Send + Sync + 'static,
{
    debug!(format, error = %err, "serializer rejected input");
    CodecError::format(format, err)
}
