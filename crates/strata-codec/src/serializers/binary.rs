use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode_target, format_error, NONE_VALUE};
use crate::codec::Codec;
use crate::context::Context;
use crate::error::{CodecError, CodecResult};

const FORMAT: &str = "bincode";

/// Compact binary serializer backed by bincode 1.
///
/// Not self-describing: the decode type must match the encode type exactly.
/// `encode(None)` fails with [`CodecError::InvalidInput`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for BincodeCodec {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        ctx.ensure_active()?;
        let value = value.ok_or_else(|| CodecError::InvalidInput(NONE_VALUE.into()))?;
        bincode::serialize(value).map_err(|e| format_error(FORMAT, e))
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let Some(dest) = decode_target(ctx, data, dest)? else {
            return Ok(());
        };
        *dest = bincode::deserialize(data).map_err(|e| format_error(FORMAT, e))?;
        Ok(())
    }
}
