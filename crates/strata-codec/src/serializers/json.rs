use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode_target, format_error, NONE_VALUE};
use crate::codec::Codec;
use crate::context::Context;
use crate::error::{CodecError, CodecResult};

const FORMAT: &str = "json";

/// JSON serializer backed by `serde_json`.
///
/// `encode(None)` fails with [`CodecError::InvalidInput`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON output.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON output. Decoding is unaffected.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        ctx.ensure_active()?;
        let value = value.ok_or_else(|| CodecError::InvalidInput(NONE_VALUE.into()))?;
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| format_error(FORMAT, e))
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let Some(dest) = decode_target(ctx, data, dest)? else {
            return Ok(());
        };
        *dest = serde_json::from_slice(data).map_err(|e| format_error(FORMAT, e))?;
        Ok(())
    }
}
