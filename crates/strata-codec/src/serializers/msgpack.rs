use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode_target, format_error};
use crate::codec::Codec;
use crate::context::Context;
use crate::error::CodecResult;

const FORMAT: &str = "msgpack";

/// MessagePack serializer backed by `rmp-serde`.
///
/// Structs are written as maps with field names so payloads stay readable
/// by non-Rust peers.
///
/// Unlike [`JsonCodec`](super::JsonCodec), `encode(None)` succeeds and
/// returns no bytes; decoding those empty bytes is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessagePackCodec;

impl MessagePackCodec {
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for MessagePackCodec {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        ctx.ensure_active()?;
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        rmp_serde::to_vec_named(value).map_err(|e| format_error(FORMAT, e))
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let Some(dest) = decode_target(ctx, data, dest)? else {
            return Ok(());
        };
        *dest = rmp_serde::from_slice(data).map_err(|e| format_error(FORMAT, e))?;
        Ok(())
    }
}
