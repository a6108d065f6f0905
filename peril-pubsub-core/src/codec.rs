// peril-pubsub-core/src/codec.rs
use serde::{de::DeserializeOwned, Serialize};

use crate::{CodecError, Envelope};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const BINCODE_CONTENT_TYPE: &str = "application/x-bincode";

/// Serialization format used on both ends of a queue.
///
/// The type parameter is bound per call, so one codec value serves every
/// message type. Sender and receiver must agree on the codec; the content
/// type travels with the message but is not used to pick a decoder.
pub trait Codec: Send + Sync + 'static {
    fn content_type(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Envelope, CodecError>;

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, CodecError>;
}

/// Human-readable JSON. Unknown fields are ignored on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Envelope, CodecError> {
        let payload = serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            content_type: JSON_CONTENT_TYPE,
            source: e.into(),
        })?;
        Ok(Envelope {
            content_type: JSON_CONTENT_TYPE.to_string(),
            payload,
        })
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(payload).map_err(|e| CodecError::Decode {
            content_type: JSON_CONTENT_TYPE,
            source: e.into(),
        })
    }
}

/// Compact binary encoding for values that stay inside this process family.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn content_type(&self) -> &'static str {
        BINCODE_CONTENT_TYPE
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Envelope, CodecError> {
        let payload = bincode::serialize(value).map_err(|e| CodecError::Encode {
            content_type: BINCODE_CONTENT_TYPE,
            source: e.into(),
        })?;
        Ok(Envelope {
            content_type: BINCODE_CONTENT_TYPE.to_string(),
            payload,
        })
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(payload).map_err(|e| CodecError::Decode {
            content_type: BINCODE_CONTENT_TYPE,
            source: e.into(),
        })
    }
}
