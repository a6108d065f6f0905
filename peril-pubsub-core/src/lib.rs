pub mod codec;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod subscription;
pub mod types;

pub use codec::{BincodeCodec, Codec, JsonCodec, BINCODE_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use dispatch::{dispatch, settle, DecodeFailurePolicy, Delivery, DispatchStats};
pub use error::{BoxError, CodecError, PubSubError};
pub use handler::Handler;
pub use subscription::{StopSignal, Subscription};
pub use types::{AckType, Binding, Envelope, QueueSpec, QueueType};
