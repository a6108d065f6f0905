// peril-pubsub-core/src/error.rs
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure inside a [`Codec`](crate::Codec), carrying the serializer's own error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("couldn't encode {content_type} value: {source}")]
    Encode {
        content_type: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("couldn't decode {content_type} payload: {source}")]
    Decode {
        content_type: &'static str,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Error)]
pub enum PubSubError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("declare error: {0}")]
    Declare(String),

    #[error("bind error: {0}")]
    Bind(String),

    #[error("consume error: {0}")]
    Consume(String),

    #[error("publish error: {0}")]
    Publish(String),

    #[error("acknowledgment error: {0}")]
    Ack(String),

    #[error("dispatch task error: {0}")]
    Task(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
