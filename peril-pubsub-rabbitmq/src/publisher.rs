use chrono::Utc;
use lapin::{options::BasicPublishOptions, BasicProperties, Channel};
use peril_pubsub_core::{BincodeCodec, Codec, Envelope, JsonCodec, PubSubError};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

fn properties(envelope: &Envelope) -> BasicProperties {
    BasicProperties::default()
        .with_content_type(envelope.content_type.clone().into())
        .with_message_id(Uuid::new_v4().to_string().into())
        .with_timestamp(Utc::now().timestamp().max(0) as u64)
}

/// Encode `value` with `codec` and send it to `exchange` under `routing_key`.
///
/// Nothing is sent when encoding fails. There is no broker confirmation and
/// no retry. The channel is one ordered command stream: callers sharing it
/// across tasks must serialize access.
pub async fn publish<T, C>(
    ch: &Channel,
    exchange: &str,
    routing_key: &str,
    value: &T,
    codec: C,
) -> Result<(), PubSubError>
where
    T: Serialize + ?Sized,
    C: Codec,
{
    let envelope = codec.encode(value)?;

    // confirms are not enabled on the channel, so the confirm resolves to NotRequested
    let _confirm = ch
        .basic_publish(
            exchange,
            routing_key,
            BasicPublishOptions {
                mandatory: false,
                immediate: false,
            },
            &envelope.payload,
            properties(&envelope),
        )
        .await
        .map_err(|e| PubSubError::Publish(e.to_string()))?;

    debug!(
        exchange,
        routing_key,
        content_type = %envelope.content_type,
        bytes = envelope.payload.len(),
        "message published"
    );
    Ok(())
}

pub async fn publish_json<T: Serialize + ?Sized>(
    ch: &Channel,
    exchange: &str,
    routing_key: &str,
    value: &T,
) -> Result<(), PubSubError> {
    publish(ch, exchange, routing_key, value, JsonCodec).await
}

pub async fn publish_bincode<T: Serialize + ?Sized>(
    ch: &Channel,
    exchange: &str,
    routing_key: &str,
    value: &T,
) -> Result<(), PubSubError> {
    publish(ch, exchange, routing_key, value, BincodeCodec).await
}
