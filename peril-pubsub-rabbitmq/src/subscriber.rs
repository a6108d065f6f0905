use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions},
    types::FieldTable,
    Connection,
};
use peril_pubsub_core::{
    dispatch, BincodeCodec, Codec, Delivery, Handler, JsonCodec, PubSubError, QueueType,
    Subscription,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{options::RabbitMqOptions, topology::declare_and_bind};

/// A lapin delivery seen through the broker-agnostic [`Delivery`] contract.
pub struct RabbitDelivery(pub lapin::message::Delivery);

#[async_trait]
impl Delivery for RabbitDelivery {
    fn body(&self) -> &[u8] {
        &self.0.data
    }

    fn routing_key(&self) -> &str {
        self.0.routing_key.as_str()
    }

    fn content_type(&self) -> Option<&str> {
        self.0
            .properties
            .content_type()
            .as_ref()
            .map(|ct| ct.as_str())
    }

    async fn ack(&self) -> Result<(), PubSubError> {
        self.0
            .acker
            .ack(BasicAckOptions { multiple: false })
            .await
            .map(|_| ())
            .map_err(|e| PubSubError::Ack(e.to_string()))
    }

    async fn nack(&self, requeue: bool) -> Result<(), PubSubError> {
        self.0
            .acker
            .nack(BasicNackOptions {
                multiple: false,
                requeue,
            })
            .await
            .map(|_| ())
            .map_err(|e| PubSubError::Ack(e.to_string()))
    }
}

/// Declare and bind `queue_name`, start consuming it on a dedicated channel,
/// and spawn the dispatch loop that feeds `handler`.
///
/// Setup errors are returned here. Once this returns, per-message failures
/// only show up in the logs and in the stats returned by
/// [`Subscription::join`].
#[allow(clippy::too_many_arguments)]
pub async fn subscribe<T, C, H>(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    queue_type: QueueType,
    handler: H,
    codec: C,
    opts: &RabbitMqOptions,
) -> Result<Subscription, PubSubError>
where
    T: DeserializeOwned + Send + 'static,
    C: Codec,
    H: Handler<T>,
{
    let (ch, queue) = declare_and_bind(
        conn,
        exchange,
        queue_name,
        routing_key,
        queue_type,
        opts.dead_letter_exchange.as_deref(),
    )
    .await?;

    ch.basic_qos(opts.prefetch, BasicQosOptions { global: false })
        .await
        .map_err(|e| PubSubError::Consume(format!("basic_qos: {e}")))?;

    let consumer = ch
        .basic_consume(
            queue.name().as_str(),
            &opts.consumer_tag(queue_name),
            BasicConsumeOptions {
                no_ack: false,
                exclusive: false,
                nowait: false,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| PubSubError::Consume(e.to_string()))?;

    info!(queue = queue_name, exchange, routing_key, "consuming");

    let deliveries = consumer.map(|delivery| {
        delivery
            .map(RabbitDelivery)
            .map_err(|e| PubSubError::Consume(e.to_string()))
    });
    let policy = opts.decode_failure;
    let queue_owned = queue_name.to_string();

    Ok(Subscription::spawn(queue_name, move |stop| async move {
        // keep the channel open for as long as the loop runs
        let _ch = ch;
        dispatch::<T, _, _, _, _>(&queue_owned, deliveries, codec, handler, policy, stop).await
    }))
}

pub async fn subscribe_json<T, H>(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    queue_type: QueueType,
    handler: H,
    opts: &RabbitMqOptions,
) -> Result<Subscription, PubSubError>
where
    T: DeserializeOwned + Send + 'static,
    H: Handler<T>,
{
    subscribe::<T, _, _>(
        conn, exchange, queue_name, routing_key, queue_type, handler, JsonCodec, opts,
    )
    .await
}

pub async fn subscribe_bincode<T, H>(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    queue_type: QueueType,
    handler: H,
    opts: &RabbitMqOptions,
) -> Result<Subscription, PubSubError>
where
    T: DeserializeOwned + Send + 'static,
    H: Handler<T>,
{
    subscribe::<T, _, _>(
        conn, exchange, queue_name, routing_key, queue_type, handler, BincodeCodec, opts,
    )
    .await
}
