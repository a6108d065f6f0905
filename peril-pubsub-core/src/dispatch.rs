// peril-pubsub-core/src/dispatch.rs
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures_util::{FutureExt, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::{AckType, Codec, Handler, PubSubError, StopSignal};

/// One message received from a queue together with its acknowledgment handle.
#[async_trait]
pub trait Delivery: Send + Sync {
    fn body(&self) -> &[u8];

    fn routing_key(&self) -> &str;

    fn content_type(&self) -> Option<&str> {
        None
    }

    async fn ack(&self) -> Result<(), PubSubError>;

    async fn nack(&self, requeue: bool) -> Result<(), PubSubError>;
}

/// What to do with a delivery whose payload the codec rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Leave it unacknowledged; the broker redelivers it once the channel closes.
    /// Unsettled deliveries count against the channel prefetch.
    #[default]
    LeaveUnacked,
    /// Reject without requeue so it is dropped or dead-lettered.
    NackDiscard,
}

/// Counters reported by a dispatch loop when it ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub acked: u64,
    pub requeued: u64,
    pub discarded: u64,
    pub decode_failures: u64,
    /// Undecodable deliveries rejected under [`DecodeFailurePolicy::NackDiscard`].
    pub decode_rejects: u64,
    pub handler_panics: u64,
    pub ack_failures: u64,
}

impl DispatchStats {
    fn record(&mut self, decision: AckType) {
        match decision {
            AckType::Ack => self.acked += 1,
            AckType::NackRequeue => self.requeued += 1,
            AckType::NackDiscard => self.discarded += 1,
        }
    }
}

/// Issue the single broker call that corresponds to `decision`.
pub async fn settle<D: Delivery + ?Sized>(
    delivery: &D,
    decision: AckType,
) -> Result<(), PubSubError> {
    match decision {
        AckType::Ack => delivery.ack().await,
        AckType::NackRequeue => delivery.nack(true).await,
        AckType::NackDiscard => delivery.nack(false).await,
    }
}

/// Consume `deliveries` until the stream ends, fails, or `stop` fires.
///
/// Each delivery is decoded, handed to `handler`, and settled before the next
/// one is pulled. Decode failures, handler panics and ack failures are logged
/// and never end the loop.
pub async fn dispatch<T, S, D, C, H>(
    queue: &str,
    deliveries: S,
    codec: C,
    handler: H,
    on_decode_failure: DecodeFailurePolicy,
    mut stop: StopSignal,
) -> DispatchStats
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<D, PubSubError>> + Send,
    D: Delivery,
    C: Codec,
    H: Handler<T>,
{
    let mut deliveries = std::pin::pin!(deliveries);
    let mut stats = DispatchStats::default();

    info!(queue, content_type = codec.content_type(), "dispatch loop started");

    loop {
        let next = tokio::select! {
            biased;
            _ = stop.requested() => {
                info!(queue, "stop requested, dispatch loop ending");
                break;
            }
            next = deliveries.next() => next,
        };

        let delivery = match next {
            Some(Ok(d)) => d,
            Some(Err(e)) => {
                error!(queue, error = %e, "delivery stream failed");
                break;
            }
            None => {
                info!(queue, "delivery stream closed");
                break;
            }
        };

        if let Some(ct) = delivery.content_type() {
            if ct != codec.content_type() {
                debug!(
                    queue,
                    content_type = ct,
                    expected = codec.content_type(),
                    "content type mismatch"
                );
            }
        }

        let message: T = match codec.decode(delivery.body()) {
            Ok(m) => m,
            Err(e) => {
                stats.decode_failures += 1;
                warn!(
                    queue,
                    routing_key = delivery.routing_key(),
                    error = %e,
                    "couldn't decode delivery"
                );
                if on_decode_failure == DecodeFailurePolicy::NackDiscard {
                    match settle(&delivery, AckType::NackDiscard).await {
                        Ok(()) => stats.decode_rejects += 1,
                        Err(e) => {
                            stats.ack_failures += 1;
                            error!(queue, error = %e, "nack of undecodable delivery failed");
                        }
                    }
                }
                continue;
            }
        };

        let decision = match AssertUnwindSafe(handler.handle(message))
            .catch_unwind()
            .await
        {
            Ok(decision) => decision,
            Err(_) => {
                stats.handler_panics += 1;
                error!(
                    queue,
                    routing_key = delivery.routing_key(),
                    "handler panicked, delivery left unacknowledged"
                );
                continue;
            }
        };

        match settle(&delivery, decision).await {
            Ok(()) => {
                stats.record(decision);
                debug!(queue, routing_key = delivery.routing_key(), %decision, "delivery settled");
            }
            Err(e) => {
                stats.ack_failures += 1;
                error!(queue, %decision, error = %e, "settling delivery failed");
            }
        }
    }

    stats
}
