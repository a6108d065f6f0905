// peril-pubsub-core/src/handler.rs
use std::future::Future;

use async_trait::async_trait;

use crate::AckType;

/// Consumer-side callback for one decoded message type.
///
/// Handlers of a single subscription run one at a time, in delivery order.
/// The returned [`AckType`] decides how the delivery is settled.
#[async_trait]
pub trait Handler<T>: Send + Sync + 'static {
    async fn handle(&self, message: T) -> AckType;
}

#[async_trait]
impl<T, F, Fut> Handler<T> for F
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AckType> + Send + 'static,
{
    async fn handle(&self, message: T) -> AckType {
        (self)(message).await
    }
}
