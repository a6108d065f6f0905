use lapin::{
    options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::{AMQPValue, FieldTable},
    Channel, Connection, ExchangeKind, Queue,
};
use peril_pubsub_core::{Binding, PubSubError, QueueSpec, QueueType};
use tracing::info;

use crate::connection::open_channel;

pub const DEAD_LETTER_EXCHANGE_ARG: &str = "x-dead-letter-exchange";

pub(crate) fn declare_options(spec: &QueueSpec) -> QueueDeclareOptions {
    QueueDeclareOptions {
        durable: spec.durable(),
        auto_delete: spec.auto_delete(),
        exclusive: spec.exclusive(),
        nowait: false,
        passive: false,
    }
}

pub(crate) fn queue_arguments(spec: &QueueSpec) -> FieldTable {
    let mut args = FieldTable::default();
    if let Some(dlx) = spec.dead_letter_exchange() {
        args.insert(
            DEAD_LETTER_EXCHANGE_ARG.into(),
            AMQPValue::LongString(dlx.into()),
        );
    }
    args
}

/// Declare a durable exchange. Redeclaring with the same kind is a no-op.
pub async fn declare_exchange(
    ch: &Channel,
    exchange: &str,
    kind: ExchangeKind,
) -> Result<(), PubSubError> {
    ch.exchange_declare(
        exchange,
        kind,
        ExchangeDeclareOptions {
            durable: true,
            auto_delete: false,
            internal: false,
            nowait: false,
            passive: false,
        },
        FieldTable::default(),
    )
    .await
    .map_err(|e| PubSubError::Declare(format!("exchange {exchange}: {e}")))
}

/// Open a channel, declare `queue_name` with the flags of `queue_type`, and
/// bind it to `exchange` with `routing_key`.
///
/// Declaring an existing queue with identical parameters returns it; a
/// conflicting redeclaration fails and the broker closes the channel.
pub async fn declare_and_bind(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    queue_type: QueueType,
    dead_letter_exchange: Option<&str>,
) -> Result<(Channel, Queue), PubSubError> {
    let ch = open_channel(conn).await?;

    let spec = QueueSpec::new(queue_name, queue_type, dead_letter_exchange.map(String::from));
    let queue = ch
        .queue_declare(spec.name(), declare_options(&spec), queue_arguments(&spec))
        .await
        .map_err(|e| PubSubError::Declare(format!("queue {queue_name}: {e}")))?;

    let binding = Binding::new(exchange, routing_key, queue.name().as_str());
    ch.queue_bind(
        binding.queue(),
        binding.exchange(),
        binding.routing_key(),
        QueueBindOptions { nowait: false },
        FieldTable::default(),
    )
    .await
    .map_err(|e| PubSubError::Bind(format!("{binding}: {e}")))?;

    info!(%binding, ?queue_type, "queue declared and bound");
    Ok((ch, queue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapin::types::ShortString;

    #[test]
    fn flags_follow_queue_type() {
        let durable = declare_options(&QueueSpec::new("war", QueueType::Durable, None));
        assert!(durable.durable && !durable.auto_delete && !durable.exclusive);

        let transient = declare_options(&QueueSpec::new("pause.alice", QueueType::Transient, None));
        assert!(!transient.durable && transient.auto_delete && transient.exclusive);

        assert!(!durable.passive && !transient.passive);
    }

    #[test]
    fn dead_letter_exchange_is_an_argument() {
        let spec = QueueSpec::new("war", QueueType::Durable, Some("peril_dlx".into()));
        let args = queue_arguments(&spec);
        assert_eq!(
            args.inner().get(&ShortString::from(DEAD_LETTER_EXCHANGE_ARG)),
            Some(&AMQPValue::LongString("peril_dlx".into()))
        );
    }

    #[test]
    fn no_arguments_without_dead_letter_exchange() {
        let spec = QueueSpec::new("pause.alice", QueueType::Transient, None);
        assert!(queue_arguments(&spec).inner().is_empty());
    }
}
