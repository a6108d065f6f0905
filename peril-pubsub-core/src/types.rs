// peril-pubsub-core/src/types.rs
use std::fmt;

/// Queue lifetime policy chosen by a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueType {
    /// Survives broker restarts and may be shared by several consumers.
    Durable,
    /// Deleted with its last consumer and exclusive to one connection.
    Transient,
}

/// Declaration parameters for one queue.
///
/// The flag triple is derived from a [`QueueType`]; there is no way to build
/// a spec with any other combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSpec {
    name: String,
    queue_type: QueueType,
    dead_letter_exchange: Option<String>,
}

impl QueueSpec {
    pub fn new(
        name: impl Into<String>,
        queue_type: QueueType,
        dead_letter_exchange: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            queue_type,
            dead_letter_exchange,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    pub fn durable(&self) -> bool {
        self.queue_type == QueueType::Durable
    }

    pub fn auto_delete(&self) -> bool {
        self.queue_type == QueueType::Transient
    }

    pub fn exclusive(&self) -> bool {
        self.queue_type == QueueType::Transient
    }

    /// Exchange that receives messages rejected without requeue or expired.
    pub fn dead_letter_exchange(&self) -> Option<&str> {
        self.dead_letter_exchange.as_deref()
    }
}

/// One exchange/routing-key pair routed into a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    exchange: String,
    routing_key: String,
    queue: String,
}

impl Binding {
    pub fn new(
        exchange: impl Into<String>,
        routing_key: impl Into<String>,
        queue: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
            queue: queue.into(),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.exchange, self.routing_key, self.queue)
    }
}

/// Encoded message ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub content_type: String,
    pub payload: Vec<u8>,
}

/// Settlement a handler asks for; mapped to exactly one broker call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckType {
    /// Remove the message from the queue.
    Ack,
    /// Reject and make the message available again immediately.
    NackRequeue,
    /// Reject without requeue; dead-letters when the queue has a DLX.
    NackDiscard,
}

impl AckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AckType::Ack => "ack",
            AckType::NackRequeue => "nack_requeue",
            AckType::NackDiscard => "nack_discard",
        }
    }
}

impl fmt::Display for AckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durable_policy_flags() {
        for name in ["war", "game_logs", ""] {
            let spec = QueueSpec::new(name, QueueType::Durable, None);
            assert!(spec.durable());
            assert!(!spec.auto_delete());
            assert!(!spec.exclusive());
        }
    }

    #[test]
    fn transient_policy_flags() {
        for name in ["pause.alice", "army_moves.bob"] {
            let spec = QueueSpec::new(name, QueueType::Transient, Some("peril_dlx".into()));
            assert!(!spec.durable());
            assert!(spec.auto_delete());
            assert!(spec.exclusive());
            assert_eq!(spec.dead_letter_exchange(), Some("peril_dlx"));
        }
    }

    #[test]
    fn binding_display() {
        let b = Binding::new("peril_topic", "army_moves.*", "army_moves.alice");
        assert_eq!(b.to_string(), "peril_topic -[army_moves.*]-> army_moves.alice");
    }
}
