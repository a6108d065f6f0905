mod connection;
mod options;
mod publisher;
mod subscriber;
mod topology;

pub use connection::{connect, open_channel};
pub use lapin::ExchangeKind;
pub use options::{OptionsError, RabbitMqOptions, DEFAULT_DEAD_LETTER_EXCHANGE, DEFAULT_URI};
pub use publisher::{publish, publish_bincode, publish_json};
pub use subscriber::{subscribe, subscribe_bincode, subscribe_json, RabbitDelivery};
pub use topology::{declare_and_bind, declare_exchange, DEAD_LETTER_EXCHANGE_ARG};
