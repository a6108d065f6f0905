use lapin::{Channel, Connection, ConnectionProperties};
use peril_pubsub_core::PubSubError;
use tracing::info;

/// Dial the broker. The caller owns the returned connection and its shutdown.
pub async fn connect(uri: &str) -> Result<Connection, PubSubError> {
    let conn = Connection::connect(uri, ConnectionProperties::default())
        .await
        .map_err(|e| PubSubError::Connection(e.to_string()))?;
    info!("RabbitMQ connected");
    Ok(conn)
}

/// Open a fresh channel; every declaration and publish path gets its own.
pub async fn open_channel(conn: &Connection) -> Result<Channel, PubSubError> {
    conn.create_channel()
        .await
        .map_err(|e| PubSubError::Connection(e.to_string()))
}
