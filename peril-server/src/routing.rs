//! Exchange names, routing keys and the message types the server speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EXCHANGE_PERIL_DIRECT: &str = "peril_direct";
pub const EXCHANGE_PERIL_TOPIC: &str = "peril_topic";
pub const EXCHANGE_PERIL_DLX: &str = "peril_dlx";
pub const DEAD_LETTER_QUEUE: &str = "peril_dlq";

pub const PAUSE_KEY: &str = "pause";
pub const GAME_LOG_SLUG: &str = "game_logs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayingState {
    pub is_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameLog {
    pub current_time: DateTime<Utc>,
    pub message: String,
    pub username: String,
}

pub fn game_log_binding() -> String {
    format!("{GAME_LOG_SLUG}.*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use peril_pubsub_core::{BincodeCodec, Codec, JsonCodec};

    #[test]
    fn playing_state_wire_shape() {
        let json = serde_json::to_string(&PlayingState { is_paused: true }).unwrap();
        assert_eq!(json, r#"{"IsPaused":true}"#);
    }

    #[test]
    fn game_log_survives_binary_codec() {
        let log = GameLog {
            current_time: Utc::now(),
            message: "alice won a war against bob".into(),
            username: "alice".into(),
        };
        let env = BincodeCodec.encode(&log).unwrap();
        assert_eq!(BincodeCodec.decode::<GameLog>(&env.payload).unwrap(), log);
        assert!(JsonCodec.decode::<GameLog>(&env.payload).is_err());
    }

    #[test]
    fn game_log_binding_matches_per_user_keys() {
        assert_eq!(game_log_binding(), "game_logs.*");
    }
}
