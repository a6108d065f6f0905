//! Peril server
//!
//! Connects to RabbitMQ, declares the game exchanges, records every game log
//! published by clients and lets the operator pause or resume the game.

mod cli;
mod routing;

use anyhow::{Context, Result};
use clap::Parser;
use peril_pubsub_core::{AckType, QueueType};
use peril_pubsub_rabbitmq::{
    connect, declare_and_bind, declare_exchange, open_channel, publish_json, subscribe_bincode,
    ExchangeKind, RabbitMqOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, HELP};
use routing::{
    game_log_binding, GameLog, PlayingState, DEAD_LETTER_QUEUE, EXCHANGE_PERIL_DIRECT,
    EXCHANGE_PERIL_DLX, EXCHANGE_PERIL_TOPIC, GAME_LOG_SLUG, PAUSE_KEY,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut opts = RabbitMqOptions::from_env().context("reading PERIL_* environment")?;
    if let Some(uri) = cli.uri {
        opts.uri = uri;
    }

    info!("Starting Peril server...");
    let conn = connect(&opts.uri)
        .await
        .context("connecting to RabbitMQ")?;

    let publish_ch = open_channel(&conn).await.context("opening publish channel")?;
    declare_exchange(&publish_ch, EXCHANGE_PERIL_DIRECT, ExchangeKind::Direct).await?;
    declare_exchange(&publish_ch, EXCHANGE_PERIL_TOPIC, ExchangeKind::Topic).await?;
    declare_exchange(&publish_ch, EXCHANGE_PERIL_DLX, ExchangeKind::Fanout).await?;

    // Dead letters are parked for inspection, never consumed here.
    let (_dlq_ch, _dlq) = declare_and_bind(
        &conn,
        EXCHANGE_PERIL_DLX,
        DEAD_LETTER_QUEUE,
        "",
        QueueType::Durable,
        None,
    )
    .await
    .context("declaring dead-letter queue")?;

    let game_logs = subscribe_bincode(
        &conn,
        EXCHANGE_PERIL_TOPIC,
        GAME_LOG_SLUG,
        &game_log_binding(),
        QueueType::Durable,
        |log: GameLog| async move {
            info!(
                username = %log.username,
                at = %log.current_time,
                "{}",
                log.message
            );
            AckType::Ack
        },
        &opts,
    )
    .await
    .context("subscribing to game logs")?;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        match command {
            Command::Pause | Command::Resume => {
                let state = PlayingState {
                    is_paused: command == Command::Pause,
                };
                match publish_json(&publish_ch, EXCHANGE_PERIL_DIRECT, PAUSE_KEY, &state).await {
                    Ok(()) => info!(paused = state.is_paused, "playing state published"),
                    Err(e) => warn!(error = %e, "couldn't publish playing state"),
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(word) => {
                println!("Unknown command: {word}");
                println!("{HELP}");
            }
        }
    }

    info!("Server shutting down...");
    match game_logs.shutdown().await {
        Ok(stats) => info!(?stats, "game log subscription stopped"),
        Err(e) => warn!(error = %e, "game log subscription ended abnormally"),
    }
    conn.close(200, "server shutdown")
        .await
        .context("closing connection")?;
    Ok(())
}
