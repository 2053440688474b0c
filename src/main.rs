//! CLI for comment-hub
//!
//! Subcommands:
//! - `server`: run the comment stream server
//! - `watch`: subscribe to a post and print its events (useful for smoke tests)
//! - `token`: mint a development token signed with the configured secret

use std::sync::Arc;

use clap::Parser;
use comment_hub::auth::{JwtVerifier, TokenVerifier, lifetime_hours};
use comment_hub::config::{Settings, load_config};
use comment_hub::hub::{Event, Hub};
use comment_hub::transport::{comments_url, start_websocket_server};
use comment_hub::utils::error::ServerError;
use comment_hub::utils::logging;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tracing::{error, info};
use tungstenite::protocol::Message as WsMessage;

#[derive(Parser)]
#[command(name = "comment-hub")]
enum Command {
    /// Start the comment stream server
    Server,
    /// Subscribe to a post's comment stream and print each event
    Watch {
        /// Server base URL
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        /// Post to watch
        #[arg(long)]
        post: u64,
        /// Token to authenticate with
        #[arg(long)]
        token: String,
    },
    /// Print a token for `sub`
    Token {
        #[arg(long)]
        sub: String,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info", false);
            error!("{}", ServerError::from(e));
            std::process::exit(1);
        }
    };
    logging::init(&config.log.level, config.log.json);

    let result = match cmd {
        Command::Server => run_server(config).await,
        Command::Watch { url, post, token } => run_watch(&url, post, &token).await,
        Command::Token { sub, ttl_hours } => run_token(&config, &sub, ttl_hours),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run_server(config: Settings) -> Result<(), ServerError> {
    let addr = config.listen_addr();
    let handshake_timeout = config.handshake_timeout();
    let hub = Hub::spawn(config.hub.command_buffer);
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(&config.server.jwt_secret));

    tokio::select! {
        result = start_websocket_server(&addr, hub, verifier, handshake_timeout) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_watch(url: &str, post: u64, token: &str) -> Result<(), ServerError> {
    let target = comments_url(url, post, token)?;

    let (mut ws_stream, _response) = connect_async(target).await?;
    info!(%post, "watching comments");

    while let Some(frame) = ws_stream.next().await {
        if let WsMessage::Text(text) = frame? {
            let event: Event = serde_json::from_str(text.as_str())?;
            println!("{}", serde_json::to_string_pretty(event.data())?);
        }
    }

    info!("stream closed by server");
    Ok(())
}

fn run_token(config: &Settings, sub: &str, ttl_hours: i64) -> Result<(), ServerError> {
    let verifier = JwtVerifier::new(&config.server.jwt_secret);
    let token = verifier.issue(sub, lifetime_hours(ttl_hours)?)?;
    println!("{token}");
    Ok(())
}
