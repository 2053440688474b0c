use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub log: LogSettings,
}

/// Where the upgrade endpoint listens and how tokens are checked.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Seconds a peer gets to complete the WebSocket handshake.
    pub handshake_timeout_secs: u64,
}

/// Broadcast hub tuning.
///
/// `command_buffer` bounds the hub's command queue; callers wait when it is full.
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub command_buffer: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled in from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub hub: Option<PartialHubSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub handshake_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub command_buffer: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                jwt_secret: "change-me".to_string(),
                handshake_timeout_secs: 10,
            },
            hub: HubSettings {
                command_buffer: 1024,
            },
            log: LogSettings {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl Settings {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.server.handshake_timeout_secs)
    }
}
