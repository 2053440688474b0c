mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{HubSettings, LogSettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `COMMENT_HUB__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "COMMENT_HUB";

/// Loads the configuration from `config/default` and environment variables,
/// merged over `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let server = partial.server;
    let hub = partial.hub;
    let log = partial.log;

    Ok(Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            jwt_secret: server
                .as_ref()
                .and_then(|s| s.jwt_secret.clone())
                .unwrap_or(default.server.jwt_secret),
            handshake_timeout_secs: server
                .as_ref()
                .and_then(|s| s.handshake_timeout_secs)
                .filter(|&n| n > 0)
                .unwrap_or(default.server.handshake_timeout_secs),
        },
        hub: HubSettings {
            command_buffer: hub
                .as_ref()
                .and_then(|h| h.command_buffer)
                .filter(|&n| n > 0)
                .unwrap_or(default.hub.command_buffer),
        },
        log: LogSettings {
            level: log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
            json: log
                .as_ref()
                .and_then(|l| l.json)
                .unwrap_or(default.log.json),
        },
    })
}
