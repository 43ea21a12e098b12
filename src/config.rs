use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::scroll::DEFAULT_SCROLL_THRESHOLD;
use crate::session::{DEFAULT_SESSION_TIMEOUT, ReplyDelay};

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub agent: AgentConfig,
    pub reply: ReplyConfig,
    pub scroll: ScrollConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub request_timeout_secs: u64,
}

/// Presence shown in the agent header. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Presence {
    #[default]
    Online,
    Busy,
    Offline,
}

impl From<String> for Presence {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "online" => Self::Online,
            "busy" => Self::Busy,
            _ => Self::Offline,
        }
    }
}

impl Presence {
    /// Badge text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Offline => "Offline",
        }
    }
}

/// Who the page says it is talking to.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub status: Presence,
    #[serde(default)]
    pub avatar: Option<String>,
    pub placeholder: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplyConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl ReplyConfig {
    #[must_use]
    pub fn delay(&self) -> ReplyDelay {
        ReplyDelay::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrollConfig {
    pub threshold: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layered load: defaults, then the config file, then `CHAT_*` env vars, then CLI flags.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.static_dir", "static")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("agent.name", "AI Assistant Pro")?
            .set_default("agent.description", "Your intelligent business automation partner")?
            .set_default("agent.status", "online")?
            .set_default("agent.placeholder", "Ask me anything about our platform...")?
            .set_default("reply.min_delay_ms", 1500)?
            .set_default("reply.max_delay_ms", 2500)?
            .set_default("scroll.threshold", DEFAULT_SCROLL_THRESHOLD)?
            .set_default("session.idle_timeout_secs", DEFAULT_SESSION_TIMEOUT.as_secs())?
            .set_default("session.sweep_interval_secs", 60)?
            .set_default("logging.json", false)?;

        // Explicit file must exist; the working-directory fallback is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path)).required(true)),
            None => builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)).required(false)),
        };

        // E.g. CHAT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.reply.min_delay_ms > self.reply.max_delay_ms {
            return Err(config::ConfigError::Message(format!(
                "reply.min_delay_ms ({}) must not exceed reply.max_delay_ms ({})",
                self.reply.min_delay_ms, self.reply.max_delay_ms
            )));
        }
        if !(self.scroll.threshold.is_finite() && self.scroll.threshold > 0.0) {
            return Err(config::ConfigError::Message(format!(
                "scroll.threshold must be a positive number, got {}",
                self.scroll.threshold
            )));
        }
        if self.agent.name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "agent.name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_parsing_falls_back_to_offline() {
        assert_eq!(Presence::from("Online".to_string()), Presence::Online);
        assert_eq!(Presence::from("busy".to_string()), Presence::Busy);
        assert_eq!(Presence::from("away".to_string()), Presence::Offline);
        assert_eq!(Presence::Busy.label(), "Busy");
    }

    #[test]
    fn test_reply_delay_from_config() {
        let reply = ReplyConfig {
            min_delay_ms: 1500,
            max_delay_ms: 2500,
        };
        let delay = reply.delay();
        assert_eq!(delay.min(), Duration::from_millis(1500));
        assert_eq!(delay.max(), Duration::from_millis(2500));
    }

    #[test]
    fn test_sweep_interval_never_zero() {
        let session = SessionConfig {
            idle_timeout_secs: 10,
            sweep_interval_secs: 0,
        };
        assert_eq!(session.sweep_interval(), Duration::from_secs(1));
    }
}
