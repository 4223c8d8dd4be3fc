//! QuestSearch Serve Library
//!
//! HTTP server for the QuestSearch question search API.

use questsearch_core::QuestConfig;

pub mod handlers;
pub mod middleware;
pub mod search;
pub mod server;

pub use handlers::AppState;
pub use server::*;

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_enabled: true,
            max_request_size: 1024 * 1024, // 1MB
        }
    }
}

impl From<&QuestConfig> for ServerConfig {
    fn from(config: &QuestConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            cors_enabled: config.server.cors_enabled,
            max_request_size: config.server.max_request_size,
        }
    }
}

impl ServerConfig {
    /// Address to bind, as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.cors_enabled);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_from_quest_config() {
        let mut quest = QuestConfig::default();
        quest.server.port = 8081;
        quest.server.cors_enabled = false;

        let config = ServerConfig::from(&quest);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert!(!config.cors_enabled);
    }
}
