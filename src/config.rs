use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SERVER_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("SERVER_HOST must not be empty")]
    EmptyHost,
}

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads SERVER_HOST and SERVER_PORT, falling back to 0.0.0.0:3000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("SERVER_HOST").ok(),
            std::env::var("SERVER_PORT").ok(),
        )
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let host = host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        Ok(Self { host, port })
    }

    /// `host:port`, resolved by the listener when it binds
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
