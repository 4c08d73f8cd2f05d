//! Environment-backed configuration
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file by `main`). Missing values fall back to development defaults.

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Base URL used to build the full short URL in API responses
    pub public_base_url: String,
    /// Where unknown or deactivated codes get redirected
    pub default_url: String,
    pub storage_backend: String,
    pub links_file: String,
    pub random_code_length: usize,
    /// Seconds between click-buffer flushes
    pub click_flush_interval: u64,
    /// Empty means the management API is open
    pub api_token: String,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        Config {
            public_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port)),
            default_url: env::var("DEFAULT_URL")
                .unwrap_or_else(|_| "https://www.coupang.com".to_string()),
            storage_backend: env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".to_string()),
            links_file: env::var("LINKS_FILE").unwrap_or_else(|_| "links.json".to_string()),
            random_code_length: env::var("RANDOM_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
            click_flush_interval: env::var("CLICK_FLUSH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            api_token: env::var("API_TOKEN").unwrap_or_default(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: env::var("LOG_FILE").ok().filter(|f| !f.is_empty()),
            server_host,
            server_port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Full short URL for a code, e.g. `http://localhost:8080/aB3xYz`
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_strips_trailing_slash() {
        let mut config = Config::from_env();
        config.public_base_url = "https://s.example.com/".to_string();
        assert_eq!(config.short_url("abc123"), "https://s.example.com/abc123");
    }
}
