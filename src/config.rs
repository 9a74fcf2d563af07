use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the content aggregation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Outbound HTTP client settings
    pub http: HttpConfig,

    /// YouTube scraping settings
    pub youtube: YouTubeConfig,

    /// Reddit scraping settings
    pub reddit: RedditConfig,

    /// Summarizer client settings
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Widen the log filter to debug level
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent sent on every outbound request. Some upstreams (Reddit in
    /// particular) reject default library agents.
    pub user_agent: String,

    /// Per-request timeout for outbound calls (seconds)
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Metadata resolver binary
    pub yt_dlp_path: String,

    /// SponsorBlock API base URL
    pub sponsorblock_api: String,

    /// Comment threads API endpoint
    pub comments_api: String,

    /// Referer header required by the comments API proxy
    pub comments_referer: String,

    /// API key for the comments API
    pub comments_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    /// Base URL for listing and comment fetches
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (for the hosted provider)
    pub api_key: Option<String>,

    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36"
                .to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            sponsorblock_api: "https://sponsor.ajay.app".to_string(),
            comments_api: "https://www.googleapis.com/youtube/v3/commentThreads".to_string(),
            comments_referer: "https://ytcomment.kmcat.uk/".to_string(),
            comments_api_key: None,
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 2048,
            temperature: 0.3,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    /// Load configuration: the first TOML file that parses, then environment
    /// overrides, then validation. Missing files fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            "content-aggregator.toml",
            "config/content-aggregator.toml",
        ];

        let mut config = None;
        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(parsed) => {
                        tracing::info!("loaded configuration from {}", path);
                        config = Some(parsed);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        let mut config: Config = config.unwrap_or_default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("cannot read config file {}: {}", path, e))?;
        let mut config: Config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("cannot parse config file {}: {}", path, e))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables on the current values.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("COMMENTS_API_KEY") {
            self.youtube.comments_api_key = Some(key);
        }
        if let Ok(debug) = std::env::var("DEBUG") {
            self.server.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(host) = std::env::var("AGGREGATOR_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("AGGREGATOR_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("ignoring unparsable AGGREGATOR_PORT={}", port),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.youtube.yt_dlp_path.is_empty() {
            return Err(anyhow!("yt_dlp_path must not be empty"));
        }
        if self.server.host.is_empty() {
            return Err(anyhow!("server host must not be empty"));
        }
        Ok(())
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
        assert_eq!(config.youtube.yt_dlp_path, "yt-dlp");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.reddit.base_url, "https://www.reddit.com");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.http.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
