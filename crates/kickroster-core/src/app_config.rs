use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub public_dir: PathBuf,
    pub players_path: Option<PathBuf>,
    pub request_timeout_ms: u64,
    pub max_redirects: u32,
    pub cache_ttl_secs: u64,
    pub degraded_ttl_secs: u64,
    pub primary_base_url: String,
    pub secondary_base_url: String,
    pub piloterr_api_key: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn degraded_ttl(&self) -> Duration {
        Duration::from_secs(self.degraded_ttl_secs)
    }

    /// Whether the secondary (enrichment) source has a credential to run with.
    #[must_use]
    pub fn has_secondary_key(&self) -> bool {
        self.piloterr_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("public_dir", &self.public_dir)
            .field("players_path", &self.players_path)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_redirects", &self.max_redirects)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("degraded_ttl_secs", &self.degraded_ttl_secs)
            .field("primary_base_url", &self.primary_base_url)
            .field("secondary_base_url", &self.secondary_base_url)
            .field(
                "piloterr_api_key",
                &self.piloterr_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
