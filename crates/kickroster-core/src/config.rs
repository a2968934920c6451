use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    // Empty values count as unset so `FOO=` in a .env file behaves like a missing key.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bind_addr = match optional("KICKROSTER_BIND_ADDR") {
        Some(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid("KICKROSTER_BIND_ADDR", e.to_string()))?,
        None => {
            let port = or_default("PORT", "3000")
                .parse::<u16>()
                .map_err(|e| invalid("PORT", e.to_string()))?;
            SocketAddr::from(([0, 0, 0, 0], port))
        }
    };

    let log_level = or_default("KICKROSTER_LOG_LEVEL", "info");
    let public_dir = PathBuf::from(or_default("KICKROSTER_PUBLIC_DIR", "./public"));
    let players_path = optional("KICKROSTER_PLAYERS_PATH").map(PathBuf::from);

    let request_timeout_ms = parse_u64("KICKROSTER_REQUEST_TIMEOUT_MS", "12000")?;
    if request_timeout_ms == 0 {
        return Err(invalid(
            "KICKROSTER_REQUEST_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }
    let max_redirects = parse_u32("KICKROSTER_MAX_REDIRECTS", "3")?;
    let cache_ttl_secs = parse_u64("KICKROSTER_CACHE_TTL_SECS", "60")?;
    let degraded_ttl_secs = parse_u64("KICKROSTER_DEGRADED_TTL_SECS", "60")?;

    let primary_base_url = or_default("KICKROSTER_PRIMARY_BASE_URL", "https://kick.com");
    let secondary_base_url = or_default("KICKROSTER_SECONDARY_BASE_URL", "https://piloterr.com");
    let piloterr_api_key = optional("PILOTERR_API_KEY");

    Ok(AppConfig {
        bind_addr,
        log_level,
        public_dir,
        players_path,
        request_timeout_ms,
        max_redirects,
        cache_ttl_secs,
        degraded_ttl_secs,
        primary_base_url,
        secondary_base_url,
        piloterr_api_key,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
