use std::env;

use serde::{Deserialize, Serialize};

use crate::error::RefguardError;

/// Admission gate size used when nothing else is configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Parse a concurrency limit. Zero, negative and non-numeric values are
/// rejected rather than clamped.
pub fn parse_max_concurrency(raw: &str) -> Result<usize, RefguardError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| RefguardError::Config(format!("max concurrency is not an integer: {:?}", raw)))?;
    if value < 1 {
        return Err(RefguardError::Config(format!(
            "max concurrency must be at least 1, got {}",
            value
        )));
    }
    usize::try_from(value)
        .map_err(|_| RefguardError::Config(format!("max concurrency out of range: {}", value)))
}

// ── Engine config ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Maximum number of classification tasks in flight at once.
    pub max_concurrency: usize,
    /// tracing `EnvFilter` directive.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `REFGUARD_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, RefguardError> {
        let profile = env_or("REFGUARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, RefguardError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let max_concurrency = match profiled_env_opt(p, "REFGUARD_MAX_CONCURRENCY") {
            Some(raw) => parse_max_concurrency(&raw)?,
            None => DEFAULT_MAX_CONCURRENCY,
        };
        Ok(Self {
            profile: p.to_string(),
            max_concurrency,
            log_filter: profiled_env_or(p, "REFGUARD_LOG", "info"),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  engine:      max_concurrency={}", self.max_concurrency);
        tracing::info!("  logging:     filter={}", self.log_filter);
    }
}
