//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Smallest selectable sampling cadence, in seconds.
pub const MIN_INTERVAL_SECONDS: u64 = 1;
/// Largest selectable sampling cadence, in seconds.
pub const MAX_INTERVAL_SECONDS: u64 = 10;

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub disk_path: String,
    pub sample_interval_seconds: u64,
    pub locale: String,
    pub display_format: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every variable is optional. Values that fail to parse fall back to
    /// their defaults; the sampling interval is clamped to the selectable range.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "system-monitor"),
            log_level: var_or("LOG_LEVEL", "monitor=info"),
            log_file: var_or("LOG_FILE", "monitor.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "system_monitor.db"),
            disk_path: var_or("DISK_PATH", "/"),
            sample_interval_seconds: parsed_or("SAMPLE_INTERVAL_SECONDS", MIN_INTERVAL_SECONDS)
                .clamp(MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS),
            locale: var_or("MONITOR_LOCALE", "en"),
            display_format: var_or("DISPLAY_FORMAT", "text"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    /// Override `database_path` value.
    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    /// Override the sampling interval. Clamped like the environment value.
    pub fn set_sample_interval_seconds(value: u64) {
        AppConfig::set_field(|cfg| {
            cfg.sample_interval_seconds = value.clamp(MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS)
        });
    }

    pub fn set_locale(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.locale = value.into());
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn disk_path() -> String {
    AppConfig::global().disk_path.clone()
}

pub fn sample_interval_seconds() -> u64 {
    AppConfig::global().sample_interval_seconds
}

pub fn locale() -> String {
    AppConfig::global().locale.clone()
}

pub fn display_format() -> String {
    AppConfig::global().display_format.clone()
}
