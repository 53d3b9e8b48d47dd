//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Library code should not reach for the singleton directly: binaries read it once
//! at startup and hand explicit values (runner settings, report filters, database
//! URL) down to the components that need them.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub database_path: String,
    pub report_dir: String,
    pub shell_binary: String,
    pub valgrind_bin: String,
    pub run_timeout_secs: u64,
    pub classifier_policy: String,
    pub still_reachable_denylist: Vec<String>,
    pub error_denylist: Vec<String>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Splits a comma-separated env value into trimmed, non-empty entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every field has a default, so this never panics. A malformed
    /// `RUN_TIMEOUT_SECS` falls back to the default as well.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "shell-memcheck".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/harness.log".into()),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "instance/tests.db".into()),
            report_dir: env::var("REPORT_DIR").unwrap_or_else(|_| "valgrind_reports".into()),
            shell_binary: env::var("SHELL_BINARY").unwrap_or_else(|_| "../minishell".into()),
            valgrind_bin: env::var("VALGRIND_BIN").unwrap_or_else(|_| "valgrind".into()),
            run_timeout_secs: env::var("RUN_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            classifier_policy: env::var("CLASSIFIER_POLICY").unwrap_or_else(|_| "strict".into()),
            still_reachable_denylist: parse_list(
                &env::var("STILL_REACHABLE_DENYLIST").unwrap_or_else(|_| "libreadline.so".into()),
            ),
            error_denylist: parse_list(
                &env::var("ERROR_DENYLIST").unwrap_or_else(|_| "readline".into()),
            ),
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
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
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

    pub fn set_report_dir(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.report_dir = value.into());
    }

    pub fn set_shell_binary(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.shell_binary = value.into());
    }

    pub fn set_valgrind_bin(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.valgrind_bin = value.into());
    }

    pub fn set_run_timeout_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.run_timeout_secs = value);
    }

    pub fn set_classifier_policy(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.classifier_policy = value.into());
    }

    pub fn set_still_reachable_denylist(value: Vec<String>) {
        AppConfig::set_field(|cfg| cfg.still_reachable_denylist = value);
    }

    pub fn set_error_denylist(value: Vec<String>) {
        AppConfig::set_field(|cfg| cfg.error_denylist = value);
    }
}

// --- Free accessors ---

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn app_env() -> String {
    AppConfig::global().env.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn report_dir() -> String {
    AppConfig::global().report_dir.clone()
}

pub fn shell_binary() -> String {
    AppConfig::global().shell_binary.clone()
}

pub fn valgrind_bin() -> String {
    AppConfig::global().valgrind_bin.clone()
}

pub fn run_timeout_secs() -> u64 {
    AppConfig::global().run_timeout_secs
}

pub fn classifier_policy() -> String {
    AppConfig::global().classifier_policy.clone()
}

pub fn still_reachable_denylist() -> Vec<String> {
    AppConfig::global().still_reachable_denylist.clone()
}

pub fn error_denylist() -> Vec<String> {
    AppConfig::global().error_denylist.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_list_drops_blank_entries() {
        assert_eq!(
            parse_list(" libreadline.so, ,libhistory.so,"),
            vec!["libreadline.so".to_string(), "libhistory.so".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    #[serial]
    fn setters_override_and_reset_restores() {
        AppConfig::set_report_dir("/tmp/override_reports");
        AppConfig::set_run_timeout_secs(7);
        assert_eq!(report_dir(), "/tmp/override_reports");
        assert_eq!(run_timeout_secs(), 7);

        AppConfig::reset();
        assert_eq!(report_dir(), AppConfig::from_env().report_dir);
    }

    #[test]
    #[serial]
    fn denylists_default_to_line_editor_library() {
        unsafe {
            env::remove_var("STILL_REACHABLE_DENYLIST");
            env::remove_var("ERROR_DENYLIST");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.still_reachable_denylist, vec!["libreadline.so".to_string()]);
        assert_eq!(cfg.error_denylist, vec!["readline".to_string()]);
    }
}
