//! Console configuration.
//!
//! Every setting has a default; the environment only overrides. Lookup goes
//! through a closure so tests never touch the process environment.

use std::time::Duration;

use adminguard_auth::{GateConfig, MembershipRole};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(60_000);
/// Shortest usable check interval; smaller values are raised to it.
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Status monitor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Minimum spacing between checks; also the timer period.
    pub check_interval: Duration,
    pub enabled: bool,
    pub sign_in_path: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            enabled: true,
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval.max(MIN_CHECK_INTERVAL);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Authorization verifier settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub redirect_on_unauthorized: bool,
    pub redirect_to: String,
    pub sign_in_path: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            redirect_on_unauthorized: true,
            redirect_to: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

impl VerifierConfig {
    pub fn without_redirect(mut self) -> Self {
        self.redirect_on_unauthorized = false;
        self
    }
}

/// Full console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub monitor: MonitorConfig,
    pub verifier: VerifierConfig,
    /// Organization gate; disabled when no admin organization is configured.
    pub gate: Option<GateConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            monitor: MonitorConfig::default(),
            verifier: VerifierConfig::default(),
            gate: None,
        }
    }
}

impl ConsoleConfig {
    /// Load from `ADMINGUARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ADMINGUARD_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("ADMINGUARD_MONITOR_INTERVAL_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "ADMINGUARD_MONITOR_INTERVAL_MS",
                value: raw.clone(),
                reason: "expected milliseconds",
            })?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    key: "ADMINGUARD_MONITOR_INTERVAL_MS",
                    value: raw,
                    reason: "interval must be positive",
                });
            }
            config.monitor.check_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("ADMINGUARD_MONITOR_ENABLED") {
            config.monitor.enabled = parse_bool("ADMINGUARD_MONITOR_ENABLED", &raw)?;
        }

        if let Some(raw) = lookup("ADMINGUARD_REDIRECT_ON_UNAUTHORIZED") {
            config.verifier.redirect_on_unauthorized =
                parse_bool("ADMINGUARD_REDIRECT_ON_UNAUTHORIZED", &raw)?;
        }

        if let Some(path) = lookup("ADMINGUARD_REDIRECT_TO") {
            config.verifier.redirect_to = path;
        }

        if let Some(path) = lookup("ADMINGUARD_SIGN_IN_PATH") {
            config.verifier.sign_in_path = path.clone();
            config.monitor.sign_in_path = path;
        }

        if let Some(org) = lookup("ADMINGUARD_ADMIN_ORG_ID").filter(|v| !v.trim().is_empty()) {
            let mut gate = GateConfig::new(org.trim());
            if let Some(roles) = lookup("ADMINGUARD_ADMIN_ORG_ROLES") {
                let roles: Vec<MembershipRole> = roles
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(|r| MembershipRole::new(r.to_string()))
                    .collect();
                if !roles.is_empty() {
                    gate = gate.with_allowed_roles(roles);
                }
            }
            config.gate = Some(gate);
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean",
        }),
    }
}
