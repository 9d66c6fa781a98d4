use crate::treasury::{TreasuryPolicy, WithdrawalSign};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub treasury: TreasuryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            treasury: TreasuryConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Treasury policy dials plus optional CSV seeds for the in-memory stores.
#[derive(Debug, Clone, Default)]
pub struct TreasuryConfig {
    pub policy: TreasuryPolicy,
    pub ledger_csv: Option<PathBuf>,
    pub members_csv: Option<PathBuf>,
}

impl TreasuryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut policy = TreasuryPolicy::default();

        if let Ok(raw) = env::var("TREASURY_WITHDRAWAL_SIGN") {
            policy.withdrawal_sign = WithdrawalSign::parse(&raw)
                .ok_or(ConfigError::InvalidWithdrawalSign { value: raw })?;
        }

        if let Ok(raw) = env::var("TREASURY_SOCIAL_TARGET") {
            policy.social_contribution_target = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSocialTarget { value: raw })?;
        }

        Ok(Self {
            policy,
            ledger_csv: non_empty_path("TREASURY_LEDGER_CSV"),
            members_csv: non_empty_path("TREASURY_MEMBERS_CSV"),
        })
    }
}

fn non_empty_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWithdrawalSign { value: String },
    InvalidSocialTarget { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWithdrawalSign { value } => write!(
                f,
                "TREASURY_WITHDRAWAL_SIGN must be 'as_recorded' or 'debit' (found '{}')",
                value
            ),
            ConfigError::InvalidSocialTarget { value } => write!(
                f,
                "TREASURY_SOCIAL_TARGET must be a whole amount (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWithdrawalSign { .. }
            | ConfigError::InvalidSocialTarget { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "TREASURY_WITHDRAWAL_SIGN",
            "TREASURY_SOCIAL_TARGET",
            "TREASURY_LEDGER_CSV",
            "TREASURY_MEMBERS_CSV",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.treasury.policy.withdrawal_sign, WithdrawalSign::AsRecorded);
        assert_eq!(config.treasury.policy.social_contribution_target, 50_000);
        assert!(config.treasury.ledger_csv.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_treasury_policy_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TREASURY_WITHDRAWAL_SIGN", "debit");
        env::set_var("TREASURY_SOCIAL_TARGET", "60000");
        env::set_var("TREASURY_LEDGER_CSV", "data/ledger.csv");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.treasury.policy.withdrawal_sign, WithdrawalSign::Debit);
        assert_eq!(config.treasury.policy.social_contribution_target, 60_000);
        assert_eq!(
            config.treasury.ledger_csv,
            Some(PathBuf::from("data/ledger.csv"))
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_withdrawal_sign() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TREASURY_WITHDRAWAL_SIGN", "sometimes");
        match AppConfig::load() {
            Err(ConfigError::InvalidWithdrawalSign { value }) => assert_eq!(value, "sometimes"),
            other => panic!("expected withdrawal sign error, got {other:?}"),
        }
        reset_env();
    }
}
