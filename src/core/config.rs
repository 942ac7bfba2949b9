use config::Config;
use serde::Deserialize;

use crate::core::error::ConfigError;
use crate::types::user::UserCredential;

pub(crate) const DEFAULT_ACCESS_EXPIRY_MINUTES: i64 = 60;
pub(crate) const DEFAULT_REFRESH_EXPIRY_MINUTES: i64 = 1440;
/// One hundred years. Keeps `now + lifetime` well inside chrono's range.
pub(crate) const MAX_EXPIRY_MINUTES: i64 = 100 * 365 * 24 * 60;

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    #[serde(default = "default_tickets_path")]
    pub(crate) tickets_path: String,
    #[serde(default)]
    pub(crate) jwt: JwtSettings,
    #[serde(default)]
    pub(crate) users: Vec<UserCredential>,
}

#[derive(Deserialize, Clone, Default)]
pub(crate) struct JwtSettings {
    #[serde(default)]
    pub(crate) secret: String,
    #[serde(default = "default_claim_value")]
    pub(crate) issuer: String,
    #[serde(default = "default_claim_value")]
    pub(crate) audience: String,
    pub(crate) expiry_minutes: Option<i64>,
    pub(crate) refresh_expiry_minutes: Option<i64>,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_minutes", &self.expiry_minutes)
            .field("refresh_expiry_minutes", &self.refresh_expiry_minutes)
            .finish()
    }
}

impl JwtSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let lifetimes = [
            ("jwt.expiry_minutes", self.expiry_minutes),
            ("jwt.refresh_expiry_minutes", self.refresh_expiry_minutes),
        ];

        for (name, minutes) in lifetimes {
            match minutes {
                Some(minutes) if !(1..=MAX_EXPIRY_MINUTES).contains(&minutes) => {
                    return Err(ConfigError::InvalidExpiry(name, minutes));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl Args {
    /// Reads the optional TOML file named by `TICKETDESK_CONFIG`, then lets
    /// `TICKETDESK_*` environment variables override it.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("TICKETDESK_CONFIG").unwrap_or_else(|_| "ticketdesk.toml".to_string());

        let config = Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("TICKETDESK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(ConfigError::Config)?;

        Self::from_config(config)
    }

    pub(crate) fn from_config(config: Config) -> Result<Self, ConfigError> {
        let args = config
            .try_deserialize::<Args>()
            .map_err(ConfigError::Config)?;

        args.jwt.validate()?;

        Ok(args)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_tickets_path() -> String {
    "tickets.csv".to_string()
}

fn default_claim_value() -> String {
    "ticketdesk".to_string()
}
