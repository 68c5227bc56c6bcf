//! Web server configuration.
//!
//! Layered with the `config` crate:
//! ```text
//! built-in defaults
//!     └── barbearia.toml (or $BARBER_CONFIG), optional
//!             └── BARBER_* environment variables
//!                     └── PORT / DATABASE_URL / SECRET_KEY
//! ```

use std::collections::HashSet;
use std::env;

use barber_core::{Role, DEFAULT_PRODUCTS};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// File read when `BARBER_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "barbearia.toml";

/// Web server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface to listen on
    pub bind_addr: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database, `sqlite://path` or a bare path
    pub database_url: String,

    /// HMAC key for session tokens
    pub secret_key: String,

    /// Session lifetime in seconds
    pub session_ttl_secs: i64,

    /// Products offered on the register form
    #[serde(default = "default_products")]
    pub products: Vec<String>,

    /// Accounts allowed to log in
    #[serde(default = "default_users")]
    pub users: Vec<UserEntry>,
}

/// One configured account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    /// Plain text or an argon2 PHC string (`$argon2id$...`).
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AppConfig {
    /// Loads the configuration from the file and process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("BARBER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("BARBER").try_parsing(true))
            .set_override_option("port", env::var("PORT").ok())?
            .set_override_option("database_url", env::var("DATABASE_URL").ok())?
            .set_override_option("secret_key", env::var("SECRET_KEY").ok())?;

        Self::finish(builder)
    }

    /// Loads the configuration from TOML text on top of the defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.add_source(File::from_str(text, FileFormat::Toml)))
    }

    /// `bind_addr:port`, ready for a TCP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("bind_addr", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("database_url", "sqlite://barbearia.db")?
            .set_default("secret_key", "barbearia-secret")?
            .set_default("session_ttl_secs", 12 * 60 * 60)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("secret_key".to_string()));
        }
        if self.session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue("session_ttl_secs".to_string()));
        }
        if self.users.is_empty() {
            return Err(ConfigError::MissingRequired("users".to_string()));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            let name = barber_core::validation::normalize_username(&user.username);
            if name.is_empty() || !seen.insert(name) {
                return Err(ConfigError::InvalidValue(format!(
                    "users: '{}' is empty or duplicated",
                    user.username
                )));
            }
        }

        Ok(())
    }
}

fn default_products() -> Vec<String> {
    DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect()
}

fn default_users() -> Vec<UserEntry> {
    [
        ("mairon", "1234", Role::Admin, "Mairon"),
        ("vini", "111", Role::Barber, "Vini"),
        ("artur", "222", Role::Barber, "Artur"),
    ]
    .into_iter()
    .map(|(username, password, role, display)| UserEntry {
        username: username.to_string(),
        password: password.to_string(),
        role,
        display_name: Some(display.to_string()),
    })
    .collect()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.secret_key, "barbearia-secret");
        assert_eq!(config.session_ttl_secs, 43_200);
        assert_eq!(config.products, vec!["Gel de cabelo", "Espuma de barbear", "Xampu"]);
        assert_eq!(config.users.len(), 3);
        assert_eq!(config.users[0].role, Role::Admin);
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            port = 8080
            database_url = "sqlite:///var/lib/barbearia.db"
            products = ["Pomada"]

            [[users]]
            username = "dono"
            password = "segredo"
            role = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite:///var/lib/barbearia.db");
        assert_eq!(config.products, vec!["Pomada"]);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].display_name, None);
    }

    #[test]
    fn test_rejects_duplicate_users() {
        let err = AppConfig::from_toml(
            r#"
            [[users]]
            username = "vini"
            password = "1"
            role = "barbeiro"

            [[users]]
            username = " VINI "
            password = "2"
            role = "barbeiro"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_rejects_unknown_role() {
        let err = AppConfig::from_toml(
            r#"
            [[users]]
            username = "ze"
            password = "1"
            role = "caixa"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Load(_)));
    }
}
