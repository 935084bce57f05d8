use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Config {
    pub application: Application,
    pub database: Database,
    pub session: Session,
    pub storage: Storage,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Application {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub run_migration: bool,
    pub cors_origin: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_ms: u64,
}

impl Application {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Database {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
}

impl Database {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

/// Session cookie settings. `secure` should only be off for local development over plain http.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct Session {
    pub cookie_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub ttl_days: i64,
    pub secure: bool,
}

impl Session {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.ttl_days)
    }
}

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Postgres,
    Memory,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Storage {
    pub backend: Backend,
    #[serde(default)]
    pub seed_file: Option<String>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let base_path = std::env::current_dir()?;
        let config_directory = base_path.join("configuration");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(anyhow::Error::msg)?;

        let environment_filename = format!("{}.yaml", environment.as_str());

        let config = Figment::new()
            .merge(Yaml::file(config_directory.join("base.yaml")))
            .merge(Yaml::file(config_directory.join(environment_filename)))
            .merge(Env::raw().split("__"))
            .extract()?;

        Ok(config)
    }
}
