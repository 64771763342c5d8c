//! Configuration types for event seeding.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

use crate::generators::EventGenConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),
}

/// Connection parameters for the target database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "aimet".to_string(),
            user: "aimet".to_string(),
            password: "aimetpassword".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Builds sqlx connect options from the URL or the individual fields.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .database(&self.name)
                .username(&self.user)
                .password(&self.password)),
        }
    }
}

/// Configuration for a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of event slots to fill.
    pub slots: usize,

    /// Insert attempts per slot before the slot is given up.
    pub attempts_per_slot: usize,

    /// Roll back after a uniqueness violation as well.
    ///
    /// Off by default: the uniqueness branch continues without a rollback
    /// and the following attempt sees an aborted transaction instead.
    pub rollback_on_conflict: bool,

    /// Emit a progress line every this many slots (0 disables it).
    pub progress_every: usize,

    /// Shape of the generated rows.
    pub events: EventGenConfig,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            slots: 20_000,
            attempts_per_slot: 300,
            rollback_on_conflict: false,
            progress_every: 1_000,
            events: EventGenConfig::default(),
        }
    }
}

impl SeedConfig {
    /// Checks the generator ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.events.validate()
    }
}

/// Everything the `seed` binary reads from its environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    /// Fixed RNG seed for reproducible runs. Entropy-seeded when absent.
    pub rng_seed: Option<u64>,
    /// Whitespace-separated word file used for titles instead of the built-in corpus.
    pub words_file: Option<PathBuf>,
    /// Apply the bundled migrations before seeding.
    pub migrate: bool,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Unset keys fall back to the defaults; set keys must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL"),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "DB_PORT", defaults.port)?,
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
        };

        let seed_defaults = SeedConfig::default();
        let seed = SeedConfig {
            slots: parse_or(&lookup, "SEED_SLOTS", seed_defaults.slots)?,
            attempts_per_slot: parse_or(
                &lookup,
                "SEED_ATTEMPTS",
                seed_defaults.attempts_per_slot,
            )?,
            rollback_on_conflict: parse_or(
                &lookup,
                "SEED_ROLLBACK_ON_CONFLICT",
                seed_defaults.rollback_on_conflict,
            )?,
            ..seed_defaults
        };
        seed.validate()?;

        let rng_seed = match lookup("SEED_RNG_SEED") {
            Some(value) => Some(parse_value("SEED_RNG_SEED", value)?),
            None => None,
        };

        Ok(Self {
            database,
            seed,
            rng_seed,
            words_file: lookup("SEED_WORDS_FILE").map(PathBuf::from),
            migrate: parse_or(&lookup, "SEED_MIGRATE", false)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => parse_value(key, value),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
