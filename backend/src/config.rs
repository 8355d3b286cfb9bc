use std::time::Duration;
use rocket::figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment, Profile,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 1080;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/voters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Service settings, read from the `voter` table of `Rocket.toml` and
/// overridden by `VOTER_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoterConfig {
    pub store: StoreKind,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub statement_timeout_ms: u64,
}

impl Default for VoterConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Postgres,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            acquire_timeout_ms: 5000,
            statement_timeout_ms: 5000,
        }
    }
}

impl VoterConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, rocket::figment::Error> {
        Figment::from(Serialized::defaults(VoterConfig::default()))
            .merge(figment.focus("voter"))
            .merge(Env::prefixed("VOTER_").global())
            .select(figment.profile().clone())
            .extract()
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

/// Rocket's figment layering with this service's listener defaults slotted
/// in under `Rocket.toml` and `ROCKET_*`.
pub fn figment() -> Figment {
    Figment::from(rocket::Config::default())
        .merge(("address", "0.0.0.0"))
        .merge(("port", DEFAULT_PORT))
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .select(Profile::from_env_or("ROCKET_PROFILE", rocket::Config::DEFAULT_PROFILE))
}
