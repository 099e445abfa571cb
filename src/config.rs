//! Application configuration management.
//!
//! Configuration is read from environment variables with `envy`, after an
//! optional `.env` file has been loaded by `dotenvy`.

use serde::Deserialize;

/// Which persistence backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through sqlx (default).
    Postgres,
    /// Volatile in-process maps. Data is lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required for the postgres backend)
/// - `SERVER_PORT`: HTTP server port, defaults to 3000
/// - `STORAGE_BACKEND`: `postgres` or `memory`, defaults to `postgres`
/// - `DB_MAX_CONNECTIONS`: pool size, defaults to 5
/// - `IDENTITY_HEADER`: header carrying the identity provider's subject id
/// - `IDENTITY_EMAIL_HEADER`: header carrying the user's email, if the provider sends one
/// - `CHECKOUT_PATH`: path prefix of the hosted checkout page
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_backend")]
    pub storage_backend: StorageBackend,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    #[serde(default = "default_identity_email_header")]
    pub identity_email_header: String,

    #[serde(default = "default_checkout_path")]
    pub checkout_path: String,
}

fn default_port() -> u16 {
    3000
}

fn default_backend() -> StorageBackend {
    StorageBackend::Postgres
}

fn default_max_connections() -> u32 {
    5
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

fn default_identity_email_header() -> String {
    "x-user-email".to_string()
}

fn default_checkout_path() -> String {
    "/checkout".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed into its expected type
    /// (e.g. a non-numeric `SERVER_PORT` or an unknown `STORAGE_BACKEND`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Identity settings only, used by the request extractors.
    pub fn identity(&self) -> IdentityConfig {
        IdentityConfig {
            subject_header: self.identity_header.to_ascii_lowercase(),
            email_header: self.identity_email_header.to_ascii_lowercase(),
        }
    }
}

/// Local defaults: in-memory storage, no database.
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            server_port: default_port(),
            storage_backend: StorageBackend::Memory,
            db_max_connections: default_max_connections(),
            identity_header: default_identity_header(),
            identity_email_header: default_identity_email_header(),
            checkout_path: default_checkout_path(),
        }
    }
}

/// Names of the trusted headers set by the upstream identity provider.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub subject_header: String,
    pub email_header: String,
}
