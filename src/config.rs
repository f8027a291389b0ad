// src/config.rs

use crate::error::MapError;
use crate::location::LocationFields;

pub const ENV_SERVER_URL: &str = "PARSE_SERVER_URL";
pub const ENV_APP_ID: &str = "PARSE_APP_ID";
pub const ENV_REST_API_KEY: &str = "PARSE_REST_API_KEY";
pub const ENV_MASTER_KEY: &str = "PARSE_MASTER_KEY";
pub const ENV_TABLE: &str = "MAP_TABLE";
pub const ENV_USERNAME: &str = "MAP_USERNAME";
pub const ENV_PASSWORD: &str = "MAP_PASSWORD";
pub const ENV_NAME_FIELD: &str = "MAP_NAME_FIELD";
pub const ENV_LAT_FIELD: &str = "MAP_LAT_FIELD";
pub const ENV_LONG_FIELD: &str = "MAP_LONG_FIELD";

/// Server used when no server name is configured.
pub const DEFAULT_SERVER: &str = "localhost";

/// User credentials for a session login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything needed to reach the store and read one table of locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub server_url: String,
    pub app_id: String,
    pub rest_api_key: Option<String>,
    pub master_key: Option<String>,
    pub table: String,
    pub credentials: Option<Credentials>,
    pub fields: LocationFields,
}

impl ConnectionSettings {
    /// Loads settings from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, MapError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// Blank values count as unset. A blank server falls back to [`DEFAULT_SERVER`].
    ///
    /// # Errors
    /// `MapError::Config` when the application id or the table is missing, or when
    /// only one of username and password is given.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = get(ENV_SERVER_URL).unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let app_id = get(ENV_APP_ID)
            .ok_or_else(|| MapError::Config(format!("{} is not set", ENV_APP_ID)))?;
        let table =
            get(ENV_TABLE).ok_or_else(|| MapError::Config(format!("{} is not set", ENV_TABLE)))?;

        let credentials = match (get(ENV_USERNAME), lookup(ENV_PASSWORD)) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(MapError::Config(format!(
                    "{} and {} must be set together",
                    ENV_USERNAME, ENV_PASSWORD
                )))
            }
        };

        let defaults = LocationFields::default();
        let fields = LocationFields {
            name: get(ENV_NAME_FIELD).unwrap_or(defaults.name),
            lat: get(ENV_LAT_FIELD).unwrap_or(defaults.lat),
            long: get(ENV_LONG_FIELD).unwrap_or(defaults.long),
        };

        Ok(ConnectionSettings {
            server_url,
            app_id,
            rest_api_key: get(ENV_REST_API_KEY),
            master_key: get(ENV_MASTER_KEY),
            table,
            credentials,
            fields,
        })
    }
}
