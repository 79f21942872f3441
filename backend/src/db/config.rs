//! Document-store configuration and environment variable handling.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Characters left unescaped in connection-string credentials (RFC 3986 unreserved).
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const DEFAULT_DATABASE: &str = "homenest";
pub const DEFAULT_COLLECTION: &str = "properties";
pub const DEFAULT_APP_NAME: &str = "Cluster0";

/// MongoDB connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoConfig {
    /// Full connection string, credentials included
    pub uri: String,
    /// Database holding the property collection
    pub database: String,
    /// Property collection name
    pub collection: String,
    /// Application name reported to the server
    pub app_name: String,
    /// Maximum number of pooled connections
    pub max_pool_size: u32,
    /// Minimum number of pooled connections
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connect_timeout_sec: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            max_pool_size: 10,
            min_pool_size: 0,
            connect_timeout_sec: 10,
        }
    }
}

impl MongoConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MONGODB_URI` (optional): full connection string, used verbatim
    /// - `DB_USERNAME`, `DB_PASSWORD`, `DB_CLUSTER` (required without `MONGODB_URI`):
    ///   composed into a `mongodb+srv://` connection string
    /// - `DB_APP_NAME` (optional, default: `Cluster0`)
    /// - `DB_NAME` (optional, default: `homenest`)
    /// - `DB_COLLECTION` (optional, default: `properties`)
    /// - `DB_POOL_MAX` (optional, default: 10)
    /// - `DB_POOL_MIN` (optional, default: 0)
    /// - `DB_CONN_TIMEOUT_SEC` (optional, default: 10)
    ///
    /// # Errors
    /// Returns an error if required variables are missing or a number fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let app_name = env_or("DB_APP_NAME", &defaults.app_name);

        let uri = match env::var("MONGODB_URI").ok().filter(|v| !v.is_empty()) {
            Some(uri) => uri,
            None => {
                let username = required("DB_USERNAME")?;
                let password = required("DB_PASSWORD")?;
                let cluster = required("DB_CLUSTER")?;
                Self::srv_uri(&username, &password, &cluster, &app_name)
            }
        };

        Ok(Self {
            uri,
            database: env_or("DB_NAME", &defaults.database),
            collection: env_or("DB_COLLECTION", &defaults.collection),
            app_name,
            max_pool_size: parsed("DB_POOL_MAX", defaults.max_pool_size)?,
            min_pool_size: parsed("DB_POOL_MIN", defaults.min_pool_size)?,
            connect_timeout_sec: parsed("DB_CONN_TIMEOUT_SEC", defaults.connect_timeout_sec)?,
        })
    }

    /// Create a new configuration with a connection string.
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Compose an SRV connection string with percent-encoded credentials.
    pub fn srv_uri(username: &str, password: &str, cluster: &str, app_name: &str) -> String {
        format!(
            "mongodb+srv://{}:{}@{}/?appName={}",
            utf8_percent_encode(username, USERINFO),
            utf8_percent_encode(password, USERINFO),
            cluster,
            utf8_percent_encode(app_name, USERINFO),
        )
    }

    /// Connection string with the credentials masked, for logs.
    pub fn redacted_uri(&self) -> String {
        match (self.uri.find("://"), self.uri.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &self.uri[..scheme_end], &self.uri[at..])
            }
            _ => self.uri.clone(),
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("uri", &self.redacted_uri())
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("app_name", &self.app_name)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("connect_timeout_sec", &self.connect_timeout_sec)
            .finish()
    }
}

fn required(key: &str) -> Result<String, String> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{} environment variable not set", key))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| format!("{} must be a valid number, got '{}'", key, raw)),
        _ => Ok(default),
    }
}
