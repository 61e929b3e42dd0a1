//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::NonZeroU64,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;

pub use cli::{CliArgs, ServeOverrides};

const ENV_PREFIX: &str = "PKBLOG";
/// Environment variable carrying the identity API token.
pub const IDENTITY_TOKEN_ENV: &str = "pluralkit_auth";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE_NAME: &str = "blog";
const DEFAULT_POSTS_COLLECTION: &str = "posts";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://api.pluralkit.me/v2/";
const DEFAULT_USER_AGENT: &str = concat!("pkblog/", env!("CARGO_PKG_VERSION"));
const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
const DEFAULT_CACHE_PURGE_SECS: u64 = 10 * 60;
const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;
pub(crate) const DEFAULT_MODDED_MESSAGE: &str =
    "cuboid now owns/runs the server, i (lycanea) might help with some stuff tho idk meow";

/// Fully-resolved settings, produced once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub cache: CacheSettings,
    pub modded_message: String,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub collection: String,
}

#[derive(Clone)]
pub struct IdentitySettings {
    pub system_id: String,
    pub base_url: Url,
    pub token: Option<String>,
    pub user_agent: String,
}

impl std::fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("system_id", &self.system_id)
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub purge_interval: Duration,
    /// Consult the cache before calling the identity API.
    pub read_through: bool,
    pub max_capacity: NonZeroU64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("failed to load env file `{}`: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
///
/// Both the configuration file and the env file are mandatory.
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    dotenvy::from_path(&cli.env_file).map_err(|source| LoadError::EnvFile {
        path: cli.env_file.clone(),
        source,
    })?;

    let builder = Config::builder()
        .add_source(
            File::from(cli.config_file.as_path())
                .format(FileFormat::Json)
                .required(true),
        )
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_serve_overrides(&cli.overrides);

    let token = std::env::var(IDENTITY_TOKEN_ENV).ok();
    Settings::from_raw(raw, token)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    #[serde(alias = "SystemID", alias = "systemid", alias = "systemId")]
    system_id: Option<String>,
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    identity: RawIdentitySettings,
    cache: RawCacheSettings,
    modded_message: Option<String>,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings, token: Option<String>) -> Result<Self, LoadError> {
        let RawSettings {
            system_id,
            server,
            logging,
            database,
            identity,
            cache,
            modded_message,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let database = build_database_settings(database)?;
        let identity = build_identity_settings(system_id, identity, token)?;
        let cache = build_cache_settings(cache)?;
        let modded_message =
            modded_message.unwrap_or_else(|| DEFAULT_MODDED_MESSAGE.to_string());

        Ok(Self {
            server,
            logging,
            database,
            identity,
            cache,
            modded_message,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = non_empty(database.url).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    if !url.starts_with("mongodb://") && !url.starts_with("mongodb+srv://") {
        return Err(LoadError::invalid(
            "database.url",
            "expected a mongodb:// or mongodb+srv:// connection string",
        ));
    }

    Ok(DatabaseSettings {
        url,
        name: non_empty(database.name).unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
        collection: non_empty(database.collection)
            .unwrap_or_else(|| DEFAULT_POSTS_COLLECTION.to_string()),
    })
}

fn build_identity_settings(
    system_id: Option<String>,
    identity: RawIdentitySettings,
    token: Option<String>,
) -> Result<IdentitySettings, LoadError> {
    let system_id = non_empty(system_id)
        .ok_or_else(|| LoadError::invalid("SystemID", "a system identifier is required"))?;

    let raw_base = non_empty(identity.base_url)
        .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string());
    let mut base_url = Url::parse(&raw_base)
        .map_err(|err| LoadError::invalid("identity.base_url", err.to_string()))?;
    if base_url.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "identity.base_url",
            "url cannot be used as a base",
        ));
    }
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    Ok(IdentitySettings {
        system_id,
        base_url,
        token: non_empty(token),
        user_agent: non_empty(identity.user_agent)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl_secs = cache.ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS);
    if ttl_secs == 0 {
        return Err(LoadError::invalid(
            "cache.ttl_seconds",
            "must be greater than zero",
        ));
    }

    let purge_secs = cache
        .purge_interval_seconds
        .unwrap_or(DEFAULT_CACHE_PURGE_SECS);
    if purge_secs == 0 {
        return Err(LoadError::invalid(
            "cache.purge_interval_seconds",
            "must be greater than zero",
        ));
    }

    let max_capacity = NonZeroU64::new(cache.max_capacity.unwrap_or(DEFAULT_CACHE_MAX_CAPACITY))
        .ok_or_else(|| LoadError::invalid("cache.max_capacity", "must be greater than zero"))?;

    Ok(CacheSettings {
        ttl: Duration::from_secs(ttl_secs),
        purge_interval: Duration::from_secs(purge_secs),
        read_through: cache.read_through.unwrap_or(true),
        max_capacity,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    name: Option<String>,
    collection: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawIdentitySettings {
    base_url: Option<String>,
    user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    ttl_seconds: Option<u64>,
    purge_interval_seconds: Option<u64>,
    read_through: Option<bool>,
    max_capacity: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests;
