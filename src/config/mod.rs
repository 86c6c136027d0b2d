//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::images::{DEFAULT_JPEG_QUALITY, DEFAULT_TARGET_WIDTH};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folio";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_GALLERY_IMAGES: u64 = 10;
const DEFAULT_CACHE_LIST_TTL_SECS: u64 = 60;
const DEFAULT_CACHE_CAPACITY: u64 = 64;
const DEFAULT_CACHE_SWEEP_SECS: u64 = 30;
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;

/// Command-line arguments for the folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Portfolio backend server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(Box<ServeArgs>),
    /// Create the admin record read by `/getAdmin`.
    #[command(name = "seed-admin")]
    SeedAdmin(SeedAdminArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SeedAdminArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Email address of the site owner.
    #[arg(long, value_name = "EMAIL")]
    pub email: String,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Origin of the frontend allowed by CORS.
    #[arg(long = "server-allowed-origin", value_name = "URL")]
    pub server_allowed_origin: Option<String>,

    /// Directory of static files served for unmatched paths.
    #[arg(long = "server-static-dir", value_name = "PATH")]
    pub server_static_dir: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the per-file upload limit in bytes.
    #[arg(long = "uploads-max-file-bytes", value_name = "BYTES")]
    pub uploads_max_file_bytes: Option<u64>,

    /// Override the maximum number of gallery images per project.
    #[arg(long = "uploads-max-gallery-images", value_name = "COUNT")]
    pub uploads_max_gallery_images: Option<u64>,

    /// Override the list cache TTL.
    #[arg(long = "cache-list-ttl-seconds", value_name = "SECONDS")]
    pub cache_list_ttl_seconds: Option<u64>,

    /// Override the number of cache keys kept in memory.
    #[arg(long = "cache-capacity", value_name = "COUNT")]
    pub cache_capacity: Option<u64>,

    /// Override the expired-entry sweep cadence; 0 disables the sweeper.
    #[arg(long = "cache-sweep-interval-seconds", value_name = "SECONDS")]
    pub cache_sweep_interval_seconds: Option<u64>,

    /// Override the mail relay endpoint.
    #[arg(long = "mail-relay-url", value_name = "URL")]
    pub mail_relay_url: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub uploads: UploadSettings,
    pub images: ImageSettings,
    pub cache: CacheSettings,
    pub mail: Option<MailSettings>,
    pub admin: AdminSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
    pub allowed_origin: Option<String>,
    pub static_dir: Option<PathBuf>,
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
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

impl DatabaseSettings {
    /// The configured URL, for commands that must not fall back to memory.
    pub fn require_url(&self) -> Result<&str, LoadError> {
        self.url.as_deref().ok_or_else(|| {
            LoadError::invalid(
                "database.url",
                "a database is required for this command; set database.url or FOLIO__DATABASE__URL",
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_file_bytes: NonZeroUsize,
    pub max_gallery_images: NonZeroUsize,
}

impl UploadSettings {
    /// Whole-request ceiling: every allowed file at full size plus room for text fields.
    pub fn max_request_bytes(&self) -> usize {
        let files = self.max_gallery_images.get().saturating_add(1);
        self.max_file_bytes
            .get()
            .saturating_mul(files)
            .saturating_add(64 * 1024)
    }
}

#[derive(Debug, Clone)]
pub struct ImageSettings {
    pub target_width: NonZeroU32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub list_ttl: Duration,
    pub capacity: NonZeroUsize,
    pub sweep_interval: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub relay_url: Url,
    pub api_token: Option<String>,
    pub from: String,
    pub to: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct AdminSettings {
    /// Hex SHA-256 of the bearer token accepted by `/getAdminEmail`.
    pub token_sha256: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
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
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("FOLIO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::SeedAdmin(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    uploads: RawUploadSettings,
    images: RawImageSettings,
    cache: RawCacheSettings,
    mail: RawMailSettings,
    admin: RawAdminSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(origin) = overrides.server_allowed_origin.as_ref() {
            self.server.allowed_origin = Some(origin.clone());
        }
        if let Some(dir) = overrides.server_static_dir.as_ref() {
            self.server.static_dir = Some(dir.clone());
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
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(limit) = overrides.uploads_max_file_bytes {
            self.uploads.max_file_bytes = Some(limit);
        }
        if let Some(count) = overrides.uploads_max_gallery_images {
            self.uploads.max_gallery_images = Some(count);
        }
        if let Some(ttl) = overrides.cache_list_ttl_seconds {
            self.cache.list_ttl_seconds = Some(ttl);
        }
        if let Some(capacity) = overrides.cache_capacity {
            self.cache.capacity = Some(capacity);
        }
        if let Some(interval) = overrides.cache_sweep_interval_seconds {
            self.cache.sweep_interval_seconds = Some(interval);
        }
        if let Some(url) = overrides.mail_relay_url.as_ref() {
            self.mail.relay_url = Some(url.clone());
        }
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            uploads,
            images,
            cache,
            mail,
            admin,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            uploads: build_upload_settings(uploads)?,
            images: build_image_settings(images)?,
            cache: build_cache_settings(cache)?,
            mail: build_mail_settings(mail)?,
            admin: build_admin_settings(admin)?,
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

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    let allowed_origin = match non_empty(server.allowed_origin) {
        Some(origin) => {
            let parsed = Url::parse(&origin)
                .map_err(|err| LoadError::invalid("server.allowed_origin", err.to_string()))?;
            Some(parsed.origin().ascii_serialization())
        }
        None => None,
    };

    let static_dir = server
        .static_dir
        .filter(|dir| !dir.as_os_str().is_empty());

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
        allowed_origin,
        static_dir,
    })
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
    let url = non_empty(database.url);
    let max_connections = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = NonZeroU32::new(max_connections).ok_or_else(|| {
        LoadError::invalid("database.max_connections", "must be greater than zero")
    })?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_upload_settings(uploads: RawUploadSettings) -> Result<UploadSettings, LoadError> {
    let max_file_bytes = non_zero_usize(
        uploads.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES),
        "uploads.max_file_bytes",
    )?;
    let max_gallery_images = non_zero_usize(
        uploads
            .max_gallery_images
            .unwrap_or(DEFAULT_MAX_GALLERY_IMAGES),
        "uploads.max_gallery_images",
    )?;

    Ok(UploadSettings {
        max_file_bytes,
        max_gallery_images,
    })
}

fn build_image_settings(images: RawImageSettings) -> Result<ImageSettings, LoadError> {
    let width = images.target_width.unwrap_or(DEFAULT_TARGET_WIDTH);
    let target_width = NonZeroU32::new(width)
        .ok_or_else(|| LoadError::invalid("images.target_width", "must be greater than zero"))?;

    let jpeg_quality = images.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    if !(1..=100).contains(&jpeg_quality) {
        return Err(LoadError::invalid(
            "images.jpeg_quality",
            "must be between 1 and 100",
        ));
    }

    Ok(ImageSettings {
        target_width,
        jpeg_quality,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl_secs = cache
        .list_ttl_seconds
        .unwrap_or(DEFAULT_CACHE_LIST_TTL_SECS);
    if ttl_secs == 0 {
        return Err(LoadError::invalid(
            "cache.list_ttl_seconds",
            "must be greater than zero",
        ));
    }

    let capacity = non_zero_usize(
        cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
        "cache.capacity",
    )?;

    let sweep_secs = cache
        .sweep_interval_seconds
        .unwrap_or(DEFAULT_CACHE_SWEEP_SECS);
    let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

    Ok(CacheSettings {
        list_ttl: Duration::from_secs(ttl_secs),
        capacity,
        sweep_interval,
    })
}

fn build_mail_settings(mail: RawMailSettings) -> Result<Option<MailSettings>, LoadError> {
    let Some(relay_url) = non_empty(mail.relay_url) else {
        return Ok(None);
    };
    let relay_url = Url::parse(&relay_url)
        .map_err(|err| LoadError::invalid("mail.relay_url", err.to_string()))?;

    let from = non_empty(mail.from)
        .ok_or_else(|| LoadError::invalid("mail.from", "required when mail.relay_url is set"))?;
    let to = non_empty(mail.to)
        .ok_or_else(|| LoadError::invalid("mail.to", "required when mail.relay_url is set"))?;

    let timeout_secs = mail.timeout_seconds.unwrap_or(DEFAULT_MAIL_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "mail.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(Some(MailSettings {
        relay_url,
        api_token: non_empty(mail.api_token),
        from,
        to,
        timeout: Duration::from_secs(timeout_secs),
    }))
}

fn build_admin_settings(admin: RawAdminSettings) -> Result<AdminSettings, LoadError> {
    let token_sha256 = non_empty(admin.token_sha256).map(|digest| digest.to_ascii_lowercase());
    if let Some(digest) = token_sha256.as_deref() {
        let valid = digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            return Err(LoadError::invalid(
                "admin.token_sha256",
                "must be 64 hex characters",
            ));
        }
    }
    Ok(AdminSettings { token_sha256 })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
    allowed_origin: Option<String>,
    static_dir: Option<PathBuf>,
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
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUploadSettings {
    max_file_bytes: Option<u64>,
    max_gallery_images: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawImageSettings {
    target_width: Option<u32>,
    jpeg_quality: Option<u8>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    list_ttl_seconds: Option<u64>,
    capacity: Option<u64>,
    sweep_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMailSettings {
    relay_url: Option<String>,
    api_token: Option<String>,
    from: Option<String>,
    to: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAdminSettings {
    token_sha256: Option<String>,
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

fn non_zero_usize(value: u64, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    let value: usize = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for usize"))?;
    NonZeroUsize::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
