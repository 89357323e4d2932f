use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Effective runtime configuration. Loaded once at startup and handed to the
/// adapters as plain structs; no component reads the process environment
/// after construction.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sheets: SheetsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

/// Remote table-invocation service. Each capability is gated on its own
/// table id: an unset id short-circuits that capability to the deterministic
/// fallback without touching the network.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
    pub tables: RemoteTableIds,
}

#[derive(Clone, Debug, Default)]
pub struct RemoteTableIds {
    pub intent: Option<String>,
    pub faq: Option<String>,
    pub inventory: Option<String>,
    pub order: Option<String>,
    pub analytics: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub base_url: String,
    pub access_token: Option<SecretString>,
    pub spreadsheet_id: Option<String>,
    pub inventory_range: String,
    pub order_range: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub remote_base_url: Option<String>,
    pub remote_tables: RemoteTableIds,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://borong.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            remote: RemoteConfig {
                base_url: "https://api.jamaibase.com/v1".to_string(),
                api_key: None,
                timeout_secs: 15,
                tables: RemoteTableIds::default(),
            },
            sheets: SheetsConfig {
                base_url: "https://sheets.googleapis.com/v4".to_string(),
                access_token: None,
                spreadsheet_id: None,
                inventory_range: "Inventory!A2:F".to_string(),
                order_range: "Orders!A2:G".to_string(),
                timeout_secs: 15,
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("borong.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(remote) = patch.remote {
            if let Some(base_url) = remote.base_url {
                self.remote.base_url = base_url;
            }
            if let Some(api_key_value) = remote.api_key {
                self.remote.api_key = Some(api_key_value.into());
            }
            if let Some(timeout_secs) = remote.timeout_secs {
                self.remote.timeout_secs = timeout_secs;
            }
            if let Some(tables) = remote.tables {
                merge_table_ids(&mut self.remote.tables, tables.into());
            }
        }

        if let Some(sheets) = patch.sheets {
            if let Some(base_url) = sheets.base_url {
                self.sheets.base_url = base_url;
            }
            if let Some(access_token_value) = sheets.access_token {
                self.sheets.access_token = Some(access_token_value.into());
            }
            if let Some(spreadsheet_id) = sheets.spreadsheet_id {
                self.sheets.spreadsheet_id = Some(spreadsheet_id);
            }
            if let Some(inventory_range) = sheets.inventory_range {
                self.sheets.inventory_range = inventory_range;
            }
            if let Some(order_range) = sheets.order_range {
                self.sheets.order_range = order_range;
            }
            if let Some(timeout_secs) = sheets.timeout_secs {
                self.sheets.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = non_empty_env("BORONG_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(level) = non_empty_env("BORONG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = non_empty_env("BORONG_LOG_FORMAT") {
            self.logging.format = format.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "BORONG_LOG_FORMAT".to_string(),
                value: format,
            })?;
        }

        if let Some(base_url) = non_empty_env("BORONG_REMOTE_BASE_URL") {
            self.remote.base_url = base_url;
        }
        if let Some(api_key) = non_empty_env("BORONG_REMOTE_API_KEY") {
            self.remote.api_key = Some(api_key.into());
        }
        let tables = &mut self.remote.tables;
        merge_table_ids(
            tables,
            RemoteTableIds {
                intent: non_empty_env("BORONG_REMOTE_INTENT_TABLE_ID"),
                faq: non_empty_env("BORONG_REMOTE_FAQ_TABLE_ID"),
                inventory: non_empty_env("BORONG_REMOTE_INVENTORY_TABLE_ID"),
                order: non_empty_env("BORONG_REMOTE_ORDER_TABLE_ID"),
                analytics: non_empty_env("BORONG_REMOTE_ANALYTICS_TABLE_ID"),
            },
        );

        if let Some(base_url) = non_empty_env("BORONG_SHEETS_BASE_URL") {
            self.sheets.base_url = base_url;
        }
        if let Some(access_token) = non_empty_env("BORONG_SHEETS_ACCESS_TOKEN") {
            self.sheets.access_token = Some(access_token.into());
        }
        if let Some(spreadsheet_id) = non_empty_env("BORONG_SHEETS_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = Some(spreadsheet_id);
        }
        if let Some(inventory_range) = non_empty_env("BORONG_SHEETS_INVENTORY_RANGE") {
            self.sheets.inventory_range = inventory_range;
        }
        if let Some(order_range) = non_empty_env("BORONG_SHEETS_ORDER_RANGE") {
            self.sheets.order_range = order_range;
        }

        if let Some(bind_address) = non_empty_env("BORONG_SERVER_BIND_ADDRESS") {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = non_empty_env("BORONG_SERVER_PORT") {
            self.server.port =
                port.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "BORONG_SERVER_PORT".to_string(),
                    value: port,
                })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(base_url) = overrides.remote_base_url {
            self.remote.base_url = base_url;
        }
        merge_table_ids(&mut self.remote.tables, overrides.remote_tables);
        if let Some(spreadsheet_id) = overrides.sheets_spreadsheet_id {
            self.sheets.spreadsheet_id = Some(spreadsheet_id);
        }
        if let Some(access_token) = overrides.sheets_access_token {
            self.sheets.access_token = Some(access_token.into());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.remote.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("remote.base_url must not be empty".to_string()));
        }
        if self.sheets.inventory_range.trim().is_empty()
            || self.sheets.order_range.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "sheets.inventory_range and sheets.order_range must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Presence report per configuration group, mirrored by the status
    /// endpoint and the `doctor` command. Unset values are gaps, not errors:
    /// the pipeline degrades to fallbacks without them.
    pub fn report(&self) -> Vec<ConfigGroupReport> {
        let remote_missing: Vec<&'static str> = [
            ("remote.api_key", self.remote.api_key.is_some()),
            ("remote.tables.intent", self.remote.tables.intent.is_some()),
            ("remote.tables.faq", self.remote.tables.faq.is_some()),
            ("remote.tables.inventory", self.remote.tables.inventory.is_some()),
            ("remote.tables.order", self.remote.tables.order.is_some()),
            ("remote.tables.analytics", self.remote.tables.analytics.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| (!present).then_some(key))
        .collect();

        let sheets_missing: Vec<&'static str> = [
            ("sheets.access_token", self.sheets.access_token.is_some()),
            ("sheets.spreadsheet_id", self.sheets.spreadsheet_id.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| (!present).then_some(key))
        .collect();

        vec![
            ConfigGroupReport::new("database", Vec::new()),
            ConfigGroupReport::new("remote", remote_missing),
            ConfigGroupReport::new("sheets", sheets_missing),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfigGroupReport {
    pub group: &'static str,
    pub missing: Vec<&'static str>,
    pub satisfied: bool,
}

impl ConfigGroupReport {
    fn new(group: &'static str, missing: Vec<&'static str>) -> Self {
        let satisfied = missing.is_empty();
        Self { group, missing, satisfied }
    }
}

fn merge_table_ids(target: &mut RemoteTableIds, patch: RemoteTableIds) {
    if patch.intent.is_some() {
        target.intent = patch.intent;
    }
    if patch.faq.is_some() {
        target.faq = patch.faq;
    }
    if patch.inventory.is_some() {
        target.inventory = patch.inventory;
    }
    if patch.order.is_some() {
        target.order = patch.order;
    }
    if patch.analytics.is_some() {
        target.analytics = patch.analytics;
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn resolve_config_path(requested: Option<&Path>) -> Option<PathBuf> {
    match requested {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => {
            let default = PathBuf::from("borong.toml");
            default.exists().then_some(default)
        }
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&contents)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    remote: Option<RemotePatch>,
    sheets: Option<SheetsPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RemotePatch {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    tables: Option<RemoteTableIdsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteTableIdsPatch {
    intent: Option<String>,
    faq: Option<String>,
    inventory: Option<String>,
    order: Option<String>,
    analytics: Option<String>,
}

impl From<RemoteTableIdsPatch> for RemoteTableIds {
    fn from(patch: RemoteTableIdsPatch) -> Self {
        Self {
            intent: patch.intent,
            faq: patch.faq,
            inventory: patch.inventory,
            order: patch.order,
            analytics: patch.analytics,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SheetsPatch {
    base_url: Option<String>,
    access_token: Option<String>,
    spreadsheet_id: Option<String>,
    inventory_range: Option<String>,
    order_range: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, RemoteTableIds};

    #[test]
    fn defaults_leave_every_remote_capability_unconfigured() {
        let config = AppConfig::default();
        assert!(config.remote.tables.intent.is_none());
        assert!(config.remote.tables.analytics.is_none());
        assert!(config.sheets.spreadsheet_id.is_none());
    }

    #[test]
    fn toml_file_patches_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[database]\nurl = \"sqlite::memory:\"\n\n\
             [remote.tables]\nintent = \"tbl-intent\"\n\n\
             [logging]\nformat = \"json\"\n"
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect("config should load");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.remote.tables.intent.as_deref(), Some("tbl-intent"));
        assert_eq!(config.logging.format, LogFormat::Json);
        // Unpatched sections keep their defaults.
        assert_eq!(config.sheets.inventory_range, "Inventory!A2:F");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn programmatic_overrides_win() {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                remote_tables: RemoteTableIds {
                    faq: Some("tbl-faq".to_string()),
                    ..RemoteTableIds::default()
                },
                server_port: Some(9090),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.remote.tables.faq.as_deref(), Some("tbl-faq"));
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn report_flags_unset_remote_and_sheets_values() {
        let report = AppConfig::default().report();

        let database = report.iter().find(|group| group.group == "database").expect("database");
        assert!(database.satisfied);

        let remote = report.iter().find(|group| group.group == "remote").expect("remote");
        assert!(!remote.satisfied);
        assert!(remote.missing.contains(&"remote.tables.intent"));

        let sheets = report.iter().find(|group| group.group == "sheets").expect("sheets");
        assert!(sheets.missing.contains(&"sheets.spreadsheet_id"));
    }
}
