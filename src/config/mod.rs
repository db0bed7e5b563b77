pub mod file;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::domain::TagMatch;
use crate::utils::error::{RecipeError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_positive_number, validate_required_field, validate_socket_addr, validate_url, Validate,
};
use file::FileConfig;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_NAME: &str = "test";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const MONGO_SCHEMES: &[&str] = &["mongodb", "mongodb+srv"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "recipes-api")]
#[command(about = "REST API for managing recipes")]
pub struct CliArgs {
    /// Optional TOML configuration file
    #[arg(short, long, env = "RECIPES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long, env = "SERVER_ADDR")]
    pub listen_addr: Option<String>,

    /// MongoDB connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    #[arg(long, value_enum, env = "RECIPES_STORAGE")]
    pub storage: Option<StorageBackend>,

    /// Deadline for each storage call
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Match tags exactly instead of ignoring case
    #[arg(long)]
    pub case_sensitive_tags: bool,

    /// JSON array of recipes to create at startup
    #[arg(long, env = "RECIPES_SEED")]
    pub seed: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Fully resolved settings the server runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_name: String,
    pub request_timeout: Duration,
    pub tag_match: TagMatch,
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    /// Merges command line/environment over the optional file over defaults,
    /// then validates the result.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    pub fn merge(args: &CliArgs, file: FileConfig) -> Result<Self> {
        let listen_addr = args
            .listen_addr
            .clone()
            .or(file.server.listen_addr)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = validate_socket_addr("server.listen_addr", &listen_addr)?;

        let timeout_secs = args
            .request_timeout_secs
            .or(file.server.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let case_sensitive = args.case_sensitive_tags || file.search.case_sensitive_tags.unwrap_or(false);

        let config = Self {
            listen_addr,
            storage: args.storage.unwrap_or_default(),
            database_url: args.database_url.clone().or(file.database.url),
            database_name: args
                .database_name
                .clone()
                .or(file.database.name)
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            tag_match: if case_sensitive {
                TagMatch::CaseSensitive
            } else {
                TagMatch::CaseInsensitive
            },
            seed_file: args.seed.clone().or(file.server.seed_file.map(PathBuf::from)),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number(
            "server.request_timeout_secs",
            self.request_timeout.as_secs(),
            1,
        )?;

        if self.storage == StorageBackend::Mongo {
            let url = validate_required_field("database.url", &self.database_url)?;
            validate_url("database.url", url, MONGO_SCHEMES)?;
        }

        if self.database_name.trim().is_empty() {
            return Err(RecipeError::InvalidConfigValueError {
                field: "database.name".to_string(),
                value: self.database_name.clone(),
                reason: "Database name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            database_url: Some("mongodb://localhost:27017".to_string()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::merge(&args(), FileConfig::default()).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.storage, StorageBackend::Mongo);
        assert_eq!(config.database_name, "test");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.tag_match, TagMatch::CaseInsensitive);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_mongo_requires_database_url() {
        let err = AppConfig::merge(&CliArgs::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, RecipeError::MissingConfigError { field } if field == "database.url"));
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let args = CliArgs {
            storage: Some(StorageBackend::Memory),
            ..CliArgs::default()
        };
        let config = AppConfig::merge(&args, FileConfig::default()).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_toml_str(
            r#"
            [server]
            listen_addr = "127.0.0.1:9000"
            request_timeout_secs = 3

            [database]
            url = "mongodb://file-host:27017"
            name = "from_file"
            "#,
        )
        .unwrap();
        let args = CliArgs {
            listen_addr: Some("127.0.0.1:7000".to_string()),
            ..args()
        };

        let config = AppConfig::merge(&args, file).unwrap();
        assert_eq!(config.listen_addr.port(), 7000);
        assert_eq!(config.database_url.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(config.database_name, "from_file");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_timeout = CliArgs {
            request_timeout_secs: Some(0),
            ..args()
        };
        assert!(AppConfig::merge(&zero_timeout, FileConfig::default()).is_err());

        let bad_addr = CliArgs {
            listen_addr: Some(":8080".to_string()),
            ..args()
        };
        assert!(AppConfig::merge(&bad_addr, FileConfig::default()).is_err());

        let bad_url = CliArgs {
            database_url: Some("postgres://localhost".to_string()),
            ..args()
        };
        assert!(matches!(
            AppConfig::merge(&bad_url, FileConfig::default()),
            Err(RecipeError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_case_sensitive_tags_from_file() {
        let file = FileConfig::from_toml_str("[search]\ncase_sensitive_tags = true\n").unwrap();
        let config = AppConfig::merge(&args(), file).unwrap();
        assert_eq!(config.tag_match, TagMatch::CaseSensitive);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "recipes-api",
            "--storage",
            "memory",
            "--listen-addr",
            "127.0.0.1:0",
            "--case-sensitive-tags",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.storage, Some(StorageBackend::Memory));
        assert!(args.case_sensitive_tags);
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
