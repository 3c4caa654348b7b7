//! Configuration loading and path resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every field has a built-in
//! default, so a missing file is never fatal: the service logs a warning and starts
//! with defaults. A file that exists but cannot be parsed is a configuration error.
//!
//! Resolution order for both the config file and the catalog database:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (database path only)
//! 4. OS-dependent default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "CATALOG_CONFIG";

/// Environment variable naming the catalog database
pub const DATABASE_ENV_VAR: &str = "CATALOG_DATABASE";

const APP_DIR: &str = "catalog-search";

/// Upper bound for facet list length
pub const MAX_FACET_LIMIT: usize = 100;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the SQLite catalog (optional, see [`resolve_database_path`])
    pub database_path: Option<PathBuf>,

    /// HTTP port for the browse service
    pub port: u16,

    /// Address the browse service binds to
    pub bind_address: String,

    pub logging: LoggingConfig,
    pub facets: FacetSettings,
    pub fuzzy: FuzzySettings,
    pub browse: BrowseSettings,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            port: 5740,
            bind_address: "127.0.0.1".to_string(),
            logging: LoggingConfig::default(),
            facets: FacetSettings::default(),
            fuzzy: FuzzySettings::default(),
            browse: BrowseSettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Facet engine tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FacetSettings {
    /// Maximum entries per facet list
    pub limit: usize,

    /// Culture used for display labels
    pub culture: String,
}

impl Default for FacetSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            culture: "en".to_string(),
        }
    }
}

/// Fuzzy query correction tuning
///
/// The confidence constants are heuristics; tests pin behaviour to the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FuzzySettings {
    /// Disable to pass every query through untouched
    pub enabled: bool,

    /// Cap on record titles sampled into the vocabulary
    pub title_sample_limit: i64,

    /// Shortest word kept when splitting titles and phrases
    pub min_word_length: usize,

    /// Corrections at or above this confidence replace the query outright
    pub auto_correct_threshold: f64,

    /// Fixed confidence of a Soundex match
    pub soundex_confidence: f64,

    /// Fixed confidence of a Metaphone match
    pub metaphone_confidence: f64,

    /// Floor applied to edit-distance confidence
    pub min_levenshtein_confidence: f64,

    /// Label culture for term and actor vocabulary sources
    pub culture: String,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            title_sample_limit: 5000,
            min_word_length: 3,
            auto_correct_threshold: 0.9,
            soundex_confidence: 0.6,
            metaphone_confidence: 0.5,
            min_levenshtein_confidence: 0.1,
            culture: "en".to_string(),
        }
    }
}

/// Browse service behaviour
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Treat every request as authenticated (shows unpublished records).
    /// Only for staff-internal deployments; no authentication is performed.
    pub assume_authenticated: bool,
}

impl CatalogConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: CatalogConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file yields defaults with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Config file not found at {}, using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Load configuration following the resolution order
    pub fn load_resolved(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            Some(path) => Self::load(&path),
            None => {
                info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&mut self) -> Result<()> {
        if self.facets.limit == 0 {
            return Err(Error::Config("facets.limit must be at least 1".to_string()));
        }
        if self.facets.limit > MAX_FACET_LIMIT {
            warn!(
                "facets.limit {} exceeds maximum, clamping to {}",
                self.facets.limit, MAX_FACET_LIMIT
            );
            self.facets.limit = MAX_FACET_LIMIT;
        }

        let fuzzy = &self.fuzzy;
        for (name, value) in [
            ("fuzzy.auto_correct_threshold", fuzzy.auto_correct_threshold),
            ("fuzzy.soundex_confidence", fuzzy.soundex_confidence),
            ("fuzzy.metaphone_confidence", fuzzy.metaphone_confidence),
            ("fuzzy.min_levenshtein_confidence", fuzzy.min_levenshtein_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        if fuzzy.title_sample_limit < 0 {
            return Err(Error::Config(
                "fuzzy.title_sample_limit must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resolve the config file path: CLI argument, then `CATALOG_CONFIG`, then the
/// platform config directory if a file exists there.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_file().filter(|path| path.exists())
}

/// Resolve the catalog database path
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &CatalogConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database_path {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_database_path()
}

/// Default config file location (`<config dir>/catalog-search/config.toml`)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// OS-dependent default database path
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("catalog.db"))
        .unwrap_or_else(|| PathBuf::from("./catalog_data/catalog.db"))
}
