//! Configuration loading and root folder resolution
//!
//! Root folder resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`FYYUR_ROOT_FOLDER`, then `FYYUR_ROOT`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable config file is never fatal: it is logged and the
//! next tier is used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary root folder environment variable
pub const ENV_ROOT_FOLDER: &str = "FYYUR_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ENV_ROOT: &str = "FYYUR_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "fyyur.db";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Values used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub error_log: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            error_log: None,
        }
    }
}

/// `[server]` table of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[logging]` table of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub error_log: Option<PathBuf>,
}

/// Contents of `config.toml`
///
/// Every key is optional; an empty file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse config text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load the platform config file, falling back to an empty config
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Resolves the root folder for a module
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            config: None,
        }
    }

    /// Highest-priority override from the command line
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Use an already-loaded config instead of reading the platform file
    pub fn with_config(mut self, config: TomlConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("[{}] root folder from command line", self.module_name);
            return path.clone();
        }

        for var in [ENV_ROOT_FOLDER, ENV_ROOT] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    debug!("[{}] root folder from {}", self.module_name, var);
                    return PathBuf::from(path);
                }
            }
        }

        let from_file = match &self.config {
            Some(config) => config.root_folder.clone(),
            None => TomlConfig::load_or_default().root_folder,
        };
        if let Some(path) = from_file {
            debug!("[{}] root folder from config file", self.module_name);
            return path;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the root folder and locates the database inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

/// Locate the config file for this platform, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("fyyur").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/fyyur/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/fyyur
        dirs::data_local_dir()
            .map(|d| d.join("fyyur"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/fyyur"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/fyyur
        dirs::data_dir()
            .map(|d| d.join("fyyur"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/fyyur"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\fyyur
        dirs::data_local_dir()
            .map(|d| d.join("fyyur"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\fyyur"))
    } else {
        PathBuf::from("./fyyur_data")
    }
}
