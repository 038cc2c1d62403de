/*
 * Playground configuration. `PlaygroundOptions` carries the settings a
 * session is constructed with (version overrides, CDN provider, output
 * preferences). The CDN provider is also a persisted user preference: it is
 * stored as a one-line text file in the application's local configuration
 * directory, the way a browser build keeps it in local storage.
 *
 * Persistence goes through `ConfigManagerOperations` so the driver and tests
 * can swap the storage location.
 */
use crate::core::cdn::{self, DEFAULT_CDN};
use crate::core::path_utils;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

pub const APP_NAME: &str = "CdxPlayground";
const CDN_SETTING_FILENAME: &str = "cdn-setting.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Preview,
    Js,
    Css,
    Ssr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaygroundOptions {
    pub versions: BTreeMap<String, String>,
    pub cdn: String,
    pub production_mode: bool,
    pub show_output: bool,
    pub output_mode: OutputMode,
}

impl Default for PlaygroundOptions {
    fn default() -> Self {
        PlaygroundOptions {
            versions: BTreeMap::new(),
            cdn: DEFAULT_CDN.to_string(),
            production_mode: true,
            show_output: true,
            output_mode: OutputMode::Preview,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoConfigDirectory,
    Utf8Error(std::string::FromUtf8Error),
    UnknownCdn(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for ConfigError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ConfigError::Utf8Error(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::Utf8Error(e) => write!(f, "Configuration file UTF-8 error: {e}"),
            ConfigError::UnknownCdn(name) => write!(
                f,
                "Unknown CDN '{name}'. Known CDNs: {}",
                cdn::cdn_names().collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Utf8Error(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_cdn_setting(&self) -> Result<Option<String>>;
    fn save_cdn_setting(&self, cdn_name: &str) -> Result<()>;
}

pub struct CoreConfigManager {
    app_name: String,
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new(app_name: &str) -> Self {
        CoreConfigManager {
            app_name: app_name.to_string(),
            config_dir_override: None,
        }
    }

    // Stores settings in `dir` instead of the platform config directory.
    pub fn with_config_dir(dir: PathBuf) -> Self {
        CoreConfigManager {
            app_name: APP_NAME.to_string(),
            config_dir_override: Some(dir),
        }
    }

    fn config_dir(&self) -> Result<PathBuf> {
        match &self.config_dir_override {
            Some(dir) => Ok(dir.clone()),
            None => path_utils::get_base_app_config_local_dir(&self.app_name)
                .ok_or(ConfigError::NoConfigDirectory),
        }
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new(APP_NAME)
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the preferred CDN name. A missing or empty file means no
     * preference has been saved. A stored name that is no longer a known CDN
     * is reported as `None` so the default applies.
     */
    fn load_cdn_setting(&self) -> Result<Option<String>> {
        let file_path = self.config_dir()?.join(CDN_SETTING_FILENAME);
        log::trace!("CoreConfigManager: Loading CDN setting from {file_path:?}");

        if !file_path.exists() {
            log::debug!("CoreConfigManager: CDN setting file {file_path:?} does not exist.");
            return Ok(None);
        }

        let mut file = File::open(&file_path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let contents = String::from_utf8(bytes)?;
        let name = contents.trim();

        if name.is_empty() {
            Ok(None)
        } else if !cdn::is_known_cdn(name) {
            log::warn!("CoreConfigManager: Ignoring unknown stored CDN '{name}'.");
            Ok(None)
        } else {
            log::debug!("CoreConfigManager: Loaded CDN setting '{name}'.");
            Ok(Some(name.to_string()))
        }
    }

    fn save_cdn_setting(&self, cdn_name: &str) -> Result<()> {
        if !cdn::is_known_cdn(cdn_name) {
            return Err(ConfigError::UnknownCdn(cdn_name.to_string()));
        }
        let file_path = self.config_dir()?.join(CDN_SETTING_FILENAME);
        let mut file = File::create(&file_path)?;
        file.write_all(cdn_name.as_bytes())?;
        log::debug!("CoreConfigManager: Saved CDN setting '{cdn_name}' to {file_path:?}.");
        Ok(())
    }
}
