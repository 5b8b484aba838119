use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_FREQUENT_LIMIT, DEFAULT_RECENT_CAPACITY};
use crate::navigator::DEFAULT_COLUMNS;

const APP_DIR_NAME: &str = "gridlaunch";
const CONFIG_FILE_NAME: &str = "config.toml";
const HISTORY_DB_FILE_NAME: &str = "history.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: usize,
    pub recent_capacity: usize,
    pub frequent_limit: usize,
    pub show_frequent_section: bool,
    pub scan_roots: Vec<PathBuf>,
    pub toggle_gesture: String,
    pub double_tap_interval_ms: u64,
    pub history_db_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            columns: DEFAULT_COLUMNS,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            frequent_limit: DEFAULT_FREQUENT_LIMIT,
            show_frequent_section: false,
            scan_roots: default_scan_roots(),
            toggle_gesture: "double-tap:Command".to_string(),
            double_tap_interval_ms: 300,
            history_db_path: base.join(HISTORY_DB_FILE_NAME),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Encode(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Encode(error) => write!(f, "encode error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if cfg!(target_os = "macos") => PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME),
        Some(home) => PathBuf::from(home).join(".config").join(APP_DIR_NAME),
        None => std::env::temp_dir().join(APP_DIR_NAME),
    }
}

pub fn default_scan_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        roots.push(PathBuf::from(home).join("Applications"));
    }
    roots
}

/// Reads `path` (or the default location). A missing file yields defaults.
/// `.json` and `.json5` files are parsed as JSON5, everything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    if !config_path.exists() {
        return Ok(Config {
            config_path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&config_path)?;
    let mut cfg = parse(&raw, &config_path)?;
    cfg.config_path = config_path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    if is_json_path(path) {
        json5::from_str::<Config>(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        toml::from_str::<Config>(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let encoded = if is_json_path(&cfg.config_path) {
        serde_json::to_string_pretty(cfg).map_err(|e| ConfigError::Encode(e.to_string()))?
    } else {
        toml::to_string_pretty(cfg).map_err(|e| ConfigError::Encode(e.to_string()))?
    };
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if !(1..=16).contains(&cfg.columns) {
        return Err("columns out of range".into());
    }

    if !(1..=32).contains(&cfg.recent_capacity) {
        return Err("recent_capacity out of range".into());
    }

    if !(1..=50).contains(&cfg.frequent_limit) {
        return Err("frequent_limit out of range".into());
    }

    if !(100..=1000).contains(&cfg.double_tap_interval_ms) {
        return Err("double_tap_interval_ms out of range".into());
    }

    crate::hotkey::parse_toggle_gesture(&cfg.toggle_gesture)?;

    if cfg.history_db_path.as_os_str().is_empty() {
        return Err("history_db_path is required".into());
    }

    Ok(())
}
