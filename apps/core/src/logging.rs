use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "gridlaunch.log";
const ARCHIVE_PREFIX: &str = "gridlaunch-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;
const LEVEL_ENV_VAR: &str = "GRIDLAUNCH_LOG";

static LOGGER: OnceLock<Logger> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

struct Logger {
    sink: Mutex<File>,
    threshold: Level,
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

pub fn init() -> io::Result<PathBuf> {
    init_in(&logs_dir())
}

/// Opens the log file under `log_dir`, rotating it first when oversized.
/// Only the first successful call installs the global logger.
pub fn init_in(log_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let threshold = std::env::var(LEVEL_ENV_VAR)
        .ok()
        .and_then(|raw| Level::parse(&raw))
        .unwrap_or(Level::Info);

    let _ = LOGGER.set(Logger {
        sink: Mutex::new(file),
        threshold,
    });

    install_panic_hook();
    Ok(log_path)
}

pub fn debug(message: &str) {
    write_line(Level::Debug, message);
}

pub fn info(message: &str) {
    write_line(Level::Info, message);
}

pub fn warn(message: &str) {
    write_line(Level::Warn, message);
}

pub fn error(message: &str) {
    write_line(Level::Error, message);
}

fn write_line(level: Level, message: &str) {
    let Some(logger) = LOGGER.get().filter(|logger| level >= logger.threshold) else {
        return;
    };
    if let Ok(mut sink) = logger.sink.lock() {
        let line = format_line(now_secs(), level, message);
        let _ = sink.write_all(line.as_bytes()).and_then(|()| sink.flush());
    }
}

fn format_line(ts: u64, level: Level, message: &str) -> String {
    format!("[{ts}] [{}] {message}\n", level.as_str())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> io::Result<()> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => 0,
        Err(error) => return Err(error),
    };
    if size < MAX_LOG_BYTES {
        return Ok(());
    }

    fs::rename(log_path, log_dir.join(format!("{ARCHIVE_PREFIX}{}.log", now_secs())))?;
    prune_archives(log_dir)
}

fn is_archive(file_name: &str) -> bool {
    file_name.starts_with(ARCHIVE_PREFIX) && file_name.ends_with(".log")
}

/// Archive names embed the rotation time, so lexical order is age order.
fn prune_archives(log_dir: &Path) -> io::Result<()> {
    let mut names: Vec<String> = fs::read_dir(log_dir)?
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_archive(name))
        .collect();
    names.sort_unstable();

    while names.len() > MAX_ARCHIVES {
        let oldest = names.remove(0);
        let _ = fs::remove_file(log_dir.join(oldest));
    }
    Ok(())
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let payload = info.payload();
            let message = match (payload.downcast_ref::<&str>(), payload.downcast_ref::<String>()) {
                (Some(text), _) => (*text).to_string(),
                (None, Some(text)) => text.clone(),
                (None, None) => "non-string panic payload".to_string(),
            };
            let site = info.location().map_or_else(
                || "unknown location".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
            error(&format!("panic at {site}: {message}"));
            previous(info);
        }));
    });
}
