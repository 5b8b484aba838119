use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::core_service::{CoreService, ServiceError};
use crate::transport::handle_json;

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Service(ServiceError),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Service(error) => write!(f, "service error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ServiceError> for RuntimeError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub scan_only: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--scan-only" => options.scan_only = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    if let Err(error) = crate::logging::init() {
        eprintln!("[gridlaunch-core] file logging disabled: {error}");
    }

    let config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        eprintln!(
            "[gridlaunch-core] wrote default config to {}",
            config.config_path.display()
        );
    }
    eprintln!(
        "[gridlaunch-core] startup columns={} recent_capacity={} config_path={} history_db_path={}",
        config.columns,
        config.recent_capacity,
        config.config_path.display(),
        config.history_db_path.display(),
    );
    crate::logging::info(&format!(
        "[runtime] startup config_path={}",
        config.config_path.display()
    ));

    let mut service = CoreService::new(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if options.scan_only {
        let indexed = service.rebuild_catalog();
        eprintln!("[gridlaunch-core] scan indexed_items={indexed}");
        writeln!(out, "{}", handle_json(&mut service, r#"{"kind":"snapshot"}"#))?;
        return Ok(());
    }

    service.spawn_rescan();
    eprintln!("[gridlaunch-core] event loop running (json lines on stdin)");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }
        writeln!(out, "{}", handle_json(&mut service, payload))?;
        out.flush()?;
    }

    service.persist_history()?;
    crate::logging::info("[runtime] stdin closed; shutting down");
    Ok(())
}
