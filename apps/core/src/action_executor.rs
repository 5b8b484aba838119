use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    EmptyPath,
    MissingPath(PathBuf),
    Spawn(String),
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty path"),
            Self::MissingPath(path) => write!(f, "path does not exist: {}", path.display()),
            Self::Spawn(error) => write!(f, "failed to spawn opener: {error}"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// Asks the OS to open or activate an application. Fire-and-forget: the
/// launched process is never awaited.
pub trait AppOpener: Send {
    fn open(&self, id: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl AppOpener for SystemOpener {
    fn open(&self, id: &str) -> Result<(), LaunchError> {
        let path = validate_launch_path(id)?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("/usr/bin/open")
                .arg(&path)
                .spawn()
                .map_err(|e| LaunchError::Spawn(e.to_string()))?;
        }

        #[cfg(not(target_os = "macos"))]
        {
            let _ = path;
        }

        Ok(())
    }
}

pub fn validate_launch_path(path: &str) -> Result<PathBuf, LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyPath);
    }

    let candidate = Path::new(trimmed);
    if !candidate.exists() {
        return Err(LaunchError::MissingPath(candidate.to_path_buf()));
    }

    Ok(candidate.to_path_buf())
}

/// Remembers every identifier it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|ids| ids.clone()).unwrap_or_default()
    }
}

impl AppOpener for RecordingOpener {
    fn open(&self, id: &str) -> Result<(), LaunchError> {
        if id.trim().is_empty() {
            return Err(LaunchError::EmptyPath);
        }
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(id.to_string());
        }
        Ok(())
    }
}

impl<T: AppOpener + Sync> AppOpener for std::sync::Arc<T> {
    fn open(&self, id: &str) -> Result<(), LaunchError> {
        (**self).open(id)
    }
}
