//! Process-wide configuration, resolved once at startup.
//!
//! The pipeline takes a [`ServerConfig`] by value at construction and never
//! touches the environment afterwards, so tests can inject arbitrary paths.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming the scraping executable.
pub const EXE_PATH_ENV: &str = "SCRAPER_EXE_PATH";
/// Environment variable for the MCP HTTP port.
pub const PORT_ENV: &str = "MCP_PORT";
/// Environment variable bounding concurrent subprocess runs.
pub const MAX_CONCURRENT_ENV: &str = "SCRAPER_MAX_CONCURRENT";

const DEFAULT_EXE_PATH: &str = "bin/scraper";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONCURRENT: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {variable}: {source}")]
    InvalidNumber {
        variable: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("executable path '{0}' has no parent directory")]
    NoParentDir(PathBuf),
    #[error("could not resolve executable path: {0}")]
    Resolve(#[from] std::io::Error),
}

/// Immutable server configuration.
///
/// The working directory for subprocess runs is always the executable's own
/// directory, because the scraping tool resolves its auxiliary resources
/// relative to its install location.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    exe_path: PathBuf,
    exe_dir: PathBuf,
    port: u16,
    max_concurrent_tasks: usize,
}

impl ServerConfig {
    /// Resolve configuration from the environment (after `dotenvy` has run).
    pub fn from_env() -> Result<Self, ConfigError> {
        let exe_path = env::var(EXE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXE_PATH));
        let port = env_number(PORT_ENV, DEFAULT_PORT)?;
        let max_concurrent_tasks = env_number(MAX_CONCURRENT_ENV, DEFAULT_MAX_CONCURRENT)?;
        Self::build(exe_path, port, max_concurrent_tasks)
    }

    /// Build a configuration with explicit values; used by tests and
    /// embedders.
    pub fn new(exe_path: impl Into<PathBuf>, port: u16) -> Result<Self, ConfigError> {
        Self::build(exe_path.into(), port, DEFAULT_MAX_CONCURRENT)
    }

    fn build(
        exe_path: PathBuf,
        port: u16,
        max_concurrent_tasks: usize,
    ) -> Result<Self, ConfigError> {
        let exe_path = std::path::absolute(&exe_path)?;
        let exe_dir = exe_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ConfigError::NoParentDir(exe_path.clone()))?;

        if !exe_path.exists() {
            tracing::warn!(
                path = %exe_path.display(),
                "scraping executable not found at configured path; invocations will fail to start"
            );
        }

        Ok(Self {
            exe_path,
            exe_dir,
            port,
            max_concurrent_tasks: max_concurrent_tasks.max(1),
        })
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    pub fn exe_dir(&self) -> &Path {
        &self.exe_dir
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent_tasks
    }
}

fn env_number<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidNumber {
                variable,
                value: raw.clone(),
                source,
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exe_dir_is_parent_of_exe_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("scraper");
        let config = ServerConfig::new(&exe, 3001).unwrap();
        assert_eq!(config.exe_path(), exe);
        assert_eq!(config.exe_dir(), dir.path());
        assert_eq!(config.port(), 3001);
    }

    #[test]
    fn exe_path_is_made_absolute() {
        let config = ServerConfig::new("bin/scraper", 3001).unwrap();
        assert!(config.exe_path().is_absolute());
        assert!(config.exe_dir().is_absolute());
    }

    #[test]
    fn root_path_has_no_parent() {
        let error = ServerConfig::new("/", 3001).unwrap_err();
        assert!(matches!(error, ConfigError::NoParentDir(_)));
    }
}
