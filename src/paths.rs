//! XDG-compliant path resolution for gideon.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(gideon::paths::no_home),
        help("Set the HOME environment variable, or pass --config with an explicit path.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(gideon::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Directories gideon reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GideonPaths {
    /// `$XDG_CONFIG_HOME/gideon/`
    pub config_dir: PathBuf,
    /// `$XDG_STATE_HOME/gideon/`
    pub state_dir: PathBuf,
}

impl GideonPaths {
    /// Resolve from the process environment.
    pub fn resolve() -> PathResult<Self> {
        Self::resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for environment variables, with the standard
    /// `~/.config` and `~/.local/state` fallbacks.
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> PathResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let home = var("HOME");
        let base = |xdg: &str, fallback: &str| -> PathResult<PathBuf> {
            match var(xdg) {
                Some(dir) => Ok(dir),
                None => home
                    .as_ref()
                    .map(|h| h.join(fallback))
                    .ok_or(PathError::NoHome),
            }
        };

        Ok(Self {
            config_dir: base("XDG_CONFIG_HOME", ".config")?.join("gideon"),
            state_dir: base("XDG_STATE_HOME", ".local/state")?.join("gideon"),
        })
    }

    /// `config_dir/config.toml`
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// `state_dir/lock_state.json`
    pub fn default_lock_file(&self) -> PathBuf {
        self.state_dir.join("lock_state.json")
    }

    /// Create both directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.state_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn falls_back_to_home() {
        let paths = GideonPaths::resolve_with(env(&[("HOME", "/home/a")])).unwrap();
        assert_eq!(paths.config_dir, PathBuf::from("/home/a/.config/gideon"));
        assert_eq!(paths.state_dir, PathBuf::from("/home/a/.local/state/gideon"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/a/.config/gideon/config.toml")
        );
        assert_eq!(
            paths.default_lock_file(),
            PathBuf::from("/home/a/.local/state/gideon/lock_state.json")
        );
    }

    #[test]
    fn xdg_overrides_win() {
        let paths = GideonPaths::resolve_with(env(&[
            ("HOME", "/home/a"),
            ("XDG_CONFIG_HOME", "/cfg"),
            ("XDG_STATE_HOME", "/state"),
        ]))
        .unwrap();
        assert_eq!(paths.config_dir, PathBuf::from("/cfg/gideon"));
        assert_eq!(paths.state_dir, PathBuf::from("/state/gideon"));
    }

    #[test]
    fn no_home_without_xdg() {
        assert!(matches!(
            GideonPaths::resolve_with(env(&[])),
            Err(PathError::NoHome)
        ));
        // Fully specified XDG dirs do not need HOME.
        assert!(
            GideonPaths::resolve_with(env(&[
                ("XDG_CONFIG_HOME", "/cfg"),
                ("XDG_STATE_HOME", "/state"),
            ]))
            .is_ok()
        );
    }

    #[test]
    fn ensure_dirs_creates_both() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = GideonPaths {
            config_dir: tmp.path().join("cfg/gideon"),
            state_dir: tmp.path().join("state/gideon"),
        };
        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();
        assert!(paths.config_dir.is_dir());
        assert!(paths.state_dir.is_dir());
    }
}
