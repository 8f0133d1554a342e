// Application state module
// Immutable per-process state shared by every request

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// The trust boundary for all served content
///
/// Always absolute and canonical, so lexical and symlink-resolved paths can
/// be compared against it component by component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDir(PathBuf);

impl RootDir {
    /// Resolve `path` against the working directory and canonicalize it
    ///
    /// Fails if the directory does not exist or is not a directory.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let absolute = std::path::absolute(path.as_ref())?;
        let canonical = absolute.canonicalize()?;
        if !canonical.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("root is not a directory: {}", canonical.display()),
            ));
        }
        Ok(Self(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub root: RootDir,
}

impl AppState {
    pub const fn new(config: Config, root: RootDir) -> Self {
        Self { config, root }
    }

    /// Build state from configuration, resolving `server.root`
    pub fn from_config(config: Config) -> io::Result<Self> {
        let root = RootDir::new(&config.server.root)?;
        Ok(Self::new(config, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("www")).unwrap();

        let root = RootDir::new(dir.path().join("www").join("..").join("www")).unwrap();
        assert_eq!(root.path(), dir.path().join("www").canonicalize().unwrap());
        assert!(root.path().is_absolute());
    }

    #[test]
    fn test_root_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RootDir::new(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let err = RootDir::new(&file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_state_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.root = dir.path().to_string_lossy().into_owned();
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.root.path(), dir.path().canonicalize().unwrap());
    }
}
