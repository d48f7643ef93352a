//! Configuration lookup for the CLI.

use docsift_processor::{ConfigError, DocsiftConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file, `~/.docsift/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".docsift").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit path must exist. Without one the default file is used when it
/// exists, and built-in defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<DocsiftConfig, ConfigError> {
    if let Some(path) = explicit {
        debug!("Loading configuration from {}", path.display());
        return DocsiftConfig::from_file(path);
    }

    match default_path().filter(|path| path.exists()) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            DocsiftConfig::from_file(&path)
        }
        None => {
            debug!("No configuration file, using defaults");
            Ok(DocsiftConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_path() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(".docsift/config.toml"));
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nenabled = false\n\n[processing]\ntimeout_secs = 30").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.processing.timeout_secs, 30);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load(Some(Path::new("/nonexistent/docsift.toml")));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
