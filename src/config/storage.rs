//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where sessions are persisted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for YAML session files; in-memory storage when unset
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured directory, ignoring blank values
    pub fn data_dir(&self) -> Option<&PathBuf> {
        self.data_dir
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_dir_means_in_memory() {
        let config = StorageConfig {
            data_dir: Some(PathBuf::new()),
        };
        assert!(config.data_dir().is_none());
        assert!(StorageConfig::default().data_dir().is_none());
    }

    #[test]
    fn test_dir_is_returned() {
        let config = StorageConfig {
            data_dir: Some(PathBuf::from("./data/interviews")),
        };
        assert_eq!(config.data_dir(), Some(&PathBuf::from("./data/interviews")));
    }
}
