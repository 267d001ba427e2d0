//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Json(#[from] serde_json::Error),

    #[error("Missing {0} field for infobook construction")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("config.json"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("config.json"));

        let missing_err = ConfigError::MissingField("base_dir");
        let display = format!("{missing_err}");
        assert_eq!(display, "Missing base_dir field for infobook construction");
    }
}
