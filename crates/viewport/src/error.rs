use std::fmt;

/// Why the interactive map surface could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The rendering surface failed to initialize.
    Surface(String),
    /// Marker icon assets failed to load.
    MarkerAssets(String),
    /// The surface reported an error after it was initialized.
    Runtime(String),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Surface(msg) => write!(f, "map surface failed to initialize: {msg}"),
            InitError::MarkerAssets(msg) => write!(f, "marker assets failed to load: {msg}"),
            InitError::Runtime(msg) => write!(f, "map surface error: {msg}"),
        }
    }
}

impl std::error::Error for InitError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}
