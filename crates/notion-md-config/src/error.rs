use thiserror::Error;

/// Error type for notion-md-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Invalid URL for '{key}': {source}")]
  InvalidUrl {
    key:    &'static str,
    #[source]
    source: url::ParseError,
  },
}
