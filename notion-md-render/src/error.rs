use serde_json::Value;
use thiserror::Error;

/// Errors raised while fetching or converting Notion content.
#[derive(Debug, Error)]
pub enum NotionError {
  /// The request never produced a usable response (connection, TLS, decoding).
  #[error("Request error: {0}")]
  Request(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The API answered with a non-success status.
  #[error("API error {status} ({code}): {message}")]
  Api {
    status:  u16,
    code:    String,
    message: String,
  },

  /// A partial reference came back where a full object was required, usually
  /// because the integration lacks access to the referenced object.
  #[error("expected full {object}, received: {dump}")]
  Partial { object: &'static str, dump: String },

  #[error("Unexpected, page has no title property: {0}")]
  MissingTitle(String),

  #[error("Serde error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Front matter error: {0}")]
  FrontMatter(#[from] serde_yaml::Error),
}

impl NotionError {
  /// Build a [`NotionError::Partial`] holding a pretty-printed dump of the
  /// offending value.
  #[must_use]
  pub fn partial(object: &'static str, value: &Value) -> Self {
    let dump = serde_json::to_string_pretty(value)
      .unwrap_or_else(|_| value.to_string());
    Self::Partial { object, dump }
  }

  /// Wrap any transport-level error.
  pub fn request<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Request(Box::new(err))
  }
}
