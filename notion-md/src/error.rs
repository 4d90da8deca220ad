use thiserror::Error;

/// Errors raised by the notion-md binary itself. Library failures are
/// reported through their own error types.
#[derive(Debug, Error)]
pub enum AppError {
  #[error(
    "Missing API token: set the {var} environment variable to an integration \
     secret"
  )]
  MissingCredential { var: String },
}

/// Accept the value read from the token variable `var`, rejecting absent or
/// blank tokens.
///
/// # Errors
///
/// Returns [`AppError::MissingCredential`] when `value` is `None` or blank.
pub fn require_token(
  var: &str,
  value: Option<String>,
) -> Result<String, AppError> {
  match value {
    Some(token) if !token.trim().is_empty() => Ok(token),
    _ => {
      Err(AppError::MissingCredential {
        var: var.to_string(),
      })
    },
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn token_is_passed_through() {
    let token = require_token("NOTION_SECRET", Some("secret_abc".to_string()))
      .expect("token present");
    assert_eq!(token, "secret_abc");
  }

  #[test]
  fn absent_or_blank_token_names_the_variable() {
    for value in [None, Some(String::new()), Some("  ".to_string())] {
      let err = require_token("NOTION_SECRET", value).expect_err("no token");
      assert!(err.to_string().contains("NOTION_SECRET"));
    }
  }
}
