//! Inline Markdown for rich text runs.
use log::warn;
use url::Url;

use crate::types::RichText;

/// Host that relative links inside a workspace are resolved against.
pub const DEFAULT_LINK_BASE: &str = "https://www.notion.so";

/// Concatenate the formatted runs.
#[must_use]
pub fn format_rich_text(items: &[RichText], link_base: &Url) -> String {
  items
    .iter()
    .map(|item| format_rich_text_item(item, link_base))
    .collect()
}

/// Wrap a single run in its style delimiters.
///
/// Wrappers are applied innermost first in a fixed order: code, bold, italic,
/// strikethrough, underline. A link, if any, wraps the result.
#[must_use]
pub fn format_rich_text_item(item: &RichText, link_base: &Url) -> String {
  let annotations = &item.annotations;
  let mut text = item.plain_text.clone();

  if annotations.code {
    text = format!("`{text}`");
  }
  if annotations.bold {
    text = format!("**{text}**");
  }
  if annotations.italic {
    text = format!("_{text}_");
  }
  if annotations.strikethrough {
    text = format!("~~{text}~~");
  }
  if annotations.underline {
    text = format!("__{text}__");
  }

  if let Some(href) = item.href.as_deref() {
    text = format!("[{text}]({})", resolve_link(href, link_base));
  }

  text
}

/// Resolve `href` against `link_base`; absolute links pass through.
#[must_use]
pub fn resolve_link(href: &str, link_base: &Url) -> String {
  match link_base.join(href) {
    Ok(url) => url.into(),
    Err(e) => {
      warn!("Keeping unresolvable link {href:?}: {e}");
      href.to_owned()
    },
  }
}
