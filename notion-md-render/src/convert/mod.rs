//! Conversion of a page tree into Markdown.
//!
//! The [`Converter`] walks the tree top-down: page, then blocks, then the
//! rich text and database tables inside them. Every fetch goes through the
//! supplied [`NotionSource`] and siblings are fetched one after another, so
//! the output follows server order exactly.
mod block;
mod database;
mod page;

pub use database::{DatabaseOutcome, format_table};
use url::Url;

use crate::{
  error::NotionError,
  rich_text::format_rich_text,
  source::NotionSource,
  types::RichText,
};

/// Renders pages fetched from a [`NotionSource`].
pub struct Converter<'a> {
  source:    &'a dyn NotionSource,
  link_base: Url,
}

impl<'a> Converter<'a> {
  /// Create a converter resolving relative links against `link_base`.
  #[must_use]
  pub fn new(source: &'a dyn NotionSource, link_base: Url) -> Self {
    Self { source, link_base }
  }

  #[must_use]
  pub const fn link_base(&self) -> &Url {
    &self.link_base
  }

  /// Fetch the page `page_id` and render it as a Markdown document.
  ///
  /// # Errors
  ///
  /// Fails if the page or any block below it cannot be fetched or comes back
  /// as a partial reference. Database failures are rendered inline instead.
  pub async fn convert_page(
    &self,
    page_id: &str,
  ) -> Result<String, NotionError> {
    let page = self.source.retrieve_page(page_id).await?;
    self.format_page(&page).await
  }

  fn rich_text(&self, items: &[RichText]) -> String {
    format_rich_text(items, &self.link_base)
  }
}
