use indexmap::IndexMap;
use serde_json::Value;

use super::Converter;
use crate::{error::NotionError, types::Page, utils::compact_join};

impl Converter<'_> {
  /// Render a page: optional front matter, a level-one title heading, then
  /// the body.
  ///
  /// The front matter holds every property except the title and is omitted
  /// when there are none.
  ///
  /// # Errors
  ///
  /// Fails if the page has no title property or its body cannot be fetched.
  pub async fn format_page(&self, page: &Page) -> Result<String, NotionError> {
    let split = page.split_title()?;
    let title = self.rich_text(split.title);

    let front_matter = if split.properties.is_empty() {
      String::new()
    } else {
      let raw: IndexMap<&str, &Value> = split
        .properties
        .iter()
        .map(|(name, property)| (*name, &property.raw))
        .collect();
      format!("---\n{}---\n", serde_yaml::to_string(&raw)?)
    };

    let body = self.format_block_children(&page.id, "").await?;

    let mut document =
      compact_join("\n", [front_matter, format!("# {title}\n"), body]);
    if !document.ends_with('\n') {
      document.push('\n');
    }
    Ok(document)
  }
}
