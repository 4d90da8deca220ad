use log::{info, warn};

use super::{Converter, DatabaseOutcome};
use crate::{
  error::NotionError,
  source::collect_children,
  types::{Block, BlockKind, CalloutBlock, CodeBlock, Icon, SyncedBlock},
  utils::{compact_join, prefix_lines, single_line},
};

/// Prefix for children nested under paragraphs and list items.
const NESTED_INDENT: &str = "  ";

impl Converter<'_> {
  /// Render every child of `block_id`, prefixing each line with
  /// `line_prefix`. Sibling chunks are separated by a blank line.
  ///
  /// # Errors
  ///
  /// Propagates fetch failures and partial child blocks.
  pub async fn format_block_children(
    &self,
    block_id: &str,
    line_prefix: &str,
  ) -> Result<String, NotionError> {
    info!("Fetching block children: {block_id}");
    let children = collect_children(self.source, block_id).await?;

    let mut chunks = Vec::with_capacity(children.len());
    for child in &children {
      let chunk = Box::pin(self.format_block(child)).await?;
      chunks.push(prefix_lines(&chunk, line_prefix));
    }

    Ok(chunks.join("\n\n"))
  }

  /// Render a single block, recursing into its children.
  ///
  /// # Errors
  ///
  /// Propagates failures while fetching nested children.
  pub async fn format_block(
    &self,
    block: &Block,
  ) -> Result<String, NotionError> {
    let rendered = match &block.kind {
      BlockKind::Heading1(text) => {
        format!("# {}", self.rich_text(&text.rich_text))
      },
      BlockKind::Heading2(text) => {
        format!("## {}", self.rich_text(&text.rich_text))
      },
      BlockKind::Heading3(text) => {
        format!("### {}", self.rich_text(&text.rich_text))
      },
      BlockKind::Paragraph(text) => {
        let children = self.nested_children(block, NESTED_INDENT).await?;
        compact_join("\n\n", [self.rich_text(&text.rich_text), children])
      },
      BlockKind::BulletedListItem(text) => {
        let children = self.nested_children(block, NESTED_INDENT).await?;
        compact_join("\n\n", [
          format!("- {}", self.rich_text(&text.rich_text)),
          children,
        ])
      },
      BlockKind::NumberedListItem(text) => {
        let children = self.nested_children(block, NESTED_INDENT).await?;
        compact_join("\n\n", [
          format!("1. {}", self.rich_text(&text.rich_text)),
          children,
        ])
      },
      BlockKind::Quote(text) => {
        let children = self.nested_children(block, "> ").await?;
        compact_join("\n\n", [
          format!("> {}", self.rich_text(&text.rich_text)),
          children,
        ])
      },
      BlockKind::Code(code) => self.format_code(block, code).await?,
      BlockKind::Callout(callout) => {
        self.format_callout(block, callout).await?
      },
      BlockKind::Divider => "---".to_owned(),
      BlockKind::Synced(synced) => self.format_synced(block, synced).await?,
      BlockKind::ChildDatabase(database) => {
        match self.format_database(block, database).await {
          DatabaseOutcome::Table(table) => table,
          DatabaseOutcome::Failed(message) => {
            format!(
              "<!-- failed to query database: {} -->",
              single_line(&message)
            )
          },
        }
      },
      BlockKind::Unsupported(kind) => {
        warn!("Unsupported block type {kind}, skipping");
        format!("<!-- unsupported block type: {kind} -->")
      },
    };

    Ok(rendered)
  }

  /// Children of `block`, or an empty string when it has none.
  async fn nested_children(
    &self,
    block: &Block,
    line_prefix: &str,
  ) -> Result<String, NotionError> {
    if !block.has_children {
      return Ok(String::new());
    }
    self.format_block_children(&block.id, line_prefix).await
  }

  async fn format_code(
    &self,
    block: &Block,
    code: &CodeBlock,
  ) -> Result<String, NotionError> {
    let children = self.nested_children(block, "").await?;
    let fenced = compact_join("\n", [
      format!("```{}", code.language),
      self.rich_text(&code.rich_text),
      children,
      "```".to_owned(),
    ]);

    let caption = self.rich_text(&code.caption);
    let aside = if caption.is_empty() {
      String::new()
    } else {
      compact_join("\n", ["<aside>", caption.as_str(), "</aside>"])
    };

    Ok(compact_join("\n\n", [fenced, aside]))
  }

  async fn format_callout(
    &self,
    block: &Block,
    callout: &CalloutBlock,
  ) -> Result<String, NotionError> {
    let emoji = match &callout.icon {
      Some(Icon::Emoji { emoji }) => emoji.as_str(),
      Some(Icon::Other) | None => "",
    };
    let text = self.rich_text(&callout.rich_text);
    let children = self.nested_children(block, "").await?;

    Ok(compact_join("\n\n", [
      "<aside>".to_owned(),
      compact_join(" ", [emoji, text.as_str()]),
      children,
      "</aside>".to_owned(),
    ]))
  }

  /// Synced blocks render their content with no wrapper. Duplicates hold no
  /// content of their own; it lives under the original block.
  async fn format_synced(
    &self,
    block: &Block,
    synced: &SyncedBlock,
  ) -> Result<String, NotionError> {
    let content_id = synced
      .synced_from
      .as_ref()
      .map_or(block.id.as_str(), |from| from.block_id.as_str());
    self.format_block_children(content_id, "").await
  }
}
