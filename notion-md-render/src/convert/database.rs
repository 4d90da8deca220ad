use indexmap::IndexMap;
use log::{info, warn};

use super::Converter;
use crate::{
  error::NotionError,
  source::collect_rows,
  types::{Block, ChildDatabase, DatabaseItem, Page, Property, PropertyValue},
};

/// Result of rendering an embedded database.
///
/// Linked views of a database defined elsewhere cannot be queried through the
/// API, and there is no way to tell them apart from a broken reference other
/// than trying. Either way the failure stays local to the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseOutcome {
  Table(String),
  Failed(String),
}

impl Converter<'_> {
  /// Render the database referenced by `block` as a pipe table.
  pub async fn format_database(
    &self,
    block: &Block,
    database: &ChildDatabase,
  ) -> DatabaseOutcome {
    info!("Querying database: {}", database.title);

    match self.database_table(&block.id).await {
      Ok(table) => DatabaseOutcome::Table(table),
      Err(e) => {
        warn!("Failed to query database: {e}");
        DatabaseOutcome::Failed(e.to_string())
      },
    }
  }

  async fn database_table(
    &self,
    database_id: &str,
  ) -> Result<String, NotionError> {
    let database = self.source.retrieve_database(database_id).await?;
    let columns = database.ordered_column_names();

    let mut rows = Vec::new();
    for item in collect_rows(self.source, database_id).await? {
      match item {
        DatabaseItem::Page(page) => rows.push(self.flatten_row(&page).await?),
        DatabaseItem::Partial { id } => {
          warn!("Unsupported database item: {id}");
        },
      }
    }

    Ok(format_table(&columns, &rows))
  }

  /// Flatten every property of a database row to a string.
  ///
  /// # Errors
  ///
  /// Fails if a related page cannot be fetched.
  pub async fn flatten_row(
    &self,
    page: &Page,
  ) -> Result<IndexMap<String, String>, NotionError> {
    let mut row = IndexMap::with_capacity(page.properties.len());
    for (name, property) in &page.properties {
      row.insert(name.clone(), self.flatten_property(property).await?);
    }
    Ok(row)
  }

  /// Flatten one property value to the text shown in a table cell.
  ///
  /// Relations are resolved to the titles of the pages they point at. Types
  /// without a textual form fall back to their raw JSON.
  ///
  /// # Errors
  ///
  /// Fails if a related page cannot be fetched or has no title.
  pub async fn flatten_property(
    &self,
    property: &Property,
  ) -> Result<String, NotionError> {
    let flattened = match &property.value {
      PropertyValue::Title(runs) | PropertyValue::RichText(runs) => {
        self.rich_text(runs)
      },
      PropertyValue::Select(option) => {
        option.as_ref().map(|o| o.name.clone()).unwrap_or_default()
      },
      PropertyValue::MultiSelect(options) => {
        options
          .iter()
          .map(|o| o.name.as_str())
          .collect::<Vec<_>>()
          .join(", ")
      },
      PropertyValue::Relation(ids) => {
        let mut titles = Vec::with_capacity(ids.len());
        for id in ids {
          let related = self.source.retrieve_page(id).await?;
          titles.push(self.rich_text(related.split_title()?.title));
        }
        titles.join(", ")
      },
      PropertyValue::Other(kind) => {
        warn!("Unsupported database property: {kind}");
        serde_json::to_string(&property.raw)?
      },
    };

    Ok(flattened)
  }
}

/// Render a Markdown pipe table. Cells missing from a row render empty.
#[must_use]
pub fn format_table(
  columns: &[String],
  rows: &[IndexMap<String, String>],
) -> String {
  let mut lines = Vec::with_capacity(rows.len() + 2);
  lines.push(table_line(columns.iter().map(String::as_str)));
  lines.push(table_line(columns.iter().map(|_| "---")));

  for row in rows {
    let cells: Vec<String> = columns
      .iter()
      .map(|column| row.get(column).map_or_else(String::new, |c| escape_cell(c)))
      .collect();
    lines.push(table_line(cells.iter().map(String::as_str)));
  }

  lines.join("\n")
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
  format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

/// Keep a cell on one table row.
fn escape_cell(cell: &str) -> String {
  cell.replace('|', "\\|").replace('\n', "<br>")
}
