//! Read-only access to a Notion workspace.
//!
//! [`NotionSource`] is the seam between conversion and transport: the
//! converters only ever talk to this trait, so tests can substitute an
//! in-memory workspace and production wraps the HTTP client in a
//! [`CachedSource`](crate::cache::CachedSource).
use async_trait::async_trait;
use serde_json::Value;

use crate::{
  error::NotionError,
  types::{Block, Database, DatabaseItem, Page},
};

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
  pub results:     Vec<T>,
  /// Cursor for the next request, `None` on the last page.
  pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
  /// A single, final page.
  #[must_use]
  pub const fn last(results: Vec<T>) -> Self {
    Self {
      results,
      next_cursor: None,
    }
  }

  /// Parse a list response, converting each entry with `parse`.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Partial`] if the value is not a list object, or
  /// the first error produced by `parse`.
  pub fn from_value<F>(value: &Value, parse: F) -> Result<Self, NotionError>
  where
    F: Fn(&Value) -> Result<T, NotionError>,
  {
    let Some(results) = value.get("results").and_then(Value::as_array) else {
      return Err(NotionError::partial("list", value));
    };

    let has_more = value
      .get("has_more")
      .and_then(Value::as_bool)
      .unwrap_or(false);
    let next_cursor = value
      .get("next_cursor")
      .and_then(Value::as_str)
      .filter(|_| has_more)
      .map(str::to_owned);

    Ok(Self {
      results: results.iter().map(parse).collect::<Result<_, _>>()?,
      next_cursor,
    })
  }
}

/// The four read-only operations conversion needs from the content host.
#[async_trait]
pub trait NotionSource: Send + Sync {
  /// Fetch a page by identifier.
  async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError>;

  /// List one page of a block's children.
  async fn list_block_children(
    &self,
    block_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<Block>, NotionError>;

  /// Fetch a database schema.
  async fn retrieve_database(
    &self,
    database_id: &str,
  ) -> Result<Database, NotionError>;

  /// Query one page of a database's rows.
  async fn query_database(
    &self,
    database_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<DatabaseItem>, NotionError>;
}

/// Fetch every child of a block, following cursors in order.
///
/// # Errors
///
/// Propagates the first failed page request.
pub async fn collect_children(
  source: &dyn NotionSource,
  block_id: &str,
) -> Result<Vec<Block>, NotionError> {
  let mut children = Vec::new();
  let mut cursor: Option<String> = None;

  loop {
    let page = source
      .list_block_children(block_id, cursor.as_deref())
      .await?;
    children.extend(page.results);
    match page.next_cursor {
      Some(next) => cursor = Some(next),
      None => break,
    }
  }

  Ok(children)
}

/// Fetch every row of a database, following cursors in order.
///
/// # Errors
///
/// Propagates the first failed query.
pub async fn collect_rows(
  source: &dyn NotionSource,
  database_id: &str,
) -> Result<Vec<DatabaseItem>, NotionError> {
  let mut rows = Vec::new();
  let mut cursor: Option<String> = None;

  loop {
    let page = source.query_database(database_id, cursor.as_deref()).await?;
    rows.extend(page.results);
    match page.next_cursor {
      Some(next) => cursor = Some(next),
      None => break,
    }
  }

  Ok(rows)
}
