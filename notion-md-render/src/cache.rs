//! Memoized page fetches.
//!
//! Relation properties frequently point at the same handful of pages, so
//! [`CachedSource`] keeps every page it has fetched for the lifetime of the
//! conversion. Each identifier owns a [`OnceCell`]; a fetch that is still in
//! flight is awaited rather than repeated. Failed fetches leave the cell
//! empty so a later access retries.
use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use log::debug;
use tokio::sync::OnceCell;

use crate::{
  error::NotionError,
  source::{NotionSource, Paginated},
  types::{Block, Database, DatabaseItem, Page},
};

/// A [`NotionSource`] decorator that fetches each page at most once.
pub struct CachedSource<S> {
  inner: S,
  pages: Mutex<HashMap<String, Arc<OnceCell<Page>>>>,
}

impl<S: NotionSource> CachedSource<S> {
  #[must_use]
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      pages: Mutex::new(HashMap::new()),
    }
  }

  /// The wrapped source.
  #[must_use]
  pub const fn inner(&self) -> &S {
    &self.inner
  }

  /// Number of pages currently held.
  #[must_use]
  pub fn cached_pages(&self) -> usize {
    self
      .pages
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .values()
      .filter(|cell| cell.initialized())
      .count()
  }

  fn page_cell(&self, page_id: &str) -> Arc<OnceCell<Page>> {
    let mut pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(pages.entry(cache_key(page_id)).or_default())
  }
}

/// Identifiers show up both dashed and undashed; both name the same page.
fn cache_key(id: &str) -> String {
  id.chars()
    .filter(|c| *c != '-')
    .flat_map(char::to_lowercase)
    .collect()
}

#[async_trait]
impl<S: NotionSource> NotionSource for CachedSource<S> {
  async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
    let cell = self.page_cell(page_id);
    if cell.initialized() {
      debug!("Page cache hit: {page_id}");
    }

    let page = cell
      .get_or_try_init(|| self.inner.retrieve_page(page_id))
      .await?;
    Ok(page.clone())
  }

  async fn list_block_children(
    &self,
    block_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<Block>, NotionError> {
    self.inner.list_block_children(block_id, start_cursor).await
  }

  async fn retrieve_database(
    &self,
    database_id: &str,
  ) -> Result<Database, NotionError> {
    self.inner.retrieve_database(database_id).await
  }

  async fn query_database(
    &self,
    database_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<DatabaseItem>, NotionError> {
    self.inner.query_database(database_id, start_cursor).await
  }
}

#[cfg(test)]
mod tests {
  use super::cache_key;

  #[test]
  fn dashed_and_plain_ids_share_a_key() {
    assert_eq!(
      cache_key("1b1b0b88-5c0e-803d-8566-fb10e0b5130c"),
      cache_key("1B1B0B885C0E803D8566FB10E0B5130C")
    );
  }
}
