#![allow(dead_code, reason = "Not every test binary uses every helper")]
#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{
  collections::{HashMap, HashSet},
  sync::Mutex,
};

use async_trait::async_trait;
use notion_md_render::{
  Block,
  Database,
  DatabaseItem,
  NotionError,
  NotionSource,
  Page,
  Paginated,
};
use serde_json::{Value, json};
use url::Url;

pub fn link_base() -> Url {
  Url::parse(notion_md_render::DEFAULT_LINK_BASE).expect("valid link base")
}

/// An in-memory workspace that records every request it serves.
#[derive(Default)]
pub struct FakeWorkspace {
  pages:            HashMap<String, Value>,
  children:         HashMap<String, Vec<Vec<Value>>>,
  databases:        HashMap<String, Value>,
  rows:             HashMap<String, Vec<Vec<Value>>>,
  failing_queries:  HashSet<String>,
  page_fetches:     Mutex<Vec<String>>,
  children_fetches: Mutex<Vec<String>>,
}

impl FakeWorkspace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_page(mut self, page: Value) -> Self {
    let id = page["id"].as_str().expect("page id").to_string();
    self.pages.insert(id, page);
    self
  }

  /// Children of `block_id`, served as a single listing page.
  pub fn with_children(self, block_id: &str, children: Vec<Value>) -> Self {
    self.with_paged_children(block_id, vec![children])
  }

  /// Children of `block_id`, served across several listing pages.
  pub fn with_paged_children(
    mut self,
    block_id: &str,
    pages: Vec<Vec<Value>>,
  ) -> Self {
    self.children.insert(block_id.to_string(), pages);
    self
  }

  pub fn with_database(
    mut self,
    database: Value,
    row_pages: Vec<Vec<Value>>,
  ) -> Self {
    let id = database["id"].as_str().expect("database id").to_string();
    self.rows.insert(id.clone(), row_pages);
    self.databases.insert(id, database);
    self
  }

  /// A database that exists in the schema but rejects queries, like a linked
  /// view.
  pub fn with_unqueryable_database(mut self, database: Value) -> Self {
    let id = database["id"].as_str().expect("database id").to_string();
    self.failing_queries.insert(id.clone());
    self.databases.insert(id, database);
    self
  }

  pub fn page_fetches(&self, page_id: &str) -> usize {
    self
      .page_fetches
      .lock()
      .expect("lock")
      .iter()
      .filter(|id| *id == page_id)
      .count()
  }

  pub fn children_fetches(&self) -> Vec<String> {
    self.children_fetches.lock().expect("lock").clone()
  }
}

fn not_found(id: &str) -> NotionError {
  NotionError::Api {
    status:  404,
    code:    "object_not_found".to_string(),
    message: format!("Could not find object with ID: {id}."),
  }
}

fn cursor_page<T>(
  pages: &[Vec<Value>],
  start_cursor: Option<&str>,
  parse: impl Fn(&Value) -> Result<T, NotionError>,
) -> Result<Paginated<T>, NotionError> {
  let index: usize = start_cursor.map_or(0, |c| c.parse().expect("cursor"));
  let results = pages
    .get(index)
    .map(|page| page.iter().map(parse).collect::<Result<Vec<_>, _>>())
    .transpose()?
    .unwrap_or_default();
  let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());
  Ok(Paginated {
    results,
    next_cursor,
  })
}

#[async_trait]
impl NotionSource for FakeWorkspace {
  async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
    self
      .page_fetches
      .lock()
      .expect("lock")
      .push(page_id.to_string());
    let page = self.pages.get(page_id).ok_or_else(|| not_found(page_id))?;
    Page::from_value(page)
  }

  async fn list_block_children(
    &self,
    block_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<Block>, NotionError> {
    self
      .children_fetches
      .lock()
      .expect("lock")
      .push(block_id.to_string());
    let pages = self.children.get(block_id).map_or(&[][..], Vec::as_slice);
    cursor_page(pages, start_cursor, Block::from_value)
  }

  async fn retrieve_database(
    &self,
    database_id: &str,
  ) -> Result<Database, NotionError> {
    let database = self
      .databases
      .get(database_id)
      .ok_or_else(|| not_found(database_id))?;
    Database::from_value(database)
  }

  async fn query_database(
    &self,
    database_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<DatabaseItem>, NotionError> {
    if self.failing_queries.contains(database_id) {
      return Err(NotionError::Api {
        status:  400,
        code:    "validation_error".to_string(),
        message: "Database is a linked view".to_string(),
      });
    }
    let pages = self.rows.get(database_id).map_or(&[][..], Vec::as_slice);
    cursor_page(pages, start_cursor, DatabaseItem::from_value)
  }
}

pub fn text(content: &str) -> Value {
  json!({
    "type": "text",
    "text": { "content": content, "link": null },
    "plain_text": content,
    "annotations": {
      "bold": false,
      "italic": false,
      "strikethrough": false,
      "underline": false,
      "code": false,
      "color": "default"
    },
    "href": null
  })
}

pub fn block(id: &str, kind: &str, payload: Value, has_children: bool) -> Value {
  json!({
    "object": "block",
    "id": id,
    "type": kind,
    "has_children": has_children,
    kind: payload
  })
}

pub fn text_block(id: &str, kind: &str, content: &str) -> Value {
  block(id, kind, json!({ "rich_text": [text(content)] }), false)
}

pub fn parent_block(id: &str, kind: &str, content: &str) -> Value {
  block(id, kind, json!({ "rich_text": [text(content)] }), true)
}

pub fn title_property(title: &str) -> Value {
  json!({ "id": "title", "type": "title", "title": [text(title)] })
}

/// A full page whose only property is its title.
pub fn page(id: &str, title: &str) -> Value {
  page_with(id, &[("Name", title_property(title))])
}

pub fn page_with(id: &str, properties: &[(&str, Value)]) -> Value {
  let properties: serde_json::Map<String, Value> = properties
    .iter()
    .map(|(name, value)| ((*name).to_string(), value.clone()))
    .collect();
  json!({
    "object": "page",
    "id": id,
    "url": format!("https://www.notion.so/{id}"),
    "properties": properties
  })
}

pub fn database(id: &str, title: &str, columns: &[(&str, &str)]) -> Value {
  let properties: serde_json::Map<String, Value> = columns
    .iter()
    .map(|(name, kind)| {
      ((*name).to_string(), json!({ "id": name, "name": name, "type": kind }))
    })
    .collect();
  json!({
    "object": "database",
    "id": id,
    "title": [text(title)],
    "properties": properties
  })
}
