use async_trait::async_trait;
use log::debug;
use notion_md_render::{
  Block,
  Database,
  DatabaseItem,
  NotionError,
  NotionSource,
  Page,
  Paginated,
};
use reqwest::{
  Response,
  header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::{Value, json};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1/";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

const NOTION_VERSION_HEADER: &str = "notion-version";
const USER_AGENT: &str =
  concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`NotionClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
  /// Root of the REST API, e.g. `https://api.notion.com/v1/`.
  pub api_base:    Url,
  /// Value of the `Notion-Version` header.
  pub api_version: String,
  /// Results requested per listing page (the API caps this at 100).
  pub page_size:   u32,
}

/// Authenticated client for the four read-only endpoints conversion needs.
pub struct NotionClient {
  http:      reqwest::Client,
  api_base:  Url,
  page_size: u32,
}

impl NotionClient {
  /// Build a client authenticating with the integration `token`.
  ///
  /// # Errors
  ///
  /// Fails if the token or API version cannot be sent as a header, or the
  /// HTTP client cannot be constructed.
  pub fn new(token: &str, options: ClientOptions) -> Result<Self, NotionError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
      .map_err(NotionError::request)?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
      NOTION_VERSION_HEADER,
      HeaderValue::from_str(&options.api_version)
        .map_err(NotionError::request)?,
    );

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .user_agent(USER_AGENT)
      .build()
      .map_err(NotionError::request)?;

    Ok(Self {
      http,
      api_base: with_trailing_slash(options.api_base),
      page_size: options.page_size,
    })
  }

  fn endpoint(&self, path: &str) -> Result<Url, NotionError> {
    self.api_base.join(path).map_err(NotionError::request)
  }

  fn children_url(
    &self,
    block_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Url, NotionError> {
    let mut url = self.endpoint(&format!("blocks/{block_id}/children"))?;
    {
      let mut query = url.query_pairs_mut();
      query.append_pair("page_size", &self.page_size.to_string());
      if let Some(cursor) = start_cursor {
        query.append_pair("start_cursor", cursor);
      }
    }
    Ok(url)
  }

  fn query_body(&self, start_cursor: Option<&str>) -> Value {
    let mut body = json!({ "page_size": self.page_size });
    if let Some(cursor) = start_cursor {
      body["start_cursor"] = json!(cursor);
    }
    body
  }

  async fn get(&self, url: Url) -> Result<Value, NotionError> {
    debug!("GET {url}");
    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(NotionError::request)?;
    read_json(response).await
  }

  async fn post(&self, url: Url, body: &Value) -> Result<Value, NotionError> {
    debug!("POST {url}");
    let response = self
      .http
      .post(url)
      .json(body)
      .send()
      .await
      .map_err(NotionError::request)?;
    read_json(response).await
  }
}

#[async_trait]
impl NotionSource for NotionClient {
  async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
    let value = self.get(self.endpoint(&format!("pages/{page_id}"))?).await?;
    Page::from_value(&value)
  }

  async fn list_block_children(
    &self,
    block_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<Block>, NotionError> {
    let value = self.get(self.children_url(block_id, start_cursor)?).await?;
    Paginated::from_value(&value, Block::from_value)
  }

  async fn retrieve_database(
    &self,
    database_id: &str,
  ) -> Result<Database, NotionError> {
    let url = self.endpoint(&format!("databases/{database_id}"))?;
    Database::from_value(&self.get(url).await?)
  }

  async fn query_database(
    &self,
    database_id: &str,
    start_cursor: Option<&str>,
  ) -> Result<Paginated<DatabaseItem>, NotionError> {
    let url = self.endpoint(&format!("databases/{database_id}/query"))?;
    let value = self.post(url, &self.query_body(start_cursor)).await?;
    Paginated::from_value(&value, DatabaseItem::from_value)
  }
}

async fn read_json(response: Response) -> Result<Value, NotionError> {
  let status = response.status();
  if status.is_success() {
    return response.json().await.map_err(NotionError::request);
  }

  let body = response.text().await.unwrap_or_default();
  Err(api_error(status.as_u16(), &body))
}

/// Map an error response, preferring the `code` and `message` fields of the
/// JSON error object.
fn api_error(status: u16, body: &str) -> NotionError {
  let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
  let field = |key: &str| {
    parsed.get(key).and_then(Value::as_str).map(str::to_owned)
  };

  NotionError::Api {
    status,
    code: field("code").unwrap_or_else(|| "unknown".to_owned()),
    message: field("message").unwrap_or_else(|| body.trim().to_owned()),
  }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  url
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  fn client(api_base: &str) -> NotionClient {
    NotionClient::new("secret_test", ClientOptions {
      api_base:    Url::parse(api_base).expect("valid base"),
      api_version: DEFAULT_API_VERSION.to_string(),
      page_size:   100,
    })
    .expect("client should build")
  }

  #[test]
  fn endpoints_extend_the_versioned_base() {
    let client = client(DEFAULT_API_BASE);
    assert_eq!(
      client.endpoint("pages/abc").expect("url").as_str(),
      "https://api.notion.com/v1/pages/abc"
    );
  }

  #[test]
  fn base_without_trailing_slash_keeps_its_version() {
    let client = client("https://api.notion.com/v1");
    assert_eq!(
      client.endpoint("databases/d1/query").expect("url").as_str(),
      "https://api.notion.com/v1/databases/d1/query"
    );
  }

  #[test]
  fn children_url_carries_page_size_and_cursor() {
    let client = client(DEFAULT_API_BASE);
    assert_eq!(
      client.children_url("b1", None).expect("url").as_str(),
      "https://api.notion.com/v1/blocks/b1/children?page_size=100"
    );
    assert_eq!(
      client.children_url("b1", Some("c2")).expect("url").as_str(),
      "https://api.notion.com/v1/blocks/b1/children?page_size=100&start_cursor=c2"
    );
  }

  #[test]
  fn query_body_only_sends_cursor_when_paging() {
    let client = client(DEFAULT_API_BASE);
    assert_eq!(client.query_body(None), json!({ "page_size": 100 }));
    assert_eq!(
      client.query_body(Some("next")),
      json!({ "page_size": 100, "start_cursor": "next" })
    );
  }

  #[test]
  fn api_errors_use_the_json_error_object() {
    let err = api_error(
      400,
      r#"{"object":"error","status":400,"code":"validation_error","message":"Database is a linked view"}"#,
    );
    assert_eq!(
      err.to_string(),
      "API error 400 (validation_error): Database is a linked view"
    );
  }

  #[test]
  fn api_errors_fall_back_to_the_raw_body() {
    let err = api_error(502, "  Bad Gateway\n");
    assert_eq!(err.to_string(), "API error 502 (unknown): Bad Gateway");
  }
}
