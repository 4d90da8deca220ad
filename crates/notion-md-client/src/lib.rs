//! HTTP access to the Notion REST API.
//!
//! [`NotionClient`] implements [`NotionSource`](notion_md_render::NotionSource)
//! on top of `reqwest`. Wrap it in a
//! [`CachedSource`](notion_md_render::CachedSource) to memoize page fetches.
mod client;

pub use client::{
  ClientOptions,
  DEFAULT_API_BASE,
  DEFAULT_API_VERSION,
  NotionClient,
};
