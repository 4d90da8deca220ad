//! # notion-md-render
//!
//! Converts a Notion page tree into a single Markdown document.
//!
//! ```rust,ignore
//! use notion_md_render::{CachedSource, Converter, DEFAULT_LINK_BASE};
//!
//! let source = CachedSource::new(client);
//! let converter = Converter::new(&source, Url::parse(DEFAULT_LINK_BASE)?);
//! let markdown = converter.convert_page("1b1b0b885c0e803d8566fb10e0b5130c").await?;
//! ```
//!
//! ## Rendering
//!
//! - Headings, paragraphs, list items and quotes map to their Markdown forms;
//!   nested children are indented (or quoted) line by line.
//! - Code blocks are fenced with their language; captions and callouts become
//!   `<aside>` blocks.
//! - Synced blocks are transparent.
//! - Embedded databases become pipe tables. A database that cannot be queried
//!   is replaced by a `<!-- failed to query database -->` comment.
//! - Unknown block kinds are replaced by an `<!-- unsupported block type -->`
//!   comment naming the kind.

pub mod cache;
pub mod convert;
pub mod error;
pub mod rich_text;
pub mod source;
pub mod types;
pub mod utils;

pub use crate::{
  cache::CachedSource,
  convert::{Converter, DatabaseOutcome},
  error::NotionError,
  rich_text::{DEFAULT_LINK_BASE, format_rich_text, format_rich_text_item},
  source::{NotionSource, Paginated},
  types::{Block, BlockKind, Database, DatabaseItem, Page, RichText},
};
