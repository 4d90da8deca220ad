//! Document model for pages, blocks and databases fetched from Notion.
//!
//! Objects arrive as loosely typed JSON. Each `from_value` constructor turns
//! one API object into a closed Rust type, rejecting partial references and
//! keeping unknown kinds around by name so they can be reported later.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::NotionError;

/// Independent style flags of a rich text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Mirrors the API's annotation object"
)]
pub struct Annotations {
  pub bold:          bool,
  pub italic:        bool,
  pub strikethrough: bool,
  pub underline:     bool,
  pub code:          bool,
}

/// A styled span of plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RichText {
  #[serde(default)]
  pub plain_text:  String,
  #[serde(default)]
  pub annotations: Annotations,
  #[serde(default)]
  pub href:        Option<String>,
}

impl RichText {
  /// An unstyled run without a link.
  #[must_use]
  pub fn plain(text: impl Into<String>) -> Self {
    Self {
      plain_text: text.into(),
      ..Default::default()
    }
  }

  #[must_use]
  pub const fn with_annotations(mut self, annotations: Annotations) -> Self {
    self.annotations = annotations;
    self
  }

  #[must_use]
  pub fn with_href(mut self, href: impl Into<String>) -> Self {
    self.href = Some(href.into());
    self
  }
}

/// Payload shared by headings, paragraphs, list items and quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextBlock {
  #[serde(default)]
  pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeBlock {
  #[serde(default)]
  pub rich_text: Vec<RichText>,
  #[serde(default)]
  pub caption:   Vec<RichText>,
  #[serde(default)]
  pub language:  String,
}

/// Callout icon. Only emoji icons have a textual rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
  Emoji {
    emoji: String,
  },
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalloutBlock {
  #[serde(default)]
  pub rich_text: Vec<RichText>,
  #[serde(default)]
  pub icon:      Option<Icon>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncedBlock {
  /// Set on duplicates; points at the original block holding the content.
  #[serde(default)]
  pub synced_from: Option<SyncedFrom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncedFrom {
  pub block_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChildDatabase {
  #[serde(default)]
  pub title: String,
}

/// Kind tag of a block along with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
  Heading1(TextBlock),
  Heading2(TextBlock),
  Heading3(TextBlock),
  Paragraph(TextBlock),
  BulletedListItem(TextBlock),
  NumberedListItem(TextBlock),
  Quote(TextBlock),
  Code(CodeBlock),
  Callout(CalloutBlock),
  Divider,
  Synced(SyncedBlock),
  ChildDatabase(ChildDatabase),
  /// Any kind without a dedicated rendering, kept by its raw name.
  Unsupported(String),
}

/// One node of a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
  pub id:           String,
  pub has_children: bool,
  pub kind:         BlockKind,
}

impl Block {
  /// Parse a block object as returned by the children listing endpoint.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Partial`] when the value has no `type`, and
  /// [`NotionError::Json`] when a known kind carries a malformed payload.
  pub fn from_value(value: &Value) -> Result<Self, NotionError> {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
      return Err(NotionError::partial("block", value));
    };

    let payload = || value.get(kind).cloned().unwrap_or(Value::Null);
    let text = || serde_json::from_value::<TextBlock>(payload());

    let kind = match kind {
      "heading_1" => BlockKind::Heading1(text()?),
      "heading_2" => BlockKind::Heading2(text()?),
      "heading_3" => BlockKind::Heading3(text()?),
      "paragraph" => BlockKind::Paragraph(text()?),
      "bulleted_list_item" => BlockKind::BulletedListItem(text()?),
      "numbered_list_item" => BlockKind::NumberedListItem(text()?),
      "quote" => BlockKind::Quote(text()?),
      "code" => BlockKind::Code(serde_json::from_value(payload())?),
      "callout" => BlockKind::Callout(serde_json::from_value(payload())?),
      "divider" => BlockKind::Divider,
      "synced_block" => BlockKind::Synced(serde_json::from_value(payload())?),
      "child_database" => {
        BlockKind::ChildDatabase(serde_json::from_value(payload())?)
      },
      other => BlockKind::Unsupported(other.to_owned()),
    };

    Ok(Self {
      id: string_field(value, "id"),
      has_children: value
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false),
      kind,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct RelationRef {
  id: String,
}

/// Typed value of a page property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
  Title(Vec<RichText>),
  RichText(Vec<RichText>),
  Select(Option<SelectOption>),
  MultiSelect(Vec<SelectOption>),
  /// Identifiers of the related pages.
  Relation(Vec<String>),
  /// Any other property type, by name.
  Other(String),
}

/// A page property: its typed value plus the JSON it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
  pub value: PropertyValue,
  pub raw:   Value,
}

impl Property {
  /// Parse a property value object.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Json`] when a known property type is malformed.
  pub fn from_value(raw: Value) -> Result<Self, NotionError> {
    let kind = raw.get("type").and_then(Value::as_str).unwrap_or("unknown");
    let payload = || raw.get(kind).cloned().unwrap_or(Value::Null);

    let value = match kind {
      "title" => PropertyValue::Title(serde_json::from_value(payload())?),
      "rich_text" => {
        PropertyValue::RichText(serde_json::from_value(payload())?)
      },
      "select" => PropertyValue::Select(serde_json::from_value(payload())?),
      "multi_select" => {
        PropertyValue::MultiSelect(serde_json::from_value(payload())?)
      },
      "relation" => {
        let refs: Vec<RelationRef> = serde_json::from_value(payload())?;
        PropertyValue::Relation(refs.into_iter().map(|r| r.id).collect())
      },
      other => PropertyValue::Other(other.to_owned()),
    };

    Ok(Self { value, raw })
  }

  #[must_use]
  pub const fn is_title(&self) -> bool {
    matches!(self.value, PropertyValue::Title(_))
  }
}

/// A fully resolved page with its properties in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
  pub id:         String,
  pub properties: IndexMap<String, Property>,
}

/// A page whose title property has been separated from the rest.
#[derive(Debug)]
pub struct SplitPage<'a> {
  pub title:      &'a [RichText],
  pub properties: IndexMap<&'a str, &'a Property>,
}

impl Page {
  /// Parse a page object.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Partial`] for partial page references and
  /// [`NotionError::Json`] for malformed property values.
  pub fn from_value(value: &Value) -> Result<Self, NotionError> {
    let Some(properties) = value
      .get("properties")
      .and_then(Value::as_object)
      .filter(|_| value.get("url").is_some())
    else {
      return Err(NotionError::partial("page", value));
    };

    let properties = properties
      .iter()
      .map(|(name, raw)| Ok((name.clone(), Property::from_value(raw.clone())?)))
      .collect::<Result<IndexMap<_, _>, NotionError>>()?;

    Ok(Self {
      id: string_field(value, "id"),
      properties,
    })
  }

  /// Locate the title property.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::MissingTitle`] if no property is title-typed.
  pub fn title_property(&self) -> Result<(&str, &Property), NotionError> {
    self
      .properties
      .iter()
      .find(|(_, property)| property.is_title())
      .map(|(key, property)| (key.as_str(), property))
      .ok_or_else(|| NotionError::MissingTitle(self.id.clone()))
  }

  /// Split the title runs from the remaining properties.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::MissingTitle`] if no property is title-typed.
  pub fn split_title(&self) -> Result<SplitPage<'_>, NotionError> {
    let (title_key, title) = self.title_property()?;
    let PropertyValue::Title(runs) = &title.value else {
      return Err(NotionError::MissingTitle(self.id.clone()));
    };

    let properties = self
      .properties
      .iter()
      .filter(|(key, _)| key.as_str() != title_key)
      .map(|(key, property)| (key.as_str(), property))
      .collect();

    Ok(SplitPage {
      title: runs,
      properties,
    })
  }
}

/// A column of a database schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
  pub name: String,
  pub kind: String,
}

/// Database schema, columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
  pub id:      String,
  pub title:   String,
  pub columns: Vec<Column>,
}

impl Database {
  /// Parse a database object.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Partial`] if the value lacks a title or schema.
  pub fn from_value(value: &Value) -> Result<Self, NotionError> {
    let (Some(title), Some(properties)) = (
      value.get("title").and_then(Value::as_array),
      value.get("properties").and_then(Value::as_object),
    ) else {
      return Err(NotionError::partial("database", value));
    };

    let title = title
      .iter()
      .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
      .collect();

    let columns = properties
      .iter()
      .map(|(key, column)| {
        Column {
          name: column
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(key.as_str())
            .to_owned(),
          kind: string_field(column, "type"),
        }
      })
      .collect();

    Ok(Self {
      id: string_field(value, "id"),
      title,
      columns,
    })
  }

  /// Column names with the title column first, the rest in schema order.
  #[must_use]
  pub fn ordered_column_names(&self) -> Vec<String> {
    let mut columns: Vec<&Column> = self.columns.iter().collect();
    // stable: ties keep declaration order
    columns.sort_by_key(|column| column.kind != "title");
    columns.into_iter().map(|column| column.name.clone()).collect()
  }
}

/// One result of a database query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseItem {
  Page(Page),
  /// A row returned as a bare reference.
  Partial { id: String },
}

impl DatabaseItem {
  /// Parse a query result, keeping partial rows instead of failing.
  ///
  /// # Errors
  ///
  /// Returns [`NotionError::Json`] when a full row has malformed properties.
  pub fn from_value(value: &Value) -> Result<Self, NotionError> {
    match Page::from_value(value) {
      Ok(page) => Ok(Self::Page(page)),
      Err(NotionError::Partial { .. }) => {
        Ok(Self::Partial {
          id: string_field(value, "id"),
        })
      },
      Err(err) => Err(err),
    }
  }
}

fn string_field(value: &Value, key: &str) -> String {
  value
    .get(key)
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_owned()
}
