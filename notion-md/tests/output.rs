#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::fs;

use notion_md::output::{format_markdown, write_output};
use tempfile::tempdir;

const RENDERED: &str = "---
Status:
  id: s
  type: select
---

# Guide

Some ~~old~~ **bold** text

| Name | Status |
| --- | --- |
| Task A | Done |

<!-- unsupported block type: toggle -->
";

#[test]
fn formatting_keeps_front_matter_first() {
  let formatted = format_markdown(RENDERED);
  assert!(formatted.starts_with("---\nStatus:\n"), "got: {formatted}");
  assert!(formatted.contains("# Guide"));
}

#[test]
fn formatting_keeps_tables_and_comments() {
  let formatted = format_markdown(RENDERED);
  assert!(formatted.contains("Task A"));
  assert!(
    formatted
      .lines()
      .filter(|line| line.starts_with('|'))
      .count()
      >= 3,
    "table rows must survive: {formatted}"
  );
  assert!(formatted.contains("<!-- unsupported block type: toggle -->"));
  assert!(formatted.contains("~~old~~"));
  assert!(formatted.ends_with('\n'));
}

#[test]
fn write_output_creates_parent_directories() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let path = temp_dir.path().join("data").join("nested").join("guide.md");

  write_output(&path, "# Guide\n").expect("Failed to write output in test");

  let content =
    fs::read_to_string(&path).expect("Failed to read output in test");
  assert_eq!(content, "# Guide\n");
}

#[test]
fn write_output_replaces_existing_file() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let path = temp_dir.path().join("guide.md");
  fs::write(&path, "stale").expect("Failed to seed file in test");

  write_output(&path, "fresh\n").expect("Failed to write output in test");

  assert_eq!(
    fs::read_to_string(&path).expect("Failed to read output in test"),
    "fresh\n"
  );
}
