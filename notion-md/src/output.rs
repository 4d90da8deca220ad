use std::{fs, io, path::Path};

use comrak::{Options, markdown_to_commonmark};
use log::info;

/// Normalize rendered Markdown with comrak's CommonMark renderer.
///
/// Tables and strikethrough are parsed as GFM, and a leading `---` block is
/// kept verbatim as front matter. HTML blocks and comments pass through.
#[must_use]
pub fn format_markdown(markdown: &str) -> String {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.strikethrough = true;
  options.extension.front_matter_delimiter = Some("---".to_owned());

  let formatted = markdown_to_commonmark(markdown, &options);
  if formatted.ends_with('\n') {
    formatted
  } else {
    formatted + "\n"
  }
}

/// Write `markdown` to `path`, creating missing parent directories first.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot be
/// written.
pub fn write_output(path: &Path, markdown: &str) -> io::Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent)?;
    info!("Created directory: {}", parent.display());
  }

  fs::write(path, markdown)
}
