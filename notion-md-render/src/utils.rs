//! String helpers shared by the converters.

/// Join the non-empty items with `separator`.
#[must_use]
pub fn compact_join<I, S>(separator: &str, items: I) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  items
    .into_iter()
    .filter(|item| !item.as_ref().is_empty())
    .map(|item| item.as_ref().to_owned())
    .collect::<Vec<_>>()
    .join(separator)
}

/// Prefix every line of `chunk`, blank lines included.
#[must_use]
pub fn prefix_lines(chunk: &str, prefix: &str) -> String {
  if prefix.is_empty() {
    return chunk.to_owned();
  }

  chunk
    .split('\n')
    .map(|line| format!("{prefix}{line}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Collapse a message onto one line so it fits inside an HTML comment.
#[must_use]
pub fn single_line(message: &str) -> String {
  message
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .replace("-->", "-- >")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compact_join_skips_empty_items() {
    assert_eq!(compact_join("\n\n", ["a", "", "b"]), "a\n\nb");
    assert_eq!(compact_join(" ", ["", ""]), "");
  }

  #[test]
  fn prefix_lines_covers_blank_lines() {
    assert_eq!(prefix_lines("a\n\nb", "> "), "> a\n> \n> b");
  }

  #[test]
  fn single_line_flattens_and_defuses_comment_end() {
    assert_eq!(single_line("bad\n  thing --> here"), "bad thing -- > here");
  }
}
