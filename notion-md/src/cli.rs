use std::path::PathBuf;

use clap::Parser;
use notion_md_config::Config;

/// Command line interface for notion-md
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Render a Notion page tree into a single Markdown document"
)]
pub struct Cli {
  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,

  /// Identifier of the page to convert.
  #[arg(long = "page-id")]
  pub page_id: Option<String>,

  /// File to write the Markdown to.
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Write the rendered Markdown without the formatting pass.
  #[arg(long = "no-format")]
  pub no_format: bool,
}

impl Cli {
  /// Parse command line arguments
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Apply the dedicated flags on top of a loaded configuration. These take
  /// precedence over config files and `--config` overrides.
  pub fn apply_to(&self, config: &mut Config) {
    if let Some(page_id) = &self.page_id {
      config.page_id.clone_from(page_id);
    }
    if let Some(output) = &self.output {
      config.output.clone_from(output);
    }
    if self.no_format {
      config.format = false;
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn defaults_leave_config_untouched() {
    let cli = Cli::try_parse_from(["notion-md"]).expect("valid args");
    let mut config = Config::default();
    cli.apply_to(&mut config);
    assert_eq!(config, Config::default());
    assert!(!cli.verbose);
  }

  #[test]
  fn flags_override_config() {
    let cli = Cli::try_parse_from([
      "notion-md",
      "--no-format",
      "--page-id",
      "abc123",
      "-o",
      "out/doc.md",
      "-v",
    ])
    .expect("valid args");

    let mut config = Config::default();
    cli.apply_to(&mut config);
    assert_eq!(config.page_id, "abc123");
    assert_eq!(config.output, PathBuf::from("out/doc.md"));
    assert!(!config.format);
    assert!(cli.verbose);
  }

  #[test]
  fn config_files_and_overrides_accumulate() {
    let cli = Cli::try_parse_from([
      "notion-md",
      "-c",
      "a.toml",
      "--config-file",
      "b.json",
      "--config",
      "page_size=10",
      "--config",
      "format=false",
    ])
    .expect("valid args");

    assert_eq!(cli.config_files, [
      PathBuf::from("a.toml"),
      PathBuf::from("b.json")
    ]);
    assert_eq!(cli.config_overrides, ["page_size=10", "format=false"]);
  }

  #[test]
  fn rejects_subcommands() {
    assert!(Cli::try_parse_from(["notion-md", "html"]).is_err());
  }
}
