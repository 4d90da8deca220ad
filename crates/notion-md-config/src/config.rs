use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Largest page size the listing endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for a notion-md run.
///
/// [`Config`] controls which page is converted, where the Markdown lands and
/// how the API is reached. Fields are typically loaded from a TOML or JSON
/// config file, and can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Identifier of the root page to convert.
  pub page_id: String,

  /// File the rendered Markdown is written to.
  pub output: PathBuf,

  /// Whether to normalize the rendered Markdown before writing it.
  pub format: bool,

  /// Base that links without their own host are resolved against.
  pub link_base: String,

  /// Root of the REST API.
  pub api_base: String,

  /// Value sent in the `Notion-Version` header.
  pub api_version: String,

  /// Environment variable holding the integration token.
  pub token_env: String,

  /// Results requested per listing page.
  pub page_size: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      page_id:     "1b1b0b885c0e803d8566fb10e0b5130c".to_string(),
      output:      PathBuf::from("data/guide.md"),
      format:      true,
      link_base:   "https://www.notion.so".to_string(),
      api_base:    "https://api.notion.com/v1/".to_string(),
      api_version: "2022-06-28".to_string(),
      token_env:   "NOTION_SECRET".to_string(),
      page_size:   MAX_PAGE_SIZE,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then apply
  /// `KEY=VALUE` overrides and validate the result.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed, or
  /// the merged configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;
      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, names an
  /// unknown key, or carries a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Set a single field by its configuration key.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "page_id" => self.page_id = value.to_string(),
      "output" => self.output = PathBuf::from(value),
      "format" => self.format = parse_value(key, value)?,
      "link_base" => self.link_base = value.to_string(),
      "api_base" => self.api_base = value.to_string(),
      "api_version" => self.api_version = value.to_string(),
      "token_env" => self.token_env = value.to_string(),
      "page_size" => self.page_size = parse_value(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }
    Ok(())
  }

  /// Merge another config into this one. Fields the other config leaves at
  /// their default keep this config's value.
  pub fn merge(&mut self, other: Self) {
    let defaults = Self::default();

    if other.page_id != defaults.page_id {
      self.page_id = other.page_id;
    }
    if other.output != defaults.output {
      self.output = other.output;
    }
    if other.format != defaults.format {
      self.format = other.format;
    }
    if other.link_base != defaults.link_base {
      self.link_base = other.link_base;
    }
    if other.api_base != defaults.api_base {
      self.api_base = other.api_base;
    }
    if other.api_version != defaults.api_version {
      self.api_version = other.api_version;
    }
    if other.token_env != defaults.token_env {
      self.token_env = other.token_env;
    }
    if other.page_size != defaults.page_size {
      self.page_size = other.page_size;
    }
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    [
      "notion-md.toml",
      "notion-md.json",
      ".notion-md.toml",
      ".notion-md.json",
    ]
    .iter()
    .map(|filename| dir.join(filename))
    .find(|path| path.is_file())
  }

  /// Check field values that cannot be expressed in the type.
  ///
  /// # Errors
  ///
  /// Returns an error describing every invalid field.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.page_id.trim().is_empty() {
      errors.push("page_id must not be empty".to_string());
    }
    if self.token_env.trim().is_empty() {
      errors.push("token_env must not be empty".to_string());
    }
    if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
      errors.push(format!(
        "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
        self.page_size
      ));
    }
    if self.output.as_os_str().is_empty() {
      errors.push("output must not be empty".to_string());
    }
    if let Err(e) = self.link_base_url() {
      errors.push(e.to_string());
    }
    if let Err(e) = self.api_base_url() {
      errors.push(e.to_string());
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Parsed [`Config::link_base`].
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidUrl`] if the value is not an absolute URL.
  pub fn link_base_url(&self) -> Result<Url, ConfigError> {
    Url::parse(&self.link_base).map_err(|source| {
      ConfigError::InvalidUrl {
        key: "link_base",
        source,
      }
    })
  }

  /// Parsed [`Config::api_base`].
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidUrl`] if the value is not an absolute URL.
  pub fn api_base_url(&self) -> Result<Url, ConfigError> {
    Url::parse(&self.api_base).map_err(|source| {
      ConfigError::InvalidUrl {
        key: "api_base",
        source,
      }
    })
  }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  value.parse().map_err(|e| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}' ({e})"))
  })
}
