use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};
use notion_md::{
  cli::Cli,
  error::require_token,
  output::{format_markdown, write_output},
};
use notion_md_client::{ClientOptions, NotionClient};
use notion_md_config::Config;
use notion_md_render::{CachedSource, Converter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
  cli.apply_to(&mut config);
  config.validate()?;

  let token =
    require_token(&config.token_env, std::env::var(&config.token_env).ok())?;

  convert(&config, &token).await
}

/// Convert the configured page and write it to the configured output.
async fn convert(config: &Config, token: &str) -> Result<()> {
  let client = NotionClient::new(token, ClientOptions {
    api_base:    config.api_base_url()?,
    api_version: config.api_version.clone(),
    page_size:   config.page_size,
  })
  .wrap_err("Failed to create API client")?;
  let source = CachedSource::new(client);
  let converter = Converter::new(&source, config.link_base_url()?);

  let mut markdown = converter
    .convert_page(&config.page_id)
    .await
    .wrap_err_with(|| format!("Failed to convert page {}", config.page_id))?;

  if config.format {
    info!("Formatting... (pass --no-format to skip)");
    markdown = format_markdown(&markdown);
  }

  write_output(&config.output, &markdown).wrap_err_with(|| {
    format!("Failed to write output: {}", config.output.display())
  })?;
  info!("Wrote {}", config.output.display());

  Ok(())
}
