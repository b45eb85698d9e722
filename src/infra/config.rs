use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::related::DEFAULT_RELATED_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config
{
    /// Directory holding the category JSON datasets
    pub data_dir: PathBuf,

    /// Optional directory of Markdown spot articles
    pub articles_dir: Option<PathBuf>,

    /// Drop draft records when loading
    pub published_only: bool,

    /// Controlled tag vocabulary used by the validator
    pub tags: Vec<String>,

    /// Default list settings
    pub list: ListConfig,

    /// Default cap on related items
    pub related_limit: usize,

    /// Default cap for the latest view
    pub latest_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig
{
    pub sort: String,
    pub limit: Option<usize>,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            data_dir: PathBuf::from("data"),
            articles_dir: None,
            published_only: true,
            tags: [
                "廃墟",
                "トンネル",
                "湖",
                "山",
                "森",
                "学校",
                "病院",
                "神社",
                "橋",
                "都市伝説",
                "儀式",
                "人形",
                "鏡",
                "電話",
                "インターネット",
                "目撃",
                "飛行",
                "水棲",
                "巨大生物",
                "写真",
                "夜",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            list: ListConfig { sort: "recommend".to_string(), limit: None },
            related_limit: DEFAULT_RELATED_LIMIT,
            latest_limit: 6,
        }
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["kaidex.toml", "kaidex.yaml", "kaidex.json", ".kaidex.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with KAIDEX_ prefix
    builder = builder.add_source(config::Environment::with_prefix("KAIDEX").separator("_"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let mut parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    // Tolerate ~ and $VAR in user-authored paths
    parsed.data_dir = expand_path(&parsed.data_dir.to_string_lossy())?;
    if let Some(dir) = &parsed.articles_dir
    {
        parsed.articles_dir = Some(expand_path(&dir.to_string_lossy())?);
    }

    Ok(parsed)
}

/// Expand ~ and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf>
{
    let expanded = shellexpand::full(raw).with_context(|| format!("Failed to expand {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("kaidex.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn default_vocabulary_covers_the_seed_datasets()
    {
        let config = Config::default();
        for tag in ["廃墟", "都市伝説", "目撃"]
        {
            assert!(config.tags.iter().any(|t| t == tag), "missing {tag}");
        }
    }

    #[test]
    fn default_config_round_trips_through_toml()
    {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.data_dir, config.data_dir);
        assert_eq!(back.tags, config.tags);
        assert_eq!(back.related_limit, DEFAULT_RELATED_LIMIT);
    }
}
