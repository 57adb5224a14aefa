use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "CPTOOLS_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "~/.config/cptools/config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Name written into solution headers
    pub author: String,

    /// Judge group used when a contest URL omits one
    pub default_group_id: String,

    /// Compiler executable
    pub compiler: String,

    /// Flags passed to the compiler; `-I<dir>` entries double as bundle search paths
    pub compiler_flags: Vec<String>,

    pub cookie_cache_enabled: bool,

    /// -1 = never expire (only refresh on auth failure)
    pub cookie_cache_max_age_hours: i64,

    /// None = auto-detect
    pub preferred_browser: Option<String>,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            author: "Dev".to_string(),
            default_group_id: "yc7Yxny414".to_string(),
            compiler: "g++".to_string(),
            compiler_flags: vec!["-O2".to_string(), "-std=c++17".to_string()],
            cookie_cache_enabled: true,
            cookie_cache_max_age_hours: 24,
            preferred_browser: None,
        }
    }
}

impl Config
{
    /// Fallback include directories taken from `-I` compiler flags, in order.
    ///
    /// Accepts both `-I<dir>` and the split `-I <dir>` form; `~` is expanded.
    pub fn include_dirs(&self) -> Vec<PathBuf>
    {
        let mut dirs = Vec::new();
        let mut flags = self
            .compiler_flags
            .iter();

        while let Some(flag) = flags.next()
        {
            let Some(rest) = flag.strip_prefix("-I")
            else
            {
                continue;
            };

            let dir = if rest.is_empty()
            {
                match flags.next()
                {
                    Some(next) => next.as_str(),
                    None => break,
                }
            }
            else
            {
                rest
            };

            if dir.is_empty()
            {
                continue;
            }

            dirs.push(PathBuf::from(
                shellexpand::tilde(dir).into_owned(),
            ));
        }

        dirs
    }
}

/// Location of the config file (`$CPTOOLS_CONFIG` or `~/.config/cptools/config.json`)
pub fn config_path() -> PathBuf
{
    match std::env::var_os(CONFIG_PATH_ENV)
    {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned()),
    }
}

/// Load the effective configuration from the default location
pub fn load_config() -> Result<Config>
{
    load_config_from(&config_path())
}

/// Defaults, overlaid by the JSON file at `path` (if present), overlaid by
/// `CPTOOLS_*` environment variables.
pub fn load_config_from(path: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    if path.is_file()
    {
        debug!(path = %path.display(), "loading config file");
        builder = builder.add_source(
            config::File::from(path).format(config::FileFormat::Json),
        );
    }

    // CPTOOLS_COMPILER_FLAGS="-O2 -I~/lib" splits on spaces
    builder = builder.add_source(
        config::Environment::with_prefix("CPTOOLS")
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("compiler_flags"),
    );

    let cfg = builder
        .build()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let parsed: Config = cfg
        .try_deserialize()
        .with_context(|| format!("Failed to parse configuration in {}", path.display()))?;

    Ok(parsed)
}

/// Like [`load_config`], but a broken file degrades to defaults with a warning
pub fn load_config_or_default() -> Config
{
    match load_config()
    {
        Ok(cfg) => cfg,
        Err(err) =>
        {
            warn!("{err:#}; using default configuration");
            Config::default()
        }
    }
}

/// Write the default config to `path` unless a file already exists there.
/// Returns true when a file was created.
pub fn ensure_config(path: &Path) -> Result<bool>
{
    if path.exists()
    {
        return Ok(false);
    }

    write_defaults(path)?;
    Ok(true)
}

/// Serialize the defaults to `path`, creating parent directories
pub fn write_defaults(path: &Path) -> Result<()>
{
    if let Some(parent) = path.parent()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?;
    json.push('\n');

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}
