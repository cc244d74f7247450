use anyhow::{Context, Result, bail};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub pretty_json: bool,
    /// chrono format string for dates in `ofx show`
    pub date_format: String,
    pub max_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.output.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("output.date_format is not a valid strftime pattern: {}", self.output.date_format);
        }
        Ok(())
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pretty_json: true,
            date_format: "%Y-%m-%d".to_string(),
            max_rows: 50,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// `$HOME/.ofx102`
fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ofx102"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    read_config(&p)
}

pub fn read_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = config_dir()?.join(CONFIG_FILE);
    write_config(&p, cfg)?;
    Ok(p)
}

fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str("[output]\nmax_rows = 5\n").unwrap();
        assert_eq!(cfg.output.max_rows, 5);
        assert!(cfg.output.pretty_json);
        assert_eq!(cfg.output.date_format, "%Y-%m-%d");
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn test_rejects_bad_date_format() {
        let cfg: Config = toml::from_str("[output]\ndate_format = \"%Y %\"\n").unwrap();
        assert!(cfg.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_written_config_reads_back() {
        let dir = std::env::temp_dir().join(format!("ofx102-config-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE);
        let mut cfg = Config::default();
        cfg.output.max_rows = 12;
        cfg.log.filter = "ofx_ingest=debug".to_string();

        write_config(&path, &cfg).unwrap();
        let back = read_config(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(back.output.max_rows, 12);
        assert_eq!(back.log.filter, "ofx_ingest=debug");
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
    }
}
