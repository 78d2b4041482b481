use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_paisa_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone for localizing receipt timestamps and "today"
    pub timezone: String,
    pub remote: RemoteSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Opt-in; the regex pipeline alone is the default
    pub enabled: bool,
    /// Hosted classifier URL; blank disables the remote stage
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".to_string(),
            remote: RemoteSection {
                enabled: false,
                endpoint: String::new(),
                timeout_secs: 20,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_paisa_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
