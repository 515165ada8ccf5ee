use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

pub const CONFIG_ENV_VAR: &str = "RESOLUTION_NORMALIZER_CONFIG";
const CONFIG_DIR_NAME: &str = "resolution-normalizer";
const CONFIG_FILE_NAME: &str = "resolution-normalizer.toml";

/// Defaults applied to any flag not given on the command line.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub input_codec: Option<String>,
    pub output_codec: Option<String>,
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Cli(path) | ConfigSource::Env(path) | ConfigSource::Default(path) => {
                path
            }
        }
    }
}

pub fn load(path_override: Option<&Path>) -> Result<Option<(Config, ConfigSource)>> {
    if let Some(path) = path_override {
        if !path.exists() {
            bail!("Configuration file '{}' does not exist", path.display());
        }
        let cfg = read_config(path)?;
        return Ok(Some((cfg, ConfigSource::Cli(path.to_path_buf()))));
    }

    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            let cfg = read_config(&path)?;
            return Ok(Some((cfg, ConfigSource::Env(path))));
        }
        warn!(
            "{} points at '{}', which does not exist; falling back to default locations",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for candidate in default_config_candidates() {
        if !candidate.exists() {
            continue;
        }
        let cfg = read_config(&candidate)?;
        return Ok(Some((cfg, ConfigSource::Default(candidate))));
    }

    debug!("No configuration file found; using built-in defaults");
    Ok(None)
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Invalid configuration file at {}", path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(contents)?;
    Ok(cfg)
}

fn default_config_candidates() -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    let mut push_unique = |path: PathBuf, out: &mut Vec<PathBuf>| {
        if !path.as_os_str().is_empty() && seen.insert(path.clone()) {
            out.push(path);
        }
    };

    if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME").filter(|val| !val.is_empty()) {
        let mut path = PathBuf::from(xdg_config);
        path.push(CONFIG_DIR_NAME);
        path.push("config.toml");
        push_unique(path, &mut out);
    }

    if let Some(home) = detect_home_dir() {
        let mut path = home.join(".config");
        path.push(CONFIG_DIR_NAME);
        path.push("config.toml");
        push_unique(path, &mut out);

        push_unique(home.join(CONFIG_FILE_NAME), &mut out);
    }

    if let Ok(current_dir) = env::current_dir() {
        push_unique(current_dir.join(CONFIG_FILE_NAME), &mut out);
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(parent) = exe_path.parent() {
            push_unique(parent.join(CONFIG_FILE_NAME), &mut out);
        }
    }

    push_unique(
        PathBuf::from(format!("/etc/{}/config.toml", CONFIG_DIR_NAME)),
        &mut out,
    );

    out
}

fn detect_home_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os("HOME").filter(|val| !val.is_empty()) {
        return Some(PathBuf::from(home));
    }

    #[cfg(unix)]
    {
        use std::ffi::CStr;

        unsafe {
            let uid = libc::getuid();
            let pwd = libc::getpwuid(uid);
            if pwd.is_null() {
                return None;
            }
            let dir_ptr = (*pwd).pw_dir;
            if dir_ptr.is_null() {
                return None;
            }
            if let Ok(path_str) = CStr::from_ptr(dir_ptr).to_str() {
                if !path_str.is_empty() {
                    return Some(PathBuf::from(path_str));
                }
            }
        }
    }

    None
}
