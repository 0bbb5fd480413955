use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Presentation tunables. Scale accumulation itself is unclamped regardless
/// of these values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tunables {
    /// Scale change per unit of two-finger spread delta.
    pub scale_step: f32,
    /// Nominal rectangle edge length before scaling.
    pub rect_size: f32,
    /// Outline stroke width.
    pub stroke_width: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            scale_step: 0.01,
            rect_size: 100.0,
            stroke_width: 8.0,
        }
    }
}

fn default_config_text() -> &'static str {
    include_str!("../config/default.toml")
}

pub fn config_dir() -> Result<PathBuf> {
    let dirs = UserDirs::new().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(dirs.home_dir().join(".config").join("gesturepad"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load tunables from the given file, or from the user config (installing
/// the shipped default on first run) when no path is given.
pub fn load(path: Option<&Path>) -> Result<Tunables> {
    match path {
        Some(p) => load_file(p),
        None => {
            let dir = config_dir()?;
            fs::create_dir_all(&dir)?;
            let p = dir.join("config.toml");
            if !p.exists() {
                fs::write(&p, default_config_text())?;
                info!("installed default config at {}", p.display());
            }
            load_file(&p)
        }
    }
}

fn load_file(path: &Path) -> Result<Tunables> {
    let txt =
        fs::read_to_string(path).map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    let tun: Tunables =
        toml::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?;
    validate(&tun)?;
    Ok(tun)
}

fn validate(t: &Tunables) -> Result<()> {
    if !(t.scale_step > 0.0) {
        return Err(anyhow!("scale_step must be positive"));
    }
    if !(t.rect_size > 0.0) {
        return Err(anyhow!("rect_size must be positive"));
    }
    if !(t.stroke_width > 0.0) {
        return Err(anyhow!("stroke_width must be positive"));
    }
    Ok(())
}

pub fn doctor_report() -> serde_json::Value {
    let dev_input_readable = fs::read_dir("/dev/input").is_ok();
    let devices: Vec<String> = crate::input::discover_multitouch()
        .into_iter()
        .map(|d| format!("{} ({})", d.name, d.path))
        .collect();
    serde_json::json!({
        "dev_input_readable": dev_input_readable,
        "input_group_member": check_in_input_group(),
        "config": config_path().map(|p| p.display().to_string()).unwrap_or_default(),
        "devices": devices,
        "hints": {
            "add_user_to_input_group": "sudo usermod -aG input $USER && newgrp input"
        }
    })
}

fn check_in_input_group() -> bool {
    let Ok(groups) = fs::read_to_string("/etc/group") else {
        return false;
    };
    let user = whoami::username();
    groups
        .lines()
        .filter(|line| line.starts_with("input:"))
        .any(|line| {
            line.split(':')
                .nth(3)
                .unwrap_or("")
                .split(',')
                .any(|u| u == user)
        })
}
