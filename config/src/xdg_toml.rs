//! Load the `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// Resolves the config directory: `$XDG_CONFIG_HOME` when set (kept
/// explicit so behavior matches on every platform), else the platform
/// config dir from `dirs`.
fn config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir(),
    }
}

fn xdg_config_path(app_name: &str) -> Option<PathBuf> {
    let path = config_home()?.join(app_name).join("config.toml");
    path.is_file().then_some(path)
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Returns the `[env]` key-value pairs. A missing file, a missing `[env]`
/// section, or an empty one all yield an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = xdg_config_path(app_name) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}
