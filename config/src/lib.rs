//! Load configuration from XDG `config.toml` and project `.env`, then apply
//! it to the process environment with priority: **existing env > .env > XDG**.
//!
//! Keys Selah reads downstream: `OPENAI_API_KEY` (credential; absence puts
//! the handler on its fallback path), `SELAH_MODEL` / `OPENAI_MODEL`,
//! `SELAH_TEMPERATURE`, `SELAH_ADDR`, `RUST_LOG`. This crate does not
//! interpret any of them — it only fills the environment once at startup.

mod dotenv;
mod xdg_toml;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// App name used for the XDG path `~/.config/<app>/config.toml`.
pub const APP_NAME: &str = "selah";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Loads the XDG `[env]` table and an optional project `.env`, then sets
/// each key that is **not** already present in the process environment, so
/// existing env always wins.
///
/// Precedence for a key missing from the environment:
/// 1. Project `.env` (current directory, or `override_dir` when given).
/// 2. `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table.
///
/// Missing files are not errors; unreadable or unparsable ones are.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut merged: BTreeMap<String, String> = xdg_map.into_iter().collect();
    merged.extend(dotenv_map); // .env overrides XDG

    for (key, value) in merged {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
        }
    }

    Ok(())
}

/// [`load_and_apply`] with the Selah app name and the current directory.
pub fn load() -> Result<(), LoadError> {
    load_and_apply(APP_NAME, None)
}
