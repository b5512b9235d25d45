//! Parse a project `.env` file into a key-value map. Application to the
//! process environment happens in `lib.rs` so precedence stays in one place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses one `KEY=VALUE` line; returns `None` for blanks, comments, lines
/// without `=`, and empty keys.
///
/// * An optional `export ` prefix is accepted and dropped.
/// * Double-quoted values support the `\"` escape; single-quoted values are
///   stripped verbatim. `#` inside a value is kept.
/// * No multiline values or line continuations.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim();
    let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    };

    Some((key.to_string(), value))
}

/// Loads `.env` from `override_dir` or the current directory. A missing
/// file yields an empty map; an unreadable one is an error.
pub fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path)?;
    Ok(content.lines().filter_map(parse_line).collect())
}
