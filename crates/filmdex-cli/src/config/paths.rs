//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory under the config root.
const APP_DIR: &str = "filmdex";

/// Config file name inside the application directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path from the process environment.
///
/// See [`resolve_config_path_with`].
///
/// # Errors
///
/// Returns an error if no config root can be determined.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_config_path_with(dir, |name| std::env::var(name).ok())
}

/// Resolves the config file path, reading variables through `lookup`.
///
/// In order of precedence:
/// 1. `{dir}/config.toml` when `--dir` is given.
/// 2. `$XDG_CONFIG_HOME/filmdex/config.toml` when it is an absolute path.
/// 3. `$HOME/.config/filmdex/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither variable yields a root.
pub fn resolve_config_path_with(
    dir: Option<&PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    // Relative XDG paths are invalid and ignored.
    let xdg = lookup("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute());
    let root = match xdg {
        Some(root) => root,
        None => match lookup("HOME").filter(|h| !h.is_empty()) {
            Some(home) => Path::new(&home).join(".config"),
            None => bail!("neither XDG_CONFIG_HOME nor HOME is set"),
        },
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}
