use std::{env, path::PathBuf};

/// Revision used when a registry entry doesn't pin one.
pub const DEFAULT_REF: &str = "main";

/// Directory Chrome reads managed policies from.
///
/// On macOS: /Library/Google/Chrome/policies/managed
/// On Linux: /etc/opt/chrome/policies/managed
/// Elsewhere policies don't live in a directory, so the value is empty.
pub fn default_policy_path() -> String {
    match env::consts::OS {
        "macos" => "/Library/Google/Chrome/policies/managed".to_string(),
        "linux" => "/etc/opt/chrome/policies/managed".to_string(),
        _ => String::new(),
    }
}

/// If the $CRX_CONFIG env variable is set, then $CRX_CONFIG
/// If the $XDG_CONFIG_HOME env variable is set, then $XDG_CONFIG_HOME/crx/config.yaml
/// Otherwise ~/.config/crx/config.yaml
pub fn default_config_file() -> Option<PathBuf> {
    if let Ok(path) = env::var("CRX_CONFIG") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("crx/config.yaml"));
    }

    home::home_dir().map(|home| home.join(".config/crx/config.yaml"))
}
