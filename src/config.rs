use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

/// Built-in settings. `config.json` next to the binary may override them for a
/// deployment whose sensor log lives elsewhere; the window offers no settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub csv_path: String,
    pub geo_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: "dht_data.csv".to_string(),
            geo_timeout_secs: 3,
        }
    }
}

impl Config {
    pub fn geo_timeout(&self) -> Duration {
        Duration::from_secs(self.geo_timeout_secs)
    }
}

pub fn load_config() -> Config {
    load_config_from(CONFIG_FILE)
}

/// Missing file means defaults; a broken file is logged and also means defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            info!("No config at '{}', using built-in defaults.", path.display());
            return Config::default();
        }
    };
    match serde_json::from_str::<Config>(&content) {
        Ok(config) => {
            info!("Loaded config from '{}'.", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring unparseable config '{}': {}", path.display(), e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.geo_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"csv_path": "/var/log/dht.csv"}}"#).unwrap();
        let config = load_config_from(file.path());
        assert_eq!(config.csv_path, "/var/log/dht.csv");
        assert_eq!(config.geo_timeout_secs, 3);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"window_title": "Mine", "geo_url": "http://example.invalid"}}"#).unwrap();
        assert_eq!(load_config_from(file.path()), Config::default());
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert_eq!(load_config_from(file.path()), Config::default());
    }
}
