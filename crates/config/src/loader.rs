use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::ConfigsmithConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "configsmith.toml",
    "configsmith.yaml",
    "configsmith.yml",
    "configsmith.json",
];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Restrict config discovery to `path`. Each call replaces the previous
/// override.
pub fn set_config_dir(path: PathBuf) {
    *CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(path);
}

/// Restore default discovery.
pub fn clear_config_dir() {
    *CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

fn config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Load config from the given path (any supported format), expanding
/// `${ENV_VAR}` references first.
pub fn load_config(path: &Path) -> anyhow::Result<ConfigsmithConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./configsmith.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/configsmith/configsmith.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `ConfigsmithConfig::default()` when nothing is found or the
/// file found cannot be loaded.
pub fn discover_and_load() -> ConfigsmithConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return ConfigsmithConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        ConfigsmithConfig::default()
    })
}

/// Find the first config file in standard locations.
///
/// With a config dir override only that directory is searched.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return find_in_dir(&dir);
    }
    find_in_dir(Path::new("")).or_else(|| config_dir().and_then(|dir| find_in_dir(&dir)))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: override, or `~/.config/configsmith/`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return Some(dir);
    }
    home_dir().map(|h| h.join(".config").join("configsmith"))
}

/// Returns the data directory: `~/.configsmith/`.
pub fn data_dir() -> PathBuf {
    home_dir()
        .map(|h| h.join(".configsmith"))
        .unwrap_or_else(|| PathBuf::from(".configsmith"))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ConfigsmithConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[rstest]
    #[case("configsmith.toml", "[logging]\nlevel = \"debug\"\njson = true\n")]
    #[case("configsmith.yaml", "logging:\n  level: debug\n  json: true\n")]
    #[case("configsmith.yml", "logging:\n  level: debug\n  json: true\n")]
    #[case("configsmith.json", r#"{"logging": {"level": "debug", "json": true}}"#)]
    fn loads_every_format(#[case] name: &str, #[case] body: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), name, body);
        let config = load_config(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "configsmith.ini", "level=debug");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/configsmith.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/configsmith.toml"));
    }

    #[test]
    fn unset_env_reference_stays_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "configsmith.toml",
            "[store]\npath = \"${CONFIGSMITH_TEST_UNSET_VAR_41}/store.json\"\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("${CONFIGSMITH_TEST_UNSET_VAR_41}/store.json"))
        );
    }

    #[test]
    fn find_in_dir_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "configsmith.json", "{}");
        write(dir.path(), "configsmith.toml", "");
        assert_eq!(
            find_in_dir(dir.path()),
            Some(dir.path().join("configsmith.toml"))
        );
    }

    #[test]
    fn discovery_uses_config_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        set_config_dir(dir.path().to_path_buf());
        assert_eq!(config_dir(), Some(dir.path().to_path_buf()));

        assert!(find_config_file().is_none());
        assert_eq!(discover_and_load(), ConfigsmithConfig::default());

        write(dir.path(), "configsmith.toml", "[logging]\nlevel = \"warn\"\n");
        assert_eq!(
            find_config_file(),
            Some(dir.path().join("configsmith.toml"))
        );
        assert_eq!(discover_and_load().logging.level, "warn");

        // A broken file falls back to defaults.
        write(dir.path(), "configsmith.toml", "[logging\nlevel = ");
        assert_eq!(discover_and_load(), ConfigsmithConfig::default());

        clear_config_dir();
        assert_ne!(config_dir(), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn find_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_in_dir(dir.path()).is_none());
    }
}
