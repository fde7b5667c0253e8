use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use super::value::{Array, Key, Value};
use crate::error::AppError;

/// Top-level key holding the server list.
pub const SERVERS: &str = "Servers";

/// What the config generator needs to know about a configuration.
pub trait ConfigSource {
    /// The whole configuration tree, top-level keys in order.
    fn config(&self) -> Array;

    fn server_count(&self) -> usize;

    /// Display name of server `id`; empty when there is no such server.
    fn server_name(&self, id: &Key) -> String;

    /// Default of a persisted key, `NULL` when it has none.
    fn default_value(&self, key: &str) -> Value;

    /// Keys whose defaults are written even when not set, in order.
    fn persist_keys(&self) -> IndexSet<String>;
}

/// A configuration loaded from disk together with its persisted defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    values: Array,
    defaults: IndexMap<String, Value>,
    persist: IndexSet<String>,
}

#[derive(Debug, Deserialize)]
struct DefaultsFile {
    #[serde(default)]
    persist: Vec<String>,
    #[serde(default)]
    defaults: toml::Table,
}

impl ConfigFile {
    /// Wrap a configuration tree; a zero-based `Servers` list is re-keyed
    /// so that server ids start at 1.
    pub fn new(mut values: Array) -> Self {
        if let Some(Value::Array(servers)) = values.get_mut(&Key::from(SERVERS)) {
            let zero_based = servers
                .keys()
                .enumerate()
                .all(|(i, k)| *k == Key::Int(i as i64));
            if zero_based {
                let renumbered: Array = std::mem::take(servers)
                    .into_iter()
                    .enumerate()
                    .map(|(i, (_, server))| (Key::Int(i as i64 + 1), server))
                    .collect();
                *servers = renumbered;
            }
        }
        Self {
            values,
            ..Self::default()
        }
    }

    /// Load a `.json` or `.toml` configuration; the top level must be a table.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let value = if is_json {
            let parsed: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            if !parsed.is_object() {
                return Err(AppError::ConfigError(format!(
                    "{} must contain a table of settings",
                    path.display()
                )));
            }
            Value::from(parsed)
        } else {
            let parsed: toml::Table = toml::from_str(&content).map_err(|e| {
                AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            Value::from(toml::Value::Table(parsed))
        };

        match value {
            Value::Array(values) => Ok(Self::new(values)),
            _ => Err(AppError::ConfigError(format!(
                "{} must contain a table of settings",
                path.display()
            ))),
        }
    }

    /// Read persisted keys and their defaults from a TOML file:
    ///
    /// ```toml
    /// persist = ["DefaultLang", "Servers/1/host"]
    ///
    /// [defaults]
    /// DefaultLang = "en"
    /// "Servers/1/host" = "localhost"
    /// ```
    pub fn load_defaults(&mut self, path: &Path) -> Result<(), AppError> {
        let content = std::fs::read_to_string(path)?;
        let file: DefaultsFile = toml::from_str(&content).map_err(|e| {
            AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        for (key, value) in file.defaults {
            self.set_default(key, Value::from(value));
        }
        for key in file.persist {
            self.persist(key);
        }
        Ok(())
    }

    pub fn set_default(&mut self, key: impl Into<String>, value: Value) {
        self.defaults.insert(key.into(), value);
    }

    pub fn persist(&mut self, key: impl Into<String>) {
        self.persist.insert(key.into());
    }

    /// Look up a `/`-separated path such as `Servers/1/host`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('/');
        let mut current = self.values.get(&Key::from(parts.next()?))?;
        for part in parts {
            current = current.as_array()?.get(&Key::from(part))?;
        }
        Some(current)
    }
}

impl ConfigSource for ConfigFile {
    fn config(&self) -> Array {
        self.values.clone()
    }

    fn server_count(&self) -> usize {
        self.values
            .get(&Key::from(SERVERS))
            .and_then(Value::as_array)
            .map_or(0, |servers| servers.len())
    }

    fn server_name(&self, id: &Key) -> String {
        let id = id.as_string();
        if self.get(&format!("{}/{}", SERVERS, id)).is_none() {
            return String::new();
        }
        let named = |field: &str| {
            self.get(&format!("{}/{}/{}", SERVERS, id, field))
                .filter(|v| !v.is_empty())
                .map(|v| match v {
                    Value::Str(s) => s.clone(),
                    other => other.export(),
                })
        };
        named("verbose")
            .or_else(|| named("host"))
            .unwrap_or_else(|| "localhost".to_string())
    }

    fn default_value(&self, key: &str) -> Value {
        self.defaults.get(key).cloned().unwrap_or(Value::Null)
    }

    fn persist_keys(&self) -> IndexSet<String> {
        self.persist.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_servers_renumbered_from_one() {
        let config = ConfigFile::new(Array::from_iter([(
            Key::from(SERVERS),
            Value::list([
                Value::map([("host", Value::from("db1"))]),
                Value::map([("host", Value::from("db2")), ("verbose", Value::from("Replica"))]),
            ]),
        )]));

        assert_eq!(config.server_count(), 2);
        assert_eq!(config.server_name(&Key::Int(1)), "db1");
        assert_eq!(config.server_name(&Key::Int(2)), "Replica");
        assert_eq!(config.server_name(&Key::Int(3)), "");
        assert_eq!(config.get("Servers/2/host"), Some(&Value::from("db2")));
    }

    #[test]
    fn test_server_without_host_is_localhost() {
        let config = ConfigFile::new(Array::from_iter([(
            Key::from(SERVERS),
            Value::list([Value::map([("host", Value::from(""))])]),
        )]));
        assert_eq!(config.server_name(&Key::Int(1)), "localhost");
    }

    #[test]
    fn test_load_toml_and_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "blowfish_secret = \"abc\"\n\n[[Servers]]\nhost = \"127.0.0.1\"\nport = 3306\n",
        )
        .unwrap();
        let defaults_path = dir.path().join("defaults.toml");
        std::fs::write(
            &defaults_path,
            "persist = [\"DefaultLang\", \"Servers/1/host\"]\n\n[defaults]\nDefaultLang = \"en\"\n",
        )
        .unwrap();

        let mut config = ConfigFile::load(&config_path).unwrap();
        config.load_defaults(&defaults_path).unwrap();

        assert_eq!(config.get("blowfish_secret"), Some(&Value::from("abc")));
        assert_eq!(config.get("Servers/1/port"), Some(&Value::Int(3306)));
        assert_eq!(config.default_value("DefaultLang"), Value::from("en"));
        assert_eq!(config.default_value("Unknown"), Value::Null);
        assert_eq!(
            config.persist_keys().into_iter().collect::<Vec<_>>(),
            vec!["DefaultLang", "Servers/1/host"]
        );
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ShowStats": false, "Servers": {"1": {"host": "h"}}}"#).unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.get("ShowStats"), Some(&Value::Bool(false)));
        assert_eq!(config.server_name(&Key::Int(1)), "h");
    }

    #[test]
    fn test_load_rejects_non_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(ConfigFile::load(&path), Err(AppError::ConfigError(_))));

        std::fs::write(&path, "\"just a string\"").unwrap();
        assert!(matches!(ConfigFile::load(&path), Err(AppError::ConfigError(_))));
    }
}
