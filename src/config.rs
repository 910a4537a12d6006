use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

/// Test-run settings: a flat JSON object of keys, with the process
/// environment as fallback on lookup.
///
/// A `Config` is built once and passed to whoever needs it. There is no
/// process-wide cache.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, Value>,
}

impl Config {
    /// An empty config. Lookups fall through to the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config from a JSON file holding a single object.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading config file");
        let text = fs::read_to_string(path)
            .map_err(|err| format!("cannot read config file {}: {}", path.display(), err))?;
        let json = serde_json::from_str(&text)
            .map_err(|err| format!("cannot parse config file {}: {}", path.display(), err))?;
        let config = Self::from_json(&json)?;
        debug!(keys = config.values.len(), "config loaded");
        Ok(config)
    }

    /// Builds a config from an already parsed JSON value.
    pub fn from_json(json: &Value) -> Result<Self, String> {
        let Value::Object(fields) = json else {
            return Err("config must be a JSON object".to_owned());
        };
        Ok(Self {
            values: fields
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    /// Sets one key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Looks a key up, falling back to an environment variable of the same
    /// name.
    pub fn get(&self, key: &str) -> Result<Value, String> {
        if let Some(value) = self.values.get(key) {
            return Ok(value.clone());
        }
        warn!(key, "key not in config, checking the environment");
        match env::var(key) {
            Ok(value) => Ok(Value::String(value)),
            Err(_) => Err(format!(
                "key '{}' not found in config or environment",
                key
            )),
        }
    }

    /// Like [`get`](Self::get), rendered as a string. JSON strings come
    /// back without quotes.
    pub fn get_str(&self, key: &str) -> Result<String, String> {
        match self.get(key)? {
            Value::String(text) => Ok(text),
            other => Ok(other.to_string()),
        }
    }
}
