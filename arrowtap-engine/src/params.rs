//! Engine process parameters and their normalization rules.

use std::collections::BTreeMap;

/// String key/value parameters handed to the engine process at open time.
///
/// Two keys receive fixed treatment before the engine sees them, applied by
/// [`ProcessParams::normalized`]:
///
/// - `log_config`: a caller-supplied value is discarded (the engine's
///   file-based logging stays off); when absent the key is inserted with an
///   empty value.
/// - `default_database_version`: defaulted to `"2"` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessParams {
    entries: BTreeMap<String, String>,
}

const LOG_CONFIG: &str = "log_config";
const DEFAULT_DATABASE_VERSION: &str = "default_database_version";

impl ProcessParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one parameter, replacing any previous value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the documented parameter rules.
    ///
    /// A caller-supplied `log_config` is removed; an absent one is inserted
    /// empty. `default_database_version` is inserted as `"2"` when absent
    /// and left alone otherwise.
    pub fn normalized(mut self) -> Self {
        if self.entries.remove(LOG_CONFIG).is_none() {
            self.entries.insert(LOG_CONFIG.to_string(), String::new());
        }
        self.entries
            .entry(DEFAULT_DATABASE_VERSION.to_string())
            .or_insert_with(|| "2".to_string());
        self
    }
}
