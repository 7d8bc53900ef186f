//! Engine settings parsed from `key=value` arguments

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single engine setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(i32),
    String(String),
}

impl SettingValue {
    /// Integer when the text is a base-10 `i32` literal, otherwise the text itself
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i32>() {
            Ok(num) => SettingValue::Integer(num),
            Err(_) => SettingValue::String(raw.to_string()),
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            SettingValue::Integer(num) => Some(*num),
            SettingValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Integer(_) => None,
            SettingValue::String(s) => Some(s),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Integer(num) => write!(f, "{num}"),
            SettingValue::String(s) => f.write_str(s),
        }
    }
}

/// Settings keyed by name; a repeated key keeps its last value
pub type SettingsMap = BTreeMap<String, SettingValue>;

/// Build a [`SettingsMap`] from raw `key=value` entries.
///
/// Each entry is split on its first `=`. An entry without `=` maps the whole
/// text to an empty string value. This never fails.
pub fn parse_settings<S: AsRef<str>>(entries: &[S]) -> SettingsMap {
    let mut settings = SettingsMap::new();
    for entry in entries {
        let (key, value) = split_setting(entry.as_ref());
        settings.insert(key.to_string(), SettingValue::parse(value));
    }
    settings
}

fn split_setting(entry: &str) -> (&str, &str) {
    entry.split_once('=').unwrap_or((entry, ""))
}
