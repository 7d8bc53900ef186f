use std::path::{Path, PathBuf};
use tracing::debug;

use crate::settings::{SettingValue, SettingsMap};

/// The test binary to load plus the settings the engine applies to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPackage {
    path: PathBuf,
    settings: SettingsMap,
}

impl TestPackage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: SettingsMap::new(),
        }
    }

    pub fn add_setting(&mut self, key: impl Into<String>, value: SettingValue) {
        let key = key.into();
        debug!("Package setting {}={}", key, value);
        self.settings.insert(key, value);
    }

    pub fn with_settings(mut self, settings: SettingsMap) -> Self {
        for (key, value) in settings {
            self.add_setting(key, value);
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the binary, used as the suite name in reports
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }
}
