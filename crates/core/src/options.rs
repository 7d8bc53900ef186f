//! The options one invocation runs with

use std::path::PathBuf;

use crate::settings::{SettingsMap, parse_settings};

/// Queue name used when none is given
pub const DEFAULT_QUEUE_NAME: &str = "test-logs";

/// Everything parsed from the command line (and config file) for one run.
///
/// Built once before the run starts and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Discovery only; report test identities without running them
    pub explore: bool,
    /// Concise human readable console output
    pub console: bool,
    /// Selection expression
    pub filter: Option<String>,
    /// File with one test name per line
    pub test_list_file: Option<PathBuf>,
    /// Raw `key=value` engine settings, in the order given
    pub settings: Vec<String>,
    /// TeamCity service message output
    pub teamcity: bool,
    /// Where to write the final result XML
    pub output_file: Option<PathBuf>,
    /// Redis endpoint; enables the queue sink
    pub redis: Option<String>,
    /// Channel the queue sink publishes to
    pub queue_name: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            explore: false,
            console: false,
            filter: None,
            test_list_file: None,
            settings: Vec::new(),
            teamcity: false,
            output_file: None,
            redis: None,
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
        }
    }
}

impl RunOptions {
    /// Engine settings derived from the raw `key=value` list
    pub fn get_settings(&self) -> SettingsMap {
        parse_settings(&self.settings)
    }

    /// The filter expression, treating an empty string as absent
    pub fn filter_expression(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }

    /// The test list path, treating an empty path as absent
    pub fn test_list(&self) -> Option<&PathBuf> {
        self.test_list_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// The redis endpoint, treating an empty string as absent
    pub fn queue_endpoint(&self) -> Option<&str> {
        self.redis.as_deref().filter(|r| !r.is_empty())
    }

    /// The output file, treating an empty path as absent
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingValue;

    #[test]
    fn test_defaults() {
        let options = RunOptions::default();
        assert!(!options.explore);
        assert!(!options.console);
        assert!(!options.teamcity);
        assert_eq!(options.queue_name, "test-logs");
        assert!(options.get_settings().is_empty());
    }

    #[test]
    fn test_get_settings() {
        let options = RunOptions {
            settings: vec!["DefaultTimeout=2000".into(), "Label=nightly".into()],
            ..Default::default()
        };
        let settings = options.get_settings();
        assert_eq!(settings["DefaultTimeout"], SettingValue::Integer(2000));
        assert_eq!(settings["Label"], SettingValue::String("nightly".into()));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let options = RunOptions {
            filter: Some(String::new()),
            test_list_file: Some(PathBuf::new()),
            redis: Some(String::new()),
            output_file: Some(PathBuf::new()),
            ..Default::default()
        };
        assert_eq!(options.filter_expression(), None);
        assert_eq!(options.test_list(), None);
        assert_eq!(options.queue_endpoint(), None);
        assert_eq!(options.output_path(), None);
    }
}
