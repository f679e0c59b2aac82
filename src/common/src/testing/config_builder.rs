//! Test configuration builder for creating test setups quickly.

use crate::config::{Configuration, DirectoryConfig, RulesConfig, StorageConfig};
use crate::model::ExceptionList;

/// Builder for creating test configurations.
///
/// Starts from the defaults; every setter replaces one section.
///
/// # Example
///
/// ```rust,ignore
/// use common::testing::TestConfigBuilder;
///
/// let config = TestConfigBuilder::new()
///     .with_storage_dsn("file:///tmp/reports")
///     .with_directory_dsn("file:///tmp/exports")
///     .with_exceptions(["alice"])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: Configuration,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Configuration::default(),
        }
    }

    /// Report storage and directory exports in memory.
    pub fn in_memory(self) -> Self {
        self.with_storage_dsn("memory://")
    }

    pub fn with_storage_dsn(mut self, dsn: &str) -> Self {
        self.config.storage = StorageConfig {
            dsn: dsn.to_string(),
        };
        self
    }

    pub fn with_directory_dsn(mut self, dsn: &str) -> Self {
        self.config.directory = DirectoryConfig {
            dsn: Some(dsn.to_string()),
            ..self.config.directory
        };
        self
    }

    pub fn with_report_prefix(mut self, prefix: &str) -> Self {
        self.config.report.prefix = prefix.to_string();
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn with_exceptions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.exceptions = keys.into_iter().collect::<ExceptionList>();
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
