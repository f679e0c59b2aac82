use std::path::Path;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ExceptionList;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "agentsweep.toml";

/// Prefix for environment overrides, e.g. `AGENTSWEEP__STORAGE__DSN`.
pub const ENV_PREFIX: &str = "AGENTSWEEP__";

/// Object storage that receives the deletion report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage DSN: `memory://`, `file:///path` or `s3://[key:secret@]host[:port]/bucket`
    pub dsn: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dsn: String::from("file:///.data/agentsweep"),
        }
    }
}

/// Location of the paginated directory exports.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Storage DSN holding the exports. Falls back to `storage.dsn` when unset.
    #[serde(default)]
    pub dsn: Option<String>,
    /// Key prefix of the identity directory export pages
    #[serde(default = "default_identity_prefix")]
    pub identity_prefix: String,
    /// Key prefix of the contact-center export pages and reference catalog
    #[serde(default = "default_contact_prefix")]
    pub contact_prefix: String,
}

fn default_identity_prefix() -> String {
    "identity".to_string()
}

fn default_contact_prefix() -> String {
    "contact".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            identity_prefix: default_identity_prefix(),
            contact_prefix: default_contact_prefix(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Key prefix under which dated reports are written
    #[serde(default = "default_report_prefix")]
    pub prefix: String,
}

fn default_report_prefix() -> String {
    "logs".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            prefix: default_report_prefix(),
        }
    }
}

/// Thresholds of the three deletion rules.
///
/// The rule shapes are fixed; only the day counts and the training marker
/// can be tuned.
///
/// Env: AGENTSWEEP__RULES__<FIELD>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Minimum age of an orphaned contact account before it is flagged.
    ///
    /// Default: 180 days
    #[serde(default = "default_orphan_grace_days")]
    pub orphan_grace_days: i64,

    /// Minimum age of a training account before it is considered.
    ///
    /// Default: 60 days
    #[serde(default = "default_training_min_account_age_days")]
    pub training_min_account_age_days: i64,

    /// Days since the last identity login after which a training account is inactive.
    ///
    /// Default: 30 days
    #[serde(default = "default_training_inactivity_days")]
    pub training_inactivity_days: i64,

    /// Days since the last identity login after which any account is inactive.
    ///
    /// Default: 180 days
    #[serde(default = "default_identity_inactivity_days")]
    pub identity_inactivity_days: i64,

    /// Case-insensitive routing profile substring marking training accounts.
    ///
    /// Default: "nht"
    #[serde(default = "default_training_marker")]
    pub training_marker: String,
}

fn default_orphan_grace_days() -> i64 {
    180
}

fn default_training_min_account_age_days() -> i64 {
    60
}

fn default_training_inactivity_days() -> i64 {
    30
}

fn default_identity_inactivity_days() -> i64 {
    180
}

fn default_training_marker() -> String {
    "nht".to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            orphan_grace_days: default_orphan_grace_days(),
            training_min_account_age_days: default_training_min_account_age_days(),
            training_inactivity_days: default_training_inactivity_days(),
            identity_inactivity_days: default_identity_inactivity_days(),
            training_marker: default_training_marker(),
        }
    }
}

impl RulesConfig {
    /// Validate the rule thresholds.
    ///
    /// Checks:
    /// - Every threshold is positive
    /// - The training marker is not blank
    pub fn validate(&self) -> anyhow::Result<()> {
        let thresholds = [
            ("orphan_grace_days", self.orphan_grace_days),
            (
                "training_min_account_age_days",
                self.training_min_account_age_days,
            ),
            ("training_inactivity_days", self.training_inactivity_days),
            ("identity_inactivity_days", self.identity_inactivity_days),
        ];

        for (name, value) in thresholds {
            if value <= 0 {
                anyhow::bail!("{name} must be positive, got {value}");
            }
        }

        if self.training_marker.trim().is_empty() {
            anyhow::bail!("training_marker cannot be empty");
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Report storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Directory export sources
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Report layout
    #[serde(default)]
    pub report: ReportConfig,
    /// Rule thresholds
    #[serde(default)]
    pub rules: RulesConfig,
    /// Login keys never eligible for deletion
    #[serde(default)]
    pub exceptions: ExceptionList,
}

impl Configuration {
    /// DSN of the store holding the directory exports.
    pub fn directory_dsn(&self) -> &str {
        self.directory.dsn.as_deref().unwrap_or(&self.storage.dsn)
    }

    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(Box::new)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(path).extract().map_err(Box::new)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
