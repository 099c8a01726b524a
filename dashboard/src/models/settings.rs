use common::doc_store::DatabaseConfig;
use common::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Capability flags for the mutating command set, one per collection.
/// Collections default to read-only; writes have to be granted
/// explicitly in the settings file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub accounts: AccessLevel,
    pub clients: AccessLevel,
    pub projects: AccessLevel,
    pub expenses: AccessLevel,
    pub earnings: AccessLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Full,
    #[default]
    Read,
}

impl AccessLevel {
    pub fn allows_writes(self) -> bool {
        self == AccessLevel::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_defaults_to_read_only() {
        let access: AccessConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(access.expenses, AccessLevel::Read);
        assert!(!access.expenses.allows_writes());
    }

    #[test]
    fn full_access_parses() {
        let access: AccessConfig =
            serde_json::from_str(r#"{ "expenses": "full", "earnings": "read" }"#).unwrap();
        assert!(access.expenses.allows_writes());
        assert!(!access.earnings.allows_writes());
    }
}
