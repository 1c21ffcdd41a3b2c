//! Runtime environment and storage target selection.
//!
//! # Responsibility
//! - Map the runtime environment flag to one of three fixed storage targets.
//! - Carry the chosen target as an explicit value into db bootstrap.
//!
//! # Invariants
//! - Only exact `production` and `test` flags are recognized; anything else
//!   (including an unset flag) selects development.
//! - The flag is read at most once per `DbConfig::from_env` call and never
//!   cached globally.

use std::fmt::{Display, Formatter};
use std::path::Path;

/// Environment variable holding the runtime environment flag.
pub const ENVIRONMENT_VAR: &str = "COMPANY_ENV";

pub const PRODUCTION_DB_URI: &str = "/var/lib/company-directory/companyDB.sqlite3";
pub const TEST_DB_URI: &str = "companyDBtest.sqlite3";
pub const DEVELOPMENT_DB_URI: &str = "companyDB.sqlite3";
/// Special uri selecting a private in-memory store.
pub const IN_MEMORY_DB_URI: &str = ":memory:";

/// Runtime environment recognized by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Test,
    Development,
}

impl Environment {
    /// Resolves an environment flag by exact equality.
    ///
    /// No trimming or case folding is applied: `"Production"` falls through
    /// to `Development`.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("production") => Self::Production,
            Some("test") => Self::Test,
            _ => Self::Development,
        }
    }

    /// Reads `COMPANY_ENV` from the process environment.
    pub fn from_env() -> Self {
        let flag = std::env::var(ENVIRONMENT_VAR).ok();
        Self::from_flag(flag.as_deref())
    }

    /// Fixed connection target for this environment.
    pub fn db_uri(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_DB_URI,
            Self::Test => TEST_DB_URI,
            Self::Development => DEVELOPMENT_DB_URI,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
            Self::Development => "development",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage connection settings handed to `db::open_db_with_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub environment: Environment,
    pub uri: String,
}

/// Where a `DbConfig` points once interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbTarget<'a> {
    Memory,
    File(&'a Path),
}

impl DbConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            uri: environment.db_uri().to_string(),
        }
    }

    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::for_environment(Environment::from_env())
    }

    /// Test configuration backed by a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self {
            environment: Environment::Test,
            uri: IN_MEMORY_DB_URI.to_string(),
        }
    }

    pub fn target(&self) -> DbTarget<'_> {
        if self.uri == IN_MEMORY_DB_URI {
            DbTarget::Memory
        } else {
            DbTarget::File(Path::new(&self.uri))
        }
    }
}
