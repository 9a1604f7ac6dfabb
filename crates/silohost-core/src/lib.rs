#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};

mod time;

pub use time::unix_millis;

pub const CRATE_NAME: &str = "silohost-core";

pub const ENV_SILOHOST_LOG_LEVEL: &str = "SILOHOST_LOG_LEVEL";
pub const ENV_SILOHOST_DB_PATH: &str = "SILOHOST_DB_PATH";
pub const ENV_SILOHOST_ROOT_DOMAIN: &str = "SILOHOST_ROOT_DOMAIN";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
