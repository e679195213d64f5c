use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy of the engine. Every variant carries the identifier or
/// path at fault plus a one-line message; stack traces are not part of the
/// contract.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed input document {path}: {source}")]
    InputMalformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("unable to write report to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value at {id}: {message}")]
    Parse { id: String, message: String },

    #[error("reference to unknown {kind} {referenced} from {referencing}")]
    DanglingReference {
        kind: &'static str,
        referenced: String,
        referencing: String,
    },

    #[error("duplicate id {id}")]
    DuplicateId { id: String },

    #[error("configuration error for {subject}: {message}")]
    Config { subject: String, message: String },

    #[error("orphaned risk tracking entry {synthetic_id} matches no generated risk")]
    OrphanedRiskTracking { synthetic_id: String },

    #[error("plugin {name} failed: {message}")]
    Plugin { name: String, message: String },

    #[error("internal invariant violated for {id}: {message}")]
    Internal { id: String, message: String },
}

impl Error {
    /// Process exit code mapping: 1 input/parse, 2 fatal orphaned tracking,
    /// 3 plugin configuration.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InputRead { .. }
            | Error::InputMalformed { .. }
            | Error::OutputWrite { .. }
            | Error::Parse { .. }
            | Error::DanglingReference { .. }
            | Error::DuplicateId { .. }
            | Error::Internal { .. } => 1,
            Error::OrphanedRiskTracking { .. } => 2,
            Error::Config { .. } | Error::Plugin { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn exit_codes_follow_the_contract() {
        let parse = Error::Parse {
            id: "some-asset".to_string(),
            message: "unknown technology".to_string(),
        };
        assert_eq!(parse.exit_code(), 1);

        let tracking = Error::OrphanedRiskTracking {
            synthetic_id: "missing-rule@x".to_string(),
        };
        assert_eq!(tracking.exit_code(), 2);

        let config = Error::Config {
            subject: "my-plugin".to_string(),
            message: "rule id collision".to_string(),
        };
        assert_eq!(config.exit_code(), 3);
    }
}
