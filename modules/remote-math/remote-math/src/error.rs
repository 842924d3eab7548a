//! Startup failure taxonomy

use naming_sdk::RegistryError;

/// Why the server could not publish its object.
///
/// Every variant maps to its own process exit code so a supervisor can tell
/// failures apart without parsing logs.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The remote object could not be constructed or exported.
    #[error("failed to export remote object on {addr}: {source}")]
    Export {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registry at {uri} is unreachable: {reason}")]
    RegistryUnreachable { uri: String, reason: String },

    #[error("registry refused to bind '{name}'")]
    BindRejected {
        name: String,
        #[source]
        source: RegistryError,
    },

    /// The object was published but serving calls failed afterwards.
    #[error("remote object server failed: {0}")]
    Serve(String),
}

impl StartupError {
    /// Classify a registry error raised while publishing `name` at `uri`.
    #[must_use]
    pub fn from_registry(err: RegistryError, uri: &str, name: &str) -> Self {
        match err {
            RegistryError::Unreachable(reason) => Self::RegistryUnreachable {
                uri: uri.to_owned(),
                reason,
            },
            other => Self::BindRejected {
                name: name.to_owned(),
                source: other,
            },
        }
    }

    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Serve(_) => 1,
            Self::RegistryUnreachable { .. } => 2,
            Self::BindRejected { .. } => 3,
            Self::Export { .. } => 4,
            Self::InvalidConfig(_) => 5,
        }
    }

    /// Stable label used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "invalid_config",
            Self::Export { .. } => "export_failed",
            Self::RegistryUnreachable { .. } => "registry_unreachable",
            Self::BindRejected { .. } => "bind_rejected",
            Self::Serve(_) => "serve_failed",
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_registry_classification() {
        let err = StartupError::from_registry(
            RegistryError::Unreachable("connection refused".to_owned()),
            "http://127.0.0.1:1099",
            "Compute",
        );
        assert!(matches!(err, StartupError::RegistryUnreachable { .. }));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("http://127.0.0.1:1099"));
    }

    #[test]
    fn test_collision_classification() {
        let err = StartupError::from_registry(
            RegistryError::AlreadyBound("Compute".to_owned()),
            "http://127.0.0.1:1099",
            "Compute",
        );
        assert!(matches!(
            err,
            StartupError::BindRejected {
                source: RegistryError::AlreadyBound(_),
                ..
            }
        ));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.kind(), "bind_rejected");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            StartupError::InvalidConfig(String::new()),
            StartupError::Export {
                addr: String::new(),
                source: std::io::Error::other("x"),
            },
            StartupError::RegistryUnreachable {
                uri: String::new(),
                reason: String::new(),
            },
            StartupError::BindRejected {
                name: String::new(),
                source: RegistryError::Rejected(String::new()),
            },
            StartupError::Serve(String::new()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(StartupError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }
}
