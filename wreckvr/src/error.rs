use std::fmt;
use std::io;

/// Errors raised while loading persisted locomotion data (config files,
/// comfort profiles, recorded input). The per-frame simulation never fails;
/// it degrades instead.
#[derive(Debug)]
pub enum WreckVrError {
    /// I/O operation failures
    Io {
        operation: String,
        source: io::Error,
    },

    /// Malformed JSON
    Parse {
        what: String,
        source: serde_json::Error,
    },

    /// Well-formed data with a value outside its domain
    Validation { item: String, reason: String },
}

impl WreckVrError {
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        WreckVrError::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        WreckVrError::Parse {
            what: what.into(),
            source,
        }
    }

    pub fn validation(item: impl Into<String>, reason: impl Into<String>) -> Self {
        WreckVrError::Validation {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WreckVrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WreckVrError::Io { operation, source } => {
                write!(f, "I/O error during '{}': {}", operation, source)
            }
            WreckVrError::Parse { what, source } => {
                write!(f, "Failed to parse {}: {}", what, source)
            }
            WreckVrError::Validation { item, reason } => {
                write!(f, "Validation failed for '{}': {}", item, reason)
            }
        }
    }
}

impl std::error::Error for WreckVrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WreckVrError::Io { source, .. } => Some(source),
            WreckVrError::Parse { source, .. } => Some(source),
            WreckVrError::Validation { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WreckVrError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_validation() {
        let err = WreckVrError::validation("snap_turn_angle_degrees", "must be in (0, 90]");
        assert_eq!(
            err.to_string(),
            "Validation failed for 'snap_turn_angle_degrees': must be in (0, 90]"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = WreckVrError::parse("comfort profile", json_err);
        assert!(err.to_string().starts_with("Failed to parse comfort profile"));
        assert!(err.source().is_some());
    }
}
