use std::path::PathBuf;

use mpvscript_client::{HostError, PropertyFormat};
use mpvscript_events::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid property format code {0}, expected 1..=6")]
    InvalidFormat(i64),

    #[error("value of format {found} does not match requested format {expected}")]
    FormatMismatch {
        expected: PropertyFormat,
        found: PropertyFormat,
    },

    #[error("cannot coerce {found} value to {target}")]
    Coercion {
        target: PropertyFormat,
        found: &'static str,
    },

    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("cannot derive a client identity from {}", .0.display())]
    NoIdentity(PathBuf),

    #[error("script {identity} failed to load: {cause:#}")]
    ScriptLoad {
        identity: String,
        cause: anyhow::Error,
    },

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("malformed client message: {0}")]
    MalformedMessage(#[from] DecodeError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            BridgeError::InvalidFormat(7).to_string(),
            "invalid property format code 7, expected 1..=6"
        );
        assert_eq!(
            BridgeError::FormatMismatch {
                expected: PropertyFormat::Int64,
                found: PropertyFormat::String,
            }
            .to_string(),
            "value of format string does not match requested format int64"
        );
        assert_eq!(
            BridgeError::Coercion {
                target: PropertyFormat::Double,
                found: "map",
            }
            .to_string(),
            "cannot coerce map value to double"
        );
    }

    #[test]
    fn test_from_decode_error() {
        let err: BridgeError = DecodeError::NotAList.into();
        assert!(matches!(err, BridgeError::MalformedMessage(_)));
    }
}
