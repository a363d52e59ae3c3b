//! Error types for the opal crate.

use thiserror::Error;

/// Result type alias for opal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for opal operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The wrapper was released (or its owning parent was) before the call.
    #[error("{kind} used after release")]
    UseAfterRelease {
        /// Native structure the wrapper refers to.
        kind: &'static str,
    },

    /// The native side returned an integer with no matching enum variant.
    #[error("invalid {name} value: {value}")]
    InvalidEnumValue {
        /// Enumeration being decoded.
        name: &'static str,
        /// Raw value received across the boundary.
        value: i32,
    },

    /// The native create entry point returned a null handle.
    #[error("failed to allocate {0}")]
    AllocationFailed(&'static str),

    /// Function argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Check if this is a use-after-release error.
    pub fn is_use_after_release(&self) -> bool {
        matches!(self, Error::UseAfterRelease { .. })
    }

    /// Check if this is an invalid enum value error.
    pub fn is_invalid_enum(&self) -> bool {
        matches!(self, Error::InvalidEnumValue { .. })
    }

    /// Check if this is an allocation failure.
    pub fn is_allocation_failed(&self) -> bool {
        matches!(self, Error::AllocationFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::InvalidEnumValue {
            name: "OpalUserInputModes",
            value: 42,
        };
        assert_eq!(err.to_string(), "invalid OpalUserInputModes value: 42");
        assert!(err.is_invalid_enum());

        let err = Error::UseAfterRelease {
            kind: "OpalParamProtocol",
        };
        assert_eq!(err.to_string(), "OpalParamProtocol used after release");
        assert!(err.is_use_after_release());
        assert!(!err.is_allocation_failed());
    }
}
