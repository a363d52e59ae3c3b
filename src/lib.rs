//! Rust bindings for OPAL protocol parameter blocks.
//!
//! This crate provides a safe Rust interface to the `OpalParamProtocol`
//! structure of the OPAL VoIP library: the per-protocol settings (prefix,
//! user and display names, product identification, listener interfaces,
//! user input mode, default connection options) an endpoint is configured
//! with.
//!
//! Every wrapper holds an opaque native handle and forwards field accesses
//! across a [`Boundary`]. Owning wrappers free their native structure exactly
//! once, whether released explicitly, on drop, or by several threads at the
//! same time. Borrowed views, such as the product description embedded in a
//! parameter block, never free anything and cannot outlive their parent.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use opal::{LoopbackBoundary, ParamProtocol, ProtocolOptions, UserInputMode};
//!
//! fn main() -> opal::Result<()> {
//!     // Use `NativeBoundary` (feature "native") to talk to libopal instead
//!     let boundary = Arc::new(LoopbackBoundary::new());
//!
//!     let opts = ProtocolOptions {
//!         prefix: Some("sip".to_string()),
//!         user_name: Some("alice".to_string()),
//!         user_input_mode: Some(UserInputMode::AsRfc2833),
//!         ..Default::default()
//!     };
//!     let params = ParamProtocol::with_options(boundary, &opts)?;
//!     println!("Prefix: {}", params.prefix()?);
//!
//!     // Borrowed view into the parameter block
//!     if let Some(product) = params.product()? {
//!         product.set_vendor("Example Ltd")?;
//!     }
//!
//!     // Release is idempotent; drop would do the same
//!     params.release();
//!     params.release();
//!     assert!(params.prefix().unwrap_err().is_use_after_release());
//!
//!     Ok(())
//! }
//! ```

pub mod boundary;
pub mod error;
pub mod ffi;
mod handle;
pub mod loopback;
#[cfg(feature = "native")]
pub mod native;
pub mod product;
pub mod protocol;
pub mod types;

// Re-export main types at the crate root
pub use boundary::{Boundary, ProductCode, ProductText, ProtocolText};
pub use error::{Error, Result};
pub use loopback::{LoopbackBoundary, LoopbackStats};
#[cfg(feature = "native")]
pub use native::NativeBoundary;
pub use product::{ProductDescription, ProductDescriptionRef};
pub use protocol::ParamProtocol;
pub use types::{LibraryVersion, ProductInfo, ProtocolOptions, UserInputMode, ALL_INTERFACES};

/// Binding version constants.
pub mod version {
    /// Major version.
    pub const MAJOR: u32 = 0;
    /// Minor version.
    pub const MINOR: u32 = 1;
    /// Build number.
    pub const BUILD: u32 = 0;
}

/// Get the binding version string (e.g., "0.1.0").
pub fn binding_version() -> String {
    types::LibraryVersion::BINDING.to_string()
}

/// Check if a library version is compatible with these bindings.
///
/// Returns `true` when the major versions match and the library's minor
/// version is at least `minor`.
pub fn version_compatible(library: LibraryVersion, major: u32, minor: u32) -> bool {
    library.major == major && library.minor >= minor
}

/// Version of libopal, as reported by the linked library.
#[cfg(feature = "native")]
pub fn native_version() -> LibraryVersion {
    NativeBoundary.version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_version() {
        assert_eq!(binding_version(), "0.1.0");
    }

    #[test]
    fn test_version_compatible() {
        let lib = LibraryVersion {
            major: 3,
            minor: 10,
            build: 11,
        };
        assert!(version_compatible(lib, 3, 10));
        assert!(version_compatible(lib, 3, 0));
        assert!(!version_compatible(lib, 3, 12));
        assert!(!version_compatible(lib, 2, 10));
    }

    #[test]
    fn test_loopback_reports_binding_version() {
        let boundary = LoopbackBoundary::new();
        assert_eq!(boundary.version(), LibraryVersion::BINDING);
    }
}
