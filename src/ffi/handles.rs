//! Handle types for opaque references to native OPAL structures.
//!
//! Each handle type is a newtype wrapper around u64 to provide type safety.

/// Macro to define a handle type.
macro_rules! define_handle {
    ($name:ident, $kind:literal) => {
        /// Opaque handle to a native object.
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            _h: u64,
        }

        impl $name {
            /// Name of the native structure behind the handle.
            pub const KIND: &'static str = $kind;

            /// Create an invalid (null) handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self { _h: 0 }
            }

            /// Wrap a raw identifier received from the native side.
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self { _h: raw }
            }

            /// Raw identifier, as passed across the boundary.
            #[inline]
            pub const fn as_raw(&self) -> u64 {
                self._h
            }

            /// Check if this handle is valid (non-zero).
            #[inline]
            pub const fn is_valid(&self) -> bool {
                self._h != 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

define_handle!(OpalParamProtocolPtr, "OpalParamProtocol");
define_handle!(OpalProductDescriptionPtr, "OpalProductDescription");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_handle() {
        let h = OpalParamProtocolPtr::default();
        assert!(!h.is_valid());
        assert_eq!(h, OpalParamProtocolPtr::invalid());
        assert!(OpalProductDescriptionPtr::from_raw(7).is_valid());
        assert_eq!(OpalProductDescriptionPtr::from_raw(7).as_raw(), 7);
    }

    #[test]
    fn test_handle_layout_matches_u64() {
        use std::mem::{align_of, size_of};

        assert_eq!(size_of::<OpalParamProtocolPtr>(), size_of::<u64>());
        assert_eq!(align_of::<OpalParamProtocolPtr>(), align_of::<u64>());
        assert_eq!(size_of::<OpalProductDescriptionPtr>(), size_of::<u64>());
        assert_eq!(align_of::<OpalProductDescriptionPtr>(), align_of::<u64>());
    }
}
