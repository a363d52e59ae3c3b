//! FFI bindings to libopal.
//!
//! This module contains the low-level boundary types. Users should prefer the
//! safe Rust wrappers in the parent modules.

pub mod handles;
#[cfg(feature = "native")]
pub mod raw;
pub mod text;

pub use handles::*;
#[cfg(feature = "native")]
pub use raw::*;
pub use text::{borrowed_str, check_text, to_cstring};
