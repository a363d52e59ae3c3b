//! String marshaling across the boundary.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::{Error, Result};

/// Reject text that cannot be represented as a C string.
pub fn check_text(field: &str, value: &str) -> Result<()> {
    match value.find('\0') {
        Some(pos) => Err(Error::InvalidArgument(format!(
            "{} contains a NUL byte at offset {}",
            field, pos
        ))),
        None => Ok(()),
    }
}

/// Convert text to a C string, naming the field on failure.
pub fn to_cstring(field: &str, value: &str) -> Result<CString> {
    check_text(field, value)?;
    CString::new(value).map_err(|e| Error::InvalidArgument(format!("{}: {}", field, e)))
}

/// Copy a native string that stays owned by the native side.
///
/// A null pointer reads as the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that remains valid
/// for the duration of the call.
pub unsafe fn borrowed_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}
