//! Raw C function bindings for the opalshim library.
//!
//! libopal itself exports no per-field entry points: its C API hands out
//! plain `OpalParamProtocol` structs holding borrowed strings, and its
//! version functions are C++. The opalshim library (source in `shim/`)
//! wraps both behind the `extern "C"` symbols declared here, with 64-bit
//! opaque handles. Getters return strings owned by the shim; setters copy
//! their input. Users should prefer the safe Rust wrappers in the parent
//! modules.

#![allow(non_snake_case)]

use std::os::raw::{c_char, c_int, c_uint};

use super::handles::*;

// OpalUserInputModes values
pub const OPAL_USER_INPUT_DEFAULT: c_int = 0;
pub const OPAL_USER_INPUT_AS_Q931: c_int = 1;
pub const OPAL_USER_INPUT_AS_STRING: c_int = 2;
pub const OPAL_USER_INPUT_AS_TONE: c_int = 3;
pub const OPAL_USER_INPUT_AS_RFC2833: c_int = 4;
pub const OPAL_USER_INPUT_IN_BAND: c_int = 5;

// External C functions
extern "C" {
    // Library version
    pub fn OpalShim_GetMajorVersion() -> c_uint;
    pub fn OpalShim_GetMinorVersion() -> c_uint;
    pub fn OpalShim_GetBuildNumber() -> c_uint;

    // OpalParamProtocol lifecycle
    pub fn new_OpalParamProtocol() -> OpalParamProtocolPtr;
    pub fn delete_OpalParamProtocol(p: OpalParamProtocolPtr);

    // OpalParamProtocol fields
    pub fn OpalParamProtocol_prefix_set(p: OpalParamProtocolPtr, value: *const c_char);
    pub fn OpalParamProtocol_prefix_get(p: OpalParamProtocolPtr) -> *const c_char;
    pub fn OpalParamProtocol_userName_set(p: OpalParamProtocolPtr, value: *const c_char);
    pub fn OpalParamProtocol_userName_get(p: OpalParamProtocolPtr) -> *const c_char;
    pub fn OpalParamProtocol_displayName_set(p: OpalParamProtocolPtr, value: *const c_char);
    pub fn OpalParamProtocol_displayName_get(p: OpalParamProtocolPtr) -> *const c_char;
    pub fn OpalParamProtocol_product_set(
        p: OpalParamProtocolPtr,
        value: OpalProductDescriptionPtr,
    );
    pub fn OpalParamProtocol_product_get(p: OpalParamProtocolPtr) -> OpalProductDescriptionPtr;
    pub fn OpalParamProtocol_interfaceAddresses_set(
        p: OpalParamProtocolPtr,
        value: *const c_char,
    );
    pub fn OpalParamProtocol_interfaceAddresses_get(p: OpalParamProtocolPtr) -> *const c_char;
    pub fn OpalParamProtocol_userInputMode_set(p: OpalParamProtocolPtr, value: c_int);
    pub fn OpalParamProtocol_userInputMode_get(p: OpalParamProtocolPtr) -> c_int;
    pub fn OpalParamProtocol_defaultOptions_set(p: OpalParamProtocolPtr, value: *const c_char);
    pub fn OpalParamProtocol_defaultOptions_get(p: OpalParamProtocolPtr) -> *const c_char;

    // OpalProductDescription lifecycle
    pub fn new_OpalProductDescription() -> OpalProductDescriptionPtr;
    pub fn delete_OpalProductDescription(p: OpalProductDescriptionPtr);

    // OpalProductDescription fields
    pub fn OpalProductDescription_vendor_set(p: OpalProductDescriptionPtr, value: *const c_char);
    pub fn OpalProductDescription_vendor_get(p: OpalProductDescriptionPtr) -> *const c_char;
    pub fn OpalProductDescription_name_set(p: OpalProductDescriptionPtr, value: *const c_char);
    pub fn OpalProductDescription_name_get(p: OpalProductDescriptionPtr) -> *const c_char;
    pub fn OpalProductDescription_version_set(p: OpalProductDescriptionPtr, value: *const c_char);
    pub fn OpalProductDescription_version_get(p: OpalProductDescriptionPtr) -> *const c_char;
    pub fn OpalProductDescription_t35CountryCode_set(p: OpalProductDescriptionPtr, value: c_uint);
    pub fn OpalProductDescription_t35CountryCode_get(p: OpalProductDescriptionPtr) -> c_uint;
    pub fn OpalProductDescription_t35Extension_set(p: OpalProductDescriptionPtr, value: c_uint);
    pub fn OpalProductDescription_t35Extension_get(p: OpalProductDescriptionPtr) -> c_uint;
    pub fn OpalProductDescription_manufacturerCode_set(
        p: OpalProductDescriptionPtr,
        value: c_uint,
    );
    pub fn OpalProductDescription_manufacturerCode_get(p: OpalProductDescriptionPtr) -> c_uint;
}
