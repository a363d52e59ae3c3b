//! Boundary backed by libopal, through the opalshim C library.

use std::os::raw::c_int;

use crate::boundary::{Boundary, ProductCode, ProductText, ProtocolText};
use crate::error::Result;
use crate::ffi::{self, to_cstring, OpalParamProtocolPtr, OpalProductDescriptionPtr};
use crate::types::LibraryVersion;

/// Forwards every call to the opalshim C entry points.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use opal::{NativeBoundary, ParamProtocol};
///
/// let params = ParamProtocol::with_boundary(Arc::new(NativeBoundary))?;
/// params.set_prefix("sip")?;
/// # Ok::<(), opal::Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBoundary;

impl Boundary for NativeBoundary {
    fn version(&self) -> LibraryVersion {
        unsafe {
            LibraryVersion {
                major: ffi::OpalShim_GetMajorVersion(),
                minor: ffi::OpalShim_GetMinorVersion(),
                build: ffi::OpalShim_GetBuildNumber(),
            }
        }
    }

    fn new_param_protocol(&self) -> OpalParamProtocolPtr {
        unsafe { ffi::new_OpalParamProtocol() }
    }

    unsafe fn delete_param_protocol(&self, p: OpalParamProtocolPtr) {
        ffi::delete_OpalParamProtocol(p)
    }

    unsafe fn param_protocol_text(&self, p: OpalParamProtocolPtr, field: ProtocolText) -> String {
        let ptr = match field {
            ProtocolText::Prefix => ffi::OpalParamProtocol_prefix_get(p),
            ProtocolText::UserName => ffi::OpalParamProtocol_userName_get(p),
            ProtocolText::DisplayName => ffi::OpalParamProtocol_displayName_get(p),
            ProtocolText::InterfaceAddresses => ffi::OpalParamProtocol_interfaceAddresses_get(p),
            ProtocolText::DefaultOptions => ffi::OpalParamProtocol_defaultOptions_get(p),
        };
        ffi::borrowed_str(ptr)
    }

    unsafe fn set_param_protocol_text(
        &self,
        p: OpalParamProtocolPtr,
        field: ProtocolText,
        value: &str,
    ) -> Result<()> {
        let value_c = to_cstring(field.name(), value)?;
        let ptr = value_c.as_ptr();
        match field {
            ProtocolText::Prefix => ffi::OpalParamProtocol_prefix_set(p, ptr),
            ProtocolText::UserName => ffi::OpalParamProtocol_userName_set(p, ptr),
            ProtocolText::DisplayName => ffi::OpalParamProtocol_displayName_set(p, ptr),
            ProtocolText::InterfaceAddresses => {
                ffi::OpalParamProtocol_interfaceAddresses_set(p, ptr)
            }
            ProtocolText::DefaultOptions => ffi::OpalParamProtocol_defaultOptions_set(p, ptr),
        }
        Ok(())
    }

    unsafe fn param_protocol_product(&self, p: OpalParamProtocolPtr) -> OpalProductDescriptionPtr {
        ffi::OpalParamProtocol_product_get(p)
    }

    unsafe fn set_param_protocol_product(
        &self,
        p: OpalParamProtocolPtr,
        value: OpalProductDescriptionPtr,
    ) {
        ffi::OpalParamProtocol_product_set(p, value)
    }

    unsafe fn param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr) -> i32 {
        ffi::OpalParamProtocol_userInputMode_get(p)
    }

    unsafe fn set_param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr, value: i32) {
        ffi::OpalParamProtocol_userInputMode_set(p, value as c_int)
    }

    fn new_product_description(&self) -> OpalProductDescriptionPtr {
        unsafe { ffi::new_OpalProductDescription() }
    }

    unsafe fn delete_product_description(&self, p: OpalProductDescriptionPtr) {
        ffi::delete_OpalProductDescription(p)
    }

    unsafe fn product_text(&self, p: OpalProductDescriptionPtr, field: ProductText) -> String {
        let ptr = match field {
            ProductText::Vendor => ffi::OpalProductDescription_vendor_get(p),
            ProductText::Name => ffi::OpalProductDescription_name_get(p),
            ProductText::Version => ffi::OpalProductDescription_version_get(p),
        };
        ffi::borrowed_str(ptr)
    }

    unsafe fn set_product_text(
        &self,
        p: OpalProductDescriptionPtr,
        field: ProductText,
        value: &str,
    ) -> Result<()> {
        let value_c = to_cstring(field.name(), value)?;
        let ptr = value_c.as_ptr();
        match field {
            ProductText::Vendor => ffi::OpalProductDescription_vendor_set(p, ptr),
            ProductText::Name => ffi::OpalProductDescription_name_set(p, ptr),
            ProductText::Version => ffi::OpalProductDescription_version_set(p, ptr),
        }
        Ok(())
    }

    unsafe fn product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode) -> u32 {
        match field {
            ProductCode::T35CountryCode => ffi::OpalProductDescription_t35CountryCode_get(p),
            ProductCode::T35Extension => ffi::OpalProductDescription_t35Extension_get(p),
            ProductCode::ManufacturerCode => ffi::OpalProductDescription_manufacturerCode_get(p),
        }
    }

    unsafe fn set_product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode, value: u32) {
        match field {
            ProductCode::T35CountryCode => ffi::OpalProductDescription_t35CountryCode_set(p, value),
            ProductCode::T35Extension => ffi::OpalProductDescription_t35Extension_set(p, value),
            ProductCode::ManufacturerCode => {
                ffi::OpalProductDescription_manufacturerCode_set(p, value)
            }
        }
    }
}
