//! The native entry points the wrappers delegate to.
//!
//! A [`Boundary`] is the fixed set of calls a native OPAL build exposes for
//! protocol parameter blocks. The wrappers in this crate never touch native
//! memory themselves; they only pass handles back through this trait.
//! [`NativeBoundary`](crate::native::NativeBoundary) forwards to libopal and
//! [`LoopbackBoundary`](crate::loopback::LoopbackBoundary) keeps everything
//! in process.

use crate::error::Result;
use crate::ffi::{OpalParamProtocolPtr, OpalProductDescriptionPtr};
use crate::types::LibraryVersion;

/// Text fields of `OpalParamProtocol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolText {
    /// Protocol prefix, e.g. "sip" or "h323".
    Prefix,
    /// Default user name for calls.
    UserName,
    /// Default display name for calls.
    DisplayName,
    /// `'\n'` separated listener interfaces.
    InterfaceAddresses,
    /// `'\n'` separated `key=value` connection options.
    DefaultOptions,
}

impl ProtocolText {
    /// All text fields, in structure order.
    pub const ALL: [ProtocolText; 5] = [
        ProtocolText::Prefix,
        ProtocolText::UserName,
        ProtocolText::DisplayName,
        ProtocolText::InterfaceAddresses,
        ProtocolText::DefaultOptions,
    ];

    /// Native field name.
    pub fn name(self) -> &'static str {
        match self {
            ProtocolText::Prefix => "prefix",
            ProtocolText::UserName => "userName",
            ProtocolText::DisplayName => "displayName",
            ProtocolText::InterfaceAddresses => "interfaceAddresses",
            ProtocolText::DefaultOptions => "defaultOptions",
        }
    }
}

/// Text fields of `OpalProductDescription`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductText {
    /// Vendor name.
    Vendor,
    /// Product name.
    Name,
    /// Product version.
    Version,
}

impl ProductText {
    /// Native field name.
    pub fn name(self) -> &'static str {
        match self {
            ProductText::Vendor => "vendor",
            ProductText::Name => "name",
            ProductText::Version => "version",
        }
    }
}

/// Numeric fields of `OpalProductDescription`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCode {
    /// ITU-T T.35 country code.
    T35CountryCode,
    /// ITU-T T.35 extension code.
    T35Extension,
    /// Manufacturer code assigned by the country's authority.
    ManufacturerCode,
}

impl ProductCode {
    /// Native field name.
    pub fn name(self) -> &'static str {
        match self {
            ProductCode::T35CountryCode => "t35CountryCode",
            ProductCode::T35Extension => "t35Extension",
            ProductCode::ManufacturerCode => "manufacturerCode",
        }
    }
}

/// Native entry points for protocol parameter blocks.
///
/// The create calls return an invalid handle on allocation failure. Every
/// other call requires a live handle. Implementations need not tolerate a
/// second `delete_*` for the same handle; the wrappers never issue one.
pub trait Boundary: Send + Sync {
    /// Version of the library behind the boundary.
    fn version(&self) -> LibraryVersion;

    /// Allocate a parameter block with native defaults.
    fn new_param_protocol(&self) -> OpalParamProtocolPtr;

    /// Free a parameter block.
    ///
    /// # Safety
    ///
    /// `p` must be live and owned by the caller. It is invalid afterwards.
    unsafe fn delete_param_protocol(&self, p: OpalParamProtocolPtr);

    /// Read a text field. A native null reads as `""`.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn param_protocol_text(&self, p: OpalParamProtocolPtr, field: ProtocolText) -> String;

    /// Write a text field.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn set_param_protocol_text(
        &self,
        p: OpalParamProtocolPtr,
        field: ProtocolText,
        value: &str,
    ) -> Result<()>;

    /// Handle of the product description embedded in `p`.
    ///
    /// The returned handle is owned by `p`; it may be invalid.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn param_protocol_product(&self, p: OpalParamProtocolPtr) -> OpalProductDescriptionPtr;

    /// Copy the product description `value` into `p`.
    ///
    /// # Safety
    ///
    /// `p` and `value` must be live.
    unsafe fn set_param_protocol_product(
        &self,
        p: OpalParamProtocolPtr,
        value: OpalProductDescriptionPtr,
    );

    /// Raw `OpalUserInputModes` value of `p`.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr) -> i32;

    /// Write the raw `OpalUserInputModes` value of `p`.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn set_param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr, value: i32);

    /// Allocate a standalone product description.
    fn new_product_description(&self) -> OpalProductDescriptionPtr;

    /// Free a standalone product description.
    ///
    /// # Safety
    ///
    /// `p` must be live and owned by the caller, never one embedded in a
    /// parameter block.
    unsafe fn delete_product_description(&self, p: OpalProductDescriptionPtr);

    /// Read a product text field. A native null reads as `""`.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn product_text(&self, p: OpalProductDescriptionPtr, field: ProductText) -> String;

    /// Write a product text field.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn set_product_text(
        &self,
        p: OpalProductDescriptionPtr,
        field: ProductText,
        value: &str,
    ) -> Result<()>;

    /// Read a product code.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode) -> u32;

    /// Write a product code.
    ///
    /// # Safety
    ///
    /// `p` must be live.
    unsafe fn set_product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode, value: u32);
}
