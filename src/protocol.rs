//! Protocol parameter blocks.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::boundary::{Boundary, ProtocolText};
use crate::error::{Error, Result};
use crate::ffi::{check_text, OpalParamProtocolPtr};
use crate::handle::Owned;
use crate::product::{ProductDescription, ProductDescriptionRef};
use crate::types::{
    format_default_options, format_interface_addresses, parse_default_options,
    parse_interface_addresses, ProductInfo, ProtocolOptions, UserInputMode,
};

/// Parameters for one protocol (SIP, H.323, IAX2, ...) of an OPAL endpoint.
///
/// Owns a native `OpalParamProtocol`. The block is freed exactly once: by the
/// first [`release`](Self::release) call, or on drop if it was never
/// released. Every accessor fails with
/// [`UseAfterRelease`](crate::Error::UseAfterRelease) afterwards.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use opal::{LoopbackBoundary, ParamProtocol, UserInputMode};
///
/// let params = ParamProtocol::with_boundary(Arc::new(LoopbackBoundary::new()))?;
/// params.set_prefix("sip")?;
/// params.set_user_name("alice")?;
/// params.set_user_input_mode(UserInputMode::AsRfc2833)?;
/// params.set_interface_address_list(&["192.168.1.2:5060"])?;
///
/// if let Some(product) = params.product()? {
///     product.set_name("softphone")?;
/// }
///
/// // Freed here; dropping afterwards does nothing more
/// params.release();
/// # Ok::<(), opal::Error>(())
/// ```
pub struct ParamProtocol {
    inner: Owned<OpalParamProtocolPtr>,
}

impl ParamProtocol {
    /// Allocate a parameter block through `boundary`.
    pub fn with_boundary(boundary: Arc<dyn Boundary>) -> Result<Self> {
        let inner = Owned::allocate(boundary, |b| b.new_param_protocol())?;
        Ok(Self { inner })
    }

    /// Allocate a parameter block in libopal.
    #[cfg(feature = "native")]
    pub fn new() -> Result<Self> {
        Self::with_boundary(Arc::new(crate::native::NativeBoundary))
    }

    /// Allocate a parameter block and apply `options` to it.
    pub fn with_options(boundary: Arc<dyn Boundary>, options: &ProtocolOptions) -> Result<Self> {
        let params = Self::with_boundary(boundary)?;
        params.apply(options)?;
        Ok(params)
    }

    /// Take ownership of a parameter block allocated elsewhere.
    ///
    /// An invalid handle gives an already released wrapper.
    ///
    /// # Safety
    ///
    /// `handle` must be invalid, or a live block from `boundary` that nothing
    /// else owns.
    pub unsafe fn from_raw(boundary: Arc<dyn Boundary>, handle: OpalParamProtocolPtr) -> Self {
        Self {
            inner: Owned::adopt(boundary, handle),
        }
    }

    /// Give up ownership; the caller becomes responsible for freeing.
    pub fn into_raw(self) -> OpalParamProtocolPtr {
        self.inner.into_raw()
    }

    /// The native handle, invalid once released.
    pub fn raw(&self) -> OpalParamProtocolPtr {
        self.inner.raw()
    }

    /// The boundary this block lives behind.
    pub fn boundary(&self) -> &Arc<dyn Boundary> {
        self.inner.boundary()
    }

    /// Free the native block.
    ///
    /// Safe to call repeatedly and from several threads; only the first call
    /// frees. Returns `true` if this call freed it.
    pub fn release(&self) -> bool {
        self.inner.release()
    }

    /// Check whether the native block has been freed.
    pub fn is_released(&self) -> bool {
        self.inner.is_released()
    }

    /// Protocol prefix, e.g. "sip".
    pub fn prefix(&self) -> Result<String> {
        self.text(ProtocolText::Prefix)
    }

    /// Set the protocol prefix.
    pub fn set_prefix(&self, value: &str) -> Result<()> {
        self.set_text(ProtocolText::Prefix, value)
    }

    /// Default user name.
    pub fn user_name(&self) -> Result<String> {
        self.text(ProtocolText::UserName)
    }

    /// Set the default user name.
    pub fn set_user_name(&self, value: &str) -> Result<()> {
        self.set_text(ProtocolText::UserName, value)
    }

    /// Default display name.
    pub fn display_name(&self) -> Result<String> {
        self.text(ProtocolText::DisplayName)
    }

    /// Set the default display name.
    pub fn set_display_name(&self, value: &str) -> Result<()> {
        self.set_text(ProtocolText::DisplayName, value)
    }

    /// Product description embedded in this block.
    ///
    /// Returns `None` when the native block has no product description.
    pub fn product(&self) -> Result<Option<ProductDescriptionRef<'_>>> {
        let handle = self
            .inner
            .with_live(|b, p| Ok(unsafe { b.param_protocol_product(p) }))?;
        if !handle.is_valid() {
            return Ok(None);
        }
        Ok(Some(unsafe { ProductDescriptionRef::borrow_raw(&self.inner, handle) }))
    }

    /// Copy `product` into this block. `product` stays owned by the caller.
    ///
    /// Both must live behind the same boundary; handles mean nothing to a
    /// boundary that did not issue them.
    pub fn set_product(&self, product: &ProductDescription) -> Result<()> {
        if !Arc::ptr_eq(product.boundary(), self.boundary()) {
            return Err(Error::InvalidArgument(
                "product description belongs to a different boundary".to_string(),
            ));
        }
        product.access(|_, source| {
            self.inner.with_live(|b, p| {
                unsafe { b.set_param_protocol_product(p, source) };
                Ok(())
            })
        })
    }

    /// Product description as a plain value, `None` if the block has none.
    pub fn product_info(&self) -> Result<Option<ProductInfo>> {
        match self.product()? {
            Some(product) => product.info().map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite the embedded product description from a plain value.
    ///
    /// A block without a product description gets one.
    pub fn set_product_info(&self, info: &ProductInfo) -> Result<()> {
        match self.product()? {
            Some(product) => product.set_info(info),
            None => {
                let product = ProductDescription::from_info(self.boundary().clone(), info)?;
                self.set_product(&product)
            }
        }
    }

    /// Raw interface address text, `'\n'` separated.
    pub fn interface_addresses(&self) -> Result<String> {
        self.text(ProtocolText::InterfaceAddresses)
    }

    /// Set the raw interface address text.
    pub fn set_interface_addresses(&self, value: &str) -> Result<()> {
        self.set_text(ProtocolText::InterfaceAddresses, value)
    }

    /// Interface addresses as a list. `"*"` means all interfaces.
    pub fn interface_address_list(&self) -> Result<Vec<String>> {
        Ok(parse_interface_addresses(&self.interface_addresses()?))
    }

    /// Set the interface addresses from a list.
    pub fn set_interface_address_list<S: AsRef<str>>(&self, addresses: &[S]) -> Result<()> {
        self.set_interface_addresses(&format_interface_addresses(addresses))
    }

    /// User input mode.
    pub fn user_input_mode(&self) -> Result<UserInputMode> {
        let raw = self
            .inner
            .with_live(|b, p| Ok(unsafe { b.param_protocol_user_input_mode(p) }))?;
        UserInputMode::try_from(raw)
    }

    /// Set the user input mode.
    pub fn set_user_input_mode(&self, mode: UserInputMode) -> Result<()> {
        self.inner.with_live(|b, p| {
            unsafe { b.set_param_protocol_user_input_mode(p, mode.into()) };
            Ok(())
        })
    }

    /// Raw default connection options, `'\n'` separated `key=value` lines.
    pub fn default_options(&self) -> Result<String> {
        self.text(ProtocolText::DefaultOptions)
    }

    /// Set the raw default connection options.
    pub fn set_default_options(&self, value: &str) -> Result<()> {
        self.set_text(ProtocolText::DefaultOptions, value)
    }

    /// Default connection options as ordered `key=value` pairs.
    pub fn default_option_pairs(&self) -> Result<Vec<(String, String)>> {
        Ok(parse_default_options(&self.default_options()?))
    }

    /// Set the default connection options from `key=value` pairs.
    pub fn set_default_option_pairs<K: AsRef<str>, V: AsRef<str>>(
        &self,
        options: &[(K, V)],
    ) -> Result<()> {
        self.set_default_options(&format_default_options(options))
    }

    /// Set every field that is `Some` in `options`.
    ///
    /// Texts are checked before anything is written.
    pub fn apply(&self, options: &ProtocolOptions) -> Result<()> {
        let interface_addresses = options
            .interface_addresses
            .as_ref()
            .map(|list| format_interface_addresses(list.as_slice()));
        let default_options = options
            .default_options
            .as_ref()
            .map(|pairs| format_default_options(pairs.as_slice()));

        let texts = ProtocolText::ALL.map(|field| {
            let value = match field {
                ProtocolText::Prefix => options.prefix.as_deref(),
                ProtocolText::UserName => options.user_name.as_deref(),
                ProtocolText::DisplayName => options.display_name.as_deref(),
                ProtocolText::InterfaceAddresses => interface_addresses.as_deref(),
                ProtocolText::DefaultOptions => default_options.as_deref(),
            };
            (field, value)
        });
        for (field, value) in texts {
            if let Some(value) = value {
                check_text(field.name(), value)?;
            }
        }
        if let Some(product) = &options.product {
            check_text("vendor", &product.vendor)?;
            check_text("name", &product.name)?;
            check_text("version", &product.version)?;
        }

        for (field, value) in texts {
            if let Some(value) = value {
                self.set_text(field, value)?;
            }
        }
        if let Some(product) = &options.product {
            self.set_product_info(product)?;
        }
        if let Some(mode) = options.user_input_mode {
            self.set_user_input_mode(mode)?;
        }
        Ok(())
    }

    /// Read every field back as options.
    pub fn to_options(&self) -> Result<ProtocolOptions> {
        Ok(ProtocolOptions {
            prefix: Some(self.prefix()?),
            user_name: Some(self.user_name()?),
            display_name: Some(self.display_name()?),
            product: self.product_info()?,
            interface_addresses: Some(self.interface_address_list()?),
            user_input_mode: Some(self.user_input_mode()?),
            default_options: Some(self.default_option_pairs()?),
        })
    }

    fn text(&self, field: ProtocolText) -> Result<String> {
        trace!(field = field.name(), "get");
        self.inner
            .with_live(|b, p| Ok(unsafe { b.param_protocol_text(p, field) }))
    }

    fn set_text(&self, field: ProtocolText, value: &str) -> Result<()> {
        check_text(field.name(), value)?;
        trace!(field = field.name(), "set");
        self.inner
            .with_live(|b, p| unsafe { b.set_param_protocol_text(p, field, value) })
    }
}

impl fmt::Debug for ParamProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackBoundary;

    fn params() -> (Arc<LoopbackBoundary>, ParamProtocol) {
        let boundary = Arc::new(LoopbackBoundary::new());
        let params = ParamProtocol::with_boundary(boundary.clone()).unwrap();
        (boundary, params)
    }

    #[test]
    fn test_fresh_block_is_zeroed() {
        let (_, params) = params();
        assert_eq!(params.prefix().unwrap(), "");
        assert_eq!(params.user_input_mode().unwrap(), UserInputMode::Default);
        assert!(params.interface_address_list().unwrap().is_empty());

        let info = params.product_info().unwrap().unwrap();
        assert_eq!(info.t35_country_code, 0);
        assert_eq!(info.manufacturer_code, 0);
    }

    #[test]
    fn test_text_rejects_nul() {
        let (_, params) = params();
        params.set_user_name("alice").unwrap();

        let err = params.set_user_name("al\0ice").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(params.user_name().unwrap(), "alice");
    }

    #[test]
    fn test_apply_checks_before_writing() {
        let (_, params) = params();
        let options = ProtocolOptions {
            prefix: Some("sip".to_string()),
            default_options: Some(vec![("bad\0key".to_string(), "1".to_string())]),
            ..Default::default()
        };

        assert!(params.apply(&options).is_err());
        assert_eq!(params.prefix().unwrap(), "");
    }

    #[test]
    fn test_apply_writes_every_text_field() {
        let (_, params) = params();
        let options = ProtocolOptions {
            prefix: Some("sip".to_string()),
            user_name: Some("alice".to_string()),
            display_name: Some("Alice".to_string()),
            interface_addresses: Some(vec!["*".to_string()]),
            default_options: Some(vec![("k".to_string(), "v".to_string())]),
            ..Default::default()
        };
        params.apply(&options).unwrap();

        for field in ProtocolText::ALL {
            assert!(!params.text(field).unwrap().is_empty(), "{}", field.name());
        }
    }

    #[test]
    fn test_apply_names_rejected_field() {
        let (_, params) = params();
        let options = ProtocolOptions {
            display_name: Some("A\0lice".to_string()),
            ..Default::default()
        };

        let err = params.apply(&options).unwrap_err();
        assert!(err.to_string().contains("displayName"));
    }

    #[test]
    fn test_set_product_info_on_detached_block() {
        let (boundary, params) = params();
        boundary.detach_product(params.raw());
        assert!(params.product().unwrap().is_none());

        let info = ProductInfo {
            name: "softphone".to_string(),
            ..Default::default()
        };
        params.set_product_info(&info).unwrap();

        assert_eq!(params.product_info().unwrap(), Some(info));
        // The temporary standalone description was freed again
        let stats = boundary.stats();
        assert_eq!(stats.products_created, 1);
        assert_eq!(stats.products_deleted, 1);
    }
}
