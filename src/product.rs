//! Product descriptions, standalone or embedded in a parameter block.

use std::fmt;
use std::sync::Arc;

use crate::boundary::{Boundary, ProductCode, ProductText};
use crate::error::Result;
use crate::ffi::{check_text, OpalParamProtocolPtr, OpalProductDescriptionPtr};
use crate::handle::Owned;
use crate::types::ProductInfo;

/// Field accessors shared by the owned and borrowed product wrappers.
///
/// The implementing type provides `access`, which runs a closure against the
/// live product handle.
macro_rules! product_accessors {
    () => {
        /// Vendor name.
        pub fn vendor(&self) -> Result<String> {
            self.text(ProductText::Vendor)
        }

        /// Set the vendor name.
        pub fn set_vendor(&self, value: &str) -> Result<()> {
            self.set_text(ProductText::Vendor, value)
        }

        /// Product name.
        pub fn name(&self) -> Result<String> {
            self.text(ProductText::Name)
        }

        /// Set the product name.
        pub fn set_name(&self, value: &str) -> Result<()> {
            self.set_text(ProductText::Name, value)
        }

        /// Product version.
        pub fn version(&self) -> Result<String> {
            self.text(ProductText::Version)
        }

        /// Set the product version.
        pub fn set_version(&self, value: &str) -> Result<()> {
            self.set_text(ProductText::Version, value)
        }

        /// ITU-T T.35 country code.
        pub fn t35_country_code(&self) -> Result<u32> {
            self.code(ProductCode::T35CountryCode)
        }

        /// Set the ITU-T T.35 country code.
        pub fn set_t35_country_code(&self, value: u32) -> Result<()> {
            self.set_code(ProductCode::T35CountryCode, value)
        }

        /// ITU-T T.35 extension code.
        pub fn t35_extension(&self) -> Result<u32> {
            self.code(ProductCode::T35Extension)
        }

        /// Set the ITU-T T.35 extension code.
        pub fn set_t35_extension(&self, value: u32) -> Result<()> {
            self.set_code(ProductCode::T35Extension, value)
        }

        /// Manufacturer code.
        pub fn manufacturer_code(&self) -> Result<u32> {
            self.code(ProductCode::ManufacturerCode)
        }

        /// Set the manufacturer code.
        pub fn set_manufacturer_code(&self, value: u32) -> Result<()> {
            self.set_code(ProductCode::ManufacturerCode, value)
        }

        /// Read every field into a [`ProductInfo`].
        pub fn info(&self) -> Result<ProductInfo> {
            self.access(|b, p| unsafe {
                Ok(ProductInfo {
                    vendor: b.product_text(p, ProductText::Vendor),
                    name: b.product_text(p, ProductText::Name),
                    version: b.product_text(p, ProductText::Version),
                    t35_country_code: b.product_code(p, ProductCode::T35CountryCode),
                    t35_extension: b.product_code(p, ProductCode::T35Extension),
                    manufacturer_code: b.product_code(p, ProductCode::ManufacturerCode),
                })
            })
        }

        /// Overwrite every field from a [`ProductInfo`].
        ///
        /// Nothing is written if any text is rejected.
        pub fn set_info(&self, info: &ProductInfo) -> Result<()> {
            check_text(ProductText::Vendor.name(), &info.vendor)?;
            check_text(ProductText::Name.name(), &info.name)?;
            check_text(ProductText::Version.name(), &info.version)?;
            self.access(|b, p| unsafe {
                b.set_product_text(p, ProductText::Vendor, &info.vendor)?;
                b.set_product_text(p, ProductText::Name, &info.name)?;
                b.set_product_text(p, ProductText::Version, &info.version)?;
                b.set_product_code(p, ProductCode::T35CountryCode, info.t35_country_code);
                b.set_product_code(p, ProductCode::T35Extension, info.t35_extension);
                b.set_product_code(p, ProductCode::ManufacturerCode, info.manufacturer_code);
                Ok(())
            })
        }

        fn text(&self, field: ProductText) -> Result<String> {
            self.access(|b, p| Ok(unsafe { b.product_text(p, field) }))
        }

        fn set_text(&self, field: ProductText, value: &str) -> Result<()> {
            check_text(field.name(), value)?;
            self.access(|b, p| unsafe { b.set_product_text(p, field, value) })
        }

        fn code(&self, field: ProductCode) -> Result<u32> {
            self.access(|b, p| Ok(unsafe { b.product_code(p, field) }))
        }

        fn set_code(&self, field: ProductCode, value: u32) -> Result<()> {
            self.access(|b, p| {
                unsafe { b.set_product_code(p, field, value) };
                Ok(())
            })
        }
    };
}

/// A standalone product description owned by this wrapper.
///
/// Freed when dropped or on the first call to [`release`](Self::release).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use opal::{LoopbackBoundary, ProductDescription, ProductInfo};
///
/// let boundary = Arc::new(LoopbackBoundary::new());
/// let product = ProductDescription::from_info(
///     boundary,
///     &ProductInfo {
///         vendor: "Example Ltd".to_string(),
///         name: "softphone".to_string(),
///         version: "1.2".to_string(),
///         ..Default::default()
///     },
/// )?;
/// assert_eq!(product.manufacturer_code()?, 61);
/// # Ok::<(), opal::Error>(())
/// ```
pub struct ProductDescription {
    inner: Owned<OpalProductDescriptionPtr>,
}

impl ProductDescription {
    /// Allocate an empty product description through `boundary`.
    pub fn with_boundary(boundary: Arc<dyn Boundary>) -> Result<Self> {
        let inner = Owned::allocate(boundary, |b| b.new_product_description())?;
        Ok(Self { inner })
    }

    /// Allocate an empty product description in libopal.
    #[cfg(feature = "native")]
    pub fn new() -> Result<Self> {
        Self::with_boundary(Arc::new(crate::native::NativeBoundary))
    }

    /// Allocate a product description holding `info`.
    pub fn from_info(boundary: Arc<dyn Boundary>, info: &ProductInfo) -> Result<Self> {
        let product = Self::with_boundary(boundary)?;
        product.set_info(info)?;
        Ok(product)
    }

    /// Take ownership of a product description allocated elsewhere.
    ///
    /// An invalid handle gives an already released wrapper.
    ///
    /// # Safety
    ///
    /// `handle` must be invalid, or a live standalone description from
    /// `boundary` that nothing else owns.
    pub unsafe fn from_raw(boundary: Arc<dyn Boundary>, handle: OpalProductDescriptionPtr) -> Self {
        Self {
            inner: Owned::adopt(boundary, handle),
        }
    }

    /// Give up ownership; the caller becomes responsible for freeing.
    pub fn into_raw(self) -> OpalProductDescriptionPtr {
        self.inner.into_raw()
    }

    /// The native handle, invalid once released.
    pub fn raw(&self) -> OpalProductDescriptionPtr {
        self.inner.raw()
    }

    /// The boundary this description lives behind.
    pub fn boundary(&self) -> &Arc<dyn Boundary> {
        self.inner.boundary()
    }

    /// Free the native description.
    ///
    /// Safe to call repeatedly and from several threads; only the first call
    /// frees. Returns `true` if this call freed it.
    pub fn release(&self) -> bool {
        self.inner.release()
    }

    /// Check whether the native description has been freed.
    pub fn is_released(&self) -> bool {
        self.inner.is_released()
    }

    pub(crate) fn access<T>(
        &self,
        f: impl FnOnce(&dyn Boundary, OpalProductDescriptionPtr) -> Result<T>,
    ) -> Result<T> {
        self.inner.with_live(f)
    }

    product_accessors!();
}

impl fmt::Debug for ProductDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// A product description embedded in a parameter block.
///
/// Never frees anything. It borrows the owning block, so it cannot outlive
/// it, and every access fails with
/// [`UseAfterRelease`](crate::Error::UseAfterRelease) once the block has been
/// released.
pub struct ProductDescriptionRef<'a> {
    parent: &'a Owned<OpalParamProtocolPtr>,
    handle: OpalProductDescriptionPtr,
}

impl<'a> ProductDescriptionRef<'a> {
    /// Borrow a description owned by `parent`.
    ///
    /// # Safety
    ///
    /// `handle` must be valid and owned by `parent`'s native block.
    pub(crate) unsafe fn borrow_raw(
        parent: &'a Owned<OpalParamProtocolPtr>,
        handle: OpalProductDescriptionPtr,
    ) -> Self {
        Self { parent, handle }
    }

    /// The native handle. Owned by the parent block.
    pub fn raw(&self) -> OpalProductDescriptionPtr {
        self.handle
    }

    fn access<T>(
        &self,
        f: impl FnOnce(&dyn Boundary, OpalProductDescriptionPtr) -> Result<T>,
    ) -> Result<T> {
        let handle = self.handle;
        self.parent.with_live(|b, _| f(b, handle))
    }

    product_accessors!();
}

impl fmt::Debug for ProductDescriptionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductDescriptionRef")
            .field("handle", &self.handle.as_raw())
            .field("parent", &self.parent.raw().as_raw())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackBoundary;

    #[test]
    fn test_fields() {
        let boundary = Arc::new(LoopbackBoundary::new());
        let product = ProductDescription::with_boundary(boundary).unwrap();

        product.set_vendor("Vox Lucida").unwrap();
        product.set_name("OPAL").unwrap();
        product.set_version("3.10.11").unwrap();
        product.set_t35_country_code(9).unwrap();
        product.set_t35_extension(0).unwrap();
        product.set_manufacturer_code(61).unwrap();

        assert_eq!(product.vendor().unwrap(), "Vox Lucida");
        assert_eq!(product.name().unwrap(), "OPAL");
        assert_eq!(product.version().unwrap(), "3.10.11");
        assert_eq!(product.t35_country_code().unwrap(), 9);
        assert_eq!(product.t35_extension().unwrap(), 0);
        assert_eq!(product.manufacturer_code().unwrap(), 61);
    }

    #[test]
    fn test_set_info_is_all_or_nothing() {
        let boundary = Arc::new(LoopbackBoundary::new());
        let product = ProductDescription::with_boundary(boundary).unwrap();
        product.set_name("before").unwrap();

        let bad = ProductInfo {
            name: "after".to_string(),
            version: "1\02".to_string(),
            ..Default::default()
        };
        let err = product.set_info(&bad).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidArgument(_)));
        assert_eq!(product.name().unwrap(), "before");
    }

    #[test]
    fn test_release_then_access() {
        let boundary = Arc::new(LoopbackBoundary::new());
        let product = ProductDescription::with_boundary(boundary.clone()).unwrap();

        assert!(product.release());
        assert!(product.is_released());
        assert!(product.vendor().unwrap_err().is_use_after_release());
        assert!(product.set_t35_extension(1).unwrap_err().is_use_after_release());
        assert_eq!(boundary.stats().products_deleted, 1);
    }
}
