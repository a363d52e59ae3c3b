//! Exactly-once ownership of native handles.
//!
//! [`Owned`] is the shared core of every owning wrapper. The handle sits
//! behind a reader/writer lock: field accesses hold the read side for the
//! length of the boundary call, release takes the write side and swaps the
//! handle for the invalid one. Whoever sees the valid handle in that swap is
//! the only caller that frees it, so explicit releases racing each other or
//! racing `Drop` free the native resource once.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use crate::ffi::{OpalParamProtocolPtr, OpalProductDescriptionPtr};

/// A handle type that can be freed through a [`Boundary`].
pub(crate) trait Resource: Copy + fmt::Debug + Send + Sync + 'static {
    const KIND: &'static str;

    fn invalid() -> Self;

    fn is_valid(&self) -> bool;

    fn as_raw(&self) -> u64;

    /// # Safety
    ///
    /// `self` must be live and owned by the caller.
    unsafe fn destroy(self, boundary: &dyn Boundary);
}

impl Resource for OpalParamProtocolPtr {
    const KIND: &'static str = OpalParamProtocolPtr::KIND;

    fn invalid() -> Self {
        OpalParamProtocolPtr::invalid()
    }

    fn is_valid(&self) -> bool {
        OpalParamProtocolPtr::is_valid(self)
    }

    fn as_raw(&self) -> u64 {
        OpalParamProtocolPtr::as_raw(self)
    }

    unsafe fn destroy(self, boundary: &dyn Boundary) {
        boundary.delete_param_protocol(self)
    }
}

impl Resource for OpalProductDescriptionPtr {
    const KIND: &'static str = OpalProductDescriptionPtr::KIND;

    fn invalid() -> Self {
        OpalProductDescriptionPtr::invalid()
    }

    fn is_valid(&self) -> bool {
        OpalProductDescriptionPtr::is_valid(self)
    }

    fn as_raw(&self) -> u64 {
        OpalProductDescriptionPtr::as_raw(self)
    }

    unsafe fn destroy(self, boundary: &dyn Boundary) {
        boundary.delete_product_description(self)
    }
}

/// An owned native handle, released at most once.
pub(crate) struct Owned<R: Resource> {
    boundary: Arc<dyn Boundary>,
    handle: RwLock<R>,
}

impl<R: Resource> Owned<R> {
    /// Allocate through `create`, failing on an invalid handle.
    pub(crate) fn allocate(
        boundary: Arc<dyn Boundary>,
        create: impl FnOnce(&dyn Boundary) -> R,
    ) -> Result<Self> {
        let handle = create(&*boundary);
        if !handle.is_valid() {
            warn!(kind = R::KIND, "native allocation failed");
            return Err(Error::AllocationFailed(R::KIND));
        }
        debug!(kind = R::KIND, handle = handle.as_raw(), "allocated");
        Ok(Self {
            boundary,
            handle: RwLock::new(handle),
        })
    }

    /// Take ownership of an existing handle.
    ///
    /// An invalid handle gives an already released wrapper.
    ///
    /// # Safety
    ///
    /// `handle` must be invalid, or live and not owned by anything else.
    pub(crate) unsafe fn adopt(boundary: Arc<dyn Boundary>, handle: R) -> Self {
        debug!(kind = R::KIND, handle = handle.as_raw(), "adopted");
        Self {
            boundary,
            handle: RwLock::new(handle),
        }
    }

    pub(crate) fn boundary(&self) -> &Arc<dyn Boundary> {
        &self.boundary
    }

    /// Current handle; invalid once released.
    pub(crate) fn raw(&self) -> R {
        *self.handle.read()
    }

    pub(crate) fn is_released(&self) -> bool {
        !self.handle.read().is_valid()
    }

    /// Run `f` against the live handle, holding off release until it returns.
    pub(crate) fn with_live<T>(&self, f: impl FnOnce(&dyn Boundary, R) -> Result<T>) -> Result<T> {
        let handle = self.handle.read();
        if !handle.is_valid() {
            return Err(Error::UseAfterRelease { kind: R::KIND });
        }
        f(&*self.boundary, *handle)
    }

    /// Free the native resource if this is the first release.
    ///
    /// Returns `true` if this call freed it.
    pub(crate) fn release(&self) -> bool {
        let handle = {
            let mut slot = self.handle.write();
            let handle = *slot;
            if !handle.is_valid() {
                return false;
            }
            // Destroy under the write lock so no reader sees a freed handle
            unsafe { handle.destroy(&*self.boundary) };
            *slot = R::invalid();
            handle
        };
        debug!(kind = R::KIND, handle = handle.as_raw(), "released");
        true
    }

    /// Give up ownership without freeing.
    pub(crate) fn into_raw(mut self) -> R {
        let handle = std::mem::replace(self.handle.get_mut(), R::invalid());
        debug!(kind = R::KIND, handle = handle.as_raw(), "ownership transferred");
        handle
    }
}

impl<R: Resource> Drop for Owned<R> {
    fn drop(&mut self) {
        let handle = std::mem::replace(self.handle.get_mut(), R::invalid());
        if handle.is_valid() {
            unsafe { handle.destroy(&*self.boundary) };
            debug!(kind = R::KIND, handle = handle.as_raw(), "released on drop");
        }
    }
}

impl<R: Resource> fmt::Debug for Owned<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(R::KIND)
            .field("handle", &self.raw().as_raw())
            .finish()
    }
}
