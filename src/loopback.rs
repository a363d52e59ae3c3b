//! In-process native side.
//!
//! [`LoopbackBoundary`] keeps parameter blocks in memory and books every
//! allocation and deallocation, so hosts without libopal (and the test suite)
//! can drive the wrappers and check that each handle is freed exactly once.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{error, trace};

use crate::boundary::{Boundary, ProductCode, ProductText, ProtocolText};
use crate::error::Result;
use crate::ffi::{OpalParamProtocolPtr, OpalProductDescriptionPtr};
use crate::types::LibraryVersion;

/// Allocation counters of a [`LoopbackBoundary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopbackStats {
    /// `new_param_protocol` calls that succeeded.
    pub param_protocols_created: usize,
    /// `delete_param_protocol` calls on live handles.
    pub param_protocols_deleted: usize,
    /// `new_product_description` calls that succeeded.
    pub products_created: usize,
    /// `delete_product_description` calls on live standalone handles.
    pub products_deleted: usize,
    /// Deletes of a handle that was already freed.
    pub double_frees: usize,
    /// Calls naming a handle the boundary never handed out, or a product
    /// deleted while still embedded in a parameter block.
    pub invalid_accesses: usize,
}

#[derive(Debug, Default, Clone)]
struct ProtocolRecord {
    prefix: String,
    user_name: String,
    display_name: String,
    interface_addresses: String,
    default_options: String,
    user_input_mode: i32,
    product: u64,
}

impl ProtocolRecord {
    fn text_mut(&mut self, field: ProtocolText) -> &mut String {
        match field {
            ProtocolText::Prefix => &mut self.prefix,
            ProtocolText::UserName => &mut self.user_name,
            ProtocolText::DisplayName => &mut self.display_name,
            ProtocolText::InterfaceAddresses => &mut self.interface_addresses,
            ProtocolText::DefaultOptions => &mut self.default_options,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ProductRecord {
    vendor: String,
    name: String,
    version: String,
    t35_country_code: u32,
    t35_extension: u32,
    manufacturer_code: u32,
    embedded: bool,
}

impl ProductRecord {
    fn text_mut(&mut self, field: ProductText) -> &mut String {
        match field {
            ProductText::Vendor => &mut self.vendor,
            ProductText::Name => &mut self.name,
            ProductText::Version => &mut self.version,
        }
    }

    fn code_mut(&mut self, field: ProductCode) -> &mut u32 {
        match field {
            ProductCode::T35CountryCode => &mut self.t35_country_code,
            ProductCode::T35Extension => &mut self.t35_extension,
            ProductCode::ManufacturerCode => &mut self.manufacturer_code,
        }
    }

    /// Copy the value fields, keeping placement.
    fn assign(&mut self, other: &ProductRecord) {
        let embedded = self.embedded;
        *self = other.clone();
        self.embedded = embedded;
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    protocols: HashMap<u64, ProtocolRecord>,
    products: HashMap<u64, ProductRecord>,
    deletes: HashMap<u64, usize>,
    fail_allocations: usize,
    stats: LoopbackStats,
}

impl State {
    fn allocate_id(&mut self) -> Option<u64> {
        if self.fail_allocations > 0 {
            self.fail_allocations -= 1;
            return None;
        }
        self.next_id += 1;
        Some(self.next_id)
    }

    fn protocol(&mut self, p: OpalParamProtocolPtr) -> Option<&mut ProtocolRecord> {
        if !self.protocols.contains_key(&p.as_raw()) {
            error!(handle = p.as_raw(), "access to unknown OpalParamProtocol");
            self.stats.invalid_accesses += 1;
        }
        self.protocols.get_mut(&p.as_raw())
    }

    fn product(&mut self, p: OpalProductDescriptionPtr) -> Option<&mut ProductRecord> {
        if !self.products.contains_key(&p.as_raw()) {
            error!(handle = p.as_raw(), "access to unknown OpalProductDescription");
            self.stats.invalid_accesses += 1;
        }
        self.products.get_mut(&p.as_raw())
    }

    /// Book a delete and report whether it is the first one for `raw`.
    fn record_delete(&mut self, raw: u64, kind: &'static str) -> bool {
        let count = self.deletes.entry(raw).or_insert(0);
        *count += 1;
        if *count > 1 {
            error!(handle = raw, kind, count = *count, "double free");
            self.stats.double_frees += 1;
            return false;
        }
        true
    }
}

/// A [`Boundary`] that lives entirely in process.
///
/// Parameter blocks start zeroed, like the native structure: empty texts,
/// `OpalUserInputDefault`, and an embedded product description with empty
/// texts and zero codes. Handles are never reused.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use opal::{LoopbackBoundary, ParamProtocol};
///
/// let boundary = Arc::new(LoopbackBoundary::new());
/// let params = ParamProtocol::with_boundary(boundary.clone())?;
/// params.set_prefix("sip")?;
/// drop(params);
///
/// assert_eq!(boundary.stats().param_protocols_deleted, 1);
/// # Ok::<(), opal::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct LoopbackBoundary {
    state: Mutex<State>,
}

impl LoopbackBoundary {
    /// Create an empty boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` create calls return an invalid handle.
    pub fn fail_next_allocations(&self, count: usize) {
        self.state.lock().fail_allocations = count;
    }

    /// Snapshot of the allocation counters.
    pub fn stats(&self) -> LoopbackStats {
        self.state.lock().stats
    }

    /// Number of delete calls seen for a raw handle.
    pub fn delete_count(&self, raw: u64) -> usize {
        self.state.lock().deletes.get(&raw).copied().unwrap_or(0)
    }

    /// Number of parameter blocks allocated and not yet freed.
    pub fn live_param_protocols(&self) -> usize {
        self.state.lock().protocols.len()
    }

    /// Number of product descriptions (standalone or embedded) not yet freed.
    pub fn live_products(&self) -> usize {
        self.state.lock().products.len()
    }

    /// Free the product description embedded in `p`, leaving a null product
    /// handle behind, as a native block built without product info has.
    pub fn detach_product(&self, p: OpalParamProtocolPtr) {
        let mut state = self.state.lock();
        let product = match state.protocol(p) {
            Some(record) => std::mem::take(&mut record.product),
            None => return,
        };
        state.products.remove(&product);
    }
}

impl Boundary for LoopbackBoundary {
    fn version(&self) -> LibraryVersion {
        LibraryVersion::BINDING
    }

    fn new_param_protocol(&self) -> OpalParamProtocolPtr {
        let mut state = self.state.lock();
        let (Some(id), Some(product)) = (state.allocate_id(), state.allocate_id()) else {
            return OpalParamProtocolPtr::invalid();
        };
        state.products.insert(
            product,
            ProductRecord {
                embedded: true,
                ..Default::default()
            },
        );
        state.protocols.insert(
            id,
            ProtocolRecord {
                product,
                ..Default::default()
            },
        );
        state.stats.param_protocols_created += 1;
        OpalParamProtocolPtr::from_raw(id)
    }

    unsafe fn delete_param_protocol(&self, p: OpalParamProtocolPtr) {
        let mut state = self.state.lock();
        if !state.record_delete(p.as_raw(), OpalParamProtocolPtr::KIND) {
            return;
        }
        match state.protocols.remove(&p.as_raw()) {
            Some(record) => {
                state.products.remove(&record.product);
                state.stats.param_protocols_deleted += 1;
            }
            None => {
                error!(handle = p.as_raw(), "delete of unknown OpalParamProtocol");
                state.stats.invalid_accesses += 1;
            }
        }
    }

    unsafe fn param_protocol_text(&self, p: OpalParamProtocolPtr, field: ProtocolText) -> String {
        trace!(handle = p.as_raw(), field = field.name(), "get");
        let mut state = self.state.lock();
        state
            .protocol(p)
            .map(|record| record.text_mut(field).clone())
            .unwrap_or_default()
    }

    unsafe fn set_param_protocol_text(
        &self,
        p: OpalParamProtocolPtr,
        field: ProtocolText,
        value: &str,
    ) -> Result<()> {
        trace!(handle = p.as_raw(), field = field.name(), "set");
        let mut state = self.state.lock();
        if let Some(record) = state.protocol(p) {
            *record.text_mut(field) = value.to_string();
        }
        Ok(())
    }

    unsafe fn param_protocol_product(&self, p: OpalParamProtocolPtr) -> OpalProductDescriptionPtr {
        let mut state = self.state.lock();
        state
            .protocol(p)
            .map(|record| OpalProductDescriptionPtr::from_raw(record.product))
            .unwrap_or_default()
    }

    unsafe fn set_param_protocol_product(
        &self,
        p: OpalParamProtocolPtr,
        value: OpalProductDescriptionPtr,
    ) {
        let mut state = self.state.lock();
        let Some(source) = state.product(value).cloned() else {
            return;
        };
        let Some(current) = state.protocol(p).map(|record| record.product) else {
            return;
        };
        if current == value.as_raw() {
            return;
        }

        let target = if current != 0 {
            current
        } else {
            // A detached block gets a fresh embedded product.
            let Some(id) = state.allocate_id() else {
                return;
            };
            state.products.insert(
                id,
                ProductRecord {
                    embedded: true,
                    ..Default::default()
                },
            );
            if let Some(record) = state.protocols.get_mut(&p.as_raw()) {
                record.product = id;
            }
            id
        };

        if let Some(record) = state.products.get_mut(&target) {
            record.assign(&source);
        }
    }

    unsafe fn param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr) -> i32 {
        let mut state = self.state.lock();
        state
            .protocol(p)
            .map(|record| record.user_input_mode)
            .unwrap_or_default()
    }

    unsafe fn set_param_protocol_user_input_mode(&self, p: OpalParamProtocolPtr, value: i32) {
        let mut state = self.state.lock();
        if let Some(record) = state.protocol(p) {
            record.user_input_mode = value;
        }
    }

    fn new_product_description(&self) -> OpalProductDescriptionPtr {
        let mut state = self.state.lock();
        let Some(id) = state.allocate_id() else {
            return OpalProductDescriptionPtr::invalid();
        };
        state.products.insert(id, ProductRecord::default());
        state.stats.products_created += 1;
        OpalProductDescriptionPtr::from_raw(id)
    }

    unsafe fn delete_product_description(&self, p: OpalProductDescriptionPtr) {
        let mut state = self.state.lock();
        let embedded = state.products.get(&p.as_raw()).map(|record| record.embedded);
        if embedded == Some(true) {
            error!(handle = p.as_raw(), "delete of embedded OpalProductDescription");
            state.stats.invalid_accesses += 1;
            return;
        }
        if !state.record_delete(p.as_raw(), OpalProductDescriptionPtr::KIND) {
            return;
        }
        match state.products.remove(&p.as_raw()) {
            Some(_) => state.stats.products_deleted += 1,
            None => {
                error!(handle = p.as_raw(), "delete of unknown OpalProductDescription");
                state.stats.invalid_accesses += 1;
            }
        }
    }

    unsafe fn product_text(&self, p: OpalProductDescriptionPtr, field: ProductText) -> String {
        trace!(handle = p.as_raw(), field = field.name(), "get");
        let mut state = self.state.lock();
        state
            .product(p)
            .map(|record| record.text_mut(field).clone())
            .unwrap_or_default()
    }

    unsafe fn set_product_text(
        &self,
        p: OpalProductDescriptionPtr,
        field: ProductText,
        value: &str,
    ) -> Result<()> {
        trace!(handle = p.as_raw(), field = field.name(), "set");
        let mut state = self.state.lock();
        if let Some(record) = state.product(p) {
            *record.text_mut(field) = value.to_string();
        }
        Ok(())
    }

    unsafe fn product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode) -> u32 {
        let mut state = self.state.lock();
        state
            .product(p)
            .map(|record| *record.code_mut(field))
            .unwrap_or_default()
    }

    unsafe fn set_product_code(&self, p: OpalProductDescriptionPtr, field: ProductCode, value: u32) {
        let mut state = self.state.lock();
        if let Some(record) = state.product(p) {
            *record.code_mut(field) = value;
        }
    }
}
