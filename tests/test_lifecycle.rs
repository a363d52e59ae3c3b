//! Ownership and release tests against the in-process boundary.

use std::sync::Arc;

use opal::ffi::{OpalParamProtocolPtr, OpalProductDescriptionPtr};
use opal::{Boundary, Error, LoopbackBoundary, ParamProtocol, ProductDescription};

fn boundary() -> Arc<LoopbackBoundary> {
    Arc::new(LoopbackBoundary::new())
}

#[test]
fn test_release_twice_frees_once() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    let raw = params.raw();
    assert!(raw.is_valid(), "fresh block should have a handle");

    assert!(params.release(), "first release should free");
    assert!(!params.release(), "second release should be a no-op");
    assert!(params.is_released());
    assert!(!params.raw().is_valid(), "handle should read as invalid");

    drop(params);

    assert_eq!(boundary.delete_count(raw.as_raw()), 1);
    assert_eq!(boundary.stats().double_frees, 0);
    assert_eq!(boundary.live_param_protocols(), 0);
}

#[test]
fn test_drop_frees() {
    let boundary = boundary();
    {
        let _params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
        let _product = ProductDescription::with_boundary(boundary.clone()).expect("allocate");
        assert_eq!(boundary.live_param_protocols(), 1);
    }

    let stats = boundary.stats();
    assert_eq!(stats.param_protocols_deleted, 1);
    assert_eq!(stats.products_deleted, 1);
    assert_eq!(boundary.live_products(), 0);
}

#[test]
fn test_accessors_after_release() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    params.release();

    assert!(params.prefix().unwrap_err().is_use_after_release());
    assert!(params.set_display_name("Bob").unwrap_err().is_use_after_release());
    assert!(params.user_input_mode().unwrap_err().is_use_after_release());
    assert!(params.product().unwrap_err().is_use_after_release());
    assert!(params.to_options().unwrap_err().is_use_after_release());

    // Nothing reached the native side with a dead handle
    assert_eq!(boundary.stats().invalid_accesses, 0);
}

#[test]
fn test_borrowed_product_never_frees() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");

    for _ in 0..3 {
        let product = params.product().expect("product").expect("embedded product");
        product.set_name("softphone").expect("set name");
        drop(product);
    }

    let stats = boundary.stats();
    assert_eq!(stats.products_deleted, 0);
    assert_eq!(stats.invalid_accesses, 0);
    assert_eq!(boundary.live_products(), 1);
}

#[test]
fn test_borrowed_product_after_parent_release() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    let product = params.product().expect("product").expect("embedded product");

    params.release();

    let err = product.vendor().unwrap_err();
    assert!(err.is_use_after_release(), "got {:?}", err);
    assert_eq!(err.to_string(), "OpalParamProtocol used after release");
    assert_eq!(boundary.stats().invalid_accesses, 0);
}

#[test]
fn test_null_product_is_absent() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    boundary.detach_product(params.raw());

    assert!(params.product().expect("product").is_none());
    assert_eq!(params.product_info().expect("product info"), None);
}

#[test]
fn test_allocation_failure() {
    let boundary = boundary();
    boundary.fail_next_allocations(1);

    let err = ParamProtocol::with_boundary(boundary.clone()).unwrap_err();
    assert!(err.is_allocation_failed());
    assert_eq!(err.to_string(), "failed to allocate OpalParamProtocol");

    boundary.fail_next_allocations(1);
    let err = ProductDescription::with_boundary(boundary.clone()).unwrap_err();
    assert!(err.is_allocation_failed());

    // The boundary recovers once the injected failures are used up
    assert!(ParamProtocol::with_boundary(boundary.clone()).is_ok());
}

#[test]
fn test_ownership_transfer() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    params.set_prefix("h323").expect("set prefix");

    let raw = params.into_raw();
    assert_eq!(boundary.delete_count(raw.as_raw()), 0, "into_raw must not free");
    assert_eq!(boundary.live_param_protocols(), 1);

    let adopted = unsafe { ParamProtocol::from_raw(boundary.clone(), raw) };
    assert_eq!(adopted.prefix().expect("prefix"), "h323");
    drop(adopted);

    assert_eq!(boundary.delete_count(raw.as_raw()), 1);
    assert_eq!(boundary.live_param_protocols(), 0);
}

#[test]
fn test_adopt_null_handle() {
    let boundary = boundary();
    let params = unsafe { ParamProtocol::from_raw(boundary.clone(), OpalParamProtocolPtr::invalid()) };
    assert!(params.is_released());
    assert!(!params.release());

    let product = unsafe {
        ProductDescription::from_raw(boundary.clone(), OpalProductDescriptionPtr::invalid())
    };
    assert!(product.name().unwrap_err().is_use_after_release());
    drop(product);

    assert_eq!(boundary.stats().double_frees, 0);
    assert_eq!(boundary.stats().invalid_accesses, 0);
}

#[test]
fn test_adopt_standalone_product() {
    let boundary = boundary();
    let raw = boundary.new_product_description();

    let product = unsafe { ProductDescription::from_raw(boundary.clone(), raw) };
    product.set_vendor("Example Ltd").expect("set vendor");
    assert!(product.release());
    assert!(!product.release());

    assert_eq!(boundary.delete_count(raw.as_raw()), 1);
}

#[test]
fn test_set_product_from_released_description() {
    let boundary = boundary();
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    let product = ProductDescription::with_boundary(boundary.clone()).expect("allocate");
    product.release();

    let err = params.set_product(&product).unwrap_err();
    assert!(err.is_use_after_release());
    assert_eq!(err.to_string(), "OpalProductDescription used after release");
}

#[test]
fn test_set_product_rejects_other_boundary() {
    let boundary_a = boundary();
    let boundary_b = boundary();
    let product_a = ProductDescription::with_boundary(boundary_a.clone()).expect("allocate");
    product_a.set_name("from-a").expect("set name");
    let product_b = ProductDescription::with_boundary(boundary_b.clone()).expect("allocate");
    product_b.set_name("from-b").expect("set name");
    let params_b = ParamProtocol::with_boundary(boundary_b.clone()).expect("allocate");

    let err = params_b.set_product(&product_a).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(params_b.product_info().expect("read").expect("embedded product").name, "");
    assert_eq!(boundary_a.stats().invalid_accesses, 0);
    assert_eq!(boundary_b.stats().invalid_accesses, 0);

    params_b.set_product(&product_b).expect("same boundary");
    assert_eq!(params_b.product_info().expect("read").expect("embedded product").name, "from-b");
}
