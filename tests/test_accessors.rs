//! Field round-trip tests against the in-process boundary.

use std::sync::Arc;

use opal::{
    Boundary, Error, LoopbackBoundary, ParamProtocol, ProductDescription, ProductInfo,
    ProtocolOptions, UserInputMode, ALL_INTERFACES,
};

fn params() -> (Arc<LoopbackBoundary>, ParamProtocol) {
    let boundary = Arc::new(LoopbackBoundary::new());
    let params = ParamProtocol::with_boundary(boundary.clone()).expect("allocate");
    (boundary, params)
}

fn sample_texts() -> Vec<String> {
    vec![
        String::new(),
        "sip".to_string(),
        "Zoë Ångström".to_string(),
        "x".repeat(64 * 1024),
    ]
}

#[test]
fn test_text_round_trip() {
    let (_, params) = params();

    type Get = fn(&ParamProtocol) -> opal::Result<String>;
    type Set = fn(&ParamProtocol, &str) -> opal::Result<()>;
    let fields: [(&str, Get, Set); 5] = [
        ("prefix", ParamProtocol::prefix, ParamProtocol::set_prefix),
        ("userName", ParamProtocol::user_name, ParamProtocol::set_user_name),
        ("displayName", ParamProtocol::display_name, ParamProtocol::set_display_name),
        (
            "interfaceAddresses",
            ParamProtocol::interface_addresses,
            ParamProtocol::set_interface_addresses,
        ),
        (
            "defaultOptions",
            ParamProtocol::default_options,
            ParamProtocol::set_default_options,
        ),
    ];

    for (name, get, set) in fields {
        for value in sample_texts() {
            set(&params, &value).unwrap_or_else(|e| panic!("set {} failed: {}", name, e));
            assert_eq!(get(&params).expect("get"), value, "field {}", name);
        }
    }
}

#[test]
fn test_fields_are_independent() {
    let (_, params) = params();
    params.set_prefix("sip").unwrap();
    params.set_user_name("alice").unwrap();
    params.set_display_name("Alice Liddell").unwrap();

    assert_eq!(params.prefix().unwrap(), "sip");
    assert_eq!(params.user_name().unwrap(), "alice");
    assert_eq!(params.display_name().unwrap(), "Alice Liddell");
}

#[test]
fn test_user_input_mode_round_trip() {
    let (_, params) = params();
    for mode in UserInputMode::ALL {
        params.set_user_input_mode(mode).unwrap();
        assert_eq!(params.user_input_mode().unwrap(), mode);
    }
}

#[test]
fn test_user_input_mode_out_of_range() {
    let (boundary, params) = params();
    params.set_user_input_mode(UserInputMode::AsTone).unwrap();

    for raw in [6, -1, 1000] {
        unsafe { boundary.set_param_protocol_user_input_mode(params.raw(), raw) };
        let err = params.user_input_mode().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidEnumValue {
                name: "OpalUserInputModes",
                value: raw
            },
            "raw value {} must not be coerced",
            raw
        );
    }
}

#[test]
fn test_interface_address_list() {
    let (_, params) = params();
    params
        .set_interface_address_list(&["192.168.1.2:5060", "[::1]:5060"])
        .unwrap();
    assert_eq!(params.interface_addresses().unwrap(), "192.168.1.2:5060\n[::1]:5060");
    assert_eq!(
        params.interface_address_list().unwrap(),
        vec!["192.168.1.2:5060", "[::1]:5060"]
    );

    params.set_interface_address_list(&[ALL_INTERFACES]).unwrap();
    assert_eq!(params.interface_address_list().unwrap(), vec!["*"]);
}

#[test]
fn test_default_option_pairs() {
    let (_, params) = params();
    params
        .set_default_option_pairs(&[("Disable-Jitter", "1"), ("AutoStart", "video:no")])
        .unwrap();

    assert_eq!(
        params.default_options().unwrap(),
        "Disable-Jitter=1\nAutoStart=video:no"
    );
    assert_eq!(
        params.default_option_pairs().unwrap(),
        vec![
            ("Disable-Jitter".to_string(), "1".to_string()),
            ("AutoStart".to_string(), "video:no".to_string()),
        ]
    );
}

#[test]
fn test_default_option_pairs_keep_whitespace() {
    let (_, params) = params();
    params
        .set_default_option_pairs(&[("a ", "1"), ("b", " x ")])
        .unwrap();

    assert_eq!(
        params.default_option_pairs().unwrap(),
        vec![
            ("a ".to_string(), "1".to_string()),
            ("b".to_string(), " x ".to_string()),
        ]
    );
}

#[test]
fn test_embedded_product_writes_through() {
    let (_, params) = params();
    {
        let product = params.product().unwrap().expect("embedded product");
        product.set_vendor("Vox Lucida").unwrap();
        product.set_manufacturer_code(61).unwrap();
    }

    let again = params.product().unwrap().expect("embedded product");
    assert_eq!(again.vendor().unwrap(), "Vox Lucida");
    assert_eq!(again.manufacturer_code().unwrap(), 61);
}

#[test]
fn test_set_product_copies() {
    let (boundary, params) = params();
    let info = ProductInfo {
        vendor: "Example Ltd".to_string(),
        name: "softphone".to_string(),
        version: "2.0".to_string(),
        t35_country_code: 181,
        t35_extension: 0,
        manufacturer_code: 4242,
    };
    let standalone = ProductDescription::from_info(boundary.clone(), &info).unwrap();

    params.set_product(&standalone).unwrap();
    assert_eq!(params.product_info().unwrap(), Some(info.clone()));

    // The block holds a copy, not the caller's description
    standalone.set_name("changed").unwrap();
    assert_eq!(params.product_info().unwrap().unwrap().name, "softphone");

    drop(standalone);
    assert_eq!(params.product_info().unwrap(), Some(info));
    assert_eq!(boundary.stats().invalid_accesses, 0);
}

#[test]
fn test_options_round_trip() {
    let boundary = Arc::new(LoopbackBoundary::new());
    let options = ProtocolOptions {
        prefix: Some("sip".to_string()),
        user_name: Some("alice".to_string()),
        display_name: Some("Alice".to_string()),
        product: Some(ProductInfo {
            vendor: "Example Ltd".to_string(),
            name: "softphone".to_string(),
            version: "1.0".to_string(),
            ..Default::default()
        }),
        interface_addresses: Some(vec!["10.0.0.1:5060".to_string()]),
        user_input_mode: Some(UserInputMode::AsString),
        default_options: Some(vec![("Disable-Jitter".to_string(), "1".to_string())]),
    };

    let params = ParamProtocol::with_options(boundary, &options).unwrap();
    assert_eq!(params.to_options().unwrap(), options);
}

#[test]
fn test_partial_options_keep_other_fields() {
    let (_, params) = params();
    params.set_user_name("alice").unwrap();

    params
        .apply(&ProtocolOptions {
            prefix: Some("iax2".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(params.prefix().unwrap(), "iax2");
    assert_eq!(params.user_name().unwrap(), "alice");
}
