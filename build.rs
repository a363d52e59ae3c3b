//! Build script for opal-params crate.
//!
//! With the `native` feature, links the opalshim C library (built from
//! `shim/`) and the libopal it wraps. Without the feature the crate is pure
//! Rust and nothing is linked.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=OPAL_SHIM_LIB_DIR");
    println!("cargo:rerun-if-env-changed=OPAL_LIB_DIR");
    println!("cargo:rerun-if-env-changed=OPAL_STATIC");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    add_search_dir("OPAL_SHIM_LIB_DIR");
    add_search_dir("OPAL_LIB_DIR");

    let link_static = env::var("OPAL_STATIC").map(|v| v == "1").unwrap_or(false);
    if link_static {
        println!("cargo:rustc-link-lib=static=opalshim");
        println!("cargo:rustc-link-lib=static=opal");
        println!("cargo:rustc-link-lib=static=pt");
        link_system_libs();
    } else {
        println!("cargo:rustc-link-lib=dylib=opalshim");
        println!("cargo:rustc-link-lib=dylib=opal");
    }
}

fn add_search_dir(var: &str) {
    if let Some(dir) = env::var_os(var) {
        let lib_dir = PathBuf::from(dir);
        if !lib_dir.exists() {
            panic!("{} points at {}, which does not exist", var, lib_dir.display());
        }
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }
}

/// Static opalshim and libopal pull in the C++ runtime.
fn link_system_libs() {
    #[cfg(target_os = "macos")]
    {
        println!("cargo:rustc-link-lib=dylib=c++");
        println!("cargo:rustc-link-lib=framework=CoreFoundation");
    }

    #[cfg(target_os = "linux")]
    {
        println!("cargo:rustc-link-lib=dylib=stdc++");
        println!("cargo:rustc-link-lib=pthread");
        println!("cargo:rustc-link-lib=dl");
    }

    #[cfg(target_os = "windows")]
    {
        println!("cargo:rustc-link-lib=ws2_32");
        println!("cargo:rustc-link-lib=advapi32");
    }
}
