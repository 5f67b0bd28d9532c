//! Build script for opennsl-sdk.
//!
//! With the `opennsl-link` feature enabled, links the vendor `libopennsl`.
//! `OPENNSL_LIB_DIR` adds a search path for it.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OPENNSL_LIB_DIR");

    if env::var_os("CARGO_FEATURE_OPENNSL_LINK").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("OPENNSL_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=opennsl");
}
