//! Demo premium bundle.
//!
//! A minimal bundle exercising the export surface: two capabilities and a
//! setup hook. Build it as a cdylib and point the loader's `local_bundle`
//! development override at the produced library:
//!
//! ```text
//! cargo build -p folio-demo-bundle
//! # then set local_bundle = target/debug/libfolio_demo_bundle.so
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use folio_premium_sdk::prelude::*;
use folio_premium_sdk::declare_bundle;
use serde_json::json;

static SETUP_DONE: AtomicBool = AtomicBool::new(false);

fn render_statistics(props: &Value) -> BundleResult<Value> {
    let currency = props
        .get("currency")
        .and_then(|v| v.as_str())
        .unwrap_or("USD");
    Ok(json!({
        "component": "PremiumStatistics",
        "currency": currency,
        "panels": ["net-value", "asset-distribution", "historic-events"],
    }))
}

fn render_theme_manager(props: &Value) -> BundleResult<Value> {
    let scheme = props
        .get("scheme")
        .and_then(|v| v.as_str())
        .unwrap_or("light");
    if scheme != "light" && scheme != "dark" {
        return Err(BundleError::InvalidProps(format!(
            "unknown scheme: {scheme}"
        )));
    }
    Ok(json!({
        "component": "ThemeManager",
        "scheme": scheme,
        "setup_done": SETUP_DONE.load(Ordering::SeqCst),
    }))
}

/// # Safety
/// Called by the host with a valid props buffer and out pointer.
#[no_mangle]
pub unsafe extern "C" fn demo_render_statistics(
    props: *const u8,
    props_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    render_entry(props, props_len, out_len, render_statistics)
}

/// # Safety
/// Called by the host with a valid props buffer and out pointer.
#[no_mangle]
pub unsafe extern "C" fn demo_render_theme_manager(
    props: *const u8,
    props_len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    render_entry(props, props_len, out_len, render_theme_manager)
}

/// # Safety
/// `buf` and `len` must come from one of the render entry points above.
#[no_mangle]
pub unsafe extern "C" fn demo_release(buf: *mut u8, len: usize) {
    release_buffer(buf, len)
}

extern "C" fn demo_setup() {
    SETUP_DONE.store(true, Ordering::SeqCst);
}

fn bundle_spec() -> BundleSpec {
    BundleSpec::new("PremiumComponentsDemo", "0.3.0")
        .with_capability("PremiumStatistics", demo_render_statistics)
        .with_capability("ThemeManager", demo_render_theme_manager)
        .with_setup(demo_setup)
        .with_release(demo_release)
}

declare_bundle!(bundle_spec);
