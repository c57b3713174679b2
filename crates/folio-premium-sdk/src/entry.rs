//! Helpers for implementing render entry points inside a bundle.
//!
//! A bundle author writes safe render functions over `serde_json::Value`
//! and bridges them to the raw entry-point convention with [`render_entry`]
//! and [`release_buffer`].

use serde_json::Value;

use crate::error::BundleError;

/// Bridge a safe render closure to the raw entry-point convention.
///
/// Returns an owned JSON buffer the host hands back to the bundle's
/// release entry point, or null when the props are unreadable or the
/// closure fails.
///
/// # Safety
/// `props` must be valid for reads of `props_len` bytes and `out_len`
/// must be valid for writes.
pub unsafe fn render_entry<F>(
    props: *const u8,
    props_len: usize,
    out_len: *mut usize,
    render: F,
) -> *mut u8
where
    F: FnOnce(&Value) -> Result<Value, BundleError>,
{
    if props.is_null() || out_len.is_null() {
        return std::ptr::null_mut();
    }
    let raw = std::slice::from_raw_parts(props, props_len);
    let props: Value = match serde_json::from_slice(raw) {
        Ok(value) => value,
        Err(_) => return std::ptr::null_mut(),
    };
    let rendered = match render(&props) {
        Ok(value) => value,
        Err(_) => return std::ptr::null_mut(),
    };
    let bytes = match serde_json::to_vec(&rendered) {
        Ok(bytes) => bytes,
        Err(_) => return std::ptr::null_mut(),
    };
    let boxed = bytes.into_boxed_slice();
    *out_len = boxed.len();
    Box::into_raw(boxed) as *mut u8
}

/// Release a buffer produced by [`render_entry`].
///
/// # Safety
/// `buf` and `len` must come from a single prior `render_entry` call and
/// must not be used again afterwards.
pub unsafe fn release_buffer(buf: *mut u8, len: usize) {
    if buf.is_null() {
        return;
    }
    let slice = std::ptr::slice_from_raw_parts_mut(buf, len);
    drop(Box::from_raw(slice));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_entry_round_trip() {
        let props = serde_json::to_vec(&json!({"currency": "EUR"})).unwrap();
        let mut out_len = 0usize;

        let out = unsafe {
            render_entry(props.as_ptr(), props.len(), &mut out_len, |props| {
                Ok(json!({"echo": props["currency"]}))
            })
        };
        assert!(!out.is_null());

        let bytes = unsafe { std::slice::from_raw_parts(out, out_len).to_vec() };
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"echo": "EUR"}));

        unsafe { release_buffer(out, out_len) };
    }

    #[test]
    fn test_render_entry_failure_is_null() {
        let props = serde_json::to_vec(&json!({})).unwrap();
        let mut out_len = 0usize;

        let out = unsafe {
            render_entry(props.as_ptr(), props.len(), &mut out_len, |_| {
                Err(BundleError::Render("nope".to_string()))
            })
        };
        assert!(out.is_null());
    }

    #[test]
    fn test_render_entry_bad_props_is_null() {
        let props = b"not json";
        let mut out_len = 0usize;

        let out = unsafe {
            render_entry(props.as_ptr(), props.len(), &mut out_len, |_| {
                Ok(json!({}))
            })
        };
        assert!(out.is_null());
    }
}
