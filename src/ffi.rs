//! FFI interface for C and C++ callers
//!
//! The request and the result both travel as JSON, so the C side only ever
//! handles strings.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use tracing::warn;

use crate::error::ScrapeError;
use crate::request::scrape_json;
use crate::LOG_TARGET;

/// Result struct returned to C.
/// Both pointers are owned by Rust and must be freed via `free_scrape_result`.
#[repr(C)]
pub struct ScrapeResultFFI {
    /// JSON-serialized `ScrapeOutcome` (null-terminated), or null on failure
    pub json_ptr: *mut c_char,
    /// Error message if the request could not be run (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Run a JSON scrape request against HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON-serialized `ScrapeRequest` (null-terminated)
///
/// Binding failures are part of the JSON outcome in every mode. `error_ptr`
/// is only set when the request cannot be run at all.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_scrape_result`
#[no_mangle]
pub unsafe extern "C" fn scrape_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> ScrapeResultFFI {
    if html_ptr.is_null() {
        return make_error_result(&ScrapeError::NilInput { name: "html".into() });
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    let Ok(html) = std::str::from_utf8(slice) else {
        return make_error_message("Invalid UTF-8 in HTML content");
    };

    if request_json.is_null() {
        return make_error_result(&ScrapeError::NilInput {
            name: "request".into(),
        });
    }
    let Ok(request) = CStr::from_ptr(request_json).to_str() else {
        return make_error_message("Invalid UTF-8 in request JSON");
    };

    match scrape_json(html, request) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ScrapeResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_message("Result JSON contains null bytes"),
        },
        Err(err) => make_error_result(&err),
    }
}

/// Free a `ScrapeResultFFI` returned by `scrape_from_html`.
///
/// # Safety
/// - `result` must have been returned by `scrape_from_html`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_scrape_result(result: ScrapeResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn make_error_result(err: &ScrapeError) -> ScrapeResultFFI {
    warn!(target: LOG_TARGET, error = %err, "scrape request failed");
    make_error_message(&err.to_string())
}

fn make_error_message(msg: &str) -> ScrapeResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ScrapeResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn call(html: &str, request: &str) -> (Option<String>, Option<String>) {
        let request = CString::new(request).unwrap();
        let result = scrape_from_html(html.as_ptr() as *const c_char, html.len(), request.as_ptr());
        let json = (!result.json_ptr.is_null())
            .then(|| CStr::from_ptr(result.json_ptr).to_string_lossy().into_owned());
        let error = (!result.error_ptr.is_null())
            .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
        free_scrape_result(result);
        (json, error)
    }

    #[test]
    fn test_scrape_from_html_success() {
        let (json, error) = unsafe {
            call(
                r#"<a href="/x">x</a>"#,
                r#"{ "select": "a", "extract": "@href" }"#,
            )
        };
        assert_eq!(json.as_deref(), Some(r#"{"value":"/x"}"#));
        assert!(error.is_none());
    }

    #[test]
    fn test_strict_failure_is_in_outcome() {
        let (json, error) = unsafe { call("<p>x</p>", r#"{ "select": ".absent", "extract": "text" }"#) };
        assert!(error.is_none());
        assert_eq!(
            json.as_deref(),
            Some(r#"{"value":"","errors":["no nodes found by selector \".absent\""]}"#)
        );
    }

    #[test]
    fn test_nil_inputs() {
        let request = CString::new("{}").unwrap();
        unsafe {
            let result = scrape_from_html(ptr::null(), 0, request.as_ptr());
            assert!(result.json_ptr.is_null());
            assert_eq!(CStr::from_ptr(result.error_ptr).to_str().unwrap(), "html is nil");
            free_scrape_result(result);

            let html = "<p></p>";
            let result = scrape_from_html(html.as_ptr() as *const c_char, html.len(), ptr::null());
            assert_eq!(CStr::from_ptr(result.error_ptr).to_str().unwrap(), "request is nil");
            free_scrape_result(result);
        }
    }

    #[test]
    fn test_bad_request_json() {
        let (json, error) = unsafe { call("<p></p>", "not json") };
        assert!(json.is_none());
        assert!(error.unwrap().starts_with("invalid request:"));
    }
}
