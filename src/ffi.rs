//! C ABI for hosts that load the library dynamically.
//!
//! Every string returned by `adapterAlignment` is owned by the caller and
//! must be handed back to `freeCString` exactly once.

use std::ffi::{c_char, c_int, CStr, CString};
use std::ptr;

use log::warn;

use crate::{adapter_alignment, AdapterAlignError, ScoringScheme};

/// Borrows a NUL-terminated sequence; null reads as empty.
unsafe fn sequence<'a>(seq: *const c_char, which: &str) -> &'a [u8] {
    if seq.is_null() {
        warn!("null {which} sequence passed across the C boundary, treating as empty");
        return &[];
    }
    let bytes = CStr::from_ptr(seq).to_bytes();
    if std::str::from_utf8(bytes).is_err() {
        warn!("{which} sequence is not valid UTF-8, unrecognised bytes will never match");
    }
    bytes
}

fn record(read: &[u8], adapter: &[u8], scoring: &ScoringScheme) -> Result<CString, AdapterAlignError> {
    let result = adapter_alignment(read, adapter, scoring);
    Ok(CString::new(result.to_string())?)
}

/// Aligns `read_seq` against `adapter_seq` and returns the comma-separated
/// statistics record as a newly allocated C string, or null if the record
/// could not be built.
///
/// # Safety
///
/// Both pointers must be null or point to NUL-terminated strings that stay
/// valid for the duration of the call.
#[export_name = "adapterAlignment"]
pub unsafe extern "C" fn adapter_alignment_c(
    read_seq: *const c_char,
    adapter_seq: *const c_char,
    match_score: c_int,
    mismatch_score: c_int,
    gap_open_score: c_int,
    gap_extension_score: c_int,
) -> *mut c_char {
    let read = sequence(read_seq, "read");
    let adapter = sequence(adapter_seq, "adapter");
    let scoring = ScoringScheme::new(match_score, mismatch_score, gap_open_score, gap_extension_score);

    match record(read, adapter, &scoring) {
        Ok(record) => record.into_raw(),
        Err(e) => {
            warn!("{e}");
            ptr::null_mut()
        }
    }
}

/// Releases a string returned by `adapterAlignment`. Null is ignored.
///
/// # Safety
///
/// `p` must be null or a pointer obtained from `adapterAlignment` that has
/// not been freed yet.
#[export_name = "freeCString"]
pub unsafe extern "C" fn free_c_string(p: *mut c_char) {
    if !p.is_null() {
        drop(CString::from_raw(p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(read: &str, adapter: &str, scores: [c_int; 4]) -> String {
        let read = CString::new(read).unwrap();
        let adapter = CString::new(adapter).unwrap();
        unsafe {
            let p = adapter_alignment_c(
                read.as_ptr(),
                adapter.as_ptr(),
                scores[0],
                scores[1],
                scores[2],
                scores[3],
            );
            assert!(!p.is_null());
            let out = CStr::from_ptr(p).to_str().unwrap().to_owned();
            free_c_string(p);
            out
        }
    }

    #[test]
    fn returns_record_and_frees_it() {
        let out = call("ACGTACGTTTTT", "ACGTACGT", [3, -6, -5, -2]);
        assert_eq!(out, "0,7,0,7,24,100.000000,100.000000");
    }

    #[test]
    fn empty_adapter_gives_sentinel() {
        let out = call("ACGTACGT", "", [3, -6, -5, -2]);
        assert_eq!(out, "-1,-1,-1,-1,0,0.000000,0.000000");
    }

    #[test]
    fn non_utf8_bytes_align_as_mismatches() {
        let read = CString::new(vec![b'A', b'C', 0xFF, b'T']).unwrap();
        let adapter = CString::new("ACGT").unwrap();
        let out = unsafe {
            let p = adapter_alignment_c(read.as_ptr(), adapter.as_ptr(), 3, -6, -5, -2);
            assert!(!p.is_null());
            let out = CStr::from_ptr(p).to_str().unwrap().to_owned();
            free_c_string(p);
            out
        };
        assert_eq!(out, "0,3,0,3,3,75.000000,75.000000");

        let alignment = crate::align(read.as_bytes(), b"ACGT", &ScoringScheme::default());
        assert_eq!(alignment.read_row, b"ACXT".to_vec());
    }

    #[test]
    fn null_inputs_are_empty_and_null_free_is_noop() {
        unsafe {
            let p = adapter_alignment_c(ptr::null(), ptr::null(), 3, -6, -5, -2);
            assert!(!p.is_null());
            assert_eq!(CStr::from_ptr(p).to_str().unwrap(), "-1,-1,-1,-1,0,0.000000,0.000000");
            free_c_string(p);
            free_c_string(ptr::null_mut());
        }
    }
}
