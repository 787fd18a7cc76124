//! C ABI for foreign-language bindings.
//!
//! The argument order matches the `gcm_encrypt`/`gcm_decrypt` C header that
//! bindings already link against. The caller allocates every buffer:
//!
//! * `ciphertext` / `plaintext` must hold at least the input length.
//! * `tag` must hold [`TAG_LEN`] bytes.
//! * The key length is implied by `flavor` (16 or 32 bytes).
//!
//! A null pointer is accepted only with a zero length. Return values are the output
//! length on success, or one of the negative sentinels below. Output buffers are
//! left untouched on failure.

use std::os::raw::{c_int, c_uint};
use std::ptr;

use gcm_common::{Flavor, Tag, TAG_LEN};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto;
use crate::telemetry;

/// Returned by [`gcm_decrypt`] when the tag does not verify.
pub const GCM_AUTHENTICATION_FAILED: c_int = -1;

/// Returned for any failure other than tag verification.
pub const GCM_OPERATION_FAILED: c_int = -2;

/// Encrypt `plaintext` and write the ciphertext and the 16-byte tag.
///
/// Returns the ciphertext length, or [`GCM_OPERATION_FAILED`].
///
/// # Safety
///
/// Every non-null input pointer must be valid for reads of its stated length
/// (`key` for the flavor's key length). `ciphertext` must be valid for writes of
/// `plaintext_len` bytes and `tag` for writes of 16 bytes. Buffers must not overlap
/// the outputs.
#[no_mangle]
pub unsafe extern "C" fn gcm_encrypt(
    flavor: c_uint,
    plaintext: *const u8,
    plaintext_len: c_int,
    aad: *const u8,
    aad_len: c_int,
    key: *const u8,
    iv: *const u8,
    iv_len: c_int,
    ciphertext: *mut u8,
    tag: *mut u8,
) -> c_int {
    let Ok(flavor) = Flavor::try_from(flavor) else {
        return GCM_OPERATION_FAILED;
    };
    let (Some(plaintext), Some(aad), Some(key), Some(iv)) = (
        input(plaintext, plaintext_len),
        input(aad, aad_len),
        input_exact(key, flavor.key_len()),
        input(iv, iv_len),
    ) else {
        return GCM_OPERATION_FAILED;
    };
    if tag.is_null() || (ciphertext.is_null() && !plaintext.is_empty()) {
        return GCM_OPERATION_FAILED;
    }

    match crypto::seal(flavor, key, iv, aad, plaintext) {
        Ok(sealed) => {
            let len = sealed.ciphertext.len();
            if len > 0 {
                ptr::copy_nonoverlapping(sealed.ciphertext.as_ptr(), ciphertext, len);
            }
            ptr::copy_nonoverlapping(sealed.tag.as_ptr(), tag, TAG_LEN);
            // Bounded by `plaintext_len`, which is a `c_int`.
            len as c_int
        }
        Err(_) => GCM_OPERATION_FAILED,
    }
}

/// Verify `tag`, decrypt `ciphertext`, and write the plaintext.
///
/// Returns the plaintext length, [`GCM_AUTHENTICATION_FAILED`] or
/// [`GCM_OPERATION_FAILED`]. Nothing is written to `plaintext` unless the tag
/// verifies.
///
/// # Safety
///
/// Every non-null input pointer must be valid for reads of its stated length
/// (`tag` for 16 bytes, `key` for the flavor's key length). `plaintext` must be
/// valid for writes of `ciphertext_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn gcm_decrypt(
    flavor: c_uint,
    ciphertext: *const u8,
    ciphertext_len: c_int,
    aad: *const u8,
    aad_len: c_int,
    tag: *const u8,
    key: *const u8,
    iv: *const u8,
    iv_len: c_int,
    plaintext: *mut u8,
) -> c_int {
    let Ok(flavor) = Flavor::try_from(flavor) else {
        return GCM_OPERATION_FAILED;
    };
    let (Some(ciphertext), Some(aad), Some(tag), Some(key), Some(iv)) = (
        input(ciphertext, ciphertext_len),
        input(aad, aad_len),
        input_exact(tag, TAG_LEN),
        input_exact(key, flavor.key_len()),
        input(iv, iv_len),
    ) else {
        return GCM_OPERATION_FAILED;
    };
    if plaintext.is_null() && !ciphertext.is_empty() {
        return GCM_OPERATION_FAILED;
    }
    let Ok(tag) = Tag::try_from(tag) else {
        return GCM_OPERATION_FAILED;
    };

    match crypto::open(flavor, ciphertext, aad, &tag, key, iv) {
        Ok(opened) => {
            let opened = Zeroizing::new(opened);
            if !opened.is_empty() {
                ptr::copy_nonoverlapping(opened.as_ptr(), plaintext, opened.len());
            }
            opened.len() as c_int
        }
        Err(e) if e.is_authentication() => GCM_AUTHENTICATION_FAILED,
        Err(_) => GCM_OPERATION_FAILED,
    }
}

/// Read `GCM_*` settings from the environment and install the log subscriber.
///
/// Returns 0 on success and [`GCM_OPERATION_FAILED`] otherwise, including when a
/// subscriber is already installed.
#[no_mangle]
pub extern "C" fn gcm_init_logging() -> c_int {
    match Settings::from_env().and_then(|s| telemetry::init(&s)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("ERROR: gcm-engine logging initialisation failed: {e:#}");
            GCM_OPERATION_FAILED
        }
    }
}

unsafe fn input<'a>(ptr: *const u8, len: c_int) -> Option<&'a [u8]> {
    input_exact(ptr, usize::try_from(len).ok()?)
}

unsafe fn input_exact<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(ptr, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AES128: c_uint = 0;
    const AES256: c_uint = 1;

    fn encrypt(flavor: c_uint, key: &[u8], iv: &[u8], aad: &[u8], pt: &[u8]) -> (c_int, Vec<u8>, [u8; 16]) {
        let mut ct = vec![0u8; pt.len()];
        let mut tag = [0u8; 16];
        let rc = unsafe {
            gcm_encrypt(
                flavor,
                pt.as_ptr(),
                pt.len() as c_int,
                aad.as_ptr(),
                aad.len() as c_int,
                key.as_ptr(),
                iv.as_ptr(),
                iv.len() as c_int,
                ct.as_mut_ptr(),
                tag.as_mut_ptr(),
            )
        };
        (rc, ct, tag)
    }

    fn decrypt(
        flavor: c_uint,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        ct: &[u8],
        tag: &[u8; 16],
        out: &mut [u8],
    ) -> c_int {
        unsafe {
            gcm_decrypt(
                flavor,
                ct.as_ptr(),
                ct.len() as c_int,
                aad.as_ptr(),
                aad.len() as c_int,
                tag.as_ptr(),
                key.as_ptr(),
                iv.as_ptr(),
                iv.len() as c_int,
                out.as_mut_ptr(),
            )
        }
    }

    #[test]
    fn round_trip_through_c_abi() {
        for (flavor, key) in [(AES128, vec![3u8; 16]), (AES256, vec![3u8; 32])] {
            let iv = [8u8; 12];
            let (rc, ct, tag) = encrypt(flavor, &key, &iv, b"aad", b"over the wire");
            assert_eq!(rc, 13);

            let mut out = vec![0u8; ct.len()];
            assert_eq!(decrypt(flavor, &key, &iv, b"aad", &ct, &tag, &mut out), 13);
            assert_eq!(out, b"over the wire");
        }
    }

    #[test]
    fn long_iv_round_trips_through_c_abi() {
        let key = [4u8; 32];
        let iv = [0x5au8; 32];
        let (rc, ct, tag) = encrypt(AES256, &key, &iv, b"hdr", b"framed payload");
        assert_eq!(rc, 14);

        let mut out = vec![0u8; ct.len()];
        assert_eq!(decrypt(AES256, &key, &iv, b"hdr", &ct, &tag, &mut out), 14);
        assert_eq!(out, b"framed payload");

        let mut other_iv = iv;
        other_iv[31] ^= 0x01;
        assert_eq!(
            decrypt(AES256, &key, &other_iv, b"hdr", &ct, &tag, &mut out),
            GCM_AUTHENTICATION_FAILED
        );
    }

    #[test]
    fn matches_rust_api() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let (rc, ct, tag) = encrypt(AES128, &key, &iv, b"", b"test");
        let sealed = crypto::seal(Flavor::Aes128Gcm, &key, &iv, b"", b"test").unwrap();
        assert_eq!(rc, 4);
        assert_eq!(ct, sealed.ciphertext);
        assert_eq!(tag, sealed.tag);
    }

    #[test]
    fn tampered_tag_returns_auth_sentinel_and_leaves_output_untouched() {
        let key = [5u8; 16];
        let iv = [6u8; 12];
        let (_, ct, mut tag) = encrypt(AES128, &key, &iv, b"", b"secret");
        tag[15] ^= 0x01;

        let mut out = vec![0xeeu8; ct.len()];
        assert_eq!(
            decrypt(AES128, &key, &iv, b"", &ct, &tag, &mut out),
            GCM_AUTHENTICATION_FAILED
        );
        assert!(out.iter().all(|b| *b == 0xee));
    }

    #[test]
    fn empty_plaintext_is_not_a_failure() {
        let key = [1u8; 32];
        let iv = [2u8; 12];
        let tag = unsafe {
            let mut tag = [0u8; 16];
            let rc = gcm_encrypt(
                AES256,
                ptr::null(),
                0,
                b"hdr".as_ptr(),
                3,
                key.as_ptr(),
                iv.as_ptr(),
                12,
                ptr::null_mut(),
                tag.as_mut_ptr(),
            );
            assert_eq!(rc, 0);
            tag
        };
        let rc = unsafe {
            gcm_decrypt(
                AES256,
                ptr::null(),
                0,
                b"hdr".as_ptr(),
                3,
                tag.as_ptr(),
                key.as_ptr(),
                iv.as_ptr(),
                12,
                ptr::null_mut(),
            )
        };
        assert_eq!(rc, 0);
    }

    #[test]
    fn unknown_flavor_is_an_operation_failure() {
        let (rc, _, _) = encrypt(7, &[0u8; 16], &[0u8; 12], b"", b"x");
        assert_eq!(rc, GCM_OPERATION_FAILED);
        let mut out = [0u8; 1];
        assert_eq!(
            decrypt(7, &[0u8; 16], &[0u8; 12], b"", b"x", &[0u8; 16], &mut out),
            GCM_OPERATION_FAILED
        );
    }

    #[test]
    fn null_and_negative_lengths_are_rejected() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let mut ct = [0u8; 4];
        let mut tag = [0u8; 16];
        let rc = unsafe {
            gcm_encrypt(
                AES128,
                ptr::null(),
                4,
                ptr::null(),
                0,
                key.as_ptr(),
                iv.as_ptr(),
                12,
                ct.as_mut_ptr(),
                tag.as_mut_ptr(),
            )
        };
        assert_eq!(rc, GCM_OPERATION_FAILED);

        let rc = unsafe {
            gcm_encrypt(
                AES128,
                b"abcd".as_ptr(),
                -1,
                ptr::null(),
                0,
                key.as_ptr(),
                iv.as_ptr(),
                12,
                ct.as_mut_ptr(),
                tag.as_mut_ptr(),
            )
        };
        assert_eq!(rc, GCM_OPERATION_FAILED);
    }

    #[test]
    fn zero_length_nonce_is_an_operation_failure() {
        let (rc, _, _) = encrypt(AES128, &[0u8; 16], &[], b"", b"x");
        assert_eq!(rc, GCM_OPERATION_FAILED);
    }

    #[test]
    fn logging_init_reports_status() {
        let first = gcm_init_logging();
        assert!(first == 0 || first == GCM_OPERATION_FAILED);
        assert_eq!(gcm_init_logging(), GCM_OPERATION_FAILED);
    }
}
