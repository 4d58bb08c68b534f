//! The structural pre-pass run before any transcoding.

use crate::{
    pct_enc,
    TranscodeError,
    TranscodeErrorKind::{InvalidHexChar, InvalidPctEncoding},
};

/// Counts the percent-encoded octets in a byte string without decoding them.
///
/// Every `'%'` must be followed by two more bytes, neither of which is `'%'`.
/// Whether those bytes are hexadecimal digits is left to the transcoder.
///
/// Returns the index of the first offending `'%'` on failure.
pub(crate) const fn count_escapes(s: &[u8]) -> Result<usize, usize> {
    let mut n = 0;
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            if i + 2 < s.len() && s[i + 1] != b'%' && s[i + 2] != b'%' {
                n += 1;
            } else {
                return Err(i);
            }
        }
        i += 1;
    }
    Ok(n)
}

/// Checks that every `'%'` in a byte string starts a two-hex-digit escape.
///
/// Accepts exactly the strings that pass both [`count_escapes`]
/// and the hexadecimal check of the transcoder.
pub(crate) const fn is_well_formed(s: &[u8]) -> bool {
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            if i + 2 >= s.len() || pct_enc::decode_octet(s[i + 1], s[i + 2]).is_none() {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Runs the structural pre-pass, returning the number of escapes.
pub(crate) fn scan(raw: &[u8]) -> Result<usize, TranscodeError> {
    count_escapes(raw).map_err(|i| {
        log::debug!("invalid percent encoding at index {i}");
        TranscodeError::structural(i, InvalidPctEncoding)
    })
}

/// Runs both structural checks without transforming anything.
///
/// Returns the number of escapes on success.
pub(crate) fn validate(s: &[u8]) -> Result<usize, TranscodeError> {
    let n = scan(s)?;

    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            if pct_enc::decode_octet(s[i + 1], s[i + 2]).is_none() {
                log::debug!("invalid hex character at index {i}");
                return Err(TranscodeError::structural(i, InvalidHexChar));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(n)
}
