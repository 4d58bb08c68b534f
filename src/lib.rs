#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Transcoding of percent-encoded strings between character encodings.
//!
//! URI components are sometimes percent-encoded from a legacy charset such as
//! GBK or Shift_JIS instead of UTF-8. A naive decoder misreads such bytes.
//! This crate decodes the escapes of a percent-encoded string, passes the raw
//! bytes through a [`Transform`] of your choice, and percent-encodes the
//! result again:
//!
//! ```
//! use encoding_rs::GBK;
//!
//! // "中文" in GBK, converted to its UTF-8 escapes.
//! let gbk_decode = |bytes: &[u8]| {
//!     GBK.decode_without_bom_handling_and_without_replacement(bytes)
//!         .map(|s| s.into_owned().into_bytes())
//!         .ok_or("malformed GBK")
//! };
//! let utf8 = pct_transcode::decode_with_transform("%D6%D0%CE%C4", gbk_decode)?;
//! assert_eq!(utf8, "%E4%B8%AD%E6%96%87");
//! # Ok::<_, pct_transcode::TranscodeError<&str>>(())
//! ```
//!
//! # Escape runs
//!
//! A character in a multi-byte charset may need several consecutive escapes.
//! The input is therefore partitioned into literal spans, copied to the output
//! unchanged, and *escape runs*: maximal sequences of escapes with no literal
//! byte in between. The transform is invoked exactly once per escape run, with
//! all of its decoded bytes, and its output is re-encoded with uppercase
//! hexadecimal digits.
//!
//! # Errors
//!
//! Transcoding fails fast at the first problem, with no partial output. Every
//! [`TranscodeError`] carries the byte index in the input where it occurred:
//!
//! - A `'%'` not followed by two more bytes, or with another `'%'` among them,
//!   is rejected before any transform runs.
//! - A `'%'` followed by non-hexadecimal digits is rejected while transcoding.
//! - A run the transform rejects is reported at the `'%'` that starts it,
//!   together with the transform's own error.
//!
//! # Byte strings
//!
//! The input need not be valid UTF-8. [`decode_bytes_with_transform`],
//! [`encode_bytes_with_transform`] and [`validate_bytes`] take raw bytes
//! and pass the literal bytes through as they are.
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support. This includes [`Error`] implementations.
//!
//! - `impl-error`: Enables [`Error`] implementations without `std`.
//!
//! - `encoding_rs`: Provides the `charset` module with transforms backed by
//!   the `encoding_rs` codecs.
//!
//! - `serde`: Enables serialization of [`PctStr`] and borrowed deserialization of `&PctStr`.
//!
//! [`Error`]: core::error::Error

extern crate alloc;

#[cfg(feature = "encoding_rs")]
pub mod charset;

mod error;
mod fmt;
mod pct_enc;
mod pct_str;
mod scan;
mod transcode;
mod transform;

pub use error::{TranscodeError, TranscodeErrorKind};
pub use pct_enc::{encode_byte, percent_encode, percent_encode_to};
pub use pct_str::{Chunk, EscapeRun, PctStr, Runs};
pub use transform::{Identity, Transform};

#[cfg(feature = "impl-error")]
pub(crate) use core::error::Error;

use alloc::borrow::Cow;

/// Converts a percent-encoded string from a legacy charset to UTF-8,
/// given a transform that decodes the charset.
///
/// Literal bytes are kept as they are, while each escape run is decoded,
/// handed to the transform, and percent-encoded again.
///
/// If the string contains no `'%'`, it is returned borrowed
/// and the transform is never invoked.
///
/// # Errors
///
/// Returns `Err` if the string is not properly percent-encoded
/// or if the transform rejects an escape run. See [`TranscodeErrorKind`].
///
/// # Examples
///
/// ```
/// use pct_transcode::{decode_with_transform, TranscodeErrorKind};
///
/// let latin1 = |bytes: &[u8]| {
///     Ok::<_, ()>(bytes.iter().map(|&x| x as char).collect::<String>().into_bytes())
/// };
///
/// assert_eq!(decode_with_transform("r%E9sum%E9", latin1).unwrap(), "r%C3%A9sum%C3%A9");
/// assert_eq!(decode_with_transform("no escapes", latin1).unwrap(), "no escapes");
///
/// let e = decode_with_transform("%E9%", latin1).unwrap_err();
/// assert_eq!(e.index(), 3);
/// assert_eq!(e.kind(), TranscodeErrorKind::InvalidPctEncoding);
/// ```
pub fn decode_with_transform<T: Transform>(
    raw: &str,
    mut transform: T,
) -> Result<Cow<'_, str>, TranscodeError<T::Error>> {
    transcode::transcode_str(raw, &mut transform)
}

/// Converts a percent-encoded string from UTF-8 to a legacy charset,
/// given a transform that encodes the charset.
///
/// This works exactly like [`decode_with_transform`],
/// with the transform going the other way.
///
/// # Errors
///
/// Returns `Err` if the string is not properly percent-encoded
/// or if the transform rejects an escape run. See [`TranscodeErrorKind`].
///
/// # Examples
///
/// ```
/// use pct_transcode::{encode_with_transform, TranscodeErrorKind};
///
/// let latin1 = |bytes: &[u8]| match core::str::from_utf8(bytes) {
///     Ok(s) => s.chars().map(|c| u8::try_from(c).map_err(|_| c)).collect::<Result<Vec<u8>, char>>(),
///     Err(_) => Err(char::REPLACEMENT_CHARACTER),
/// };
///
/// assert_eq!(encode_with_transform("r%C3%A9sum%C3%A9", latin1).unwrap(), "r%E9sum%E9");
///
/// let e = encode_with_transform("x%E2%82%AC", latin1).unwrap_err();
/// assert_eq!(e.index(), 1);
/// assert_eq!(e.kind(), TranscodeErrorKind::Transform);
/// assert_eq!(e.into_cause(), Some('€'));
/// ```
pub fn encode_with_transform<T: Transform>(
    raw: &str,
    mut transform: T,
) -> Result<Cow<'_, str>, TranscodeError<T::Error>> {
    transcode::transcode_str(raw, &mut transform)
}

/// Checks that a string is properly percent-encoded, without transcoding it.
///
/// Applies the same checks, in the same order, as [`decode_with_transform`],
/// and returns the number of percent-encoded octets on success.
///
/// # Errors
///
/// Returns `Err` with the index and kind that transcoding would report.
///
/// # Examples
///
/// ```
/// use pct_transcode::{validate, TranscodeErrorKind};
///
/// assert_eq!(validate("%D6%D0/%CE%C4"), Ok(4));
/// assert_eq!(validate("%%D0").unwrap_err().kind(), TranscodeErrorKind::InvalidPctEncoding);
/// assert_eq!(validate("%D6%D0%ZZ").unwrap_err().index(), 6);
/// ```
pub fn validate(raw: &str) -> Result<usize, TranscodeError> {
    scan::validate(raw.as_bytes())
}

/// Converts a percent-encoded byte string from a legacy charset to UTF-8,
/// given a transform that decodes the charset.
///
/// This works like [`decode_with_transform`], except that the literal bytes
/// need not be valid UTF-8. They are copied to the output unchanged.
///
/// # Errors
///
/// Returns `Err` if the string is not properly percent-encoded
/// or if the transform rejects an escape run. See [`TranscodeErrorKind`].
///
/// # Examples
///
/// ```
/// use pct_transcode::{decode_bytes_with_transform, Identity};
///
/// // A query whose name was left unescaped in GBK.
/// let out = decode_bytes_with_transform(b"name=\xD5\xC5%c8%fd", Identity).unwrap();
/// assert_eq!(&*out, b"name=\xD5\xC5%C8%FD");
/// ```
pub fn decode_bytes_with_transform<T: Transform>(
    raw: &[u8],
    mut transform: T,
) -> Result<Cow<'_, [u8]>, TranscodeError<T::Error>> {
    transcode::transcode(raw, &mut transform)
}

/// Converts a percent-encoded byte string from UTF-8 to a legacy charset,
/// given a transform that encodes the charset.
///
/// This works like [`encode_with_transform`], except that the literal bytes
/// need not be valid UTF-8. They are copied to the output unchanged.
///
/// # Errors
///
/// Returns `Err` if the string is not properly percent-encoded
/// or if the transform rejects an escape run. See [`TranscodeErrorKind`].
pub fn encode_bytes_with_transform<T: Transform>(
    raw: &[u8],
    mut transform: T,
) -> Result<Cow<'_, [u8]>, TranscodeError<T::Error>> {
    transcode::transcode(raw, &mut transform)
}

/// Checks that a byte string is properly percent-encoded, without transcoding it.
///
/// This works like [`validate`], except that the literal bytes
/// need not be valid UTF-8.
///
/// # Errors
///
/// Returns `Err` with the index and kind that transcoding would report.
pub fn validate_bytes(raw: &[u8]) -> Result<usize, TranscodeError> {
    scan::validate(raw)
}
