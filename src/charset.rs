//! Transforms backed by the [`encoding_rs`] codecs.
//!
//! [`Decoder`] turns bytes in a legacy charset into UTF-8, for use with
//! [`decode_with_transform`]; [`Encoder`] goes the other way, for use with
//! [`encode_with_transform`]. Both are strict: malformed or unmappable input
//! is an error rather than being replaced.
//!
//! [`decode_with_transform`]: crate::decode_with_transform
//! [`encode_with_transform`]: crate::encode_with_transform
//!
//! # Examples
//!
//! ```
//! use encoding_rs::GBK;
//! use pct_transcode::{charset::{Decoder, Encoder}, decode_with_transform, encode_with_transform};
//!
//! let utf8 = decode_with_transform("%D6%D0%CE%C4", Decoder::new(GBK)).unwrap();
//! assert_eq!(utf8, "%E4%B8%AD%E6%96%87");
//!
//! let gbk = encode_with_transform(&utf8, Encoder::new(GBK)).unwrap();
//! assert_eq!(gbk, "%D6%D0%CE%C4");
//! ```

use crate::Transform;
use alloc::borrow::Cow;
use core::{fmt, str};
use encoding_rs::Encoding;

/// Detailed cause of a [`CharsetError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharsetErrorKind {
    /// The bytes are not a valid sequence in the source encoding.
    Malformed,
    /// The bytes handed to an [`Encoder`] are not valid UTF-8.
    InvalidUtf8,
    /// A character cannot be represented in the target encoding.
    Unmappable,
}

/// An error returned by [`Decoder`] or [`Encoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharsetError {
    encoding: &'static Encoding,
    kind: CharsetErrorKind,
}

impl CharsetError {
    fn new(encoding: &'static Encoding, kind: CharsetErrorKind) -> Self {
        Self { encoding, kind }
    }

    /// Returns the encoding the transform was created with.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> CharsetErrorKind {
        self.kind
    }
}

impl fmt::Display for CharsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.encoding.name();
        match self.kind {
            CharsetErrorKind::Malformed => write!(f, "malformed {name} byte sequence"),
            CharsetErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 input to {name} encoder"),
            CharsetErrorKind::Unmappable => write!(f, "character unmappable in {name}"),
        }
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for CharsetError {}

/// A transform decoding bytes in some encoding to UTF-8.
///
/// No BOM sniffing is performed, and malformed sequences are rejected
/// with [`CharsetErrorKind::Malformed`].
#[derive(Clone, Copy, Debug)]
pub struct Decoder {
    encoding: &'static Encoding,
}

impl Decoder {
    /// Creates a decoder for the given source encoding.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Returns the source encoding.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Transform for Decoder {
    type Error = CharsetError;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, CharsetError> {
        match self
            .encoding
            .decode_without_bom_handling_and_without_replacement(input)
        {
            Some(Cow::Borrowed(s)) => Ok(Cow::Borrowed(s.as_bytes())),
            Some(Cow::Owned(s)) => Ok(Cow::Owned(s.into_bytes())),
            None => Err(CharsetError::new(self.encoding, CharsetErrorKind::Malformed)),
        }
    }
}

/// A transform encoding UTF-8 bytes to some encoding.
///
/// Input that is not valid UTF-8 is rejected with [`CharsetErrorKind::InvalidUtf8`],
/// and characters with no mapping in the target encoding with
/// [`CharsetErrorKind::Unmappable`].
///
/// Note that `encoding_rs` never encodes to UTF-16 or to the replacement
/// encoding; those targets produce UTF-8 output.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    encoding: &'static Encoding,
}

impl Encoder {
    /// Creates an encoder for the given target encoding.
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Returns the target encoding.
    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Transform for Encoder {
    type Error = CharsetError;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, CharsetError> {
        let s = str::from_utf8(input)
            .map_err(|_| CharsetError::new(self.encoding, CharsetErrorKind::InvalidUtf8))?;

        let (bytes, _, had_unmappables) = self.encoding.encode(s);
        if had_unmappables {
            Err(CharsetError::new(self.encoding, CharsetErrorKind::Unmappable))
        } else {
            Ok(bytes)
        }
    }
}
