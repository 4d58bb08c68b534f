//! The byte-transform capability consumed by the transcoder.

use alloc::{borrow::Cow, vec::Vec};
use core::convert::Infallible;

/// A conversion of one byte sequence into another, such as a charset decode or encode step.
///
/// The transcoder hands each escape run to [`transform`] as a single slice, so
/// a multi-byte character always reaches the transform with all of its bytes.
/// The transform is invoked exactly once per run and never retried.
///
/// The trait is implemented for every closure of type
/// `FnMut(&[u8]) -> Result<Vec<u8>, E>`, which is usually all you need.
///
/// [`transform`]: Self::transform
///
/// # Examples
///
/// ```
/// use pct_transcode::decode_with_transform;
///
/// // A toy charset where every byte is shifted by one.
/// let unshift = |bytes: &[u8]| Ok::<_, ()>(bytes.iter().map(|x| x - 1).collect::<Vec<u8>>());
/// assert_eq!(decode_with_transform("a%42%43", unshift).unwrap(), "a%41%42");
/// ```
pub trait Transform {
    /// The error returned when the input bytes are rejected.
    type Error;

    /// Converts a byte sequence.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not valid in the source representation
    /// or cannot be expressed in the target one.
    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error>;
}

impl<F, E> Transform for F
where
    F: FnMut(&[u8]) -> Result<Vec<u8>, E>,
{
    type Error = E;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, E> {
        self(input).map(Cow::Owned)
    }
}

/// A transform that returns its input unchanged.
///
/// Transcoding with `Identity` only normalizes the hexadecimal digits
/// of escapes to uppercase.
///
/// # Examples
///
/// ```
/// use pct_transcode::{decode_with_transform, Identity};
///
/// assert_eq!(decode_with_transform("%e4%b8%ad/x", Identity).unwrap(), "%E4%B8%AD/x");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Transform for Identity {
    type Error = Infallible;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Infallible> {
        Ok(Cow::Borrowed(input))
    }
}
