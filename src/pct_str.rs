use crate::{pct_enc, scan, transcode, TranscodeError, Transform};
use alloc::{borrow::Cow, vec::Vec};
use core::{cmp::Ordering, hash, iter::FusedIterator};
use ref_cast::{ref_cast_custom, RefCastCustom};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Percent-encoded string slices that are known to be well-formed.
///
/// Every `'%'` in a `PctStr` is followed by two hexadecimal digits, so
/// transcoding a `PctStr` can only fail in the transform itself.
/// All other bytes are literal and are left alone.
///
/// # Comparison
///
/// `PctStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Escapes are **not** normalized prior to comparison.
///
/// # Examples
///
/// Check a query once, then transcode it with different charsets:
///
/// ```
/// use pct_transcode::PctStr;
///
/// let query = PctStr::new("q=%D6%D0%CE%C4&page=2").unwrap();
/// assert_eq!(query.escape_count(), 4);
///
/// let upper = query.decode_with(|b: &[u8]| Ok::<_, ()>(b.to_ascii_uppercase())).unwrap();
/// assert_eq!(upper, "q=%D6%D0%CE%C4&page=2");
///
/// assert!(PctStr::new("100%").is_none());
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct PctStr {
    inner: str,
}

impl PctStr {
    /// Converts a string slice to a `PctStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `PctStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to a `PctStr` slice, returning `None` if
    /// any `'%'` is not followed by two hexadecimal digits.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if scan::is_well_formed(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Converts a string slice to a `PctStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string is not well-formed.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Converts a string slice to a `PctStr` slice, reporting where it is malformed.
    ///
    /// # Errors
    ///
    /// Returns `Err` with the same index and kind that
    /// [`decode_with_transform`] would report on the string.
    ///
    /// [`decode_with_transform`]: crate::decode_with_transform
    ///
    /// # Examples
    ///
    /// ```
    /// use pct_transcode::{PctStr, TranscodeErrorKind};
    ///
    /// let e = PctStr::try_new("%D6%D0%ZZ%C4").unwrap_err();
    /// assert_eq!(e.index(), 6);
    /// assert_eq!(e.kind(), TranscodeErrorKind::InvalidHexChar);
    /// ```
    pub fn try_new(s: &str) -> Result<&Self, TranscodeError> {
        scan::validate(s.as_bytes()).map(|_| Self::new_validated(s))
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `PctStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `PctStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of percent-encoded octets in the slice.
    #[must_use]
    pub fn escape_count(&self) -> usize {
        self.inner.bytes().filter(|&x| x == b'%').count()
    }

    /// Checks whether the slice contains any percent-encoded octet.
    #[must_use]
    pub fn has_escapes(&self) -> bool {
        self.inner.contains('%')
    }

    /// Transcodes the slice with a transform decoding a legacy charset,
    /// typically into UTF-8.
    ///
    /// See [`decode_with_transform`] for details.
    ///
    /// [`decode_with_transform`]: crate::decode_with_transform
    ///
    /// # Errors
    ///
    /// Returns `Err` if the transform rejects an escape run.
    /// The error kind is always [`Transform`](crate::TranscodeErrorKind::Transform).
    pub fn decode_with<T: Transform>(
        &self,
        mut transform: T,
    ) -> Result<Cow<'_, str>, TranscodeError<T::Error>> {
        self.transcode(&mut transform)
    }

    /// Transcodes the slice with a transform encoding into a legacy charset,
    /// typically from UTF-8.
    ///
    /// See [`encode_with_transform`] for details.
    ///
    /// [`encode_with_transform`]: crate::encode_with_transform
    ///
    /// # Errors
    ///
    /// Returns `Err` if the transform rejects an escape run.
    /// The error kind is always [`Transform`](crate::TranscodeErrorKind::Transform).
    pub fn encode_with<T: Transform>(
        &self,
        mut transform: T,
    ) -> Result<Cow<'_, str>, TranscodeError<T::Error>> {
        self.transcode(&mut transform)
    }

    fn transcode<T: Transform>(
        &self,
        transform: &mut T,
    ) -> Result<Cow<'_, str>, TranscodeError<T::Error>> {
        let n = self.escape_count();
        if n == 0 {
            return Ok(Cow::Borrowed(&self.inner));
        }
        transcode::transcode_escaped(self.inner.as_bytes(), n, transform)
            // SAFETY: `buf` is the output of transcoding a `str`.
            .map(|buf| Cow::Owned(unsafe { transcode::into_string(buf) }))
    }

    /// Returns an iterator over the literal spans and escape runs of the slice,
    /// in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pct_transcode::{Chunk, PctStr};
    ///
    /// let s = PctStr::new_or_panic("a=%D6%D0&b");
    /// let chunks: Vec<_> = s.runs().map(Chunk::as_str).collect();
    /// assert_eq!(chunks, ["a=", "%D6%D0", "&b"]);
    /// ```
    pub fn runs(&self) -> Runs<'_> {
        Runs {
            source: &self.inner,
            pos: 0,
        }
    }
}

impl AsRef<Self> for PctStr {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsRef<str> for PctStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for PctStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for PctStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<PctStr> for str {
    fn eq(&self, other: &PctStr) -> bool {
        self == &other.inner
    }
}

impl Eq for PctStr {}

impl hash::Hash for PctStr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for PctStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PctStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &PctStr {
    /// Creates an empty `PctStr` slice.
    fn default() -> Self {
        PctStr::EMPTY
    }
}

impl<'a> TryFrom<&'a str> for &'a PctStr {
    type Error = TranscodeError;

    fn try_from(s: &'a str) -> Result<Self, TranscodeError> {
        PctStr::try_new(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for PctStr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de: 'a, 'a> Deserialize<'de> for &'a PctStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        PctStr::try_new(s).map_err(de::Error::custom)
    }
}

/// An item returned by the [`Runs`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// A maximal span containing no `'%'`.
    Literal(&'a str),
    /// A maximal run of percent-encoded octets.
    Run(EscapeRun<'a>),
}

impl<'a> Chunk<'a> {
    /// Returns the chunk as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'a str {
        match self {
            Self::Literal(s) => s,
            Self::Run(run) => run.as_str(),
        }
    }
}

/// A maximal run of percent-encoded octets in a [`PctStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeRun<'a> {
    source: &'a str,
    start: usize,
}

impl<'a> EscapeRun<'a> {
    /// Yields the run as it appears in the source, such as `"%D6%D0"`.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Returns the byte index of the run in the source slice.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of percent-encoded octets in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len() / 3
    }

    /// Always returns `false`, as a run contains at least one octet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Decodes the run, appending the octets to a buffer.
    pub fn decode_to(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.len());
        for triple in self.source.as_bytes().chunks_exact(3) {
            // A run only holds escapes that were checked when the `PctStr` was created.
            let x = pct_enc::decode_octet(triple[1], triple[2]);
            debug_assert!(x.is_some(), "unchecked escape in run");
            buf.extend(x);
        }
    }

    /// Decodes the run into a new buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.decode_to(&mut buf);
        buf
    }
}

/// An iterator over the literal spans and escape runs of a [`PctStr`].
///
/// This struct is created by [`PctStr::runs`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Runs<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let s = self.source.as_bytes();
        let start = self.pos;
        if start == s.len() {
            return None;
        }

        if s[start] == b'%' {
            let mut end = start;
            while end < s.len() && s[end] == b'%' {
                end += 3;
            }
            self.pos = end;
            Some(Chunk::Run(EscapeRun {
                source: &self.source[start..end],
                start,
            }))
        } else {
            let end = s[start..]
                .iter()
                .position(|&x| x == b'%')
                .map_or(s.len(), |i| start + i);
            self.pos = end;
            Some(Chunk::Literal(&self.source[start..end]))
        }
    }
}

impl FusedIterator for Runs<'_> {}
