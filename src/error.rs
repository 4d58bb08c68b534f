use core::convert::Infallible;

/// Detailed cause of a [`TranscodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranscodeErrorKind {
    /// A percent character `'%'` that is not followed by two more bytes,
    /// or whose next two bytes contain another `'%'`.
    ///
    /// The error index points to the percent character.
    InvalidPctEncoding,
    /// A percent character `'%'` whose next two bytes are not both hexadecimal digits.
    ///
    /// The error index points to the percent character.
    InvalidHexChar,
    /// The transform rejected the bytes of an escape run.
    ///
    /// The error index points to the percent character that starts the run,
    /// that is, three bytes back per decoded octet from where the run ends.
    /// The error returned by the transform is available as the [cause].
    ///
    /// [cause]: TranscodeError::cause
    Transform,
}

/// An error occurred when transcoding a percent-encoded string.
///
/// The type parameter `E` is the error type of the [`Transform`] in use.
/// Errors that can only be structural use the default, [`Infallible`].
///
/// [`Transform`]: crate::Transform
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscodeError<E = Infallible> {
    pub(crate) index: usize,
    pub(crate) kind: TranscodeErrorKind,
    pub(crate) cause: Option<E>,
}

impl<E> TranscodeError<E> {
    pub(crate) fn structural(index: usize, kind: TranscodeErrorKind) -> Self {
        debug_assert!(kind != TranscodeErrorKind::Transform);
        Self {
            index,
            kind,
            cause: None,
        }
    }

    pub(crate) fn transform(index: usize, cause: E) -> Self {
        Self {
            index,
            kind: TranscodeErrorKind::Transform,
            cause: Some(cause),
        }
    }

    /// Returns the byte index in the input string at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> TranscodeErrorKind {
        self.kind
    }

    /// Checks whether the error was caused by malformed percent-encoding
    /// rather than by the transform.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.kind != TranscodeErrorKind::Transform
    }

    /// Returns a reference to the error returned by the transform, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&E> {
        self.cause.as_ref()
    }

    /// Consumes the error, returning the error returned by the transform, if any.
    #[must_use]
    pub fn into_cause(self) -> Option<E> {
        self.cause
    }

    /// Maps the error returned by the transform with a function,
    /// keeping the index and kind.
    pub fn map_cause<F>(self, f: impl FnOnce(E) -> F) -> TranscodeError<F> {
        TranscodeError {
            index: self.index,
            kind: self.kind,
            cause: self.cause.map(f),
        }
    }
}

impl TranscodeError {
    /// Converts a structural error into one for any transform error type.
    pub(crate) fn widen<E>(self) -> TranscodeError<E> {
        self.map_cause(|x| match x {})
    }
}

#[cfg(feature = "impl-error")]
impl<E: crate::Error + 'static> crate::Error for TranscodeError<E> {
    fn source(&self) -> Option<&(dyn crate::Error + 'static)> {
        match &self.cause {
            Some(e) => Some(e),
            None => None,
        }
    }
}
