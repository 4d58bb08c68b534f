use crate::{PctStr, TranscodeError, TranscodeErrorKind};
use core::fmt;

impl<E: fmt::Display> fmt::Display for TranscodeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            TranscodeErrorKind::InvalidPctEncoding => "invalid percent encoding at index ",
            TranscodeErrorKind::InvalidHexChar => "invalid hex character at index ",
            TranscodeErrorKind::Transform => "failed to transform escape run at index ",
        };
        write!(f, "{}{}", msg, self.index)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PctStr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for PctStr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}
