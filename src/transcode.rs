//! The decode-transform-encode pipeline.

use crate::{
    pct_enc, scan, TranscodeError, TranscodeErrorKind::InvalidHexChar, Transform,
};
use alloc::{borrow::Cow, string::String, vec::Vec};

/// Transcodes a percent-encoded byte string with a transform.
///
/// Returns the input borrowed if it contains no escape,
/// in which case the transform is never invoked.
pub(crate) fn transcode<'a, T: Transform + ?Sized>(
    raw: &'a [u8],
    transform: &mut T,
) -> Result<Cow<'a, [u8]>, TranscodeError<T::Error>> {
    let n = scan::scan(raw).map_err(|e| e.widen())?;
    if n == 0 {
        return Ok(Cow::Borrowed(raw));
    }
    transcode_escaped(raw, n, transform).map(Cow::Owned)
}

/// Transcodes a percent-encoded string with a transform.
pub(crate) fn transcode_str<'a, T: Transform + ?Sized>(
    raw: &'a str,
    transform: &mut T,
) -> Result<Cow<'a, str>, TranscodeError<T::Error>> {
    Ok(match transcode(raw.as_bytes(), transform)? {
        Cow::Borrowed(_) => Cow::Borrowed(raw),
        // SAFETY: `buf` is the output of transcoding `raw`.
        Cow::Owned(buf) => Cow::Owned(unsafe { into_string(buf) }),
    })
}

/// Converts the output of transcoding a `str` back into a `String`.
///
/// # Safety
///
/// `buf` must be the output of [`transcode_escaped`] on the bytes of a `str`.
pub(crate) unsafe fn into_string(buf: Vec<u8>) -> String {
    // SAFETY: The literal spans are cut out of a `str` at ASCII bytes,
    // and everything else written is an ASCII escape.
    unsafe { String::from_utf8_unchecked(buf) }
}

/// Transcodes a byte string that passed the structural pre-pass with `n` escapes.
///
/// Literal bytes are copied as they are. Each maximal run of escapes is decoded
/// into one buffer, handed to the transform in a single call, and re-encoded.
pub(crate) fn transcode_escaped<T: Transform + ?Sized>(
    s: &[u8],
    n: usize,
    transform: &mut T,
) -> Result<Vec<u8>, TranscodeError<T::Error>> {
    let mut out = Vec::with_capacity(s.len());
    let mut run = Vec::with_capacity(n);

    // Start of the literal span not yet copied to `out`.
    let mut lit = 0;
    let mut i = 0;

    while i < s.len() {
        if s[i] != b'%' {
            if !run.is_empty() {
                flush(transform, &mut run, i, &mut out)?;
            }
            i += 1;
            continue;
        }

        let octet = match (s.get(i + 1), s.get(i + 2)) {
            (Some(&hi), Some(&lo)) => pct_enc::decode_octet(hi, lo),
            _ => None,
        };
        let Some(x) = octet else {
            log::debug!("invalid hex character at index {i}");
            return Err(TranscodeError::structural(i, InvalidHexChar));
        };

        out.extend_from_slice(&s[lit..i]);
        run.push(x);
        i += 3;
        lit = i;
    }

    if !run.is_empty() {
        flush(transform, &mut run, i, &mut out)?;
    }
    out.extend_from_slice(&s[lit..]);
    Ok(out)
}

/// Transforms the decoded bytes of a run that ends at `end` and appends them, re-encoded.
fn flush<T: Transform + ?Sized>(
    transform: &mut T,
    run: &mut Vec<u8>,
    end: usize,
    out: &mut Vec<u8>,
) -> Result<(), TranscodeError<T::Error>> {
    let start = end - run.len() * 3;
    {
        let bytes = transform.transform(run).map_err(|e| {
            log::debug!(
                "transform rejected escape run at index {start} ({} bytes)",
                run.len()
            );
            TranscodeError::transform(start, e)
        })?;
        log::trace!(
            "transformed escape run at index {start}: {} bytes -> {} bytes",
            run.len(),
            bytes.len()
        );
        pct_enc::percent_encode_bytes_to(&bytes, out);
    }
    run.clear();
    Ok(())
}
