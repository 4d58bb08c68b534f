//! Percent-encoding primitives.

use alloc::{string::String, vec::Vec};
use core::str;

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes the two bytes following a `'%'`, returning `None`
/// if either of them is not a hexadecimal digit.
#[inline]
pub(crate) const fn decode_octet(hi: u8, lo: u8) -> Option<u8> {
    let hi = OCTET_TABLE_HI[hi as usize];
    let lo = OCTET_TABLE_LO[lo as usize];
    // Valid high nibbles have their lowest bit clear, valid low nibbles their highest.
    if hi & 1 == 0 && lo & 0x80 == 0 {
        Some(hi | lo)
    } else {
        None
    }
}

/// Returns the percent-encoded triple of a byte, with uppercase hexadecimal digits.
///
/// # Examples
///
/// ```
/// assert_eq!(pct_transcode::encode_byte(b' '), "%20");
/// assert_eq!(pct_transcode::encode_byte(0xd6), "%D6");
/// ```
#[must_use]
pub fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

/// Percent-encodes every byte of a slice.
///
/// Each byte becomes `'%'` followed by two uppercase hexadecimal digits,
/// so the output is always exactly three times as long as the input.
/// No character encoding is performed: the bytes are represented as they are.
///
/// # Examples
///
/// ```
/// use pct_transcode::percent_encode;
///
/// assert_eq!(percent_encode("Go语言".as_bytes()), "%47%6F%E8%AF%AD%E8%A8%80");
/// assert_eq!(percent_encode(&[]), "");
/// ```
#[must_use]
pub fn percent_encode(bytes: &[u8]) -> String {
    let mut buf = String::new();
    percent_encode_to(bytes, &mut buf);
    buf
}

/// Percent-encodes every byte of a slice, appending the output to a string.
///
/// # Examples
///
/// ```
/// use pct_transcode::percent_encode_to;
///
/// let mut buf = String::from("q=");
/// percent_encode_to(&[0xd6, 0xd0], &mut buf);
/// assert_eq!(buf, "q=%D6%D0");
/// ```
pub fn percent_encode_to(bytes: &[u8], buf: &mut String) {
    buf.reserve(encoded_len(bytes));
    for &x in bytes {
        buf.push_str(encode_byte(x));
    }
}

/// Percent-encodes every byte of a slice, appending the output to a byte buffer.
pub(crate) fn percent_encode_bytes_to(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.reserve(encoded_len(bytes));
    for &x in bytes {
        buf.extend_from_slice(encode_byte(x).as_bytes());
    }
}

fn encoded_len(bytes: &[u8]) -> usize {
    match bytes.len().checked_mul(3) {
        Some(n) => n,
        None => capacity_overflow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet() {
        assert_eq!(decode_octet(b'D', b'6'), Some(0xd6));
        assert_eq!(decode_octet(b'e', b'4'), Some(0xe4));
        assert_eq!(decode_octet(b'0', b'0'), Some(0));
        assert_eq!(decode_octet(b'f', b'F'), Some(0xff));

        assert_eq!(decode_octet(b'Z', b'Z'), None);
        assert_eq!(decode_octet(b'%', b'4'), None);
        assert_eq!(decode_octet(b'4', b'%'), None);
        assert_eq!(decode_octet(b'g', b'0'), None);
        assert_eq!(decode_octet(0xe4, b'0'), None);
    }

    #[test]
    fn every_byte() {
        for x in 0..=255u8 {
            let s = encode_byte(x);
            assert_eq!(s.len(), 3);
            assert!(s.starts_with('%'));
            assert!(!s.bytes().any(|b| b.is_ascii_lowercase()));

            let b = s.as_bytes();
            assert_eq!(decode_octet(b[1], b[2]), Some(x));
        }
    }

    #[test]
    fn length() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(percent_encode(&bytes).len(), bytes.len() * 3);
        assert_eq!(percent_encode(b"a"), "%61");

        let mut buf = b"q=".to_vec();
        percent_encode_bytes_to(&bytes, &mut buf);
        assert_eq!(buf, [b"q=", percent_encode(&bytes).as_bytes()].concat());
    }
}
