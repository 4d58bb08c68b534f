#![no_main]
use libfuzzer_sys::fuzz_target;
use pct_transcode::*;

/// Uppercases the hexadecimal digits of every escape, leaving literals alone.
fn uppercase_escapes(s: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            out.push(b'%');
            out.extend(s[i + 1..i + 3].iter().map(u8::to_ascii_uppercase));
            i += 3;
        } else {
            out.push(s[i]);
            i += 1;
        }
    }
    out
}

fuzz_target!(|data: &[u8]| {
    let mut calls = 0;
    let res = decode_bytes_with_transform(data, |bytes: &[u8]| {
        calls += 1;
        Ok::<_, ()>(bytes.to_vec())
    });

    match (&res, validate_bytes(data)) {
        (Ok(out), Ok(n)) => {
            assert_eq!(&**out, &uppercase_escapes(data)[..]);
            assert_eq!(n == 0, calls == 0);
        }
        (Err(e), Err(v)) => {
            assert_eq!(e.index(), v.index());
            assert_eq!(e.kind(), v.kind());
            assert_eq!(data[e.index()], b'%');
        }
        (res, v) => panic!("transcode: {res:?}, validate: {v:?}"),
    }

    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let mut str_calls = 0;
    let str_res = decode_with_transform(s, |bytes: &[u8]| {
        str_calls += 1;
        Ok::<_, ()>(bytes.to_vec())
    });
    assert_eq!(str_calls, calls);

    match (str_res, res) {
        (Ok(out), Ok(bytes)) => {
            assert_eq!(out.as_bytes(), &*bytes);
            let pct = PctStr::new_or_panic(s);
            assert_eq!(
                calls,
                pct.runs().filter(|c| matches!(c, Chunk::Run(_))).count()
            );
        }
        (Err(e), Err(b)) => {
            assert!(PctStr::new(s).is_none());
            assert_eq!(e.index(), b.index());
            assert_eq!(e.kind(), b.kind());
        }
        (out, bytes) => panic!("str: {out:?}, bytes: {bytes:?}"),
    }
});
