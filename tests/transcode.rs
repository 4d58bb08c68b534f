use encoding_rs::{Encoding, GBK, SHIFT_JIS};
use pct_transcode::*;
use std::borrow::Cow;

fn decoder(encoding: &'static Encoding) -> impl FnMut(&[u8]) -> Result<Vec<u8>, String> {
    move |bytes| {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|s| s.into_owned().into_bytes())
            .ok_or_else(|| format!("malformed {} input", encoding.name()))
    }
}

fn encoder(encoding: &'static Encoding) -> impl FnMut(&[u8]) -> Result<Vec<u8>, String> {
    move |bytes| {
        let s = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        match encoding.encode(s) {
            (_, _, true) => Err(format!("unmappable in {}", encoding.name())),
            (out, _, false) => Ok(out.into_owned()),
        }
    }
}

#[test]
fn gbk_to_utf8() {
    let out = decode_with_transform("%D6%D0%CE%C4", decoder(GBK)).unwrap();
    assert_eq!(out, "%E4%B8%AD%E6%96%87");
}

#[test]
fn utf8_to_gbk() {
    let out = encode_with_transform("%E4%B8%AD%E6%96%87", encoder(GBK)).unwrap();
    assert_eq!(out, "%D6%D0%CE%C4");
}

#[test]
fn round_trip() {
    let cases = [
        (GBK, "%D6%D0%CE%C4"),
        (GBK, "q=%C4%E3%BA%C3&lang=zh"),
        (GBK, "/path/%D6%D0/%CE%C4.html"),
        (SHIFT_JIS, "%93%FA%96%7B%8C%EA"),
        (SHIFT_JIS, "name=%83%65%83%58%83%67"),
    ];

    for (encoding, raw) in cases {
        let utf8 = decode_with_transform(raw, decoder(encoding)).unwrap();
        let back = encode_with_transform(&utf8, encoder(encoding)).unwrap();
        assert_eq!(back, raw, "{}", encoding.name());
    }
}

#[test]
fn round_trip_uppercases() {
    let utf8 = decode_with_transform("%d6%d0%ce%c4", decoder(GBK)).unwrap();
    let back = encode_with_transform(&utf8, encoder(GBK)).unwrap();
    assert_eq!(back, "%D6%D0%CE%C4");
}

#[test]
fn no_escape_is_noop() {
    let failing = |_: &[u8]| Err::<Vec<u8>, _>("never called");

    for s in ["", "plain", "a+b=c&d", "语言", "/path/to?x#y"] {
        let out = decode_with_transform(s, failing).unwrap();
        assert!(matches!(out, Cow::Borrowed(b) if b == s));

        let out = encode_with_transform(s, failing).unwrap();
        assert!(matches!(out, Cow::Borrowed(b) if b == s));
    }
}

#[test]
fn literals_are_preserved() {
    let out = decode_with_transform("a=%D6%D0&b=%CE%C4;c=1 2+3", decoder(GBK)).unwrap();
    assert_eq!(out, "a=%E4%B8%AD&b=%E6%96%87;c=1 2+3");

    // Literal non-ASCII text is left alone, too.
    let out = decode_with_transform("中-%D6%D0-文", decoder(GBK)).unwrap();
    assert_eq!(out, "中-%E4%B8%AD-文");
}

#[test]
fn one_call_per_run() {
    let mut calls = Vec::new();
    let recording = |bytes: &[u8]| {
        calls.push(bytes.len());
        Ok::<_, ()>(bytes.to_vec())
    };

    let out = decode_with_transform("%D6%D0%CE%C4/%41?%42%43&x", recording).unwrap();
    assert_eq!(out, "%D6%D0%CE%C4/%41?%42%43&x");
    assert_eq!(calls, [4, 1, 2]);
}

#[test]
fn run_split_by_literal_fails_to_decode() {
    // Each half of a GBK character is meaningless on its own.
    let e = decode_with_transform("%D6x%D0", decoder(GBK)).unwrap_err();
    assert_eq!(e.kind(), TranscodeErrorKind::Transform);
    assert_eq!(e.index(), 0);
}

#[test]
fn structural_errors() {
    let e = decode_with_transform("%D6%D0%ZZ%C4", decoder(GBK)).unwrap_err();
    assert_eq!(e.index(), 6);
    assert_eq!(e.kind(), TranscodeErrorKind::InvalidHexChar);
    assert!(e.is_structural());
    assert_eq!(e.cause(), None);

    let e = encode_with_transform("%E4%B8%ZZ%E6%96", encoder(GBK)).unwrap_err();
    assert_eq!(e.index(), 6);
    assert!(e.is_structural());

    let cases = [
        ("%", 0),
        ("abc%", 3),
        ("abc%4", 3),
        ("%41%", 3),
        ("%%D0", 0),
        ("%D%0", 0),
        ("x%4%", 1),
    ];
    for (s, i) in cases {
        let e = decode_with_transform(s, Identity).unwrap_err();
        assert_eq!(e.index(), i, "{s}");
        assert_eq!(e.kind(), TranscodeErrorKind::InvalidPctEncoding, "{s}");
    }
}

#[test]
fn pre_pass_runs_before_any_transform() {
    let mut called = false;
    let transform = |bytes: &[u8]| {
        called = true;
        Ok::<_, ()>(bytes.to_vec())
    };

    // The run before the stray '%' is never transformed.
    let e = decode_with_transform("%41x%4", transform).unwrap_err();
    assert_eq!(e.index(), 4);
    assert!(!called);
}

#[test]
fn transform_errors() {
    let e = decode_with_transform("ok=%D6%D0&bad=%FF%FF", decoder(GBK)).unwrap_err();
    assert_eq!(e.kind(), TranscodeErrorKind::Transform);
    assert_eq!(e.index(), 14);
    assert_eq!(e.cause().map(String::as_str), Some("malformed GBK input"));
    assert_eq!(
        e.to_string(),
        "failed to transform escape run at index 14: malformed GBK input"
    );

    let e = encode_with_transform("%F0%9F%98%83", encoder(GBK)).unwrap_err();
    assert_eq!(e.index(), 0);
    assert_eq!(e.into_cause().as_deref(), Some("unmappable in GBK"));
}

#[test]
fn error_display() {
    let e = validate("a%%").unwrap_err();
    assert_eq!(e.to_string(), "invalid percent encoding at index 1");

    let e = validate("a%zz").unwrap_err();
    assert_eq!(e.to_string(), "invalid hex character at index 1");
}

#[test]
fn error_source() {
    use std::error::Error;

    #[derive(Debug)]
    struct Rejected;

    impl std::fmt::Display for Rejected {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("rejected")
        }
    }

    impl Error for Rejected {}

    let e = decode_with_transform("%41", |_: &[u8]| Err::<Vec<u8>, _>(Rejected)).unwrap_err();
    assert_eq!(e.source().unwrap().to_string(), "rejected");

    let e = validate("%").unwrap_err();
    assert!(e.source().is_none());
}

#[test]
fn encode() {
    assert_eq!(percent_encode("Go语言".as_bytes()), "%47%6F%E8%AF%AD%E8%A8%80");
    assert_eq!(percent_encode(&[]), "");
    assert_eq!(percent_encode(&[0x00, 0x0f, 0xf0, 0xff]), "%00%0F%F0%FF");

    let bytes: Vec<u8> = (0..=255).collect();
    let s = percent_encode(&bytes);
    assert_eq!(s.len(), 3 * bytes.len());
    assert_eq!(decode_with_transform(&s, Identity).unwrap(), s);

    let mut buf = String::from("prefix:");
    percent_encode_to(b"\r\n", &mut buf);
    assert_eq!(buf, "prefix:%0D%0A");
}

#[test]
fn pct_str() {
    let s = PctStr::new("q=%D6%D0%CE%C4&page=2").unwrap();
    assert_eq!(s.decode_with(decoder(GBK)).unwrap(), "q=%E4%B8%AD%E6%96%87&page=2");

    let s = PctStr::new("q=%E4%B8%AD").unwrap();
    assert_eq!(s.encode_with(encoder(GBK)).unwrap(), "q=%D6%D0");

    let s = PctStr::new_or_panic("%FF%FF");
    let e = s.decode_with(decoder(GBK)).unwrap_err();
    assert_eq!(e.kind(), TranscodeErrorKind::Transform);

    assert!(<&PctStr>::try_from("%D6%D0%ZZ").is_err());
    assert_eq!(s.to_string(), "%FF%FF");
    assert_eq!(format!("{s:?}"), "\"%FF%FF\"");
}

#[test]
fn runs_match_transform_calls() {
    let s = PctStr::new_or_panic("%D6%D0%CE%C4/%41?%42%43&x");

    let mut calls = Vec::new();
    s.decode_with(|bytes: &[u8]| {
        calls.push(bytes.to_vec());
        Ok::<_, ()>(bytes.to_vec())
    })
    .unwrap();

    let runs: Vec<_> = s
        .runs()
        .filter_map(|chunk| match chunk {
            Chunk::Run(run) => Some(run.to_bytes()),
            Chunk::Literal(_) => None,
        })
        .collect();
    assert_eq!(calls, runs);
    assert_eq!(s.runs().map(Chunk::as_str).collect::<String>(), s.as_str());
}

#[test]
fn byte_strings() {
    // "张" left unescaped in GBK, followed by "三" escaped in GBK.
    let raw = b"name=\xD5\xC5%C8%FD";
    let out = decode_bytes_with_transform(raw, decoder(GBK)).unwrap();
    assert_eq!(&*out, b"name=\xD5\xC5%E4%B8%89");

    let out = encode_bytes_with_transform(b"\xFF/%E4%B8%89", encoder(GBK)).unwrap();
    assert_eq!(&*out, b"\xFF/%C8%FD");

    let raw = b"\xD5\xC5=\xFF";
    let out = decode_bytes_with_transform(raw, |_: &[u8]| Err::<Vec<u8>, _>(())).unwrap();
    assert!(matches!(out, Cow::Borrowed(b) if b == raw));

    assert_eq!(validate_bytes(raw), Ok(0));
    assert_eq!(validate_bytes(b"\xD5%C8%FD"), Ok(2));

    let e = decode_bytes_with_transform(b"\xD5\xC5%\xC8", Identity).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), TranscodeErrorKind::InvalidPctEncoding);

    let e = decode_bytes_with_transform(b"\xD5%FF%FF", decoder(GBK)).unwrap_err();
    assert_eq!(e.index(), 1);
    assert_eq!(e.kind(), TranscodeErrorKind::Transform);
}
