#![no_main]
use libfuzzer_sys::fuzz_target;
use pct_transcode::*;

fuzz_target!(|data: &[u8]| {
    let s = percent_encode(data);
    assert_eq!(s.len(), data.len() * 3);

    let mut decoded = Vec::new();
    let out = encode_with_transform(&s, |bytes: &[u8]| {
        decoded.extend_from_slice(bytes);
        Ok::<_, ()>(bytes.to_vec())
    })
    .unwrap();

    assert_eq!(out, s);
    assert_eq!(decoded, data);
});
