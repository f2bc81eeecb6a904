#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = lz4stream::compress_to_vec_with_header(data)
        .expect("bound-sized destination always fits");
    assert_eq!(lz4stream::stored_len(&encoded).unwrap(), data.len());

    let recovered = lz4stream::decompress_to_vec_with_header(&encoded).unwrap_or_else(|e| {
        panic!(
            "envelope round-trip: {e} (input {} bytes, encoded {} bytes)",
            data.len(),
            encoded.len()
        )
    });
    assert_eq!(recovered, data);
});
