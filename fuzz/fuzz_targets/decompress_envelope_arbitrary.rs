#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap the declared size so the fuzzer cannot ask for gigabyte buffers.
    let Ok(declared) = lz4stream::stored_len(data) else {
        return;
    };
    if declared > 1 << 24 {
        return;
    }

    if let Ok(out) = lz4stream::decompress_to_vec_with_header(data) {
        assert_eq!(out.len(), declared);
    }

    let mut fixed = vec![0u8; declared];
    if let Ok(n) = lz4stream::decompress_with_header(data, &mut fixed) {
        assert_eq!(n, declared);
    }
});
