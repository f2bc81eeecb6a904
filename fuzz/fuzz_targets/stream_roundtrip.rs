#![no_main]
use std::io::{Read, Write};

use libfuzzer_sys::fuzz_target;
use lz4stream::stream::{DecompressReader, Reader, Writer};

fuzz_target!(|input: (Vec<u16>, Vec<u8>)| {
    let (splits, data) = input;

    // Write in pieces chosen by the fuzzer so split points are explored too.
    let mut w = Writer::new(Vec::new());
    let mut rest = &data[..];
    for &split in &splits {
        if rest.is_empty() {
            break;
        }
        let cut = (split as usize) % (rest.len() + 1);
        w.write_all(&rest[..cut]).expect("write to Vec cannot fail");
        rest = &rest[cut..];
    }
    w.write_all(rest).expect("write to Vec cannot fail");
    w.close().expect("close");
    let wire = w.into_inner();

    let mut pulled = Vec::new();
    DecompressReader::new(&wire[..])
        .read_to_end(&mut pulled)
        .expect("self-compressed stream must decode");
    assert_eq!(pulled, data, "DecompressReader round-trip mismatch");

    let mut pushed = Vec::new();
    Reader::new(&wire[..])
        .read_to_end(&mut pushed)
        .expect("self-compressed stream must decode");
    assert_eq!(pushed, data, "Reader round-trip mismatch");
});
