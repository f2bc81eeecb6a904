#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;
use lz4stream::stream::{DecompressReader, Reader};
use lz4stream::Error;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail with a stream error, never panic.
    let mut pulled = Vec::new();
    let a = DecompressReader::new(data).read_to_end(&mut pulled);
    let mut pushed = Vec::new();
    let b = Reader::new(data).read_to_end(&mut pushed);

    match (&a, &b) {
        (Ok(_), Ok(_)) => assert_eq!(pulled, pushed, "decoders disagree"),
        (Err(ea), Err(eb)) => {
            for err in [ea, eb] {
                assert!(matches!(
                    Error::from_io(err),
                    Some(Error::MalformedStream(_) | Error::Truncated { .. })
                ));
            }
        }
        _ => panic!("decoders disagree on validity: {a:?} vs {b:?}"),
    }
});
