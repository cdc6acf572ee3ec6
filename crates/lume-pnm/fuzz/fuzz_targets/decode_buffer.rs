#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use lume_pnm::{PnmDecoder, PnmVersions};

    let mut decoder = PnmDecoder::new(data);
    let _ = decoder.decode();

    let mut decoder = PnmDecoder::new(data);
    decoder.set_version(PnmVersions::P3);
    let _ = decoder.decode();
});
