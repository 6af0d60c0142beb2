#![no_main]

use libfuzzer_sys::fuzz_target;
use mzxml::mzxml::{Compression, PeakCodec, Precision};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for precision in [Precision::Float32, Precision::Float64] {
        for compression in [Compression::None, Compression::Zlib] {
            let _ = PeakCodec::decode_peaks(text, precision, compression);
        }
    }
});
