//! Property tests for the peak codec and the reader

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use mzxml::experiment::Peak;
use mzxml::mzxml::{Compression, MzXMLReader, PeakCodec, Precision};
use proptest::prelude::*;

fn finite_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite", |v| v.is_finite())
}

proptest! {
    /// Values representable as f32 survive the 32-bit writer path exactly
    #[test]
    fn test_f32_peaks_roundtrip(values in prop::collection::vec((finite_f32(), finite_f32()), 0..200)) {
        let peaks: Vec<Peak> = values
            .iter()
            .map(|&(mz, intensity)| Peak::new(mz as f64, intensity as f64))
            .collect();

        let payload = PeakCodec::encode_peaks(&peaks);
        let decoded = PeakCodec::decode_peaks(&payload, Precision::Float32, Compression::None).unwrap();

        prop_assert_eq!(decoded, peaks);
    }

    /// Line breaks inside the payload do not change the decoded values
    #[test]
    fn test_whitespace_is_ignored(
        values in prop::collection::vec(any::<f64>().prop_filter("finite", |v| v.is_finite()), 1..64),
        width in 1usize..80,
    ) {
        let payload = PeakCodec::encode(&values, Precision::Float64);
        let wrapped: String = payload
            .as_bytes()
            .chunks(width)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n  ");

        let decoded = PeakCodec::decode(&wrapped, Precision::Float64, Compression::None).unwrap();

        prop_assert_eq!(decoded, values);
    }

    /// Decoding depends only on the declared byte order, never on the host
    #[test]
    fn test_byte_order_is_explicit(values in prop::collection::vec(finite_f32(), 0..64)) {
        let mut big = Vec::new();
        let mut little = Vec::new();
        for &v in &values {
            big.write_f32::<BigEndian>(v).unwrap();
            little.write_f32::<LittleEndian>(v).unwrap();
        }

        let from_big = PeakCodec::decode_with::<BigEndian>(&big, Precision::Float32).unwrap();
        let from_little = PeakCodec::decode_with::<LittleEndian>(&little, Precision::Float32).unwrap();

        prop_assert_eq!(&from_big, &from_little);
        let expected: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        prop_assert_eq!(from_big, expected);
    }

    /// Arbitrary payload text yields values or an error, never a panic
    #[test]
    fn test_decode_arbitrary_text(text in "\\PC{0,256}") {
        let _ = PeakCodec::decode_peaks(&text, Precision::Float32, Compression::None);
        let _ = PeakCodec::decode_peaks(&text, Precision::Float64, Compression::Zlib);
    }

    /// Arbitrary documents yield a run or an error, never a panic
    #[test]
    fn test_read_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = MzXMLReader::new(&bytes[..]).read_experiment();
    }
}
