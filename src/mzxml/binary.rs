//! Binary peak payloads for mzXML
//!
//! mzXML stores each scan's peaks as one Base64 string encoding interleaved
//! `(m/z, intensity)` values in network (big-endian) byte order. The decode
//! pipeline is:
//!
//! 1. Strip whitespace and Base64 decode the text
//! 2. Inflate if the payload is zlib compressed (mzXML 3.x)
//! 3. Interpret bytes as big-endian float32 or float64 values

use std::io::Read;

use base64::prelude::*;
use byteorder::{BigEndian, ByteOrder};
use flate2::read::ZlibDecoder;

use crate::experiment::Peak;

/// Floating point width of payload values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 32-bit floats, `precision="32"`
    #[default]
    Float32,
    /// 64-bit floats, `precision="64"`
    Float64,
}

impl Precision {
    /// Parse the value of a `precision` attribute
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            "32" => Some(Precision::Float32),
            "64" => Some(Precision::Float64),
            _ => None,
        }
    }

    /// Value written to the `precision` attribute
    pub fn as_attribute(&self) -> &'static str {
        match self {
            Precision::Float32 => "32",
            Precision::Float64 => "64",
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            Precision::Float32 => 4,
            Precision::Float64 => 8,
        }
    }
}

/// Payload compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw values
    #[default]
    None,
    /// zlib stream (mzXML 3.x `compressionType="zlib"`)
    Zlib,
}

impl Compression {
    /// Parse the value of a `compressionType` attribute
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            "none" | "" => Some(Compression::None),
            "zlib" => Some(Compression::Zlib),
            _ => None,
        }
    }
}

/// Errors that can occur while decoding a peak payload
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    /// The payload is not valid Base64
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The zlib stream could not be inflated
    #[error("Decompression error: {0}")]
    Decompression(#[from] std::io::Error),

    /// The byte count is not a multiple of the value width
    #[error("Invalid data length: {actual} bytes is not a multiple of {element_size}")]
    InvalidLength {
        /// Decoded byte count
        actual: usize,
        /// Bytes per value
        element_size: usize,
    },

    /// The values do not form complete (m/z, intensity) pairs
    #[error("Odd number of values ({0}) in an m/z-intensity payload")]
    OddValueCount(usize),
}

/// Codec for mzXML peak payloads
pub struct PeakCodec;

impl PeakCodec {
    /// Decode a Base64 payload into a flat list of values
    ///
    /// # Arguments
    /// * `payload` - The text content of a `<peaks>` element
    /// * `precision` - Value width declared by the `precision` attribute
    /// * `compression` - Compression declared by `compressionType`
    ///
    /// An empty payload decodes to an empty vector.
    pub fn decode(
        payload: &str,
        precision: Precision,
        compression: Compression,
    ) -> Result<Vec<f64>, BinaryError> {
        let cleaned: String;
        let text = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
            cleaned = payload.split_ascii_whitespace().collect();
            cleaned.as_str()
        } else {
            payload
        };
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let decoded = BASE64_STANDARD.decode(text)?;

        let raw = match compression {
            Compression::None => decoded,
            Compression::Zlib => {
                let mut decoder = ZlibDecoder::new(&decoded[..]);
                let mut inflated = Vec::new();
                decoder.read_to_end(&mut inflated)?;
                inflated
            }
        };

        Self::decode_with::<BigEndian>(&raw, precision)
    }

    /// Interpret raw bytes as values stored in byte order `B`
    ///
    /// Conversion to host order happens per value, so the result does not
    /// depend on the endianness of the machine running the decoder.
    pub fn decode_with<B: ByteOrder>(
        bytes: &[u8],
        precision: Precision,
    ) -> Result<Vec<f64>, BinaryError> {
        let element_size = precision.byte_size();
        if bytes.len() % element_size != 0 {
            return Err(BinaryError::InvalidLength {
                actual: bytes.len(),
                element_size,
            });
        }

        let values = match precision {
            Precision::Float32 => bytes
                .chunks_exact(4)
                .map(|chunk| B::read_f32(chunk) as f64)
                .collect(),
            Precision::Float64 => bytes.chunks_exact(8).map(B::read_f64).collect(),
        };
        Ok(values)
    }

    /// Decode a payload into peaks
    pub fn decode_peaks(
        payload: &str,
        precision: Precision,
        compression: Compression,
    ) -> Result<Vec<Peak>, BinaryError> {
        let values = Self::decode(payload, precision, compression)?;
        if values.len() % 2 != 0 {
            return Err(BinaryError::OddValueCount(values.len()));
        }
        Ok(values
            .chunks_exact(2)
            .map(|pair| Peak::new(pair[0], pair[1]))
            .collect())
    }

    /// Encode values as a big-endian Base64 payload without line breaks
    ///
    /// With [`Precision::Float32`] values are narrowed to `f32` first.
    pub fn encode(values: &[f64], precision: Precision) -> String {
        if values.is_empty() {
            return String::new();
        }
        let width = precision.byte_size();
        let mut bytes = vec![0u8; values.len() * width];
        for (slot, &value) in bytes.chunks_exact_mut(width).zip(values) {
            match precision {
                Precision::Float32 => BigEndian::write_f32(slot, value as f32),
                Precision::Float64 => BigEndian::write_f64(slot, value),
            }
        }
        BASE64_STANDARD.encode(bytes)
    }

    /// Encode peaks the way the writer emits them: interleaved, 32-bit
    pub fn encode_peaks(peaks: &[Peak]) -> String {
        if peaks.is_empty() {
            return String::new();
        }
        let mut bytes = vec![0u8; peaks.len() * 8];
        for (slot, peak) in bytes.chunks_exact_mut(8).zip(peaks) {
            BigEndian::write_f32(&mut slot[..4], peak.mz as f32);
            BigEndian::write_f32(&mut slot[4..], peak.intensity as f32);
        }
        BASE64_STANDARD.encode(bytes)
    }
}
