//! Gzip + JSON body codec.
//!
//! Values travel as gzip-compressed UTF-8 JSON. Encoding runs at the
//! maximum compression level; decoding is incremental so response bodies
//! stream through chunk by chunk without being buffered in compressed form.

use flate2::Compression;
use flate2::write::{GzDecoder, GzEncoder};
use quarry_core::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;

/// Serialize a value to JSON and gzip it at maximum compression.
///
/// A value whose serialized form is empty is replaced by the literal `null`
/// so the stored body is always valid JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut text = serde_json::to_vec(value)
        .map_err(|e| Error::Encode(format!("JSON serialization failed: {}", e)))?;
    if text.is_empty() {
        text = b"null".to_vec();
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&text)
        .map_err(|e| Error::Encode(format!("Gzip write failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Encode(format!("Gzip finish failed: {}", e)))
}

/// Incremental gunzip-then-parse decoder for response bodies.
///
/// Compressed chunks are fed as they arrive. The accumulated output is
/// parsed as JSON only once the stream completes; partial JSON is never
/// parsed. Dropping the decoder drops its buffers.
pub struct GzJsonDecoder {
    decoder: GzDecoder<Vec<u8>>,
}

impl GzJsonDecoder {
    pub fn new() -> Self {
        GzJsonDecoder {
            decoder: GzDecoder::new(Vec::new()),
        }
    }

    /// Feed one compressed chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        self.decoder
            .write_all(chunk)
            .map_err(|e| Error::Decode(format!("Gzip stream failed: {}", e)))
    }

    /// Finalize the gzip stream and parse the decompressed text.
    pub fn finish<T: DeserializeOwned>(self) -> Result<T> {
        let text = self
            .decoder
            .finish()
            .map_err(|e| Error::Decode(format!("Gzip finish failed: {}", e)))?;
        serde_json::from_slice(&text).map_err(|e| Error::Decode(format!("JSON parse failed: {}", e)))
    }
}

impl Default for GzJsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decode(body: &[u8]) -> Result<Value> {
        let mut decoder = GzJsonDecoder::new();
        decoder.feed(body)?;
        decoder.finish()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let value = json!({"artifact": "libfoo.rlib", "deps": [1, 2, 3]});
        let body = encode(&value).unwrap();
        assert_eq!(decode(&body).unwrap(), value);
    }

    #[test]
    fn test_decode_across_chunks() {
        let value = json!({"text": "a".repeat(4096)});
        let body = encode(&value).unwrap();

        let mut decoder = GzJsonDecoder::new();
        for chunk in body.chunks(7) {
            decoder.feed(chunk).unwrap();
        }
        let out: Value = decoder.finish().unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn test_unit_encodes_as_null() {
        let body = encode(&()).unwrap();
        assert_eq!(decode(&body).unwrap(), Value::Null);
    }

    #[test]
    fn test_corrupt_stream_is_decode_error() {
        let err = decode(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_truncated_stream_is_decode_error() {
        let body = encode(&json!({"k": "v".repeat(256)})).unwrap();
        let err = decode(&body[..body.len() / 2]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_non_json_payload_is_decode_error() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(b"{not json").unwrap();
        let body = encoder.finish().unwrap();

        let err = decode(&body).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
