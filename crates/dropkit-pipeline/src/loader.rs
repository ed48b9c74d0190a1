//! Byte loading
//!
//! Reads a selected file's complete content as an exact byte-for-byte
//! sequence. Inputs are binary (PNG, JPEG, PDF), so there is no text
//! re-encoding and no line-ending normalization anywhere on this path.
//!
//! Some picker collaborators can only hand content over through a text-safe
//! transport (a `data:` URI with a base64 payload). The loader decodes that
//! transport losslessly back to raw bytes; `decode(encode(b)) == b` is a hard
//! invariant, since any alphabet mismatch corrupts the uploaded artifact.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

/// Local read failure. Terminal for the attempt that hit it.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid transport payload in {uri}: {message}")]
    InvalidTransport { uri: String, message: String },
}

/// Loads the raw content behind a file descriptor's URI.
#[async_trait]
pub trait ByteLoader: Send + Sync {
    async fn load(&self, uri: &str) -> Result<Bytes, ReadError>;
}

/// Loader for locally picked files.
///
/// Resolves plain filesystem paths directly, and `data:...;base64,...` URIs
/// through the transport codec.
#[derive(Debug, Clone, Default)]
pub struct FsByteLoader;

#[async_trait]
impl ByteLoader for FsByteLoader {
    async fn load(&self, uri: &str) -> Result<Bytes, ReadError> {
        if uri.starts_with("data:") {
            return decode_data_uri(uri);
        }

        let data = tokio::fs::read(uri).await.map_err(|source| ReadError::Io {
            uri: uri.to_string(),
            source,
        })?;

        tracing::debug!(uri = %uri, size_bytes = data.len(), "Read file content");
        Ok(Bytes::from(data))
    }
}

/// Encode raw bytes for a text-safe transport.
pub fn encode_transport(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a text-safe transport payload back to raw bytes.
pub fn decode_transport(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload)
}

/// Decode a `data:<mime>;base64,<payload>` URI.
fn decode_data_uri(uri: &str) -> Result<Bytes, ReadError> {
    let payload = uri
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| ReadError::InvalidTransport {
            uri: uri.to_string(),
            message: "missing ;base64, marker".to_string(),
        })?;

    let data = decode_transport(payload).map_err(|e| ReadError::InvalidTransport {
        uri: uri.to_string(),
        message: e.to_string(),
    })?;

    Ok(Bytes::from(data))
}
