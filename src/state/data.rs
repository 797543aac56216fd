/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the conversion workflow and the UI layer.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;

/// A self-contained encoded image payload.
///
/// Holds the MIME type and the encoded bytes of either the compressed
/// upload or the converted result. On the wire (backend request/response)
/// it travels as a base64 data URI string; in memory we keep the raw
/// encoded bytes so the UI can display them without re-decoding base64.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// MIME type of the encoded bytes (e.g. "image/jpeg")
    mime: String,
    /// The encoded image bytes (JPEG/PNG/... container, not raw pixels)
    data: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// File extension matching the MIME type, used for the download name
    pub fn extension(&self) -> &str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            // JPEG is both our upload format and the backend's usual reply
            _ => "jpg",
        }
    }

    /// Serialize to a base64 data URI ("data:image/jpeg;base64,...")
    /// for the backend wire format.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, Base64.encode(&self.data))
    }

    /// Parse a base64 data URI back into an image payload.
    ///
    /// Returns an error message when the string is not a data URI,
    /// is not base64-encoded, or carries undecodable base64 content.
    pub fn from_data_uri(uri: &str) -> Result<Self, String> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| "not a data URI".to_string())?;

        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| "data URI is not base64-encoded".to_string())?;

        let data = Base64
            .decode(payload)
            .map_err(|e| format!("invalid base64 payload: {}", e))?;

        Ok(Self::new(mime, data))
    }
}
