/// Image conversion module
///
/// This module handles everything between the chosen file and the
/// saved result:
/// - Compressing the upload before it goes on the wire (compress.rs)
/// - The remote anime conversion call (backend.rs)
/// - Saving the converted image to disk (download.rs)

pub mod backend;
pub mod compress;
pub mod download;

use thiserror::Error;

/// Everything that can go wrong between picking a photo and seeing
/// the converted result. All variants are surfaced to the user as a
/// status message and roll the workflow back to its last valid stage;
/// none of them are fatal.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    /// The selected file could not be read or decoded as an image
    #[error("Could not read that image: {0}")]
    Compression(String),

    /// The conversion service could not be reached at all
    #[error("Could not reach the conversion service: {0}")]
    BackendInvocation(String),

    /// The service answered, but with an error or a malformed payload
    #[error("Conversion failed: {0}")]
    BackendResponse(String),
}
