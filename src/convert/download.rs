/// Saving the converted image to disk
///
/// The save dialog starts in the user's download directory and is
/// pre-filled with a fixed file name; only the extension follows the
/// payload. Cancelling the dialog is not an error.

use rfd::FileDialog;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::data::EncodedImage;

/// Fixed stem of the suggested download name
pub const DOWNLOAD_FILE_STEM: &str = "anime_portrait";

/// Ask the user where to save the converted image and write it.
///
/// Returns the chosen path, `Ok(None)` when the dialog was cancelled,
/// or an error message when the write itself failed.
pub fn save_converted(image: &EncodedImage) -> Result<Option<PathBuf>, String> {
    let mut dialog = FileDialog::new()
        .set_title("Save Anime Portrait")
        .set_file_name(format!("{}.{}", DOWNLOAD_FILE_STEM, image.extension()));

    if let Some(downloads) = dirs::download_dir() {
        dialog = dialog.set_directory(downloads);
    }

    let Some(path) = dialog.save_file() else {
        return Ok(None);
    };

    write_image(image, &path)?;
    println!("💾 Saved converted image to {}", path.display());

    Ok(Some(path))
}

/// Write the encoded bytes to the given path
fn write_image(image: &EncodedImage, path: &Path) -> Result<(), String> {
    fs::write(path, image.data())
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))
}
