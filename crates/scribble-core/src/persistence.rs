//! Saving, loading and exporting the drawing.
//!
//! Saved drawings live in a single storage slot as a PNG data URL. Export
//! produces the same PNG bytes as a downloadable file and never touches the
//! slot.

use crate::codec::{self, CodecError, PNG_MIME};
use crate::download::{DownloadError, Downloader};
use crate::storage::{Storage, StorageError};
use crate::surface::Surface;
use thiserror::Error;

/// Storage slot holding the saved drawing.
pub const SAVED_DRAWING_KEY: &str = "savedDrawing";
/// File name used for exports.
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Encode the whole surface and write it to `key`, replacing any previous value.
pub fn save<S: Surface + ?Sized>(
    surface: &S,
    storage: &dyn Storage,
    key: &str,
) -> PersistenceResult<()> {
    let url = codec::encode_data_url(&surface.snapshot())?;
    storage.set(key, &url)?;
    log::info!(
        "Saved {}x{} drawing to '{}' ({} bytes)",
        surface.width(),
        surface.height(),
        key,
        url.len()
    );
    Ok(())
}

/// Put the drawing stored under `key` back onto the surface at the origin.
///
/// Pixels covered by the image are replaced, not blended, so loading the
/// drawing that is already shown changes nothing. Pixels outside the image
/// are left as they are. Returns `Ok(false)` without touching the surface
/// when the slot is empty.
pub fn load<S: Surface + ?Sized>(
    surface: &mut S,
    storage: &dyn Storage,
    key: &str,
) -> PersistenceResult<bool> {
    let Some(url) = storage.get(key)? else {
        log::debug!("No saved drawing under '{}'", key);
        return Ok(false);
    };
    let image = codec::decode_data_url(&url)?;
    surface.restore(&image);
    log::info!(
        "Loaded {}x{} drawing from '{}'",
        image.width(),
        image.height(),
        key
    );
    Ok(true)
}

/// Encode the whole surface and hand it to the downloader as `drawing.png`.
pub fn export<S: Surface + ?Sized>(
    surface: &S,
    downloader: &dyn Downloader,
) -> PersistenceResult<()> {
    let png_data = codec::encode_png(&surface.snapshot())?;
    downloader.download(EXPORT_FILE_NAME, &png_data, PNG_MIME)?;
    log::info!("Exported {} ({} bytes)", EXPORT_FILE_NAME, png_data.len());
    Ok(())
}
