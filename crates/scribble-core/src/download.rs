//! Handing finished files to the user.

use thiserror::Error;

/// Download errors.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Download cancelled")]
    Cancelled,
    #[error("Download unavailable: {0}")]
    Unavailable(String),
}

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Something that can deliver a named file to the user.
pub trait Downloader {
    /// Deliver `data` as a file called `file_name`.
    fn download(&self, file_name: &str, data: &[u8], mime_type: &str) -> DownloadResult<()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::DirectoryDownloader;

#[cfg(target_arch = "wasm32")]
pub use web::BrowserDownloader;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{DownloadError, DownloadResult, Downloader};
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Writes downloads into a fixed directory, overwriting same-named files.
    pub struct DirectoryDownloader {
        dir: PathBuf,
    }

    impl DirectoryDownloader {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// Downloader writing into the user's download directory, falling
        /// back to the current directory.
        pub fn default_location() -> Self {
            Self::new(dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }
    }

    impl Downloader for DirectoryDownloader {
        fn download(&self, file_name: &str, data: &[u8], _mime_type: &str) -> DownloadResult<()> {
            fs::create_dir_all(&self.dir)
                .map_err(|e| DownloadError::Io(format!("Failed to create {}: {}", self.dir.display(), e)))?;
            let path = self.dir.join(file_name);
            fs::write(&path, data)
                .map_err(|e| DownloadError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            log::info!("Wrote {} ({} bytes)", path.display(), data.len());
            Ok(())
        }
    }

}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{DownloadError, DownloadResult, Downloader};
    use wasm_bindgen::JsCast;

    /// Triggers a browser download through a temporary anchor element.
    #[derive(Default)]
    pub struct BrowserDownloader;

    impl BrowserDownloader {
        pub fn new() -> Self {
            Self
        }
    }

    impl Downloader for BrowserDownloader {
        fn download(&self, file_name: &str, data: &[u8], mime_type: &str) -> DownloadResult<()> {
            let js_err = |what: &str, e: wasm_bindgen::JsValue| {
                DownloadError::Unavailable(format!("{}: {:?}", what, e))
            };
            let window = web_sys::window()
                .ok_or_else(|| DownloadError::Unavailable("No window object".to_string()))?;
            let document = window
                .document()
                .ok_or_else(|| DownloadError::Unavailable("No document".to_string()))?;

            let uint8_array = js_sys::Uint8Array::from(data);
            let blob_parts = js_sys::Array::new();
            blob_parts.push(&uint8_array);

            let options = web_sys::BlobPropertyBag::new();
            options.set_type(mime_type);

            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)
                .map_err(|e| js_err("Failed to create blob", e))?;
            let url = web_sys::Url::create_object_url_with_blob(&blob)
                .map_err(|e| js_err("Failed to create URL", e))?;

            let anchor = document
                .create_element("a")
                .map_err(|e| js_err("Failed to create element", e))?
                .dyn_into::<web_sys::HtmlAnchorElement>()
                .map_err(|_| DownloadError::Unavailable("Failed to cast to anchor".to_string()))?;

            anchor.set_href(&url);
            anchor.set_download(file_name);
            anchor.click();

            web_sys::Url::revoke_object_url(&url).ok();
            Ok(())
        }
    }
}
