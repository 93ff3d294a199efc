//! Transient local copies of uploaded files.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{AppError, AppResult};

/// An uploaded image held in a temp file; the file is removed on drop.
#[derive(Debug)]
pub struct UploadedImage {
    file: NamedTempFile,
    pub file_name: String,
    pub content_type: String,
}

impl UploadedImage {
    /// Write `bytes` to a fresh temp file under `dir`.
    pub fn persist(
        dir: &Path,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> AppResult<Self> {
        let file_name = file_name.into();
        let extension = Path::new(&file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&extension)
            .tempfile_in(dir)
            .map_err(|e| AppError::internal(format!("Cannot create upload file: {}", e)))?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| AppError::internal(format!("Cannot write upload file: {}", e)))?;

        Ok(Self {
            file,
            file_name,
            content_type: content_type.into(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload =
            UploadedImage::persist(dir.path(), "front.jpg", "image/jpeg", b"jpeg-bytes").unwrap();
        let path = upload.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg-bytes");

        drop(upload);
        assert!(!path.exists());
    }
}
