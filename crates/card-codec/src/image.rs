//! Image file to data URI conversion.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Error loading a user-selected image file.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read image {}: {source}", path.display())]
pub struct ImageLoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read an image file into a `data:` URI.
///
/// The MIME type is guessed from the file extension. Neither size nor
/// content is validated.
pub fn image_data_uri(path: &Path) -> Result<String, ImageLoadError> {
    let data = std::fs::read(path).map_err(|source| ImageLoadError {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    tracing::debug!(path = %path.display(), %mime, bytes = data.len(), "Loaded image file");
    Ok(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        assert_eq!(image_data_uri(&path).unwrap(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        for (name, mime) in [
            ("a.jpg", "image/jpeg"),
            ("a.svg", "image/svg+xml"),
            ("a.unknownext", "application/octet-stream"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            let uri = image_data_uri(&path).unwrap();
            assert!(uri.starts_with(&format!("data:{mime};base64,")), "{uri}");
        }
    }

    #[test]
    fn test_missing_file() {
        let err = image_data_uri(Path::new("/nonexistent/card.png")).unwrap_err();
        assert_eq!(err.path, PathBuf::from("/nonexistent/card.png"));
        assert!(err.to_string().contains("/nonexistent/card.png"));
    }
}
