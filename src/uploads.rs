//! Cover image uploads.
//!
//! Files are accepted by extension only and stored under a random name in the
//! upload directory, where the static file service picks them up. Stored files
//! are never deleted, even when the post that referenced them changes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Lowercase extensions accepted for cover images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Warning shown when an upload is refused.
pub const REJECTED_MESSAGE: &str = "Only JPG/PNG/WEBP images are allowed.";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to write upload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file field received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What happened to an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpload {
    /// No file was chosen.
    Missing,
    /// The file was refused because of its extension; nothing was written.
    Rejected,
    /// The file was written under this generated name.
    Saved(String),
}

impl ImageUpload {
    /// The stored filename, if the upload was saved.
    #[must_use]
    pub fn into_filename(self) -> Option<String> {
        match self {
            Self::Saved(name) => Some(name),
            Self::Missing | Self::Rejected => None,
        }
    }
}

/// Store an uploaded cover image in `upload_dir`.
///
/// A missing file or empty filename yields [`ImageUpload::Missing`]; a
/// disallowed extension yields [`ImageUpload::Rejected`]. Accepted files are
/// written as `<16 hex chars>.<ext>`.
///
/// # Errors
///
/// Returns an error if the upload directory or file cannot be written.
pub async fn save_image(
    upload_dir: &Path,
    file: Option<&UploadedFile>,
) -> Result<ImageUpload, UploadError> {
    let Some(file) = file.filter(|f| !f.filename.is_empty()) else {
        return Ok(ImageUpload::Missing);
    };

    let safe_name = secure_filename(&file.filename);
    let Some(ext) = allowed_extension(&safe_name) else {
        warn!(filename = %file.filename, "Rejected cover image with disallowed extension");
        return Ok(ImageUpload::Rejected);
    };

    let stored_name = format!("{}.{ext}", hex::encode(rand::random::<[u8; 8]>()));
    let path = upload_dir.join(&stored_name);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|source| UploadError::Io {
            path: upload_dir.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|source| UploadError::Io {
            path: path.clone(),
            source,
        })?;

    debug!(
        original = %file.filename,
        stored = %stored_name,
        bytes = file.bytes.len(),
        "Saved cover image"
    );
    Ok(ImageUpload::Saved(stored_name))
}

/// Reduce a client-supplied filename to a safe ASCII name.
///
/// Non-ASCII characters are dropped outright rather than folded to a base
/// letter, so `"\u{fc}mlauts"` becomes `"mlauts"`. Path separators and
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is removed,
/// and leading or trailing `.`/`_` are trimmed. May return an empty string.
/// Only the extension of the result is used; stored names are random.
#[must_use]
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: b"\x89PNG fake image bytes".to_vec(),
        }
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool photo.JPG"), "My_cool_photo.JPG");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename(r"C:\Users\me\pic.png"), "C_Users_me_pic.png");
        assert_eq!(secure_filename(".hidden.webp"), "hidden.webp");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.gif"), "i_contain_cool_mluts.gif");
        assert_eq!(secure_filename("___"), "");
        assert_eq!(secure_filename("\u{fc}mlauts.png"), "mlauts.png");
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("a.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("a.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(allowed_extension("a.webp").as_deref(), Some("webp"));
        assert_eq!(allowed_extension("a.gif"), None);
        assert_eq!(allowed_extension("png"), None);
        assert_eq!(allowed_extension("archive.png.exe"), None);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(save_image(dir.path(), None).await.unwrap(), ImageUpload::Missing);
        assert_eq!(
            save_image(dir.path(), Some(&file(""))).await.unwrap(),
            ImageUpload::Missing
        );
    }

    #[tokio::test]
    async fn test_rejected_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");

        let outcome = save_image(&upload_dir, Some(&file("script.php"))).await.unwrap();
        assert_eq!(outcome, ImageUpload::Rejected);
        assert!(!upload_dir.exists());

        // Nothing survives sanitizing, so there is no extension to accept.
        let outcome = save_image(&upload_dir, Some(&file("\u{444}\u{43e}\u{442}\u{43e}")))
            .await
            .unwrap();
        assert_eq!(outcome, ImageUpload::Rejected);
    }

    #[tokio::test]
    async fn test_saved_with_random_name() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");

        let outcome = save_image(&upload_dir, Some(&file("Beach Day.PNG"))).await.unwrap();
        let ImageUpload::Saved(name) = outcome else {
            panic!("expected saved upload, got {outcome:?}");
        };

        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), 16);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");

        let written = std::fs::read(upload_dir.join(&name)).unwrap();
        assert_eq!(written, b"\x89PNG fake image bytes");

        let other = save_image(&upload_dir, Some(&file("Beach Day.PNG")))
            .await
            .unwrap()
            .into_filename()
            .unwrap();
        assert_ne!(other, name);
    }
}
