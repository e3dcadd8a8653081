//! Leaf image storage under the configured uploads directory.

use std::path::{Path, PathBuf};

use rand::Rng;

/// Extensions accepted for leaf images, lowercase with the leading dot.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".jfif"];

pub const REJECTED_EXTENSION: &str = "Only images (.jpg, .jpeg, .png, .jfif) are allowed!";

/// Lowercased extension of a client-supplied file name, if it is allowed.
///
/// Only the extension is checked; the declared content type is ignored since
/// mobile clients often send `application/octet-stream`.
#[must_use]
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let ext = format!(".{ext}");
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// A file written to the uploads directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
}

impl StoredUpload {
    /// Public URL served by the static `/uploads` route.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/uploads/{}", self.file_name)
    }

    /// Best-effort removal, used when the detection could not be recorded.
    pub async fn discard(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), "failed to remove upload: {e}");
        }
    }
}

/// `leaf-<unix millis>-<random><ext>`.
#[must_use]
pub fn leaf_file_name(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("leaf-{millis}-{suffix}{ext}")
}

/// Write `bytes` to a fresh leaf file in `dir`, creating the directory when
/// needed.
///
/// # Errors
///
/// Returns the I/O error if the directory or file cannot be written.
pub async fn store(dir: &Path, ext: &str, bytes: &[u8]) -> std::io::Result<StoredUpload> {
    tokio::fs::create_dir_all(dir).await?;
    let file_name = leaf_file_name(ext);
    let path = dir.join(&file_name);
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored upload");
    Ok(StoredUpload { file_name, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("leaf.jpg", Some(".jpg"))]
    #[case("LEAF.JPEG", Some(".jpeg"))]
    #[case("scan.Png", Some(".png"))]
    #[case("photo.jfif", Some(".jfif"))]
    #[case("leaf.gif", None)]
    #[case("leaf", None)]
    #[case("leaf.jpg.exe", None)]
    fn extension_filter(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(allowed_extension(name).as_deref(), expected);
    }

    #[test]
    fn leaf_names_follow_pattern() {
        let name = leaf_file_name(".png");
        assert!(name.starts_with("leaf-"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.matches('-').count(), 2);
    }

    #[tokio::test]
    async fn store_creates_directory_and_discard_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("uploads");
        let stored = store(&dir, ".jpg", b"jpeg bytes").await.unwrap();
        assert!(stored.path.exists());
        assert_eq!(stored.url(), format!("/uploads/{}", stored.file_name));

        stored.discard().await;
        assert!(!stored.path.exists());
    }
}
