//! Leaf-image upload storage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from("uploads")
}

const fn default_max_bytes() -> usize {
    5 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Directory uploaded images are written to and served from (`/uploads`).
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Largest accepted image, in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            max_bytes: default_max_bytes(),
        }
    }
}
