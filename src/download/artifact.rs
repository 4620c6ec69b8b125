//! The file a request produces and eventually uploads.

use std::path::{Path, PathBuf};

use crate::core::error::AppResult;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Downloaded (or transcoded) media file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercased file extension, empty when the file has none
    pub container: String,
}

impl Artifact {
    /// Reads size from disk.
    pub async fn from_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let size_bytes = tokio::fs::metadata(&path).await?.len();
        let container = extension_of(&path);
        Ok(Self {
            path,
            size_bytes,
            container,
        })
    }

    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    /// Whether this artifact must be compressed before upload
    pub fn exceeds(&self, threshold_mb: f64) -> bool {
        self.size_mb() > threshold_mb
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Picks the file that actually holds the merged video.
///
/// yt-dlp reports the pre-merge name in some cases (e.g. `.webm` while the
/// merger wrote `.mp4`). When the reported file is not in the target
/// container and a same-stem sibling with the target extension exists,
/// that sibling wins; otherwise the reported path is kept.
pub fn resolve_container(reported: &Path, target_ext: &str) -> PathBuf {
    if extension_of(reported) == target_ext.to_lowercase() {
        return reported.to_path_buf();
    }

    let candidate = reported.with_extension(target_ext);
    if candidate.is_file() {
        log::info!(
            "Using merged {} instead of reported {}",
            candidate.display(),
            reported.display()
        );
        candidate
    } else {
        reported.to_path_buf()
    }
}

/// `<dir>/<stem>_compressed.<ext>` next to `input`.
pub fn compressed_path(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    input.with_file_name(format!("{}{}.{}", stem, suffix, ext))
}
