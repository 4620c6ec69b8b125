//! Per-request scratch directories.
//!
//! Every request gets its own directory under the download root. The
//! artifact and the staged cookie file live there, and cleanup removes
//! only that directory, so concurrent requests never delete each
//! other's files.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::core::error::AppResult;

/// Prefix shared by all request directories (used for stale sweeping)
pub const WORKSPACE_PREFIX: &str = "req-";

/// Fixed name of the staged cookie file inside a workspace
pub const COOKIES_FILE_NAME: &str = "cookies.txt";

/// Scratch directory owned by a single request.
#[derive(Debug)]
pub struct RequestWorkspace {
    dir: PathBuf,
}

impl RequestWorkspace {
    /// Creates `<root>/req-<chat>-<message>-<uuid>`, creating `root` if needed.
    pub async fn create(root: &Path, chat_id: i64, message_id: i32) -> AppResult<Self> {
        let name = format!(
            "{}{}-{}-{}",
            WORKSPACE_PREFIX,
            chat_id,
            message_id,
            Uuid::new_v4().simple()
        );
        let dir = root.join(name);
        fs::create_dir_all(&dir).await?;
        log::debug!("Created request workspace {}", dir.display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes the cookie blob verbatim to the workspace's cookie file.
    ///
    /// Returns `None` without touching the filesystem when there is nothing
    /// to stage.
    pub async fn stage_cookies(&self, cookies: Option<&str>) -> AppResult<Option<PathBuf>> {
        let Some(content) = cookies else {
            return Ok(None);
        };

        let path = self.dir.join(COOKIES_FILE_NAME);
        fs::write(&path, content.as_bytes()).await?;
        restrict_permissions(&path).await;
        log::debug!("Staged {} bytes of cookies at {}", content.len(), path.display());
        Ok(Some(path))
    }

    /// Best-effort removal of everything in the workspace.
    ///
    /// Each regular file is deleted individually; failures are logged and
    /// swallowed. The directory itself is removed last. Never fails.
    pub async fn cleanup(self) {
        let removed = remove_files_best_effort(&self.dir).await;
        if let Err(e) = fs::remove_dir_all(&self.dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove workspace {}: {}", self.dir.display(), e);
            }
        }
        log::debug!("Cleaned workspace {} ({} files)", self.dir.display(), removed);
    }
}

/// Deletes every regular file directly inside `dir`, ignoring failures.
///
/// Returns the number of files removed.
pub async fn remove_files_best_effort(dir: &Path) -> usize {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot list {} for cleanup: {}", dir.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                log::debug!("Stopped listing {}: {}", dir.display(), e);
                break;
            }
        };

        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        match fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Failed to delete {}: {}", entry.path().display(), e),
        }
    }
    removed
}

/// Removes request directories left behind by a previous run.
///
/// Only entries named with [`WORKSPACE_PREFIX`] are touched.
pub async fn sweep_stale_workspaces(root: &Path) -> usize {
    let mut entries = match fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut swept = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_workspace = entry.file_name().to_string_lossy().starts_with(WORKSPACE_PREFIX);
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if !(is_workspace && is_dir) {
            continue;
        }
        match fs::remove_dir_all(entry.path()).await {
            Ok(()) => swept += 1,
            Err(e) => log::warn!("Failed to sweep stale workspace {}: {}", entry.path().display(), e),
        }
    }

    if swept > 0 {
        log::info!("Removed {} stale request workspace(s) from {}", swept, root.display());
    }
    swept
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await {
        log::warn!("Failed to restrict permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) {}
