use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory name used under the system temp dir when no root is configured
pub const DEFAULT_WORKSPACE_DIR: &str = "captionscribe";

/// One call's staging directory.
///
/// The directory exists from [`DownloadSession::open`] until
/// [`DownloadSession::close`]. If the session is dropped without being closed
/// (for example when the owning future is abandoned), the directory is removed
/// on drop instead.
#[derive(Debug)]
pub struct DownloadSession {
    root: PathBuf,
    closed: bool,
}

impl DownloadSession {
    /// Ensure a directory exists at `path` and bind a session to it
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = path.into();
        fs_err::create_dir_all(&root)?;
        tracing::debug!(path = %root.display(), "workspace opened");

        Ok(Self {
            root,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Remove the directory and everything in it; an absent directory is not an error
    pub fn close(mut self) -> std::io::Result<()> {
        self.closed = true;
        remove_dir_if_present(&self.root)?;
        tracing::debug!(path = %self.root.display(), "workspace closed");
        Ok(())
    }
}

impl Drop for DownloadSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = remove_dir_if_present(&self.root) {
            tracing::warn!(path = %self.root.display(), error = %e, "failed to clean up abandoned workspace");
        }
    }
}

fn remove_dir_if_present(path: &Path) -> std::io::Result<()> {
    match fs_err::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Workspace root used when the configuration leaves it unset
pub fn default_root() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_WORKSPACE_DIR)
}

/// A fresh, per-call directory path under `root`
pub fn session_path(root: &Path) -> PathBuf {
    root.join(format!("session_{}", Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b");

        let session = DownloadSession::open(&path).unwrap();
        assert!(path.is_dir());
        assert!(session.is_open());
        assert_eq!(session.path(), path.as_path());
        session.close().unwrap();
    }

    #[test]
    fn test_open_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ws");
        std::fs::create_dir_all(&path).unwrap();

        let session = DownloadSession::open(&path).unwrap();
        assert!(path.is_dir());
        session.close().unwrap();
    }

    #[test]
    fn test_close_removes_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ws");

        let session = DownloadSession::open(&path).unwrap();
        std::fs::write(path.join("file.en.vtt"), "WEBVTT").unwrap();
        std::fs::create_dir(path.join("nested")).unwrap();
        std::fs::write(path.join("nested").join("file.webm"), b"\x00").unwrap();

        session.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_close_when_already_removed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ws");

        let session = DownloadSession::open(&path).unwrap();
        std::fs::remove_dir_all(&path).unwrap();
        assert!(session.close().is_ok());
    }

    #[test]
    fn test_drop_without_close_removes_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ws");

        {
            let _session = DownloadSession::open(&path).unwrap();
            std::fs::write(path.join("partial.part"), "x").unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_session_paths_are_unique() {
        let root = Path::new("/tmp/root");
        let a = session_path(root);
        let b = session_path(root);
        assert_ne!(a, b);
        assert!(a.starts_with(root));
    }
}
