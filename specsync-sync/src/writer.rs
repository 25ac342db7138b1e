//! Local output for rendered documents (`specsync render --out-dir`).
//!
//! Each destination path is joined under the output directory and written
//! atomically: `<path>.specsync.tmp` then rename.

use std::path::{Component, Path, PathBuf};

use crate::error::{io_err, SyncError};
use crate::pipeline::RenderedDocument;

/// Atomically write `content` to `path`, creating parent directories.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.specsync.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("wrote: {}", path.display());
    Ok(())
}

/// Map a repository-relative destination under `out_dir`.
///
/// Absolute destinations and `..` components are rejected.
pub fn output_path(out_dir: &Path, destination: &str) -> Result<PathBuf, SyncError> {
    let rel = Path::new(destination);
    let safe = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe || destination.is_empty() {
        return Err(SyncError::UnsafeDestination(destination.to_owned()));
    }
    Ok(out_dir.join(rel))
}

/// Write every document under `out_dir`; returns the paths written.
pub fn write_documents(
    out_dir: &Path,
    docs: &[RenderedDocument],
) -> Result<Vec<PathBuf>, SyncError> {
    let mut written = Vec::with_capacity(docs.len());
    for doc in docs {
        let path = output_path(out_dir, &doc.destination)?;
        atomic_write(&path, &doc.content)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specsync_core::RecordType;
    use std::fs;
    use tempfile::TempDir;

    fn doc(destination: &str, content: &str) -> RenderedDocument {
        RenderedDocument {
            record_type: RecordType::from("t"),
            source: PathBuf::from("in/t.yml"),
            destination: destination.to_owned(),
            content: content.to_owned(),
        }
    }

    #[test]
    fn creates_parent_directories_and_cleans_tmp() {
        let out = TempDir::new().unwrap();
        let written = write_documents(
            out.path(),
            &[doc("content/specification/t.md", "---\nname: t\n---\n")],
        )
        .expect("write");
        assert_eq!(written.len(), 1);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "---\nname: t\n---\n");
        let tmp = PathBuf::from(format!("{}.specsync.tmp", written[0].display()));
        assert!(!tmp.exists(), ".specsync.tmp must be cleaned up");
    }

    #[test]
    fn overwrites_existing_file() {
        let out = TempDir::new().unwrap();
        let path = out.path().join("a.md");
        atomic_write(&path, "v1").unwrap();
        atomic_write(&path, "v2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
    }

    #[test]
    fn escaping_destinations_are_rejected() {
        let out = TempDir::new().unwrap();
        for bad in ["../x.md", "/etc/x.md", "a/../../x.md", ""] {
            assert!(
                matches!(output_path(out.path(), bad), Err(SyncError::UnsafeDestination(_))),
                "{bad} should be rejected"
            );
        }
        assert!(output_path(out.path(), "./content/a.md").is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("file.md");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("file.md.specsync.tmp");

        let result = atomic_write_with_tmp(&path, "new content", &tmp_path);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only assert when the rename failed.
        if result.is_err() {
            assert_eq!(fs::read_to_string(&path).unwrap(), "original");
            assert!(!tmp_path.exists(), ".specsync.tmp should be cleaned up");
        }
    }
}
