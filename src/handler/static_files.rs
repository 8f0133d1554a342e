//! Static file serving module
//!
//! Resolves a request path under the root directory, enforces containment,
//! loads the file and picks its Content-Type.

use crate::error::ServeError;
use crate::handler::resolve;
use crate::http::mime;
use std::path::Path;
use tokio::fs;

/// A file ready to be written to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Serve `request_path` from `root`
///
/// `root` must already be absolute and canonical (see `config::RootDir`).
/// Symlinks are followed only when their target is still inside `root`.
pub async fn serve(root: &Path, request_path: &str) -> Result<StaticFile, ServeError> {
    let candidate = resolve::resolve(root, request_path)?;

    let canonical = match fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(e) => {
            // Containment is decided before existence, or a symlinked
            // directory would reveal what exists outside the root
            if resolves_outside(root, &candidate).await {
                return Err(ServeError::Forbidden);
            }
            return Err(ServeError::from_fs(e));
        }
    };
    if !resolve::is_contained(root, &canonical) {
        return Err(ServeError::Forbidden);
    }

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(ServeError::from_fs)?;
    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    let content = fs::read(&canonical).await.map_err(ServeError::from_fs)?;

    // Content-Type follows the requested name, not a symlink target
    let content_type = mime::content_type_for(&candidate);

    Ok(StaticFile {
        content,
        content_type,
    })
}

/// Whether the deepest existing ancestor of `candidate` resolves outside `root`
///
/// A dangling symlink is judged by where it points.
async fn resolves_outside(root: &Path, candidate: &Path) -> bool {
    for ancestor in candidate.ancestors() {
        if ancestor == root || !resolve::is_contained(root, ancestor) {
            return false;
        }
        if let Ok(canonical) = fs::canonicalize(ancestor).await {
            return !resolve::is_contained(root, &canonical);
        }
        if let Ok(target) = fs::read_link(ancestor).await {
            let parent = ancestor.parent().unwrap_or(root);
            let base = fs::canonicalize(parent)
                .await
                .unwrap_or_else(|_| parent.to_path_buf());
            let pointed = resolve::normalize_lexically(&base.join(target));
            return !resolve::is_contained(root, &pointed);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
        std::fs::write(root.join("style.css"), "body { color: red; }").unwrap();
        std::fs::create_dir(root.join("docs")).unwrap();
        std::fs::write(root.join("docs").join("data.json"), r#"{"ok":true}"#).unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let (_dir, root) = fixture();
        let file = serve(&root, "/index.html").await.unwrap();
        assert_eq!(file.content, b"<h1>hi</h1>");
        assert_eq!(file.content_type, "text/html");

        let file = serve(&root, "/docs/data.json").await.unwrap();
        assert_eq!(file.content, br#"{"ok":true}"#);
        assert_eq!(file.content_type, "application/json");
    }

    #[tokio::test]
    async fn test_binary_content_untouched() {
        let (_dir, root) = fixture();
        let blob: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(root.join("blob.xyz"), &blob).unwrap();

        let file = serve(&root, "/blob.xyz").await.unwrap();
        assert_eq!(file.content, blob);
        assert_eq!(file.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_repeated_requests_identical() {
        let (_dir, root) = fixture();
        let first = serve(&root, "/style.css").await.unwrap();
        let second = serve(&root, "/style.css").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, root) = fixture();
        let err = serve(&root, "/missing.txt").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound));

        // A file used as a directory component
        let err = serve(&root, "/index.html/nested").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound));
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let (_dir, root) = fixture();
        assert!(matches!(
            serve(&root, "/docs").await.unwrap_err(),
            ServeError::NotFound
        ));
        assert!(matches!(
            serve(&root, "/").await.unwrap_err(),
            ServeError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let (_dir, root) = fixture();
        let nested = root.join("docs");

        for raw in ["/../secret.txt", "/%2e%2e%2fsecret.txt", "/../docs/data.json"] {
            assert!(
                matches!(serve(&nested, raw).await.unwrap_err(), ServeError::Forbidden),
                "expected Forbidden for {raw}"
            );
        }
        // Sibling of the nested root that shares its name as a prefix
        std::fs::write(root.join("docs-evil.txt"), "x").unwrap();
        assert!(matches!(
            serve(&nested, "/../docs-evil.txt").await.unwrap_err(),
            ServeError::Forbidden
        ));
    }

    #[tokio::test]
    async fn test_forbidden_does_not_depend_on_existence() {
        let (_dir, root) = fixture();
        let err = serve(&root, "/../definitely-not-there-8f3a.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::Forbidden));
    }

    #[tokio::test]
    async fn test_invalid_path() {
        let (_dir, root) = fixture();
        assert!(matches!(
            serve(&root, "/index%00.html").await.unwrap_err(),
            ServeError::InvalidPath
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_inside_root_is_served() {
        let (_dir, root) = fixture();
        std::os::unix::fs::symlink(root.join("style.css"), root.join("alias.css")).unwrap();
        let file = serve(&root, "/alias.css").await.unwrap();
        assert_eq!(file.content, b"body { color: red; }");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escaping_root_is_forbidden() {
        let (_dir, root) = fixture();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("secret.txt");
        std::fs::write(&target, "secret").unwrap();
        std::os::unix::fs::symlink(&target, root.join("leak.txt")).unwrap();

        let err = serve(&root, "/leak.txt").await.unwrap_err();
        assert!(matches!(err, ServeError::Forbidden));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_dir_escaping_root_hides_existence() {
        let (_dir, root) = fixture();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("present.txt"), "outside").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("ext")).unwrap();

        for raw in ["/ext/present.txt", "/ext/absent.txt", "/ext/deeper/absent.txt"] {
            assert!(
                matches!(serve(&root, raw).await.unwrap_err(), ServeError::Forbidden),
                "expected Forbidden for {raw}"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_classified_by_target() {
        let (_dir, root) = fixture();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone.txt"), root.join("out.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("in.txt")).unwrap();

        assert!(matches!(
            serve(&root, "/out.txt").await.unwrap_err(),
            ServeError::Forbidden
        ));
        assert!(matches!(
            serve(&root, "/in.txt").await.unwrap_err(),
            ServeError::NotFound
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, root) = fixture();
        let locked = root.join("locked.txt");
        std::fs::write(&locked, "private").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply when running as root
        if std::fs::read(&locked).is_ok() {
            return;
        }

        let err = serve(&root, "/locked.txt").await.unwrap_err();
        assert!(matches!(err, ServeError::Io(_)), "got {err:?}");
        assert_eq!(err.status_code(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
