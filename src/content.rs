use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PortalError;

const MARKDOWN_EXT: &str = "md";

/// Resolve a requested document name against a tier's base directory.
///
/// Names are expected to come from [`list_documents`], but arbitrary
/// strings must be safe here: anything containing a traversal token or a
/// path separator is rejected outright, and the joined path must still
/// sit under the base directory afterwards.
///
/// The containment check compares lexical path prefixes without touching
/// the filesystem. Symlinks inside the base directory that point outside
/// it are NOT detected; the content tree is operator-managed and this
/// known gap is accepted.
pub fn resolve(base_dir: &Path, requested_name: &str) -> Result<PathBuf, PortalError> {
    if requested_name.contains("..")
        || requested_name.contains('/')
        || requested_name.contains(std::path::MAIN_SEPARATOR)
    {
        return Err(PortalError::InvalidName {
            name: requested_name.to_string(),
        });
    }

    let joined = base_dir.join(requested_name);
    let absolute = absolute_path(&joined)?;
    let absolute_base = absolute_path(base_dir)?;

    if !absolute.starts_with(&absolute_base) {
        return Err(PortalError::InvalidName {
            name: requested_name.to_string(),
        });
    }

    Ok(joined)
}

/// Resolve and read a document as UTF-8 text.
pub fn load_document(base_dir: &Path, requested_name: &str) -> Result<String, PortalError> {
    let path = resolve(base_dir, requested_name)?;

    std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            PortalError::NotFound { path, source }
        } else {
            PortalError::Io { path, source }
        }
    })
}

/// List the markdown files directly under `base_dir`, sorted by name.
/// A missing or unreadable directory yields an empty list.
pub fn list_documents(base_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(base_dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext == MARKDOWN_EXT)
        })
        .collect();

    names.sort();
    names
}

fn absolute_path(path: &Path) -> Result<PathBuf, PortalError> {
    std::path::absolute(path).map_err(|source| PortalError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn content_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("guide.md"), "# Guide\nWelcome aboard.").unwrap();
        fs::write(dir.path().join("notes.md"), "# Notes").unwrap();
        fs::write(dir.path().join("readme.txt"), "not markdown").unwrap();
        dir
    }

    #[test]
    fn resolves_plain_names() {
        let dir = content_dir();
        let path = resolve(dir.path(), "guide.md").unwrap();
        assert_eq!(path, dir.path().join("guide.md"));
    }

    #[test]
    fn rejects_traversal_tokens() {
        let dir = content_dir();
        for name in [
            "../secret.md",
            "../../etc/passwd",
            "..",
            "a/../b.md",
            "nested/doc.md",
            "/etc/passwd",
        ] {
            let err = resolve(dir.path(), name).unwrap_err();
            assert!(
                matches!(err, PortalError::InvalidName { .. }),
                "{name} should be invalid"
            );
        }
    }

    #[test]
    fn rejection_does_not_depend_on_base() {
        for base in ["content/public", "/tmp", "."] {
            let err = resolve(Path::new(base), "../escape.md").unwrap_err();
            assert!(matches!(err, PortalError::InvalidName { .. }));
        }
    }

    #[test]
    fn loads_exact_file_contents() {
        let dir = content_dir();
        let text = load_document(dir.path(), "guide.md").unwrap();
        assert_eq!(text, "# Guide\nWelcome aboard.");
    }

    #[test]
    fn missing_file_is_not_found_not_invalid() {
        let dir = content_dir();
        let err = load_document(dir.path(), "absent.md").unwrap_err();
        assert!(matches!(err, PortalError::NotFound { .. }));
    }

    #[test]
    fn listing_returns_sorted_markdown_only() {
        let dir = content_dir();
        assert_eq!(list_documents(dir.path()), vec!["guide.md", "notes.md"]);
    }

    #[test]
    fn listing_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nowhere");
        assert!(list_documents(&missing).is_empty());
    }

    #[test]
    fn listing_skips_subdirectories() {
        let dir = content_dir();
        fs::create_dir(dir.path().join("archive.md")).unwrap();
        assert_eq!(list_documents(dir.path()), vec!["guide.md", "notes.md"]);
    }
}
