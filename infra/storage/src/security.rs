use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` without touching the disk, refusing to climb above the root.
fn normalize(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir if out.pop() => {},
            Component::ParentDir => {
                return Err(escape(path, "Path climbs above the storage root"));
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(escape(path, "Absolute paths are not allowed"));
            },
        }
    }

    if out.as_os_str().is_empty() {
        return Err(escape(path, "Path resolves to the storage root itself"));
    }
    Ok(out)
}

/// Joins `path` onto `root`, guaranteeing the result stays inside `root`.
///
/// The nearest existing ancestor is canonicalized so symlinks cannot point
/// outside the sandbox.
pub(crate) fn resolve(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();
    let joined = root.join(normalize(path)?);

    let mut ancestor = joined.as_path();
    loop {
        if ancestor == root {
            return Ok(joined);
        }
        match ancestor.canonicalize() {
            Ok(canonical) if canonical.starts_with(root) => return Ok(joined),
            Ok(canonical) => {
                return Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Symlink leaves the storage root".into()),
                });
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to verify {}", ancestor.display()).into()),
                });
            },
        }
        match ancestor.parent() {
            Some(parent) => ancestor = parent,
            None => return Err(escape(path, "No ancestor inside the storage root")),
        }
    }
}

fn escape(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_parent_segments_are_collapsed() {
        let normalized = normalize(Path::new("a/./b/../c.bin")).unwrap();
        assert_eq!(normalized, PathBuf::from("a/c.bin"));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        for path in ["../outside", "a/../../outside", "/etc/passwd", ".", "a/.."] {
            let err = normalize(Path::new(path)).unwrap_err();
            assert_eq!(err.kind(), "PathTraversalAttempt", "{path}");
        }
    }
}
