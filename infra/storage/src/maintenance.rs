use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

pub(crate) const TMP_MARKER: &str = ".rstmp.";

/// Writes older than this are considered abandoned by a crashed process.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temporary files left behind by interrupted atomic writes.
///
/// Returns the number of files removed.
pub(crate) fn purge_tmp(root: &Path) -> usize {
    let now = SystemTime::now();
    let (mut removed, mut failed) = (0usize, 0usize);

    for entry in WalkDir::new(root).min_depth(1).into_iter().flatten().filter(is_tmp) {
        if !is_stale(&entry, now) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Failed to remove temp file");
                failed += 1;
            },
        }
    }

    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary files");
    }
    removed
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
