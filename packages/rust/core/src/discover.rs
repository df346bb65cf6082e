//! Directory enumeration: find the numbered subdirectories of a scan root.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use mdparts_shared::{MdPartsError, Result, SortOrder};

use crate::ordering::compare_names;

/// True when the first two characters of `name` are ASCII decimal digits.
pub fn is_qualifying_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit()
    )
}

/// List the immediate child directories of `root` whose names qualify,
/// ordered by name.
///
/// Non-recursive. An empty result is not an error. Names that are not
/// valid UTF-8 can never qualify and are skipped.
#[instrument(skip_all, fields(root = %root.display(), %order))]
pub fn find_qualifying_dirs(root: &Path, order: SortOrder) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| MdPartsError::io(root, e))?;

    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MdPartsError::io(root, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            debug!(path = %path.display(), "skipping non-UTF-8 entry name");
            continue;
        };

        if !is_qualifying_name(&name) {
            trace!(%name, "name does not start with two digits");
            continue;
        }

        // `is_dir` follows symlinks, so a linked chapter directory still counts.
        if !path.is_dir() {
            trace!(%name, "not a directory");
            continue;
        }

        dirs.push((name, path));
    }

    dirs.sort_by(|a, b| compare_names(&a.0, &b.0, order));
    debug!(count = dirs.len(), "qualifying directories found");

    Ok(dirs.into_iter().map(|(_, path)| path).collect())
}
