//! Traversal-safe resolution of client-supplied names against a storage root.
//!
//! A requested name is joined onto the canonical root lexically, and then
//! the deepest existing ancestor is canonicalized so symlinks are followed before
//! the containment check. Only paths strictly below the root are accepted.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathGuardError {
    #[error("{0}")]
    InvalidFilename(String),

    #[error("{0}")]
    PathTraversal(String),

    /// The root itself could not be resolved.
    #[error("Failed to resolve storage root: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve `requested` to an absolute path strictly inside `root`.
///
/// `requested` is taken literally: URL decoding happens once, in the path extractor,
/// so a `%` here is part of the filename. The returned path does not have to exist.
pub fn resolve_within(root: &Path, requested: &str) -> Result<PathBuf, PathGuardError> {
    let name = requested.trim();

    if name.is_empty() {
        return Err(PathGuardError::InvalidFilename(
            "Filename must not be empty".to_string(),
        ));
    }
    if name.contains('\0') {
        return Err(PathGuardError::InvalidFilename(
            "Filename contains a NUL byte".to_string(),
        ));
    }

    let relative = Path::new(name);
    if relative.is_absolute() || relative.has_root() {
        return Err(PathGuardError::PathTraversal(format!(
            "Absolute path not allowed: {}",
            name
        )));
    }

    let canonical_root = root.canonicalize()?;

    let mut joined = canonical_root.clone();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                joined.pop();
            }
            Component::Normal(part) => joined.push(part),
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathGuardError::PathTraversal(format!(
                    "Absolute path not allowed: {}",
                    name
                )));
            }
        }
    }

    let resolved = canonicalize_existing_prefix(&joined)?;

    if !is_strictly_within(&canonical_root, &resolved) {
        tracing::warn!(
            requested = %name,
            resolved = %resolved.display(),
            "Rejected path outside storage root"
        );
        return Err(PathGuardError::PathTraversal(format!(
            "Path resolves outside storage root: {}",
            name
        )));
    }

    Ok(resolved)
}

/// Canonicalize the deepest ancestor of `path` that exists and re-append the rest.
fn canonicalize_existing_prefix(path: &Path) -> Result<PathBuf, PathGuardError> {
    let mut existing = path.to_path_buf();
    let mut remainder = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut canonical) => {
                for part in remainder.iter().rev() {
                    canonical.push(part);
                }
                return Ok(canonical);
            }
            Err(err) => {
                // A link whose target is missing cannot be resolved, so its destination is unknown
                if existing
                    .symlink_metadata()
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false)
                {
                    return Err(PathGuardError::PathTraversal(format!(
                        "Unresolvable symlink: {}",
                        existing.display()
                    )));
                }

                match (existing.file_name(), existing.parent()) {
                    (Some(name), Some(parent)) => {
                        remainder.push(name.to_os_string());
                        existing = parent.to_path_buf();
                    }
                    _ => return Err(PathGuardError::Io(err)),
                }
            }
        }
    }
}

/// `target` is below `root` and is not `root` itself.
///
/// Component-wise, so a sibling such as `/srv/videos-evil` is not inside `/srv/videos`.
fn is_strictly_within(root: &Path, target: &Path) -> bool {
    match target.strip_prefix(root) {
        Ok(rest) => rest.components().next().is_some(),
        Err(_) => false,
    }
}
