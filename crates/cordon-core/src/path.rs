// SPDX-License-Identifier: Apache-2.0

//! Path confinement and bounded file reads.
//!
//! [`PathValidator`] canonicalizes candidate paths (following symlinks
//! first) and only then checks containment against the allowed root, so a
//! symlink inside the root pointing outside of it is caught. A
//! [`ValidatedPath`] can only be produced by the validator; file reads
//! accept nothing else.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::CordonError;

/// A filesystem path proven to resolve inside the allowed root.
///
/// Can only be created through [`PathValidator::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
}

impl ValidatedPath {
    /// The canonical path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Resolves and confines candidate paths to an allowed root directory.
#[derive(Debug, Clone)]
pub struct PathValidator {
    root: PathBuf,
}

impl PathValidator {
    /// Creates a validator rooted at `allowed_root`.
    ///
    /// The root itself is canonicalized once here so later containment
    /// checks compare canonical forms on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::PathNotFound`] if the root does not exist.
    pub fn new(allowed_root: impl AsRef<Path>) -> Result<Self, CordonError> {
        let root = std::fs::canonicalize(allowed_root.as_ref())
            .map_err(|_| CordonError::PathNotFound)?;
        Ok(Self { root })
    }

    /// Resolves `candidate` and proves it lives inside the allowed root.
    ///
    /// Relative candidates are interpreted against the root; absolute
    /// candidates are taken as-is. Either way the result is canonicalized
    /// (symlinks followed) before the containment check, never after.
    ///
    /// # Errors
    ///
    /// - [`CordonError::PathNotFound`] for empty or nonexistent candidates.
    /// - [`CordonError::PathEscapesRoot`] for candidates containing NUL
    ///   bytes or whose canonical form is outside the root.
    pub fn resolve(&self, candidate: &str) -> Result<ValidatedPath, CordonError> {
        if candidate.is_empty() {
            return Err(CordonError::PathNotFound);
        }
        if candidate.contains('\0') {
            return Err(CordonError::PathEscapesRoot);
        }

        // join() replaces the base entirely for absolute candidates, which
        // is exactly the interpretation we want.
        let joined = self.root.join(candidate);
        let canonical =
            std::fs::canonicalize(&joined).map_err(|_| CordonError::PathNotFound)?;

        if !canonical.starts_with(&self.root) {
            tracing::warn!(root = %self.root.display(), "path escaped the allowed root");
            return Err(CordonError::PathEscapesRoot);
        }

        Ok(ValidatedPath { path: canonical })
    }

    /// The canonical allowed root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reads at most `max_bytes` from a validated path.
///
/// The cap is a bound on the returned content, not a rejection: larger
/// files are truncated at the cap. Content is decoded lossily so binary
/// files cannot poison downstream text handling.
///
/// # Errors
///
/// Returns [`CordonError::PathNotFound`] if the file cannot be opened or
/// read.
pub fn read_bounded(path: &ValidatedPath, max_bytes: u64) -> Result<String, CordonError> {
    let file = File::open(path.as_path()).map_err(|_| CordonError::PathNotFound)?;
    let mut content = Vec::new();
    file.take(max_bytes)
        .read_to_end(&mut content)
        .map_err(|_| CordonError::PathNotFound)?;
    Ok(String::from_utf8_lossy(&content).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inside.txt"), "contents").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.txt"), "nested").unwrap();
        dir
    }

    #[test]
    fn test_resolve_inside_root() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let path = validator.resolve("inside.txt").unwrap();
        assert!(path.as_path().starts_with(validator.root()));
    }

    #[test]
    fn test_resolve_nested_inside_root() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let path = validator.resolve("sub/nested.txt").unwrap();
        assert!(path.as_path().ends_with("sub/nested.txt"));
    }

    #[test]
    fn test_resolve_traversal_escapes_root() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let err = validator.resolve("../../etc/passwd").unwrap_err();
        // Either kind is a rejection, but traversal to an existing file
        // outside the root must be the containment error.
        assert!(matches!(
            err,
            CordonError::PathEscapesRoot | CordonError::PathNotFound
        ));
    }

    #[test]
    fn test_resolve_absolute_outside_root() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let err = validator.resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, CordonError::PathEscapesRoot));
    }

    #[test]
    fn test_resolve_dotdot_to_existing_outside_file() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let inner = outer.path().join("jail");
        fs::create_dir(&inner).unwrap();

        let validator = PathValidator::new(&inner).unwrap();
        let err = validator.resolve("../secret.txt").unwrap_err();
        assert!(matches!(err, CordonError::PathEscapesRoot));
    }

    #[test]
    fn test_resolve_empty_candidate() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let err = validator.resolve("").unwrap_err();
        assert!(matches!(err, CordonError::PathNotFound));
    }

    #[test]
    fn test_resolve_nul_candidate() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let err = validator.resolve("inside\0.txt").unwrap_err();
        assert!(matches!(err, CordonError::PathEscapesRoot));
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let err = validator.resolve("nope.txt").unwrap_err();
        assert!(matches!(err, CordonError::PathNotFound));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_escape() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let inner = outer.path().join("jail");
        fs::create_dir(&inner).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), inner.join("link.txt"))
            .unwrap();

        let validator = PathValidator::new(&inner).unwrap();
        let err = validator.resolve("link.txt").unwrap_err();
        assert!(matches!(err, CordonError::PathEscapesRoot));
    }

    #[test]
    fn test_validator_rejects_missing_root() {
        let err = PathValidator::new("/definitely/not/a/real/root").unwrap_err();
        assert!(matches!(err, CordonError::PathNotFound));
    }

    #[test]
    fn test_read_bounded_full_file() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let path = validator.resolve("inside.txt").unwrap();
        let content = read_bounded(&path, 1024).unwrap();
        assert_eq!(content, "contents");
    }

    #[test]
    fn test_read_bounded_caps_content() {
        let dir = fixture_root();
        let validator = PathValidator::new(dir.path()).unwrap();
        let path = validator.resolve("inside.txt").unwrap();
        let content = read_bounded(&path, 4).unwrap();
        assert_eq!(content, "cont");
    }
}
