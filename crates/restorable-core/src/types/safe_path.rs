//! Entry names resolved inside a destination directory.

use crate::ExtractionError;
use crate::Result;
use std::ffi::OsString;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// An archive entry name resolved to a location inside a [`DestDir`].
///
/// `SafePath` represents a path that:
/// - is relative, without a drive prefix or NUL bytes
/// - has been normalized lexically (`.` dropped, `..` folded)
/// - after resolving symlinks of every existing ancestor, still equals the
///   destination or lies beneath it
///
/// There is no `From<PathBuf>`; [`SafePath::resolve`] is the only
/// constructor.
///
/// # Examples
///
/// ```no_run
/// use restorable_core::types::DestDir;
/// use restorable_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/opt/app")?;
///
/// let safe = SafePath::resolve("plugins/a.jar", &dest)?;
/// assert!(safe.resolved().starts_with(dest.as_path()));
///
/// assert!(SafePath::resolve("../etc/passwd", &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath {
    relative: PathBuf,
    resolved: PathBuf,
}

impl SafePath {
    /// Resolves `name` against `dest`.
    ///
    /// An empty name, or one that normalizes to nothing (`a/..`), resolves to
    /// the destination itself.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::PathTraversal` if the name is absolute, has a drive
    ///   prefix, contains NUL, climbs above the destination, or reaches
    ///   outside it through a symlink
    /// - `ExtractionError::Io` if an existing ancestor cannot be canonicalized
    pub fn resolve(name: &str, dest: &DestDir) -> Result<Self> {
        let traversal = || ExtractionError::PathTraversal {
            path: PathBuf::from(name),
        };

        if name.contains('\0') || name.starts_with(['/', '\\']) || has_drive_prefix(name) {
            return Err(traversal());
        }

        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(traversal());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(traversal()),
            }
        }

        let joined = dest.as_path().join(&relative);
        let resolved = match canonicalize_existing(&joined)? {
            Some(resolved) => resolved,
            None => return Err(traversal()),
        };

        if !resolved.starts_with(dest.as_path()) {
            return Err(traversal());
        }

        Ok(Self { relative, resolved })
    }

    /// Returns the normalized path relative to the destination.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.relative
    }

    /// Returns the absolute target path, with existing ancestors canonical.
    #[inline]
    #[must_use]
    pub fn resolved(&self) -> &Path {
        &self.resolved
    }

    /// Returns `true` if the name resolved to the destination itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Converts into the absolute target path.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.resolved
    }
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Canonicalizes the deepest existing ancestor of `path` and re-appends the
/// missing tail. Returns `None` when the deepest existing component is a
/// dangling symlink, whose target cannot be checked.
fn canonicalize_existing(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut existing = path;
    let mut tail: Vec<OsString> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut canonical) => {
                for part in tail.iter().rev() {
                    canonical.push(part);
                }
                return Ok(Some(canonical));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if existing.symlink_metadata().is_ok() {
                    return Ok(None);
                }
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(part)) => {
                        tail.push(part.to_os_string());
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => {
                return Err(io::Error::new(
                    e.kind(),
                    format!("failed to canonicalize {}: {e}", existing.display()),
                ));
            }
        }
    }
}
