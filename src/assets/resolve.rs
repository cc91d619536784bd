use std::path::{Path, PathBuf};

use crate::foundation::error::PathRejection;

/// Sandboxed resolver for untrusted, base-relative asset paths.
///
/// The base directory is canonicalized once at construction. When that fails (missing or not a
/// directory), every later [`PathResolver::resolve`] returns [`PathRejection::BaseUnavailable`].
#[derive(Clone, Debug)]
pub struct PathResolver {
    base: Option<PathBuf>,
}

impl PathResolver {
    /// Canonicalize `base_dir` and build a resolver confined to it.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        let base = match base_dir.canonicalize() {
            Ok(p) if p.is_dir() => Some(p),
            Ok(p) => {
                tracing::warn!(base = %p.display(), "base directory is not a directory");
                None
            }
            Err(e) => {
                tracing::warn!(base = %base_dir.display(), error = %e, "base directory cannot be canonicalized");
                None
            }
        };
        Self { base }
    }

    /// Canonical base directory, if it resolved.
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Resolve `raw` to a canonical absolute path strictly inside the base directory.
    ///
    /// The target does not need to exist; a missing file still resolves so that callers can
    /// report it as not found rather than as a rejected path.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, PathRejection> {
        let rel = normalize_rel_path(raw)?;
        let base = self.base.as_deref().ok_or(PathRejection::BaseUnavailable)?;

        let mut joined = base.to_path_buf();
        joined.extend(rel.split('/'));

        let canonical = canonicalize_existing_prefix(&joined)?;
        if canonical == base || !canonical.starts_with(base) {
            return Err(PathRejection::OutsideBase);
        }
        Ok(canonical)
    }
}

/// One-shot form of [`PathResolver::resolve`].
pub fn resolve(raw: &str, base_dir: impl AsRef<Path>) -> Result<PathBuf, PathRejection> {
    PathResolver::new(base_dir).resolve(raw)
}

/// Normalize and validate an untrusted relative path.
///
/// The result uses `/` separators with `.` and empty segments removed and every `..` folded into
/// its parent. Input that is absolute, climbs above its own root, or carries characters outside
/// `[A-Za-z0-9._-]` is rejected, never clamped or stripped.
pub fn normalize_rel_path(source: &str) -> Result<String, PathRejection> {
    let s = source.trim();
    if s.is_empty() {
        return Err(PathRejection::Empty);
    }
    if s.contains('\0') {
        return Err(PathRejection::NulByte);
    }

    let s = s.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PathRejection::Absolute);
    }
    if has_drive_prefix(&s) {
        return Err(PathRejection::DriveLetter);
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                if out.pop().is_none() {
                    return Err(PathRejection::EscapesRoot);
                }
            }
            _ => {
                if !part.bytes().all(is_allowed_byte) {
                    return Err(PathRejection::IllegalCharacter(part.to_string()));
                }
                out.push(part);
            }
        }
    }

    if out.is_empty() {
        return Err(PathRejection::NoFileName);
    }
    Ok(out.join("/"))
}

fn has_drive_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

fn is_allowed_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_')
}

// Canonicalize the longest existing ancestor and re-append the missing tail. The tail is made of
// plain names only, so it cannot move the result outside the canonical ancestor.
fn canonicalize_existing_prefix(path: &Path) -> Result<PathBuf, PathRejection> {
    match path.canonicalize() {
        Ok(p) => return Ok(p),
        Err(_) if path.symlink_metadata().is_ok() => return Err(PathRejection::Unresolvable),
        Err(_) => {}
    }

    let mut missing = Vec::new();
    let mut cur = path;
    loop {
        let name = cur.file_name().ok_or(PathRejection::Unresolvable)?;
        missing.push(name.to_os_string());
        let parent = cur.parent().ok_or(PathRejection::Unresolvable)?;
        match parent.canonicalize() {
            Ok(mut out) => {
                for name in missing.iter().rev() {
                    out.push(name);
                }
                return Ok(out);
            }
            Err(_) if parent.symlink_metadata().is_ok() => {
                return Err(PathRejection::Unresolvable);
            }
            Err(_) => cur = parent,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
