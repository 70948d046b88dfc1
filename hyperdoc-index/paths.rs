//! Posix-style resource path handling.
//!
//! Help resources are always addressed with forward slashes regardless of the
//! platform; the first path component names the package directory the
//! resource lives in.

/// Normalize a resource path: drop empty and `.` components and resolve `..`
/// against earlier components. Components that would climb above the root
/// are discarded.
pub fn normalize(path: &str) -> String {
  let mut parts: Vec<&str> = Vec::new();
  for comp in path.split('/') {
    match comp {
      "" | "." => {},
      ".." => {
        parts.pop();
      },
      comp => parts.push(comp),
    }
  }
  parts.join("/")
}

/// Join `rel` onto `base` and normalize the result.
pub fn join(base: &str, rel: &str) -> String {
  if base.is_empty() {
    return normalize(rel);
  }
  normalize(&format!("{base}/{rel}"))
}

/// The directory portion of a resource path, or `""` when the path has no
/// directory.
pub fn parent(path: &str) -> &str {
  match path.rfind('/') {
    Some(pos) => &path[..pos],
    None => "",
  }
}

/// The first component of a resource path: the package directory it belongs
/// to.
pub fn first_component(path: &str) -> &str {
  path.split('/').next().unwrap_or("")
}
