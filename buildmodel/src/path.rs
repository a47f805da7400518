use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Computes the shortest relative path from directory `base` to `location`.
///
/// Walks upward from `base` until a prefix of `location` is found, emitting one `..` per level walked, followed by the
/// remainder of `location`. Without any common prefix, but on the same device, the result climbs to the root and
/// descends into `location`. A relative `location`, or one on a different device than `base`, is returned unchanged.
/// An empty path is returned when `location` equals `base`.
pub fn relative_path(base: impl AsRef<Path>, location: impl AsRef<Path>) -> PathBuf {
  let base = base.as_ref();
  let location = location.as_ref();
  if !location.has_root() {
    return location.to_path_buf();
  }
  if !same_device(base, location) {
    return location.to_path_buf();
  }

  let base_segments = segments(base);
  let location_segments = segments(location);
  let common = base_segments.iter()
    .zip(&location_segments)
    .take_while(|(b, l)| b == l)
    .count();

  let mut relative = PathBuf::new();
  for _ in common..base_segments.len() {
    relative.push("..");
  }
  for segment in &location_segments[common..] {
    relative.push(segment);
  }
  relative
}

/// Gets the normal segments of `path`, without prefix and root.
fn segments(path: &Path) -> Vec<Component<'_>> {
  path.components()
    .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
    .collect()
}

/// Returns true if `a` and `b` are on the same device.
fn same_device(a: &Path, b: &Path) -> bool {
  same_prefix(device_prefix(a), device_prefix(b))
}

fn device_prefix(path: &Path) -> Option<&OsStr> {
  match path.components().next() {
    Some(Component::Prefix(prefix)) => Some(prefix.as_os_str()),
    _ => None,
  }
}

/// Returns true if device prefixes `a` and `b` are equal, ignoring case. Paths without prefix share a device.
fn same_prefix(a: Option<&OsStr>, b: Option<&OsStr>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) => a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase(),
    (None, None) => true,
    _ => false,
  }
}
