use std::{fs, io};
use std::fs::Metadata;
use std::path::Path;

/// Gets the metadata for given `path`, returning:
/// - `Ok(Some(metadata))` if a file or directory exists at given path,
/// - `Ok(None)` if no file or directory exists at given path,
/// - `Err(e)` if there was an error getting the metadata for given path.
pub fn metadata(path: impl AsRef<Path>) -> Result<Option<Metadata>, io::Error> {
  match fs::metadata(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
    Ok(m) => Ok(Some(m))
  }
}

/// Attempt to remove the file at given `path`, returning:
/// - `Ok(true)` if a file existed at given path and was removed,
/// - `Ok(false)` if no file exists at given path (but a directory could exist at given path),
/// - `Err(e)` if there was an error getting the metadata for given path, or if there was an error removing the file.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool, io::Error> {
  match metadata(&path)? {
    Some(metadata) if metadata.is_file() => {
      fs::remove_file(&path)?;
      Ok(true)
    }
    _ => Ok(false),
  }
}
