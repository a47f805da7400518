use std::io;

use tempfile::TempDir;

pub mod check;
pub mod description;
pub mod visitor;

/// Creates a new temporary directory that gets cleaned up when dropped.
pub fn create_temp_dir() -> Result<TempDir, io::Error> {
  tempfile::tempdir()
}
