use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::{BuildDescription, DescriptionFlags, Resource, ResourceId};
use crate::fs::{metadata, remove_file_if_exists};
use crate::tracker::Tracker;

/// Selects the stale generated resources among `resources`: those with a path, that are flagged as requested by
/// `flags` (needing a rebuild if it contains [`DescriptionFlags::REBUILD`], removed if it contains
/// [`DescriptionFlags::REMOVED`]), that are produced by a step other than the input step, and that are project
/// resources. Original sources are never selected, no matter their flags.
///
/// Unknown resources are skipped. Selected resources keep the order of `resources`.
pub fn filter_generated_resources(
  description: &BuildDescription,
  resources: impl IntoIterator<Item=ResourceId>,
  flags: DescriptionFlags,
) -> Vec<ResourceId> {
  resources.into_iter()
    .filter(|id| {
      let Some(resource) = description.resource(*id) else { return false };
      let flagged = (flags.contains(DescriptionFlags::REBUILD) && resource.needs_rebuild())
        || (flags.contains(DescriptionFlags::REMOVED) && resource.is_removed());
      resource.path().is_some() && flagged && description.is_generated(*id) && resource.is_project_resource()
    })
    .collect()
}


/// Resolves the workspace path of `resource` to a file or directory below `workspace_root`. Returns `Ok(None)` if
/// the resource has no path, or nothing exists at its location.
pub fn find_resource_for_build_resource(
  workspace_root: impl AsRef<Path>,
  resource: &Resource,
) -> Result<Option<PathBuf>, io::Error> {
  let Some(path) = resource.path() else { return Ok(None) };
  let mut location = workspace_root.as_ref().to_path_buf();
  location.extend(path.components().filter(|c| matches!(c, Component::Normal(_))));
  Ok(metadata(&location)?.map(|_| location))
}


/// Deletes the files of stale resources.
pub trait ResourceDeleter {
  /// Deletes the file of `resource`, returning `Ok(true)` if a file was deleted, or `Ok(false)` if no file existed.
  fn delete(&mut self, resource: &Resource) -> Result<bool, io::Error>;
}

impl<F: FnMut(&Resource) -> Result<bool, io::Error>> ResourceDeleter for F {
  #[inline]
  fn delete(&mut self, resource: &Resource) -> Result<bool, io::Error> { self(resource) }
}

/// [`ResourceDeleter`] that deletes files below a workspace root directory, which project resource paths are
/// relative to.
#[derive(Clone, Debug)]
pub struct FsResourceDeleter {
  workspace_root: PathBuf,
}

impl FsResourceDeleter {
  #[inline]
  pub fn new(workspace_root: impl Into<PathBuf>) -> Self { Self { workspace_root: workspace_root.into() } }

  #[inline]
  pub fn workspace_root(&self) -> &Path { &self.workspace_root }
}

impl ResourceDeleter for FsResourceDeleter {
  fn delete(&mut self, resource: &Resource) -> Result<bool, io::Error> {
    match find_resource_for_build_resource(&self.workspace_root, resource)? {
      Some(location) => remove_file_if_exists(location),
      None => Ok(false),
    }
  }
}


/// Failure to delete one stale resource.
#[derive(Debug, Error)]
#[error("failed to delete `{}`", .path.display())]
pub struct CleanFailure {
  pub resource: ResourceId,
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

/// Aggregate of all deletion failures of a [`clean_generated_rebuild_resources`] call.
#[derive(Debug, Error)]
#[error("failed to remove {} resource(s)", .failures.len())]
pub struct CleanError {
  failures: Vec<CleanFailure>,
}

impl CleanError {
  #[inline]
  pub fn failures(&self) -> &[CleanFailure] { &self.failures }
  #[inline]
  pub fn into_failures(self) -> Vec<CleanFailure> { self.failures }
}

/// Deletes the stale generated resources of `description`: those selected by [`filter_generated_resources`] with
/// [`DescriptionFlags::REMOVED`] and [`DescriptionFlags::REBUILD`]. Returns the selected resources.
///
/// # Errors
///
/// Deletion continues after a failure. Returns a [`CleanError`] holding every failure once all selected resources
/// were attempted.
pub fn clean_generated_rebuild_resources(
  description: &BuildDescription,
  deleter: &mut (impl ResourceDeleter + ?Sized),
  tracker: &mut (impl Tracker + ?Sized),
) -> Result<Vec<ResourceId>, CleanError> {
  let ids = description.resources().map(|(id, _)| id);
  let stale = filter_generated_resources(description, ids, DescriptionFlags::REMOVED | DescriptionFlags::REBUILD);
  let mut failures = Vec::new();
  for id in &stale {
    let Some(resource) = description.resource(*id) else { continue };
    tracker.stale_resource(*id, resource);
    tracker.delete_start(*id, resource);
    let result = deleter.delete(resource);
    tracker.delete_end(*id, resource, result.as_ref().copied());
    if let Err(source) = result {
      let path = resource.path().map(Path::to_path_buf).unwrap_or_default();
      failures.push(CleanFailure { resource: *id, path, source });
    }
  }
  if failures.is_empty() {
    Ok(stale)
  } else {
    Err(CleanError { failures })
  }
}
