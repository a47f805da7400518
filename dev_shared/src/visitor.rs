use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use buildmodel::{BuildDescription, Resource, ResourceDeleter, StepId, Visit, VisitError, Visitor};

/// [`Visitor`] that records the visited steps, optionally stopping or failing.
#[derive(Default, Clone, Debug)]
pub struct RecordingVisitor {
  visited: Vec<StepId>,
  stop_after: Option<usize>,
  fail_on: Option<StepId>,
}

impl RecordingVisitor {
  #[inline]
  pub fn new() -> Self { Self::default() }
  /// Returns [`Visit::Stop`] on the `count`th visit.
  #[inline]
  pub fn stopping_after(count: usize) -> Self { Self { stop_after: Some(count), ..Self::default() } }
  /// Fails when visiting `step`.
  #[inline]
  pub fn failing_on(step: StepId) -> Self { Self { fail_on: Some(step), ..Self::default() } }

  #[inline]
  pub fn visited(&self) -> &[StepId] { &self.visited }
  /// Gets the names of the visited steps.
  pub fn visited_names<'d>(&self, description: &'d BuildDescription) -> Vec<&'d str> {
    self.visited.iter()
      .filter_map(|step| description.step(*step))
      .map(|step| step.name())
      .collect()
  }
  /// Gets the position of `step` in the visit order.
  #[inline]
  pub fn position(&self, step: StepId) -> Option<usize> {
    self.visited.iter().position(|s| *s == step)
  }
}

impl Visitor for RecordingVisitor {
  fn visit(&mut self, _description: &BuildDescription, step: StepId) -> Result<Visit, VisitError> {
    self.visited.push(step);
    if self.fail_on == Some(step) {
      return Err("visitor failure".into());
    }
    if self.stop_after == Some(self.visited.len()) {
      return Ok(Visit::Stop);
    }
    Ok(Visit::Continue)
  }
}


/// [`ResourceDeleter`] that records deleted paths without touching the filesystem, failing on some paths.
#[derive(Default, Clone, Debug)]
pub struct RecordingDeleter {
  deleted: Vec<PathBuf>,
  fail_on: HashSet<PathBuf>,
}

impl RecordingDeleter {
  #[inline]
  pub fn new() -> Self { Self::default() }
  /// Fails with a permission denied error when deleting the resource at `path`.
  #[inline]
  pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
    self.fail_on.insert(path.into());
    self
  }

  #[inline]
  pub fn deleted(&self) -> &[PathBuf] { &self.deleted }
}

impl ResourceDeleter for RecordingDeleter {
  fn delete(&mut self, resource: &Resource) -> Result<bool, io::Error> {
    let Some(path) = resource.path() else { return Ok(false) };
    if self.fail_on.contains(path) {
      return Err(io::Error::new(io::ErrorKind::PermissionDenied, format!("cannot delete {}", path.display())));
    }
    self.deleted.push(path.to_path_buf());
    Ok(true)
  }
}
