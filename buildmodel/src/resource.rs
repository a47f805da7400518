use std::path::{Component, Path, PathBuf};

use hashlink::LinkedHashSet;

use crate::IoTypeId;

/// File-like artifact flowing between steps: a source, an object file, a generated header, a final binary.
///
/// A resource has at most one producer (the output [`IoType`](crate::IoType) that generates it) and any number of
/// dependents (the input I/O types that consume it). The links are maintained by the
/// [`BuildDescription`](crate::BuildDescription); only the flags can be changed directly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Resource {
  path: Option<PathBuf>,
  project_resource: bool,
  needs_rebuild: bool,
  removed: bool,
  pub(crate) producer: Option<IoTypeId>,
  pub(crate) dependents: LinkedHashSet<IoTypeId>,
}

impl Resource {
  #[inline]
  pub(crate) fn new(path: Option<PathBuf>, project_resource: bool) -> Self {
    Self {
      path,
      project_resource,
      needs_rebuild: false,
      removed: false,
      producer: None,
      dependents: LinkedHashSet::new(),
    }
  }

  /// Gets the path of this resource: workspace-relative (starting with the project segment) for project resources,
  /// absolute otherwise. Transient resources have no path.
  #[inline]
  pub fn path(&self) -> Option<&Path> { self.path.as_deref() }
  /// Returns true if this resource is backed by a file of the project, rather than an external or virtual one.
  #[inline]
  pub fn is_project_resource(&self) -> bool { self.project_resource }
  #[inline]
  pub fn needs_rebuild(&self) -> bool { self.needs_rebuild }
  #[inline]
  pub fn is_removed(&self) -> bool { self.removed }

  #[inline]
  pub fn set_needs_rebuild(&mut self, needs_rebuild: bool) { self.needs_rebuild = needs_rebuild; }
  #[inline]
  pub fn set_removed(&mut self, removed: bool) { self.removed = removed; }

  /// Gets the output I/O type that produces this resource, or `None` if nothing produces it.
  #[inline]
  pub fn producer(&self) -> Option<IoTypeId> { self.producer }
  /// Gets the input I/O types that consume this resource, in the order they were attached.
  #[inline]
  pub fn dependents(&self) -> impl Iterator<Item=IoTypeId> + '_ {
    self.dependents.iter().copied()
  }

  /// Gets the path under which input orders are declared for this resource: the project-relative path for project
  /// resources, the full path otherwise.
  pub fn order_key(&self) -> Option<PathBuf> {
    let path = self.path.as_deref()?;
    if self.project_resource {
      let project_relative = path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .skip(1)
        .collect();
      Some(project_relative)
    } else {
      Some(path.to_path_buf())
    }
  }
}
