//! Build description graph for incremental native builds.
//!
//! A [`BuildDescription`] owns the [`Step`]s (tool invocations) of one build configuration, the [`Resource`]s
//! (files) flowing between them, and the [`IoType`]s binding resources to steps as inputs or outputs. Two sentinel
//! steps bound the graph: the input step produces the original sources, and the output step consumes the final build
//! products.
//!
//! On top of the description this crate provides:
//!
//! - [`BuildDescription::adjacent_steps`]: the producers or consumers of a step, respecting declared input orders
//!   such as link order.
//! - [`GraphWalker`]: a depth-first traversal that hands every reachable step to a [`Visitor`] exactly once, in
//!   dependency order.
//! - [`filter_generated_resources`] and [`clean_generated_rebuild_resources`]: selection and removal of stale
//!   generated resources.
//! - [`relative_path`]: relative path computation between a build directory and a location.
//!
//! Build events are reported to a [`Tracker`](tracker::Tracker), which can be used for logging, event tracing, and
//! testing.

pub use crate::description::BuildDescription;
pub use crate::error::Error;
pub use crate::flags::DescriptionFlags;
pub use crate::io_type::{IoDirection, IoType, OrderedResources};
pub use crate::path::relative_path;
pub use crate::resource::Resource;
pub use crate::stale::{clean_generated_rebuild_resources, CleanError, CleanFailure, filter_generated_resources, find_resource_for_build_resource, FsResourceDeleter, ResourceDeleter};
pub use crate::step::{Step, StepKind};
pub use crate::tool::{InputOrder, InputType, IoTypeDefinition, OutputType, Tool};
pub use crate::walker::{accept, Accepted, Direction, GraphWalker, Visit, VisitError, Visitor, WalkError};

pub mod tracker;

mod description;
mod error;
mod flags;
mod fs;
mod io_type;
mod path;
mod resource;
mod stale;
mod step;
mod tool;
mod walker;

slotmap::new_key_type! {
  /// Identifier of a [`Step`] in a [`BuildDescription`].
  pub struct StepId;
  /// Identifier of an [`IoType`] in a [`BuildDescription`].
  pub struct IoTypeId;
  /// Identifier of a [`Resource`] in a [`BuildDescription`].
  pub struct ResourceId;
}
