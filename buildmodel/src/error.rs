use std::path::PathBuf;

use thiserror::Error;

use crate::{IoDirection, IoTypeId, ResourceId, StepId};

/// Configuration errors: the build description was constructed or updated in an inconsistent way. These signal a
/// defect in whatever builds the description and are never retried.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
  /// The given step was not found in the build description. This usually means that the step was removed, but its
  /// identifier was kept around.
  #[error("step {0:?} was not found in the build description")]
  StepMissing(StepId),
  /// The given I/O type was not found in the build description.
  #[error("I/O type {0:?} was not found in the build description")]
  IoTypeMissing(IoTypeId),
  /// The given resource was not found in the build description.
  #[error("resource {0:?} was not found in the build description")]
  ResourceMissing(ResourceId),
  /// An input order was declared with a value less than 1, or one that does not fit an order slot.
  #[error("input order {order} declared for `{}` is invalid: orders start at 1", .path.display())]
  InvalidInputOrder { path: PathBuf, order: i64 },
  /// An I/O type was bound to a type definition of the opposite direction.
  #[error("{direction} I/O type cannot be bound to {} type definition `{definition}`", .direction.opposite())]
  UnsupportedIoTypeDefinition { direction: IoDirection, definition: String },
  /// A resource was removed from an I/O type that does not contain it.
  #[error("resource {resource:?} is not attached to I/O type {io_type:?}")]
  ResourceNotAttached { io_type: IoTypeId, resource: ResourceId },
  /// A resource was added to an I/O type that already contains it.
  #[error("resource {resource:?} is already attached to I/O type {io_type:?}")]
  ResourceAlreadyAttached { io_type: IoTypeId, resource: ResourceId },
  /// A resource was added as output to a second I/O type. Resources have at most one producer.
  #[error("resource {resource:?} is already produced by I/O type {producer:?}")]
  MultipleProducers { resource: ResourceId, producer: IoTypeId },
  /// The input and output steps bound the graph and cannot be removed.
  #[error("sentinel step {0:?} cannot be removed")]
  SentinelStep(StepId),
}
