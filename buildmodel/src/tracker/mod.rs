use std::error::Error;
use std::io;

use crate::{Accepted, Direction, Resource, ResourceId, Step, StepId, Visit, WalkError};

pub mod writing;
pub mod event;

/// Build event tracker. Can be used to implement logging, event tracing, progress tracking, etc.
///
/// Object-safe trait.
#[allow(unused_variables)]
pub trait Tracker {
  /// Start: traversal in `direction`.
  #[inline]
  fn accept_start(&mut self, direction: Direction) {}
  /// End: traversal completed, stopped, or failed with an error.
  #[inline]
  fn accept_end(&mut self, result: Result<Accepted, &WalkError>) {}

  /// Entered `step`: its predecessors are visited next.
  #[inline]
  fn enter_step(&mut self, id: StepId, step: &Step) {}
  /// Skipped `step` because it was already visited.
  #[inline]
  fn skip_visited(&mut self, id: StepId, step: &Step) {}
  /// Start: visit `step`.
  #[inline]
  fn visit_start(&mut self, id: StepId, step: &Step) {}
  /// End: visited `step`, resulting in `result`.
  #[inline]
  fn visit_end(&mut self, id: StepId, step: &Step, result: Result<Visit, &dyn Error>) {}
  /// Exited `step`: it and, if continued from, its successors are done.
  #[inline]
  fn exit_step(&mut self, id: StepId, step: &Step) {}
  /// Reached `step` again while it is still waiting for its predecessors.
  #[inline]
  fn cycle_detected(&mut self, id: StepId, step: &Step) {}

  /// Selected `resource` as a stale generated resource.
  #[inline]
  fn stale_resource(&mut self, id: ResourceId, resource: &Resource) {}
  /// Start: delete `resource`.
  #[inline]
  fn delete_start(&mut self, id: ResourceId, resource: &Resource) {}
  /// End: deleted `resource`, resulting in whether a file was deleted, or an error.
  #[inline]
  fn delete_end(&mut self, id: ResourceId, resource: &Resource, result: Result<bool, &io::Error>) {}
}

/// Implement [`Tracker`] for `()` that does nothing.
impl Tracker for () {}

impl<T: Tracker + ?Sized> Tracker for &mut T {
  #[inline]
  fn accept_start(&mut self, direction: Direction) { (**self).accept_start(direction) }
  #[inline]
  fn accept_end(&mut self, result: Result<Accepted, &WalkError>) { (**self).accept_end(result) }
  #[inline]
  fn enter_step(&mut self, id: StepId, step: &Step) { (**self).enter_step(id, step) }
  #[inline]
  fn skip_visited(&mut self, id: StepId, step: &Step) { (**self).skip_visited(id, step) }
  #[inline]
  fn visit_start(&mut self, id: StepId, step: &Step) { (**self).visit_start(id, step) }
  #[inline]
  fn visit_end(&mut self, id: StepId, step: &Step, result: Result<Visit, &dyn Error>) {
    (**self).visit_end(id, step, result)
  }
  #[inline]
  fn exit_step(&mut self, id: StepId, step: &Step) { (**self).exit_step(id, step) }
  #[inline]
  fn cycle_detected(&mut self, id: StepId, step: &Step) { (**self).cycle_detected(id, step) }
  #[inline]
  fn stale_resource(&mut self, id: ResourceId, resource: &Resource) { (**self).stale_resource(id, resource) }
  #[inline]
  fn delete_start(&mut self, id: ResourceId, resource: &Resource) { (**self).delete_start(id, resource) }
  #[inline]
  fn delete_end(&mut self, id: ResourceId, resource: &Resource, result: Result<bool, &io::Error>) {
    (**self).delete_end(id, resource, result)
  }
}

/// A [`Tracker`] that forwards events to two [`Tracker`]s.
#[derive(Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub struct CompositeTracker<A1, A2>(pub A1, pub A2);
impl<A1, A2> CompositeTracker<A1, A2> {
  pub fn new(tracker_1: A1, tracker_2: A2) -> Self { Self(tracker_1, tracker_2) }
}
impl<A1: Tracker, A2: Tracker> Tracker for CompositeTracker<A1, A2> {
  #[inline]
  fn accept_start(&mut self, direction: Direction) {
    self.0.accept_start(direction);
    self.1.accept_start(direction);
  }
  #[inline]
  fn accept_end(&mut self, result: Result<Accepted, &WalkError>) {
    self.0.accept_end(result);
    self.1.accept_end(result);
  }

  #[inline]
  fn enter_step(&mut self, id: StepId, step: &Step) {
    self.0.enter_step(id, step);
    self.1.enter_step(id, step);
  }
  #[inline]
  fn skip_visited(&mut self, id: StepId, step: &Step) {
    self.0.skip_visited(id, step);
    self.1.skip_visited(id, step);
  }
  #[inline]
  fn visit_start(&mut self, id: StepId, step: &Step) {
    self.0.visit_start(id, step);
    self.1.visit_start(id, step);
  }
  #[inline]
  fn visit_end(&mut self, id: StepId, step: &Step, result: Result<Visit, &dyn Error>) {
    self.0.visit_end(id, step, result);
    self.1.visit_end(id, step, result);
  }
  #[inline]
  fn exit_step(&mut self, id: StepId, step: &Step) {
    self.0.exit_step(id, step);
    self.1.exit_step(id, step);
  }
  #[inline]
  fn cycle_detected(&mut self, id: StepId, step: &Step) {
    self.0.cycle_detected(id, step);
    self.1.cycle_detected(id, step);
  }

  #[inline]
  fn stale_resource(&mut self, id: ResourceId, resource: &Resource) {
    self.0.stale_resource(id, resource);
    self.1.stale_resource(id, resource);
  }
  #[inline]
  fn delete_start(&mut self, id: ResourceId, resource: &Resource) {
    self.0.delete_start(id, resource);
    self.1.delete_start(id, resource);
  }
  #[inline]
  fn delete_end(&mut self, id: ResourceId, resource: &Resource, result: Result<bool, &io::Error>) {
    self.0.delete_end(id, resource, result);
    self.1.delete_end(id, resource, result);
  }
}
