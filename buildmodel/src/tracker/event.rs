use std::error::Error;
use std::io;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::{Accepted, Direction, Resource, ResourceId, Step, StepId, Visit, WalkError};
use crate::tracker::Tracker;

/// A [`Tracker`] that stores [`Event`]s in a [`Vec`], useful in testing to assert that traversals visit steps in a
/// correct order and that cleanup deletes the right resources.
#[derive(Clone, Debug)]
pub struct EventTracker {
  events: Vec<Event>,
  clear_on_accept_start: bool,
}

impl Default for EventTracker {
  fn default() -> Self {
    Self { events: Vec::new(), clear_on_accept_start: true }
  }
}

impl EventTracker {
  /// Creates a new [`EventTracker`]. If `clear_on_accept_start` is `true`, events are cleared at the start of each
  /// traversal.
  pub fn new(clear_on_accept_start: bool) -> Self {
    Self { events: Vec::new(), clear_on_accept_start }
  }
}

/// Enumeration of important traversal and cleanup events.
#[derive(Clone, Debug)]
pub enum Event {
  AcceptStart(Direction),
  /// End of a traversal, with its result or the message of its error.
  AcceptEnd(Result<Accepted, String>),

  EnterStep(StepEvent),
  SkipVisited(StepEvent),
  VisitStart(StepEvent),
  VisitEnd(VisitEnd),
  ExitStep(StepEvent),
  CycleDetected(StepEvent),

  StaleResource(ResourceEvent),
  DeleteStart(ResourceEvent),
  DeleteEnd(DeleteEnd),
}

/// Event about `step`.
#[derive(Clone, Debug)]
pub struct StepEvent {
  pub step: StepId,
  pub name: String,
  pub index: usize,
}
/// End: visited `step`, resulting in `result` or the message of the visitor error.
#[derive(Clone, Debug)]
pub struct VisitEnd {
  pub step: StepId,
  pub name: String,
  pub result: Result<Visit, String>,
  pub index: usize,
}
/// Event about `resource`.
#[derive(Clone, Debug)]
pub struct ResourceEvent {
  pub resource: ResourceId,
  pub path: Option<PathBuf>,
  pub index: usize,
}
/// End: deleted `resource`, resulting in whether a file was deleted, or the kind of the I/O error.
#[derive(Clone, Debug)]
pub struct DeleteEnd {
  pub resource: ResourceId,
  pub path: Option<PathBuf>,
  pub result: Result<bool, io::ErrorKind>,
  pub index: usize,
}

impl Tracker for EventTracker {
  #[inline]
  fn accept_start(&mut self, direction: Direction) {
    if self.clear_on_accept_start {
      self.events.clear();
    }
    self.events.push(Event::AcceptStart(direction));
  }
  #[inline]
  fn accept_end(&mut self, result: Result<Accepted, &WalkError>) {
    self.events.push(Event::AcceptEnd(result.map_err(|e| e.to_string())));
  }

  #[inline]
  fn enter_step(&mut self, id: StepId, step: &Step) {
    let data = self.step_event(id, step);
    self.events.push(Event::EnterStep(data));
  }
  #[inline]
  fn skip_visited(&mut self, id: StepId, step: &Step) {
    let data = self.step_event(id, step);
    self.events.push(Event::SkipVisited(data));
  }
  #[inline]
  fn visit_start(&mut self, id: StepId, step: &Step) {
    let data = self.step_event(id, step);
    self.events.push(Event::VisitStart(data));
  }
  #[inline]
  fn visit_end(&mut self, id: StepId, step: &Step, result: Result<Visit, &dyn Error>) {
    let data = VisitEnd {
      step: id,
      name: step.name().to_string(),
      result: result.map_err(|e| e.to_string()),
      index: self.events.len(),
    };
    self.events.push(Event::VisitEnd(data));
  }
  #[inline]
  fn exit_step(&mut self, id: StepId, step: &Step) {
    let data = self.step_event(id, step);
    self.events.push(Event::ExitStep(data));
  }
  #[inline]
  fn cycle_detected(&mut self, id: StepId, step: &Step) {
    let data = self.step_event(id, step);
    self.events.push(Event::CycleDetected(data));
  }

  #[inline]
  fn stale_resource(&mut self, id: ResourceId, resource: &Resource) {
    let data = self.resource_event(id, resource);
    self.events.push(Event::StaleResource(data));
  }
  #[inline]
  fn delete_start(&mut self, id: ResourceId, resource: &Resource) {
    let data = self.resource_event(id, resource);
    self.events.push(Event::DeleteStart(data));
  }
  #[inline]
  fn delete_end(&mut self, id: ResourceId, resource: &Resource, result: Result<bool, &io::Error>) {
    let data = DeleteEnd {
      resource: id,
      path: resource.path().map(|p| p.to_path_buf()),
      result: result.map_err(|e| e.kind()),
      index: self.events.len(),
    };
    self.events.push(Event::DeleteEnd(data));
  }
}

impl EventTracker {
  #[inline]
  fn step_event(&self, step: StepId, data: &Step) -> StepEvent {
    StepEvent { step, name: data.name().to_string(), index: self.events.len() }
  }
  #[inline]
  fn resource_event(&self, resource: ResourceId, data: &Resource) -> ResourceEvent {
    ResourceEvent { resource, path: data.path().map(|p| p.to_path_buf()), index: self.events.len() }
  }
}

impl Event {
  /// Returns `Some(&data)` if this is a [visit start event](Event::VisitStart) for `step`, `None` otherwise.
  #[inline]
  pub fn match_visit_start(&self, step: StepId) -> Option<&StepEvent> {
    match self {
      Event::VisitStart(data) if data.step == step => Some(data),
      _ => None,
    }
  }
  /// Returns `Some(&data)` if this is a [visit end event](Event::VisitEnd) for `step`, `None` otherwise.
  #[inline]
  pub fn match_visit_end(&self, step: StepId) -> Option<&VisitEnd> {
    match self {
      Event::VisitEnd(data) if data.step == step => Some(data),
      _ => None,
    }
  }
  /// Returns `Some(&data)` if this is a [skip visited event](Event::SkipVisited) for `step`, `None` otherwise.
  #[inline]
  pub fn match_skip_visited(&self, step: StepId) -> Option<&StepEvent> {
    match self {
      Event::SkipVisited(data) if data.step == step => Some(data),
      _ => None,
    }
  }
  /// Returns `Some(&data)` if this is a [delete end event](Event::DeleteEnd) for `resource`, `None` otherwise.
  #[inline]
  pub fn match_delete_end(&self, resource: ResourceId) -> Option<&DeleteEnd> {
    match self {
      Event::DeleteEnd(data) if data.resource == resource => Some(data),
      _ => None,
    }
  }
}

impl EventTracker {
  /// Returns a slice over all events.
  pub fn slice(&self) -> &[Event] {
    &self.events
  }
  /// Returns an iterator over all events.
  pub fn iter(&self) -> impl Iterator<Item=&Event> {
    self.events.iter()
  }
  /// Clears all events.
  pub fn clear(&mut self) {
    self.events.clear();
  }

  /// Returns `true` if `predicate` returns `true` for any event.
  pub fn any(&self, predicate: impl FnMut(&Event) -> bool) -> bool {
    self.iter().any(predicate)
  }
  /// Returns `true` if `predicate` returns `true` for exactly one event.
  pub fn one(&self, predicate: impl FnMut(&&Event) -> bool) -> bool {
    self.iter().filter(predicate).count() == 1
  }
  /// Returns `Some(v)` for the first event `e` where `f(e)` returns `Some(v)`, or `None` otherwise.
  pub fn find_map<R>(&self, f: impl FnMut(&Event) -> Option<&R>) -> Option<&R> {
    self.iter().find_map(f)
  }


  /// Returns the visited steps in visiting order.
  pub fn visited_steps(&self) -> Vec<StepId> {
    self.iter().filter_map(|e| match e {
      Event::VisitStart(data) => Some(data.step),
      _ => None,
    }).collect()
  }
  /// Returns the names of the visited steps in visiting order.
  pub fn visited_names(&self) -> Vec<&str> {
    self.iter().filter_map(|e| match e {
      Event::VisitStart(data) => Some(data.name.as_str()),
      _ => None,
    }).collect()
  }
  /// Returns `Some(index)` of the first visit start event for `step`, or `None` if it was not visited.
  pub fn index_of_visit(&self, step: StepId) -> Option<usize> {
    self.find_map(|e| e.match_visit_start(step)).map(|d| d.index)
  }
  /// Returns `true` if `step` was visited exactly once.
  pub fn one_visit_of(&self, step: StepId) -> bool {
    self.one(|e| e.match_visit_start(step).is_some())
  }
  /// Returns `true` if `step` was skipped at least once because it was already visited.
  pub fn any_skip_of(&self, step: StepId) -> bool {
    self.any(|e| e.match_skip_visited(step).is_some())
  }
  /// Finds the first visit [start](Event::VisitStart) and [end](Event::VisitEnd) event for `step` and returns
  /// `Some(start.index..=end.index)`, or `None` otherwise.
  pub fn first_visit_range(&self, step: StepId) -> Option<RangeInclusive<usize>> {
    let start = self.find_map(|e| e.match_visit_start(step))?;
    let end = self.find_map(|e| e.match_visit_end(step))?;
    Some(start.index..=end.index)
  }
  /// Returns the result of the last traversal, or `None` if it did not end.
  pub fn accept_result(&self) -> Option<&Result<Accepted, String>> {
    self.events.iter().rev().find_map(|e| match e {
      Event::AcceptEnd(result) => Some(result),
      _ => None,
    })
  }

  /// Returns the resources selected as stale, in selection order.
  pub fn stale_resources(&self) -> Vec<ResourceId> {
    self.iter().filter_map(|e| match e {
      Event::StaleResource(data) => Some(data.resource),
      _ => None,
    }).collect()
  }
  /// Returns the first delete end event for `resource`, or `None` if it was not deleted.
  pub fn first_delete_end(&self, resource: ResourceId) -> Option<&DeleteEnd> {
    self.find_map(|e| e.match_delete_end(resource))
  }
}
