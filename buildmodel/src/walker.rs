use std::collections::HashSet;
use std::error::Error;

use thiserror::Error;

use crate::{BuildDescription, IoDirection, StepId};
use crate::tracker::Tracker;

/// Traversal direction of a [`GraphWalker`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
  /// From the input step towards the output step. Every step is visited after its producers, which is the order in
  /// which steps are executed.
  Up,
  /// From the output step towards the input step. Every step is visited after its consumers.
  Down,
}

impl Direction {
  /// Gets the sentinel step the traversal starts at.
  #[inline]
  pub fn root(self, description: &BuildDescription) -> StepId {
    match self {
      Direction::Up => description.input_step(),
      Direction::Down => description.output_step(),
    }
  }
  /// Gets the adjacency direction of the neighbors that must be visited before a step.
  #[inline]
  pub fn predecessors(self) -> IoDirection {
    match self {
      Direction::Up => IoDirection::Input,
      Direction::Down => IoDirection::Output,
    }
  }
  /// Gets the adjacency direction of the neighbors that continue the traversal after a step.
  #[inline]
  pub fn successors(self) -> IoDirection { self.predecessors().opposite() }
}

/// Result of visiting a step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Visit {
  Continue,
  /// Stops the traversal: no further steps are visited.
  Stop,
}

/// Result of a completed traversal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Accepted {
  /// Every reachable step was visited.
  Completed,
  /// The visitor stopped the traversal.
  Stopped,
}

/// Error raised by a [`Visitor`].
pub type VisitError = Box<dyn Error + Send + Sync>;

/// Callback invoked once for every step reached by a [`GraphWalker`].
pub trait Visitor {
  fn visit(&mut self, description: &BuildDescription, step: StepId) -> Result<Visit, VisitError>;
}

impl<F: FnMut(&BuildDescription, StepId) -> Result<Visit, VisitError>> Visitor for F {
  #[inline]
  fn visit(&mut self, description: &BuildDescription, step: StepId) -> Result<Visit, VisitError> {
    self(description, step)
  }
}

/// Errors that abort a traversal.
#[derive(Debug, Error)]
pub enum WalkError {
  #[error(transparent)]
  Description(#[from] crate::Error),
  /// The visitor failed on `step`. The traversal was aborted.
  #[error("visiting step `{name}` failed")]
  Visit {
    step: StepId,
    name: String,
    #[source]
    source: VisitError,
  },
  /// `step` transitively depends on itself in the traversal direction.
  #[error("dependency cycle detected at step `{name}`")]
  CycleDetected { step: StepId, name: String },
}


/// Depth-first traversal over a [`BuildDescription`] that passes every reachable step to a [`Visitor`] exactly once,
/// always after all its predecessors have been visited. Reports traversal events to tracker `A`.
#[derive(Default, Clone, Debug)]
pub struct GraphWalker<A = ()> {
  tracker: A,
}

impl GraphWalker {
  /// Creates a new graph walker without tracking.
  #[inline]
  pub fn new() -> Self { Self::default() }
}

impl<A: Tracker> GraphWalker<A> {
  /// Creates a new graph walker that reports events to `tracker`.
  #[inline]
  pub fn with_tracker(tracker: A) -> Self { Self { tracker } }

  #[inline]
  pub fn tracker(&self) -> &A { &self.tracker }
  #[inline]
  pub fn tracker_mut(&mut self) -> &mut A { &mut self.tracker }
  #[inline]
  pub fn into_tracker(self) -> A { self.tracker }

  /// Traverses `description` in `direction`, starting at the sentinel step of that direction, passing every
  /// reachable step to `visitor`.
  ///
  /// Before a step is visited, its predecessors are visited first. After a step is visited, the traversal continues
  /// with its successors, except for steps that were only reached as the predecessor of another step: those are
  /// visited but not continued from, as the step that reached them continues the traversal.
  ///
  /// Returns [`Accepted::Stopped`] as soon as `visitor` returns [`Visit::Stop`].
  ///
  /// # Errors
  ///
  /// Returns [`WalkError::Visit`] as soon as `visitor` fails, and [`WalkError::CycleDetected`] when a step is
  /// reached again while it is still waiting for its predecessors.
  pub fn accept<V: Visitor + ?Sized>(
    &mut self,
    description: &BuildDescription,
    direction: Direction,
    visitor: &mut V,
  ) -> Result<Accepted, WalkError> {
    self.tracker.accept_start(direction);
    let result = Traversal::new(description, direction, &mut self.tracker).run(visitor);
    self.tracker.accept_end(result.as_ref().copied());
    result
  }
}

/// Traverses `description` in `direction` without tracking. See [`GraphWalker::accept`].
#[inline]
pub fn accept<V: Visitor + ?Sized>(
  description: &BuildDescription,
  direction: Direction,
  visitor: &mut V,
) -> Result<Accepted, WalkError> {
  GraphWalker::new().accept(description, direction, visitor)
}


#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Phase {
  Predecessors,
  Successors,
}

struct Frame {
  step: StepId,
  /// Whether the traversal continues with the successors of this step once it is visited.
  continue_next: bool,
  phase: Phase,
  neighbors: Vec<StepId>,
  next: usize,
}

/// State of one traversal. Visited state never outlives an `accept` call.
struct Traversal<'d, 't> {
  description: &'d BuildDescription,
  direction: Direction,
  tracker: &'t mut dyn Tracker,
  visited: HashSet<StepId>,
  /// Steps on the stack that are not visited yet: those are waiting for their predecessors.
  waiting: HashSet<StepId>,
  stack: Vec<Frame>,
}

impl<'d, 't> Traversal<'d, 't> {
  fn new(description: &'d BuildDescription, direction: Direction, tracker: &'t mut dyn Tracker) -> Self {
    Self {
      description,
      direction,
      tracker,
      visited: HashSet::default(),
      waiting: HashSet::default(),
      stack: Vec::new(),
    }
  }

  fn run<V: Visitor + ?Sized>(mut self, visitor: &mut V) -> Result<Accepted, WalkError> {
    self.enter(self.direction.root(self.description), true)?;
    while let Some(frame) = self.stack.last_mut() {
      let step = frame.step;
      let phase = frame.phase;
      let neighbor = frame.neighbors.get(frame.next).copied();
      if neighbor.is_some() {
        frame.next += 1;
      }

      match (neighbor, phase) {
        (Some(neighbor), _) => {
          if self.visited.contains(&neighbor) {
            self.tracker.skip_visited(neighbor, self.description.get_step(neighbor)?);
            continue;
          }
          if phase == Phase::Predecessors && self.waiting.contains(&neighbor) {
            let neighbor_step = self.description.get_step(neighbor)?;
            self.tracker.cycle_detected(neighbor, neighbor_step);
            return Err(WalkError::CycleDetected { step: neighbor, name: neighbor_step.name().to_string() });
          }
          self.enter(neighbor, phase == Phase::Successors)?;
        }
        (None, Phase::Predecessors) => {
          if !self.visited.contains(&step) && self.visit(step, visitor)? == Visit::Stop {
            return Ok(Accepted::Stopped);
          }
          self.waiting.remove(&step);
          if let Some(frame) = self.stack.last_mut().filter(|f| f.continue_next) {
            frame.phase = Phase::Successors;
            frame.neighbors = self.description.adjacent_steps(step, self.direction.successors())?;
            frame.next = 0;
          } else {
            self.exit()?;
          }
        }
        (None, Phase::Successors) => self.exit()?,
      }
    }
    Ok(Accepted::Completed)
  }

  fn enter(&mut self, step: StepId, continue_next: bool) -> Result<(), WalkError> {
    self.tracker.enter_step(step, self.description.get_step(step)?);
    let neighbors = self.description.adjacent_steps(step, self.direction.predecessors())?;
    self.waiting.insert(step);
    self.stack.push(Frame { step, continue_next, phase: Phase::Predecessors, neighbors, next: 0 });
    Ok(())
  }

  fn visit<V: Visitor + ?Sized>(&mut self, step: StepId, visitor: &mut V) -> Result<Visit, WalkError> {
    let step_data = self.description.get_step(step)?;
    self.tracker.visit_start(step, step_data);
    let result = visitor.visit(self.description, step);
    self.tracker.visit_end(step, step_data, result.as_ref().copied().map_err(|e| &**e as &dyn Error));
    self.visited.insert(step);
    result.map_err(|source| WalkError::Visit { step, name: step_data.name().to_string(), source })
  }

  fn exit(&mut self) -> Result<(), WalkError> {
    if let Some(frame) = self.stack.pop() {
      self.tracker.exit_step(frame.step, self.description.get_step(frame.step)?);
    }
    Ok(())
  }
}
