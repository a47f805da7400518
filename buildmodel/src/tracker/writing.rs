use std::error::Error;
use std::io::{self, Stderr, Stdout};

use crate::{Accepted, Direction, Resource, ResourceId, Step, StepId, Visit, WalkError};
use crate::tracker::Tracker;

/// A [`Tracker`] that writes events to a [`std::io::Write`] instance, for example [`std::io::Stdout`]. Lines are
/// indented by traversal depth.
#[derive(Debug, Clone)]
pub struct WritingTracker<W> {
  writer: W,
  indentation: u32,
}

impl Default for WritingTracker<Stdout> {
  #[inline]
  fn default() -> Self { Self::with_stdout() }
}

impl WritingTracker<Stdout> {
  /// Creates a [`WritingTracker`] that writes to stdout.
  #[inline]
  pub fn with_stdout() -> Self { Self::new(io::stdout()) }
}

impl WritingTracker<Stderr> {
  /// Creates a [`WritingTracker`] that writes to stderr.
  #[inline]
  pub fn with_stderr() -> Self { Self::new(io::stderr()) }
}

impl<W: io::Write> WritingTracker<W> {
  /// Creates a [`WritingTracker`] that writes to `writer`.
  #[inline]
  pub fn new(writer: W) -> Self { Self { writer, indentation: 0 } }

  #[inline]
  pub fn writer(&self) -> &W { &self.writer }
  #[inline]
  pub fn into_writer(self) -> W { self.writer }
}

impl<W: io::Write> Tracker for WritingTracker<W> {
  fn accept_start(&mut self, direction: Direction) {
    self.writeln(format_args!("🏁 {:?}", direction));
    self.indent();
  }
  fn accept_end(&mut self, result: Result<Accepted, &WalkError>) {
    self.unindent();
    match result {
      Ok(accepted) => self.writeln(format_args!("🏁 {:?}", accepted)),
      Err(e) => self.writeln(format_args!("🏁 ✗ {}", e)),
    }
    self.flush();
  }

  fn enter_step(&mut self, _id: StepId, step: &Step) {
    self.writeln(format_args!("→ {}", step.name()));
    self.indent();
  }
  fn skip_visited(&mut self, _id: StepId, step: &Step) {
    self.writeln(format_args!("✓ {}", step.name()));
  }
  fn visit_start(&mut self, _id: StepId, step: &Step) {
    self.writeln(format_args!("↑ {}", step.name()));
  }
  fn visit_end(&mut self, _id: StepId, step: &Step, result: Result<Visit, &dyn Error>) {
    match result {
      Ok(Visit::Continue) => {}
      Ok(Visit::Stop) => self.writeln(format_args!("■ {}", step.name())),
      Err(e) => self.writeln(format_args!("✗ {}: {}", step.name(), e)),
    }
  }
  fn exit_step(&mut self, _id: StepId, step: &Step) {
    self.unindent();
    self.writeln(format_args!("← {}", step.name()));
  }
  fn cycle_detected(&mut self, _id: StepId, step: &Step) {
    self.writeln(format_args!("↻ {}", step.name()));
  }

  fn stale_resource(&mut self, _id: ResourceId, resource: &Resource) {
    if let Some(path) = resource.path() {
      self.writeln(format_args!("☒ {}", path.display()));
    }
  }
  fn delete_start(&mut self, _id: ResourceId, _resource: &Resource) {
    self.indent();
  }
  fn delete_end(&mut self, _id: ResourceId, resource: &Resource, result: Result<bool, &io::Error>) {
    let path = resource.path().map(|p| p.display().to_string()).unwrap_or_default();
    match result {
      Ok(true) => self.writeln(format_args!("🗑 {}", path)),
      Ok(false) => self.writeln(format_args!("☐ {}", path)),
      Err(e) => self.writeln(format_args!("✗ {}: {}", path, e)),
    }
    self.unindent();
  }
}

impl<W: io::Write> WritingTracker<W> {
  #[inline]
  fn writeln(&mut self, args: std::fmt::Arguments) {
    self.write_indentation();
    writeln!(&mut self.writer, "{}", args).ok();
  }
  #[inline]
  fn write_indentation(&mut self) {
    for _ in 0..self.indentation {
      write!(&mut self.writer, " ").ok();
    }
  }
  #[inline]
  fn flush(&mut self) {
    self.writer.flush().ok();
  }
  #[inline]
  fn indent(&mut self) {
    self.indentation = self.indentation.saturating_add(1);
  }
  #[inline]
  fn unindent(&mut self) {
    self.indentation = self.indentation.saturating_sub(1);
  }
}


#[cfg(test)]
mod test {
  use crate::{accept, BuildDescription, GraphWalker, IoDirection, VisitError};

  use super::*;

  fn count_visits(count: &mut usize) -> impl FnMut(&BuildDescription, StepId) -> Result<Visit, VisitError> + '_ {
    move |_, _| {
      *count += 1;
      Ok(Visit::Continue)
    }
  }

  #[test]
  fn test_writes_indented_traversal() {
    let mut description = BuildDescription::new();
    let source = description.get_or_create_resource("/project/main.c", true);
    description.add_source(source).unwrap();
    let compile = description.add_step("compile", None);
    let input = description.add_io_type(compile, IoDirection::Input, true, None).unwrap();
    description.add_resource(input, source).unwrap();

    let mut walker = GraphWalker::with_tracker(WritingTracker::new(Vec::new()));
    let mut tracked = 0;
    walker.accept(&description, Direction::Up, &mut count_visits(&mut tracked)).unwrap();
    let output = String::from_utf8(walker.into_tracker().into_writer()).unwrap();
    assert_eq!(
      output,
      "🏁 Up\n → input\n  ↑ input\n  → compile\n   ✓ input\n   ↑ compile\n  ← compile\n ← input\n🏁 Completed\n"
    );

    let mut untracked = 0;
    accept(&description, Direction::Up, &mut count_visits(&mut untracked)).unwrap();
    assert_eq!(tracked, 2);
    assert_eq!(untracked, tracked);
  }
}
