use assert_matches::assert_matches;
use rstest::rstest;
use testresult::TestResult;

use buildmodel::{accept, Accepted, BuildDescription, Direction, GraphWalker, IoDirection, StepId, Visit, VisitError, WalkError};
use buildmodel::tracker::event::{Event, EventTracker};
use dev_shared::description::{add_source, add_tool_step, compile_link};
use dev_shared::test::{events, TestWalker, walker};
use dev_shared::visitor::RecordingVisitor;

/// Asserts that every visited step was visited after all its neighbors in `predecessors` direction.
fn assert_predecessors_first(description: &BuildDescription, visited: &[StepId], predecessors: IoDirection) {
  for (index, step) in visited.iter().enumerate() {
    for neighbor in description.adjacent_steps(*step, predecessors).unwrap() {
      let neighbor_index = visited.iter().position(|s| *s == neighbor)
        .unwrap_or_else(|| panic!("predecessor {:?} of {:?} was not visited", neighbor, step));
      assert!(neighbor_index < index, "predecessor {:?} of {:?} was visited after it", neighbor, step);
    }
  }
}

/// Diamond build: a generated header consumed by two compile steps, whose objects are linked together.
fn diamond() -> (BuildDescription, [StepId; 4]) {
  let mut description = BuildDescription::new();
  let grammar = add_source(&mut description, "/project/src/parser.y");
  let main = add_source(&mut description, "/project/src/main.c");
  let header = description.get_or_create_resource("/project/Debug/parser.h", true);
  let parser = description.get_or_create_resource("/project/Debug/parser.c", true);
  let parser_object = description.get_or_create_resource("/project/Debug/parser.o", true);
  let main_object = description.get_or_create_resource("/project/Debug/main.o", true);
  let binary = description.get_or_create_resource("/project/Debug/app", true);
  let generate = add_tool_step(&mut description, "generate", None, &[grammar], &[header, parser]);
  let compile_main = add_tool_step(&mut description, "compile main", None, &[main, header], &[main_object]);
  let compile_parser = add_tool_step(&mut description, "compile parser", None, &[parser, header], &[parser_object]);
  let link = add_tool_step(&mut description, "link", None, &[main_object, parser_object], &[binary]);
  description.add_build_product(binary).unwrap();
  (description, [generate, compile_main, compile_parser, link])
}

#[rstest]
fn test_up_visits_producers_first(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a", "b", "c"], &[]);
  let description = &build.description;
  let mut visitor = RecordingVisitor::new();
  assert_eq!(walker.accept(description, Direction::Up, &mut visitor)?, Accepted::Completed);

  assert_eq!(
    visitor.visited_names(description),
    vec!["input", "compile a", "compile b", "compile c", "link", "output"]
  );
  assert_predecessors_first(description, visitor.visited(), IoDirection::Input);
  assert_eq!(events(&walker).visited_steps(), visitor.visited());
  Ok(())
}

#[rstest]
fn test_down_visits_consumers_first(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a", "b", "c"], &[]);
  let description = &build.description;
  let mut visitor = RecordingVisitor::new();
  assert_eq!(walker.accept(description, Direction::Down, &mut visitor)?, Accepted::Completed);

  assert_eq!(
    visitor.visited_names(description),
    vec!["output", "link", "compile a", "compile b", "compile c", "input"]
  );
  assert_predecessors_first(description, visitor.visited(), IoDirection::Output);
  Ok(())
}

#[rstest]
#[case(Direction::Up, IoDirection::Input)]
#[case(Direction::Down, IoDirection::Output)]
fn test_diamond_visits_each_step_once(
  mut walker: TestWalker,
  #[case] direction: Direction,
  #[case] predecessors: IoDirection,
) -> TestResult {
  let (description, steps) = diamond();
  let mut visitor = RecordingVisitor::new();
  walker.accept(&description, direction, &mut visitor)?;

  assert_eq!(visitor.visited().len(), description.step_count());
  let events = events(&walker);
  for step in steps.into_iter().chain([description.input_step(), description.output_step()]) {
    assert!(events.one_visit_of(step), "{:?} was not visited exactly once", step);
  }
  assert_predecessors_first(&description, visitor.visited(), predecessors);
  Ok(())
}

#[rstest]
fn test_link_order_drives_predecessor_order(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a", "b", "c"], &[("c", 1), ("b", 2)]);
  let mut visitor = RecordingVisitor::new();
  walker.accept(&build.description, Direction::Up, &mut visitor)?;
  // `compile a` is reached first from the input step, the other producers of `link` follow in link order.
  assert_eq!(
    visitor.visited_names(&build.description),
    vec!["input", "compile a", "compile c", "compile b", "link", "output"]
  );
  Ok(())
}

#[rstest]
fn test_stop(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a", "b", "c"], &[]);
  let mut visitor = RecordingVisitor::stopping_after(3);
  assert_eq!(walker.accept(&build.description, Direction::Up, &mut visitor)?, Accepted::Stopped);

  assert_eq!(visitor.visited().len(), 3);
  assert_eq!(visitor.visited_names(&build.description), vec!["input", "compile a", "compile b"]);
  let events = events(&walker);
  assert_eq!(events.visited_steps().len(), 3);
  assert_matches!(events.accept_result(), Some(Ok(Accepted::Stopped)));
  assert_matches!(events.slice().last(), Some(Event::AcceptEnd(_)));
  Ok(())
}

#[rstest]
fn test_visitor_failure_propagates(mut walker: TestWalker) {
  let build = compile_link(&["a", "b"], &[]);
  let mut visitor = RecordingVisitor::failing_on(build.link);
  let result = walker.accept(&build.description, Direction::Up, &mut visitor);

  assert_matches!(result, Err(WalkError::Visit { step, ref name, .. }) if step == build.link && name == "link");
  assert_eq!(visitor.visited().last(), Some(&build.link));
  assert_eq!(visitor.position(build.description.output_step()), None);
  let events = events(&walker);
  assert_matches!(events.first_visit_range(build.link), Some(range) => {
    assert_matches!(&events.slice()[*range.end()], Event::VisitEnd(data) if data.result.is_err());
  });
  assert_matches!(events.accept_result(), Some(Err(message)) if message == "visiting step `link` failed");
}

#[rstest]
fn test_cycle_detected(mut walker: TestWalker) {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/main.c");
  let x = description.get_or_create_resource("/project/Debug/x", true);
  let y = description.get_or_create_resource("/project/Debug/y", true);
  let first = add_tool_step(&mut description, "first", None, &[source, x], &[y]);
  let _second = add_tool_step(&mut description, "second", None, &[y], &[x]);

  let mut visitor = RecordingVisitor::new();
  let result = walker.accept(&description, Direction::Up, &mut visitor);
  assert_matches!(result, Err(WalkError::CycleDetected { step, .. }) if step == first);
  assert_eq!(visitor.visited(), &[description.input_step()]);
  assert!(events(&walker).any(|e| matches!(e, Event::CycleDetected(data) if data.step == first)));
}

#[rstest]
fn test_skips_visited(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a", "b"], &[]);
  walker.accept(&build.description, Direction::Up, &mut RecordingVisitor::new())?;
  let events = events(&walker);
  assert!(events.any_skip_of(build.description.input_step()));
  assert!(events.any_skip_of(build.compiles[0]));
  let enters = events.iter().filter(|e| matches!(e, Event::EnterStep(_))).count();
  let exits = events.iter().filter(|e| matches!(e, Event::ExitStep(_))).count();
  assert_eq!(enters, exits);
  assert_eq!(enters, build.description.step_count());
  Ok(())
}

#[rstest]
fn test_visited_state_is_per_call(mut walker: TestWalker) -> TestResult {
  let build = compile_link(&["a"], &[]);
  let mut first = RecordingVisitor::new();
  let mut second = RecordingVisitor::new();
  walker.accept(&build.description, Direction::Up, &mut first)?;
  walker.accept(&build.description, Direction::Up, &mut second)?;
  assert_eq!(first.visited(), second.visited());
  assert_eq!(events(&walker).visited_steps(), second.visited());
  Ok(())
}

#[test]
fn test_unreachable_output_step() -> TestResult {
  let description = BuildDescription::new();
  let mut visitor = RecordingVisitor::new();
  assert_eq!(accept(&description, Direction::Up, &mut visitor)?, Accepted::Completed);
  assert_eq!(visitor.visited(), &[description.input_step()]);
  Ok(())
}

#[test]
fn test_closure_visitor_with_borrowed_tracker() -> TestResult {
  let build = compile_link(&["a", "b"], &[]);
  let mut tracker = EventTracker::default();
  let mut walker = GraphWalker::with_tracker(&mut tracker);
  let mut names = Vec::new();
  let mut visitor = |description: &BuildDescription, step: StepId| -> Result<Visit, VisitError> {
    names.extend(description.step(step).map(|s| s.name().to_string()));
    Ok(Visit::Continue)
  };
  walker.accept(&build.description, Direction::Up, &mut visitor)?;
  assert_eq!(names, vec!["input", "compile a", "compile b", "link", "output"]);
  assert_eq!(tracker.visited_names(), names);
  Ok(())
}
