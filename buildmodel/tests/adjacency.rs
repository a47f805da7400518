use std::sync::Arc;

use assert_matches::assert_matches;
use testresult::TestResult;

use buildmodel::{BuildDescription, Error, InputOrder, InputType, IoDirection};
use dev_shared::description::{add_source, add_tool_step, compile_link};

#[test]
fn test_producers_follow_resolved_input_order() -> TestResult {
  let build = compile_link(&["a", "b", "c"], &[("c", 1)]);
  let [compile_a, compile_b, compile_c] = build.compiles[..] else { unreachable!() };
  let producers = build.description.adjacent_steps(build.link, IoDirection::Input)?;
  assert_eq!(producers, vec![compile_c, compile_a, compile_b]);
  Ok(())
}

#[test]
fn test_sources_are_produced_by_input_step() -> TestResult {
  let build = compile_link(&["a", "b"], &[]);
  let description = &build.description;
  assert_eq!(description.adjacent_steps(build.compiles[0], IoDirection::Input)?, vec![description.input_step()]);
  assert_eq!(description.adjacent_steps(description.input_step(), IoDirection::Output)?, build.compiles);
  assert_eq!(description.adjacent_steps(description.input_step(), IoDirection::Input)?, vec![]);
  assert_eq!(description.adjacent_steps(build.link, IoDirection::Output)?, vec![description.output_step()]);
  assert_eq!(description.adjacent_steps(description.output_step(), IoDirection::Input)?, vec![build.link]);
  Ok(())
}

#[test]
fn test_neighbors_are_deduplicated() -> TestResult {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/gen.y");
  let header = description.get_or_create_resource("/project/Debug/gen.h", true);
  let code = description.get_or_create_resource("/project/Debug/gen.c", true);
  let generate = add_tool_step(&mut description, "generate", None, &[source], &[header, code]);
  let compile = add_tool_step(&mut description, "compile", None, &[header, code], &[]);

  assert_eq!(description.adjacent_steps(compile, IoDirection::Input)?, vec![generate]);
  assert_eq!(description.adjacent_steps(generate, IoDirection::Output)?, vec![compile]);
  Ok(())
}

#[test]
fn test_resources_without_links_contribute_nothing() -> TestResult {
  let mut description = BuildDescription::new();
  let dangling = description.get_or_create_resource("/usr/include/stdio.h", false);
  let transient = description.create_transient_resource();
  let step = add_tool_step(&mut description, "compile", None, &[dangling], &[transient]);
  assert_eq!(description.adjacent_steps(step, IoDirection::Input)?, vec![]);
  assert_eq!(description.adjacent_steps(step, IoDirection::Output)?, vec![]);
  Ok(())
}

#[test]
fn test_consumers_grouped_by_input_order() -> TestResult {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/all.c");
  let x = description.get_or_create_resource("/project/Debug/x.o", true);
  let y = description.get_or_create_resource("/project/Debug/y.o", true);
  let z = description.get_or_create_resource("/project/Debug/z.o", true);
  let generate = add_tool_step(&mut description, "generate", None, &[source], &[x, y, z]);

  let objects = Arc::new(InputType::new("objects")
    .with_input_order(InputOrder::new("Debug/y.o", 1)?)
    .with_input_order(InputOrder::new("Debug/z.o", 2)?));
  let archive = add_tool_step(&mut description, "archive", None, &[x], &[]);
  let link_x = add_tool_step(&mut description, "link x", Some(objects.clone()), &[x], &[]);
  let link_y = add_tool_step(&mut description, "link y", Some(objects.clone()), &[y], &[]);
  let link_z = add_tool_step(&mut description, "link z", Some(objects), &[z], &[]);

  let consumers = description.adjacent_steps(generate, IoDirection::Output)?;
  assert_eq!(consumers, vec![link_y, link_z, link_x, archive]);
  Ok(())
}

#[test]
fn test_consumer_groups_in_encounter_order() -> TestResult {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/all.c");
  let a = description.get_or_create_resource("/project/Debug/a.o", true);
  let b = description.get_or_create_resource("/project/Debug/b.o", true);
  let generate = add_tool_step(&mut description, "generate", None, &[source], &[a, b]);

  let first = Arc::new(InputType::new("first").with_input_order(InputOrder::new("Debug/b.o", 1)?));
  let second = Arc::new(InputType::new("second").with_input_order(InputOrder::new("Debug/a.o", 1)?));
  let first_a = add_tool_step(&mut description, "first a", Some(first.clone()), &[a], &[]);
  let second_a = add_tool_step(&mut description, "second a", Some(second.clone()), &[a], &[]);
  let first_b = add_tool_step(&mut description, "first b", Some(first), &[b], &[]);
  let second_b = add_tool_step(&mut description, "second b", Some(second), &[b], &[]);

  let consumers = description.adjacent_steps(generate, IoDirection::Output)?;
  assert_eq!(consumers, vec![first_b, first_a, second_a, second_b]);
  Ok(())
}

#[test]
fn test_inherited_input_orders_group_consumers() -> TestResult {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/all.c");
  let a = description.get_or_create_resource("/project/Debug/a.o", true);
  let b = description.get_or_create_resource("/project/Debug/b.o", true);
  let generate = add_tool_step(&mut description, "generate", None, &[source], &[a, b]);

  let base = Arc::new(InputType::new("base").with_input_order(InputOrder::new("Debug/b.o", 1)?));
  let derived = Arc::new(InputType::new("derived").with_super_type(base));
  let link_a = add_tool_step(&mut description, "link a", Some(derived.clone()), &[a], &[]);
  let link_b = add_tool_step(&mut description, "link b", Some(derived), &[b], &[]);

  assert_eq!(description.adjacent_steps(generate, IoDirection::Output)?, vec![link_b, link_a]);
  Ok(())
}

#[test]
fn test_sibling_types_sharing_ordered_ancestor_form_one_group() -> TestResult {
  let mut description = BuildDescription::new();
  let source = add_source(&mut description, "/project/src/all.c");
  let a = description.get_or_create_resource("/project/Debug/a.o", true);
  let b = description.get_or_create_resource("/project/Debug/b.o", true);
  let generate = add_tool_step(&mut description, "generate", None, &[source], &[a, b]);

  let base = Arc::new(InputType::new("base")
    .with_input_order(InputOrder::new("Debug/b.o", 1)?)
    .with_input_order(InputOrder::new("Debug/a.o", 2)?));
  let shared = Arc::new(InputType::new("shared").with_super_type(base.clone()));
  let static_objects = Arc::new(InputType::new("static").with_super_type(shared));
  let dynamic_objects = Arc::new(InputType::new("dynamic").with_super_type(base));
  let link_a = add_tool_step(&mut description, "link a", Some(static_objects), &[a], &[]);
  let link_b = add_tool_step(&mut description, "link b", Some(dynamic_objects), &[b], &[]);

  assert_eq!(description.adjacent_steps(generate, IoDirection::Output)?, vec![link_b, link_a]);
  Ok(())
}

#[test]
fn test_missing_step() -> TestResult {
  let mut description = BuildDescription::new();
  let step = description.add_step("compile", None);
  description.remove_step(step)?;
  assert_matches!(description.adjacent_steps(step, IoDirection::Output), Err(Error::StepMissing(s)) if s == step);
  Ok(())
}
