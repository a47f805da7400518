use std::sync::Arc;

use buildmodel::{BuildDescription, InputOrder, InputType, IoDirection, IoTypeDefinition, OutputType, ResourceId, StepId, Tool};

use crate::check::CheckErrorExt;

/// Creates a project resource at `path` and marks it as an original source.
pub fn add_source(description: &mut BuildDescription, path: &str) -> ResourceId {
  let resource = description.get_or_create_resource(path, true);
  description.add_source(resource).check();
  resource
}

/// Adds a step named `name` that consumes `inputs` through a primary input I/O type bound to `input_type`, and
/// produces `outputs` through a primary output I/O type.
pub fn add_tool_step(
  description: &mut BuildDescription,
  name: &str,
  input_type: Option<Arc<InputType>>,
  inputs: &[ResourceId],
  outputs: &[ResourceId],
) -> StepId {
  let step = description.add_step(name, Some(Tool::new(format!("tool.{}", name), name)));
  let input = description.add_io_type(step, IoDirection::Input, true, input_type.map(IoTypeDefinition::from)).check();
  for resource in inputs {
    description.add_resource(input, *resource).check();
  }
  let output_type = IoTypeDefinition::from(OutputType::new(format!("{}.output", name)));
  let output = description.add_io_type(step, IoDirection::Output, true, Some(output_type)).check();
  for resource in outputs {
    description.add_resource(output, *resource).check();
  }
  step
}

/// Compile and link build: one compile step per source, and one link step consuming all objects.
pub struct CompileLink {
  pub description: BuildDescription,
  pub sources: Vec<ResourceId>,
  pub objects: Vec<ResourceId>,
  pub compiles: Vec<StepId>,
  pub link: StepId,
  pub binary: ResourceId,
}

/// Creates a [`CompileLink`] build that compiles `/project/src/{name}.c` into `/project/Debug/{name}.o` for each of
/// `names`, and links the objects into `/project/Debug/app`, which is a build product. The link input type declares
/// the `(name, order)` pairs in `link_orders` as input orders of the corresponding objects.
pub fn compile_link(names: &[&str], link_orders: &[(&str, i64)]) -> CompileLink {
  let mut description = BuildDescription::new();
  let mut sources = Vec::new();
  let mut objects = Vec::new();
  let mut compiles = Vec::new();
  for name in names {
    let source = add_source(&mut description, &format!("/project/src/{}.c", name));
    let object = description.get_or_create_resource(format!("/project/Debug/{}.o", name), true);
    compiles.push(add_tool_step(&mut description, &format!("compile {}", name), None, &[source], &[object]));
    sources.push(source);
    objects.push(object);
  }

  let mut link_objects = InputType::new("link.objects").with_build_variable("OBJS");
  for (name, order) in link_orders {
    link_objects = link_objects.with_input_order(InputOrder::new(format!("Debug/{}.o", name), *order).check());
  }
  let binary = description.get_or_create_resource("/project/Debug/app", true);
  let link = add_tool_step(&mut description, "link", Some(Arc::new(link_objects)), &objects, &[binary]);
  description.add_build_product(binary).check();

  CompileLink { description, sources, objects, compiles, link, binary }
}
