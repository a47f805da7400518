use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hashlink::{LinkedHashMap, LinkedHashSet};
use slotmap::SlotMap;

use crate::{DescriptionFlags, Error, InputType, IoDirection, IoType, IoTypeDefinition, IoTypeId, OrderedResources, Resource, ResourceId, Step, StepId, StepKind, Tool};

/// Build description of one build configuration: owns all steps, I/O types, and resources.
///
/// The graph is bounded by two sentinel steps created with the description: the [input step](Self::input_step)
/// producing the original sources, and the [output step](Self::output_step) consuming the final build products.
///
/// Identifiers handed out by the description stay valid until the corresponding item is removed. Looking up a
/// removed identifier results in an [`Error`] rather than a panic.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BuildDescription {
  steps: SlotMap<StepId, Step>,
  io_types: SlotMap<IoTypeId, IoType>,
  resources: SlotMap<ResourceId, Resource>,
  path_to_resource: HashMap<PathBuf, ResourceId>,
  input_step: StepId,
  output_step: StepId,
  flags: DescriptionFlags,
}

impl Default for BuildDescription {
  #[inline]
  fn default() -> Self { Self::new() }
}

impl BuildDescription {
  /// Creates a new build description with only the two sentinel steps.
  #[inline]
  pub fn new() -> Self { Self::with_flags(DescriptionFlags::empty()) }

  /// Creates a new build description with only the two sentinel steps, recording that it was created with the
  /// information in `flags`.
  pub fn with_flags(flags: DescriptionFlags) -> Self {
    let mut steps = SlotMap::default();
    let input_step = steps.insert(Step::new("input".to_string(), StepKind::Input, None));
    let output_step = steps.insert(Step::new("output".to_string(), StepKind::Output, None));
    Self {
      steps,
      io_types: SlotMap::default(),
      resources: SlotMap::default(),
      path_to_resource: HashMap::default(),
      input_step,
      output_step,
      flags,
    }
  }

  /// Gets the sentinel step that produces the original sources.
  #[inline]
  pub fn input_step(&self) -> StepId { self.input_step }
  /// Gets the sentinel step that consumes the final build products.
  #[inline]
  pub fn output_step(&self) -> StepId { self.output_step }
  #[inline]
  pub fn flags(&self) -> DescriptionFlags { self.flags }


  /// Adds a step named `name` that invokes `tool`.
  #[inline]
  pub fn add_step(&mut self, name: impl Into<String>, tool: Option<Tool>) -> StepId {
    self.steps.insert(Step::new(name.into(), StepKind::Tool, tool))
  }

  /// Removes `step` and all its I/O types, returning the resources detached from those I/O types.
  ///
  /// # Errors
  ///
  /// Returns [`Error::SentinelStep`] if `step` is the input or output step, or [`Error::StepMissing`] if `step` does
  /// not exist.
  pub fn remove_step(&mut self, step: StepId) -> Result<Vec<ResourceId>, Error> {
    let step_data = self.get_step(step)?;
    if step_data.is_sentinel() {
      return Err(Error::SentinelStep(step));
    }
    let io_types: Vec<_> = step_data.inputs.iter().chain(&step_data.outputs).copied().collect();
    let mut detached = Vec::new();
    for io_type in io_types {
      detached.extend(self.remove_io_type(io_type)?);
    }
    self.steps.remove(step);
    Ok(detached)
  }

  /// Adds an I/O type in `direction` to `step`, bound to `definition`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::UnsupportedIoTypeDefinition`] if `definition` is an output type for an input I/O type or vice
  /// versa, or [`Error::StepMissing`] if `step` does not exist.
  pub fn add_io_type(
    &mut self,
    step: StepId,
    direction: IoDirection,
    primary: bool,
    definition: Option<IoTypeDefinition>,
  ) -> Result<IoTypeId, Error> {
    self.get_step(step)?;
    if let Some(definition) = &definition {
      let matches = match direction {
        IoDirection::Input => matches!(definition, IoTypeDefinition::Input(_)),
        IoDirection::Output => matches!(definition, IoTypeDefinition::Output(_)),
      };
      if !matches {
        return Err(Error::UnsupportedIoTypeDefinition { direction, definition: definition.id().to_string() });
      }
    }
    let io_type = self.io_types.insert(IoType::new(step, direction, primary, definition));
    self.get_step_mut(step)?.io_types_mut(direction).push(io_type);
    Ok(io_type)
  }

  /// Removes `io_type` from its step, detaching all its resources. Returns the detached resources in resolved order.
  pub fn remove_io_type(&mut self, io_type: IoTypeId) -> Result<Vec<ResourceId>, Error> {
    let removed = self.io_types.remove(io_type).ok_or(Error::IoTypeMissing(io_type))?;
    if let Some(step) = self.steps.get_mut(removed.step()) {
      step.io_types_mut(removed.direction()).retain(|io| *io != io_type);
    }
    let detached = removed.resources.resolve();
    for resource in &detached {
      if let Some(resource) = self.resources.get_mut(*resource) {
        Self::unlink(resource, io_type, removed.direction());
      }
    }
    Ok(detached)
  }


  /// Gets the resource at `path`, creating it if it does not exist yet. `project_resource` is only used when the
  /// resource is created.
  pub fn get_or_create_resource(&mut self, path: impl Into<PathBuf>, project_resource: bool) -> ResourceId {
    let path = path.into();
    if let Some(resource) = self.path_to_resource.get(&path) {
      return *resource;
    }
    let resource = self.resources.insert(Resource::new(Some(path.clone()), project_resource));
    self.path_to_resource.insert(path, resource);
    resource
  }

  /// Creates a transient resource, which has no path. Transient resources link steps without a file in between.
  #[inline]
  pub fn create_transient_resource(&mut self) -> ResourceId {
    self.resources.insert(Resource::new(None, false))
  }

  /// Adds `resource` to `io_type`.
  ///
  /// Resources added to an output I/O type are produced by it. Resources added to an input I/O type depend on it, and
  /// are ordered by the input order its input type declares for the [order key](Resource::order_key) of `resource`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::ResourceAlreadyAttached`] if `io_type` already contains `resource`,
  /// [`Error::MultipleProducers`] if `io_type` is an output and another I/O type already produces `resource`, or a
  /// missing-item error if either does not exist.
  pub fn add_resource(&mut self, io_type: IoTypeId, resource: ResourceId) -> Result<(), Error> {
    let io = self.get_io_type(io_type)?;
    let res = self.get_resource(resource)?;
    if io.contains(resource) {
      return Err(Error::ResourceAlreadyAttached { io_type, resource });
    }
    let order = match io.direction() {
      IoDirection::Input => io.input_type()
        .zip(res.order_key())
        .and_then(|(input_type, key)| input_type.resolve_order(&key)),
      IoDirection::Output => {
        if let Some(producer) = res.producer {
          return Err(Error::MultipleProducers { resource, producer });
        }
        None
      }
    };
    let direction = io.direction();

    self.get_io_type_mut(io_type)?.resources.insert(resource, order);
    let res = self.get_resource_mut(resource)?;
    match direction {
      IoDirection::Input => {
        res.dependents.insert(io_type);
      }
      IoDirection::Output => res.producer = Some(io_type),
    }
    Ok(())
  }

  /// Removes `resource` from `io_type`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::ResourceNotAttached`] if `io_type` does not contain `resource`.
  pub fn remove_resource(&mut self, io_type: IoTypeId, resource: ResourceId) -> Result<(), Error> {
    let io = self.get_io_type_mut(io_type)?;
    if !io.resources.remove(resource) {
      return Err(Error::ResourceNotAttached { io_type, resource });
    }
    let direction = io.direction();
    Self::unlink(self.get_resource_mut(resource)?, io_type, direction);
    Ok(())
  }

  /// Marks `resource` as an original source, produced by the input step. Does nothing if it already is one.
  pub fn add_source(&mut self, resource: ResourceId) -> Result<(), Error> {
    let io_type = self.sentinel_io_type(self.input_step, IoDirection::Output)?;
    if self.get_io_type(io_type)?.contains(resource) {
      return Ok(());
    }
    self.add_resource(io_type, resource)
  }

  /// Marks `resource` as a final build product, consumed by the output step. Does nothing if it already is one.
  pub fn add_build_product(&mut self, resource: ResourceId) -> Result<(), Error> {
    let io_type = self.sentinel_io_type(self.output_step, IoDirection::Input)?;
    if self.get_io_type(io_type)?.contains(resource) {
      return Ok(());
    }
    self.add_resource(io_type, resource)
  }


  #[inline]
  pub fn step(&self, step: StepId) -> Option<&Step> { self.steps.get(step) }
  #[inline]
  pub fn io_type(&self, io_type: IoTypeId) -> Option<&IoType> { self.io_types.get(io_type) }
  #[inline]
  pub fn resource(&self, resource: ResourceId) -> Option<&Resource> { self.resources.get(resource) }
  /// Gets a mutable reference to `resource`, for updating its rebuild and removed flags.
  #[inline]
  pub fn resource_mut(&mut self, resource: ResourceId) -> Option<&mut Resource> { self.resources.get_mut(resource) }
  #[inline]
  pub fn resource_by_path(&self, path: impl AsRef<Path>) -> Option<ResourceId> {
    self.path_to_resource.get(path.as_ref()).copied()
  }

  #[inline]
  pub fn steps(&self) -> impl Iterator<Item=(StepId, &Step)> + '_ { self.steps.iter() }
  #[inline]
  pub fn io_types(&self) -> impl Iterator<Item=(IoTypeId, &IoType)> + '_ { self.io_types.iter() }
  #[inline]
  pub fn resources(&self) -> impl Iterator<Item=(ResourceId, &Resource)> + '_ { self.resources.iter() }
  #[inline]
  pub fn step_count(&self) -> usize { self.steps.len() }

  /// Gets the step that produces `resource`, or `None` if nothing produces it or it does not exist.
  #[inline]
  pub fn producer_step(&self, resource: ResourceId) -> Option<StepId> {
    let producer = self.resources.get(resource)?.producer?;
    self.io_types.get(producer).map(IoType::step)
  }
  /// Returns true if `resource` is produced by a step other than the input step.
  #[inline]
  pub fn is_generated(&self, resource: ResourceId) -> bool {
    self.producer_step(resource).is_some_and(|step| step != self.input_step)
  }


  /// Gets the immediate neighbors of `step` in `direction`, without duplicates.
  ///
  /// In the input direction, these are the producers of the resources of the input I/O types of `step`, in encounter
  /// order. In the output direction, these are the consumers of the resources of the output I/O types of `step`.
  /// Consumers whose input type declares or inherits input orders are grouped per [ordering
  /// type](InputType::ordering_type), and ordered inside their group by the resolved order of the resources they
  /// consume. Grouped consumers come first, groups in encounter order,
  /// followed by the other consumers in encounter order.
  ///
  /// # Errors
  ///
  /// Returns [`Error::StepMissing`] if `step` does not exist.
  pub fn adjacent_steps(&self, step: StepId, direction: IoDirection) -> Result<Vec<StepId>, Error> {
    let step = self.get_step(step)?;
    match direction {
      IoDirection::Input => self.producer_steps(step),
      IoDirection::Output => self.consumer_steps(step),
    }
  }

  fn producer_steps(&self, step: &Step) -> Result<Vec<StepId>, Error> {
    let mut producers = LinkedHashSet::new();
    for io_type in &step.inputs {
      for resource in self.get_io_type(*io_type)?.resources() {
        let Some(producer) = self.get_resource(resource)?.producer else { continue };
        insert_absent(&mut producers, self.get_io_type(producer)?.step());
      }
    }
    Ok(producers.into_iter().collect())
  }

  fn consumer_steps(&self, step: &Step) -> Result<Vec<StepId>, Error> {
    let mut groups: LinkedHashMap<&str, OrderGroup> = LinkedHashMap::new();
    let mut unordered = LinkedHashSet::new();
    for io_type in &step.outputs {
      for resource_id in self.get_io_type(*io_type)?.resources() {
        let resource = self.get_resource(resource_id)?;
        for dependent in resource.dependents() {
          let consumer_io = self.get_io_type(dependent)?;
          let consumer = consumer_io.step();
          match consumer_io.input_type().and_then(InputType::ordering_type) {
            Some(ordering_type) => {
              let group = groups.entry(ordering_type.id()).or_insert_with(OrderGroup::default);
              if !group.consumers.contains_key(&resource_id) {
                let order = resource.order_key().and_then(|key| ordering_type.resolve_order(&key));
                group.resources.insert(resource_id, order);
              }
              let consumers = group.consumers.entry(resource_id).or_default();
              if !consumers.contains(&consumer) {
                consumers.push(consumer);
              }
            }
            None => insert_absent(&mut unordered, consumer),
          }
        }
      }
    }

    let mut consumers = LinkedHashSet::new();
    for group in groups.values() {
      for resource in group.resources.resolve() {
        for consumer in group.consumers.get(&resource).into_iter().flatten() {
          insert_absent(&mut consumers, *consumer);
        }
      }
    }
    for consumer in unordered {
      insert_absent(&mut consumers, consumer);
    }
    Ok(consumers.into_iter().collect())
  }


  #[inline]
  pub(crate) fn get_step(&self, step: StepId) -> Result<&Step, Error> {
    self.steps.get(step).ok_or(Error::StepMissing(step))
  }
  #[inline]
  fn get_step_mut(&mut self, step: StepId) -> Result<&mut Step, Error> {
    self.steps.get_mut(step).ok_or(Error::StepMissing(step))
  }
  #[inline]
  pub(crate) fn get_io_type(&self, io_type: IoTypeId) -> Result<&IoType, Error> {
    self.io_types.get(io_type).ok_or(Error::IoTypeMissing(io_type))
  }
  #[inline]
  fn get_io_type_mut(&mut self, io_type: IoTypeId) -> Result<&mut IoType, Error> {
    self.io_types.get_mut(io_type).ok_or(Error::IoTypeMissing(io_type))
  }
  #[inline]
  pub(crate) fn get_resource(&self, resource: ResourceId) -> Result<&Resource, Error> {
    self.resources.get(resource).ok_or(Error::ResourceMissing(resource))
  }
  #[inline]
  fn get_resource_mut(&mut self, resource: ResourceId) -> Result<&mut Resource, Error> {
    self.resources.get_mut(resource).ok_or(Error::ResourceMissing(resource))
  }

  /// Gets the first I/O type of sentinel `step` in `direction`, creating it if it has none.
  fn sentinel_io_type(&mut self, step: StepId, direction: IoDirection) -> Result<IoTypeId, Error> {
    match self.get_step(step)?.io_types(direction).first() {
      Some(io_type) => Ok(*io_type),
      None => self.add_io_type(step, direction, true, None),
    }
  }

  fn unlink(resource: &mut Resource, io_type: IoTypeId, direction: IoDirection) {
    match direction {
      IoDirection::Input => {
        resource.dependents.remove(&io_type);
      }
      IoDirection::Output => if resource.producer == Some(io_type) {
        resource.producer = None;
      }
    }
  }
}

/// Consumers reached through one input type with input orders.
#[derive(Default)]
struct OrderGroup {
  resources: OrderedResources,
  consumers: HashMap<ResourceId, Vec<StepId>>,
}

/// Inserts `value` at the back of `set` if absent. A plain insert would move an existing value to the back.
#[inline]
fn insert_absent(set: &mut LinkedHashSet<StepId>, value: StepId) {
  if !set.contains(&value) {
    set.insert(value);
  }
}
