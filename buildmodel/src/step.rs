use crate::{IoDirection, IoTypeId, Tool};

/// Kind of a [`Step`]: one of the two sentinels bounding the graph, or a tool invocation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepKind {
  /// Virtual source of the graph: produces the original sources.
  Input,
  /// Virtual sink of the graph: consumes the final build products.
  Output,
  /// Invocation of a tool.
  Tool,
}

/// Unit of work in a build: a tool invocation with ordered lists of input and output I/O types.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Step {
  name: String,
  kind: StepKind,
  tool: Option<Tool>,
  pub(crate) inputs: Vec<IoTypeId>,
  pub(crate) outputs: Vec<IoTypeId>,
}

impl Step {
  #[inline]
  pub(crate) fn new(name: String, kind: StepKind, tool: Option<Tool>) -> Self {
    Self { name, kind, tool, inputs: Vec::new(), outputs: Vec::new() }
  }

  #[inline]
  pub fn name(&self) -> &str { &self.name }
  #[inline]
  pub fn kind(&self) -> StepKind { self.kind }
  /// Gets the tool this step invokes. Sentinel steps have no tool.
  #[inline]
  pub fn tool(&self) -> Option<&Tool> { self.tool.as_ref() }
  #[inline]
  pub fn is_sentinel(&self) -> bool { self.kind != StepKind::Tool }

  #[inline]
  pub fn inputs(&self) -> &[IoTypeId] { &self.inputs }
  #[inline]
  pub fn outputs(&self) -> &[IoTypeId] { &self.outputs }
  /// Gets the I/O types of this step in `direction`.
  #[inline]
  pub fn io_types(&self, direction: IoDirection) -> &[IoTypeId] {
    match direction {
      IoDirection::Input => &self.inputs,
      IoDirection::Output => &self.outputs,
    }
  }

  #[inline]
  pub(crate) fn io_types_mut(&mut self, direction: IoDirection) -> &mut Vec<IoTypeId> {
    match direction {
      IoDirection::Input => &mut self.inputs,
      IoDirection::Output => &mut self.outputs,
    }
  }
}
