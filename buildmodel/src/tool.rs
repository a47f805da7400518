use std::iter;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Error;

/// Tool definition a [`Step`](crate::Step) invokes. Opaque to the graph apart from its identity.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Tool {
  id: String,
  name: String,
}

impl Tool {
  #[inline]
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self { Self { id: id.into(), name: name.into() } }

  #[inline]
  pub fn id(&self) -> &str { &self.id }
  #[inline]
  pub fn name(&self) -> &str { &self.name }
}


/// Declared 1-based position of the input resource at `path` among the inputs of a tool, for example the position of
/// an object file on a linker command line.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputOrder {
  path: PathBuf,
  order: NonZeroU32,
}

impl InputOrder {
  /// Creates an input order of `order` for `path`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvalidInputOrder`] if `order` is less than 1. Orders are never renumbered silently.
  pub fn new(path: impl Into<PathBuf>, order: i64) -> Result<Self, Error> {
    let path = path.into();
    match u32::try_from(order).ok().and_then(NonZeroU32::new) {
      Some(order) => Ok(Self { path, order }),
      None => Err(Error::InvalidInputOrder { path, order }),
    }
  }

  #[inline]
  pub fn path(&self) -> &Path { &self.path }
  #[inline]
  pub fn order(&self) -> NonZeroU32 { self.order }
}


/// Input type definition of a tool: the kind of input a tool accepts, with optional input orders.
///
/// Input types form a hierarchy through their super type. Input-order lookups consult the type itself first and then
/// its ancestors, nearest first. The ancestor list is computed once, when the super type is set.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputType {
  id: String,
  build_variable: Option<String>,
  primary_input: bool,
  orders: Vec<InputOrder>,
  ancestors: Vec<Arc<InputType>>,
}

impl InputType {
  #[inline]
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into(), build_variable: None, primary_input: false, orders: Vec::new(), ancestors: Vec::new() }
  }

  /// Sets the build variable, which becomes the link id of input I/O types bound to this type.
  #[inline]
  pub fn with_build_variable(mut self, build_variable: impl Into<String>) -> Self {
    self.build_variable = Some(build_variable.into());
    self
  }
  #[inline]
  pub fn with_primary_input(mut self, primary_input: bool) -> Self {
    self.primary_input = primary_input;
    self
  }
  /// Declares `order`, replacing an earlier declaration for the same path.
  pub fn with_input_order(mut self, order: InputOrder) -> Self {
    match self.orders.iter_mut().find(|o| o.path == order.path) {
      Some(existing) => *existing = order,
      None => self.orders.push(order),
    }
    self
  }
  /// Sets `super_type` as the parent of this type, precomputing the ancestor list.
  pub fn with_super_type(mut self, super_type: Arc<InputType>) -> Self {
    let mut ancestors = Vec::with_capacity(super_type.ancestors.len() + 1);
    let inherited = super_type.ancestors.clone();
    ancestors.push(super_type);
    ancestors.extend(inherited);
    self.ancestors = ancestors;
    self
  }

  #[inline]
  pub fn id(&self) -> &str { &self.id }
  #[inline]
  pub fn build_variable(&self) -> Option<&str> { self.build_variable.as_deref() }
  #[inline]
  pub fn is_primary_input(&self) -> bool { self.primary_input }
  /// Gets the input orders declared directly on this type, not on its ancestors.
  #[inline]
  pub fn input_orders(&self) -> &[InputOrder] { &self.orders }
  #[inline]
  pub fn super_type(&self) -> Option<&InputType> { self.ancestors.first().map(AsRef::as_ref) }

  /// Iterates over this type followed by its ancestors, nearest first.
  #[inline]
  pub fn lineage(&self) -> impl Iterator<Item=&InputType> + '_ {
    iter::once(self).chain(self.ancestors.iter().map(AsRef::as_ref))
  }

  /// Returns the order declared for `path` by the nearest type in the lineage that declares one.
  pub fn resolve_order(&self, path: &Path) -> Option<NonZeroU32> {
    self.lineage().find_map(|input_type| {
      input_type.orders.iter().find(|o| o.path == path).map(|o| o.order)
    })
  }

  /// Gets the nearest type in the lineage that declares input orders, or `None` if no type declares any. Consumers
  /// whose input types share this type are ordered together.
  #[inline]
  pub fn ordering_type(&self) -> Option<&InputType> {
    self.lineage().find(|input_type| !input_type.orders.is_empty())
  }

  /// Returns true if any type in the lineage declares input orders.
  #[inline]
  pub fn has_input_orders(&self) -> bool { self.ordering_type().is_some() }
}


/// Output type definition of a tool.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OutputType {
  id: String,
  build_variable: Option<String>,
}

impl OutputType {
  #[inline]
  pub fn new(id: impl Into<String>) -> Self { Self { id: id.into(), build_variable: None } }

  #[inline]
  pub fn with_build_variable(mut self, build_variable: impl Into<String>) -> Self {
    self.build_variable = Some(build_variable.into());
    self
  }

  #[inline]
  pub fn id(&self) -> &str { &self.id }
  #[inline]
  pub fn build_variable(&self) -> Option<&str> { self.build_variable.as_deref() }
}


/// Type definition an [`IoType`](crate::IoType) is bound to.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum IoTypeDefinition {
  Input(Arc<InputType>),
  Output(Arc<OutputType>),
}

impl IoTypeDefinition {
  #[inline]
  pub fn id(&self) -> &str {
    match self {
      IoTypeDefinition::Input(t) => t.id(),
      IoTypeDefinition::Output(t) => t.id(),
    }
  }
  #[inline]
  pub fn build_variable(&self) -> Option<&str> {
    match self {
      IoTypeDefinition::Input(t) => t.build_variable(),
      IoTypeDefinition::Output(t) => t.build_variable(),
    }
  }
  #[inline]
  pub fn input_type(&self) -> Option<&InputType> {
    match self {
      IoTypeDefinition::Input(t) => Some(t),
      IoTypeDefinition::Output(_) => None,
    }
  }
}

impl From<InputType> for IoTypeDefinition {
  #[inline]
  fn from(value: InputType) -> Self { Self::Input(Arc::new(value)) }
}

impl From<Arc<InputType>> for IoTypeDefinition {
  #[inline]
  fn from(value: Arc<InputType>) -> Self { Self::Input(value) }
}

impl From<OutputType> for IoTypeDefinition {
  #[inline]
  fn from(value: OutputType) -> Self { Self::Output(Arc::new(value)) }
}

impl From<Arc<OutputType>> for IoTypeDefinition {
  #[inline]
  fn from(value: Arc<OutputType>) -> Self { Self::Output(value) }
}
