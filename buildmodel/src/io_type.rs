use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

use crate::{InputType, IoTypeDefinition, ResourceId, StepId};

/// Direction of an [`IoType`] relative to its step.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum IoDirection {
  Input,
  Output,
}

impl IoDirection {
  #[inline]
  pub fn opposite(self) -> Self {
    match self {
      IoDirection::Input => IoDirection::Output,
      IoDirection::Output => IoDirection::Input,
    }
  }
}

impl Display for IoDirection {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      IoDirection::Input => f.write_str("input"),
      IoDirection::Output => f.write_str("output"),
    }
  }
}


/// Typed, directional binding of a step to a set of resources.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct IoType {
  step: StepId,
  direction: IoDirection,
  primary: bool,
  definition: Option<IoTypeDefinition>,
  pub(crate) resources: OrderedResources,
}

impl IoType {
  #[inline]
  pub(crate) fn new(step: StepId, direction: IoDirection, primary: bool, definition: Option<IoTypeDefinition>) -> Self {
    Self { step, direction, primary, definition, resources: OrderedResources::default() }
  }

  /// Gets the step this I/O type belongs to.
  #[inline]
  pub fn step(&self) -> StepId { self.step }
  #[inline]
  pub fn direction(&self) -> IoDirection { self.direction }
  #[inline]
  pub fn is_input(&self) -> bool { self.direction == IoDirection::Input }
  /// Returns true if this is the main input or output of the tool, rather than a secondary one.
  #[inline]
  pub fn is_primary(&self) -> bool { self.primary }
  #[inline]
  pub fn definition(&self) -> Option<&IoTypeDefinition> { self.definition.as_ref() }
  /// Gets the input type definition, if this is an input I/O type bound to one.
  #[inline]
  pub fn input_type(&self) -> Option<&InputType> { self.definition.as_ref().and_then(IoTypeDefinition::input_type) }
  /// Gets the link id: the build variable of the type definition.
  #[inline]
  pub fn link_id(&self) -> Option<&str> { self.definition.as_ref().and_then(IoTypeDefinition::build_variable) }

  /// Gets the resources of this I/O type in resolved order. See [`OrderedResources::resolve`].
  #[inline]
  pub fn resources(&self) -> Vec<ResourceId> { self.resources.resolve() }
  #[inline]
  pub fn contains(&self, resource: ResourceId) -> bool { self.resources.contains(resource) }
  #[inline]
  pub fn len(&self) -> usize { self.resources.len() }
  #[inline]
  pub fn is_empty(&self) -> bool { self.resources.is_empty() }
}


/// Resources split into an ordered subset, with a declared order value of at least 1, and an unordered subset.
///
/// A resource is in at most one of the two subsets. Ordered resources with equal order values keep their insertion
/// order.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OrderedResources {
  ordered: Vec<(NonZeroU32, ResourceId)>,
  unordered: Vec<ResourceId>,
  members: HashSet<ResourceId>,
}

impl OrderedResources {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Inserts `resource` into the ordered subset if `order` is given, otherwise into the unordered subset. Returns
  /// false without changing anything if `resource` is already contained.
  pub fn insert(&mut self, resource: ResourceId, order: Option<NonZeroU32>) -> bool {
    if !self.members.insert(resource) {
      return false;
    }
    match order {
      Some(order) => {
        let index = self.ordered.partition_point(|(o, _)| *o <= order);
        self.ordered.insert(index, (order, resource));
      }
      None => self.unordered.push(resource),
    }
    true
  }

  /// Removes `resource` from whichever subset holds it, returning false if neither does.
  pub fn remove(&mut self, resource: ResourceId) -> bool {
    if !self.members.remove(&resource) {
      return false;
    }
    if let Some(index) = self.unordered.iter().position(|r| *r == resource) {
      self.unordered.remove(index);
      true
    } else if let Some(index) = self.ordered.iter().position(|(_, r)| *r == resource) {
      self.ordered.remove(index);
      true
    } else {
      false
    }
  }

  #[inline]
  pub fn contains(&self, resource: ResourceId) -> bool {
    self.members.contains(&resource)
  }
  #[inline]
  pub fn len(&self) -> usize { self.ordered.len() + self.unordered.len() }
  #[inline]
  pub fn is_empty(&self) -> bool { self.ordered.is_empty() && self.unordered.is_empty() }

  /// Returns all resources in resolved order.
  ///
  /// Slots `1..=len` are filled in turn. A slot takes the next ordered resource if its order value equals the slot
  /// index, or if the unordered resources are exhausted; otherwise it takes the next unordered resource. Unordered
  /// resources thereby fill the holes between order values, and a resource with a very high order value ends up
  /// last.
  pub fn resolve(&self) -> Vec<ResourceId> {
    let len = self.len();
    let mut resolved = Vec::with_capacity(len);
    let mut ordered = self.ordered.iter().peekable();
    let mut unordered = self.unordered.iter().peekable();
    for slot in 1..=len {
      let take_ordered = match (ordered.peek(), unordered.peek()) {
        (Some((order, _)), Some(_)) => order.get() as usize == slot,
        (Some(_), None) => true,
        (None, _) => false,
      };
      let next = if take_ordered {
        ordered.next().map(|(_, r)| *r)
      } else {
        unordered.next().copied()
      };
      resolved.extend(next);
    }
    resolved
  }
}


#[cfg(test)]
mod test {
  use slotmap::SlotMap;

  use super::*;

  fn resources(count: usize) -> Vec<ResourceId> {
    let mut arena = SlotMap::<ResourceId, ()>::with_key();
    (0..count).map(|_| arena.insert(())).collect()
  }

  fn order(value: u32) -> Option<NonZeroU32> { NonZeroU32::new(value) }

  #[test]
  fn test_unordered_fill_holes() {
    let [u0, u1, u2, o2, o5] = resources(5)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(o5, order(5));
    set.insert(u0, None);
    set.insert(u1, None);
    set.insert(o2, order(2));
    set.insert(u2, None);
    assert_eq!(set.resolve(), vec![u0, o2, u1, u2, o5]);
  }

  #[test]
  fn test_high_order_lands_last() {
    let [u0, u1, last] = resources(3)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(last, order(1000));
    set.insert(u0, None);
    set.insert(u1, None);
    assert_eq!(set.resolve(), vec![u0, u1, last]);
  }

  #[test]
  fn test_only_ordered_sorted_by_order() {
    let [a, b, c] = resources(3)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(a, order(30));
    set.insert(b, order(10));
    set.insert(c, order(20));
    assert_eq!(set.resolve(), vec![b, c, a]);
  }

  #[test]
  fn test_only_unordered_keeps_insertion_order() {
    let [a, b, c] = resources(3)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(c, None);
    set.insert(a, None);
    set.insert(b, None);
    assert_eq!(set.resolve(), vec![c, a, b]);
  }

  #[test]
  fn test_equal_orders_keep_insertion_order() {
    let [first, second, u0] = resources(3)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(first, order(1));
    set.insert(second, order(1));
    set.insert(u0, None);
    assert_eq!(set.resolve(), vec![first, u0, second]);
  }

  #[test]
  fn test_insert_contained_is_ignored() {
    let [a, b] = resources(2)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    assert!(set.insert(a, None));
    assert!(set.insert(b, order(1)));
    assert!(!set.insert(a, order(2)));
    assert!(!set.insert(b, None));
    assert_eq!(set.len(), 2);
    assert_eq!(set.resolve(), vec![b, a]);
    assert!(set.remove(a));
    assert!(set.insert(a, order(2)));
    assert_eq!(set.resolve(), vec![b, a]);
  }

  #[test]
  fn test_remove() {
    let [a, b, c] = resources(3)[..] else { unreachable!() };
    let mut set = OrderedResources::new();
    set.insert(a, order(1));
    set.insert(b, None);
    assert!(set.contains(a));
    assert!(set.remove(a));
    assert!(!set.contains(a));
    assert!(set.remove(b));
    assert!(!set.remove(c));
    assert!(set.is_empty());
    assert_eq!(set.resolve(), vec![]);
  }
}
