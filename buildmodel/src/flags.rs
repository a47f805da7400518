use bitflags::bitflags;

bitflags! {
  /// Information included in a build description, and the selection mask for stale resources.
  #[derive(Default, Copy, Clone, PartialEq, Eq, Hash, Debug)]
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  pub struct DescriptionFlags: u32 {
    /// Removed resources.
    const REMOVED = 1;
    /// Rebuild state of resources.
    const REBUILD = 1 << 1;
    /// Dependency information.
    const DEPS = 1 << 2;
    /// Dependency file (`.d`) information.
    const DEPFILES = 1 << 3;
  }
}
