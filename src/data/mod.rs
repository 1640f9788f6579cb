//! Data layout: atlas, storage backends and sections.
#![warn(missing_docs)]

pub mod atlas;
pub mod debug_invariants;
pub mod section;
pub mod storage;

pub use atlas::Atlas;
pub use debug_invariants::DebugInvariants;
pub use section::Section;
pub use storage::{Storage, VecStorage};

/// Alias for the common Vec-backed section.
pub type CpuSection<V> = section::Section<V, VecStorage<V>>;
