//! Mesh topology abstractions: points, incidence sieves and strata.
//!
//! The coordinate layer only needs enough topology to anchor function spaces
//! and classify points by depth (vertices at depth 0, cells at the top).
//! [`MeshTopology`] is the validated, immutable form the rest of the crate
//! consumes.

pub mod mesh_topology;
pub mod point;
pub mod sieve;
pub mod stratum;

pub use mesh_topology::MeshTopology;
pub use point::PointId;
pub use sieve::{InMemorySieve, Sieve};
pub use stratum::{StrataCache, compute_strata};
