//! # mesh-coords
//!
//! mesh-coords is a mesh geometry management library for finite-element
//! codes. It models the coordinate side of a mesh: a topology anchors
//! function spaces, fields carry per-dof data with shared storage, and a
//! mesh joins a topology with a vector-valued coordinate field.
//!
//! ## Coordinate contract
//! - Read positions through [`Mesh::coordinates`](mesh::Mesh::coordinates)
//!   and move the mesh by mutating them in place.
//! - The coordinate field can never be rebound on an existing mesh;
//!   [`Mesh::replace_coordinates`](mesh::Mesh::replace_coordinates) always
//!   fails, by design.
//! - Wholesale replacement constructs a *new* mesh from a field (possibly on
//!   a different function space) via
//!   [`Mesh::from_field`](mesh::Mesh::from_field); the new mesh and the
//!   field share underlying storage, so mutating the field moves the mesh.
//! - Fields anchored to an old mesh migrate onto the new geometry with
//!   [`migrate_field`](migrate::migrate_field), sharing their values, since
//!   both meshes share a topology.
//!
//! ## Shared storage
//! Cloning a [`Field`](field::Field) aliases its value buffer; use
//! [`deep_copy`](field::Field::deep_copy) for a detached copy. Interior
//! mutability goes through `parking_lot::RwLock`, so any handle can move a
//! mesh.
//!
//! ## Determinism
//! Atlas offsets follow stratum-then-point order, adjacency is sorted at
//! topology freeze, and generators number vertices before cells, so layouts
//! and traversals are reproducible across runs.

pub mod data;
pub mod error;
pub mod field;
pub mod generation;
pub mod geometry;
pub mod mesh;
pub mod migrate;
pub mod space;
pub mod topology;

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::data::atlas::Atlas;
    pub use crate::data::section::Section;
    pub use crate::data::storage::{Storage, VecStorage};
    pub use crate::data::{CpuSection, DebugInvariants};
    pub use crate::error::MeshCoordsError;
    pub use crate::field::Field;
    pub use crate::generation::{interval_mesh, unit_square_mesh};
    pub use crate::mesh::Mesh;
    pub use crate::migrate::{migrate_field, migrate_field_copied};
    pub use crate::space::{DofLayout, FunctionSpace, ValueShape};
    pub use crate::topology::mesh_topology::MeshTopology;
    pub use crate::topology::point::PointId;
    pub use crate::topology::sieve::{InMemorySieve, Sieve};
}
