//! MeshCoordsError: unified error type for mesh-coords public APIs.
//!
//! Every fallible public operation in this crate returns this error type so
//! callers get non-panicking behavior with structured failure information.

use thiserror::Error;

use crate::topology::point::PointId;

/// Unified error type for mesh-coords operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshCoordsError {
    /// Attempted to construct a `PointId` with a zero value.
    #[error("PointId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidPointId,
    /// Attempted to register a zero-length slice in an atlas.
    #[error("atlas slices must have non-zero length")]
    ZeroLengthSlice,
    /// A point was inserted twice into the same atlas.
    #[error("point {0} is already registered in the atlas")]
    DuplicatePoint(PointId),
    /// A point was looked up in an atlas that does not contain it.
    #[error("point {0} is not registered in the atlas")]
    MissingAtlasPoint(PointId),
    /// A per-point slice had the wrong length for the operation.
    #[error("slice length mismatch at point {point}: expected {expected}, found {found}")]
    SliceLengthMismatch {
        /// Point whose slice was being written or read.
        point: PointId,
        /// Length required by the atlas.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },
    /// A raw buffer write fell outside the storage bounds.
    #[error("storage write out of bounds at offset {offset} (len {len})")]
    StorageChunkMismatch {
        /// Starting offset of the rejected range.
        offset: usize,
        /// Length of the rejected range.
        len: usize,
    },
    /// A raw buffer read was given a destination of the wrong size.
    #[error("storage read length mismatch: expected {expected}, found {found}")]
    StorageLengthMismatch {
        /// Length of the requested range.
        expected: usize,
        /// Length of the destination buffer.
        found: usize,
    },
    /// The mesh topology contains a cycle; expected a DAG.
    #[error("cycle detected in mesh topology (expected DAG)")]
    CycleDetected,
    /// A topology with no points cannot carry a mesh or function space.
    #[error("topology has no points")]
    EmptyTopology,
    /// A value shape with zero components is not representable.
    #[error("value shape must have at least one component")]
    ZeroComponentShape,
    /// A dof layout with no strata (or a zero dof count) is not usable.
    #[error("dof layout must assign a non-zero dof count to at least one stratum")]
    EmptyDofLayout,
    /// Direct reassignment of a mesh's coordinate field is rejected.
    ///
    /// Wholesale replacement goes through `Mesh::from_field`, which builds a
    /// new mesh sharing storage with the replacement field.
    #[error(
        "mesh coordinates cannot be reassigned in place; \
         construct a new mesh from the field via `Mesh::from_field`"
    )]
    CoordinateReassignment,
    /// Coordinate fields must be vector-valued.
    #[error("coordinate fields must have a vector value shape")]
    ScalarCoordinates,
    /// A vertex of the topology has no slot in the coordinate space.
    #[error("vertex {0} is not covered by the coordinate function space")]
    VertexNotCovered(PointId),
    /// Two meshes or spaces do not share a topology.
    #[error("topologies do not match: {0}")]
    TopologyMismatch(String),
    /// Geometry input that cannot be processed (degenerate sizes, bad cells).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
