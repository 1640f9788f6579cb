//! `PointId`: a strong, zero-cost handle for mesh entities.
//!
//! Every topological entity (cell, edge, vertex, …) is identified by an
//! opaque `PointId` wrapping a `NonZeroU64`; 0 is reserved as an invalid or
//! sentinel value. The type is `repr(transparent)`, so it has the same
//! layout as a `u64` and can live in dense adjacency tables at no cost.

use std::{fmt, num::NonZeroU64};

use crate::error::MeshCoordsError;

/// Opaque identifier for a topological point.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct PointId(NonZeroU64);

impl PointId {
    /// Creates a new `PointId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns `Err(InvalidPointId)` if `raw == 0`.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshCoordsError> {
        NonZeroU64::new(raw)
            .map(PointId)
            .ok_or(MeshCoordsError::InvalidPointId)
    }

    /// Returns the inner `u64` value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointId").field(&self.get()).finish()
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
