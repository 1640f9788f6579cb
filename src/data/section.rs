//! Section: per-point field data over an atlas layout.
//!
//! A `Section<V, S>` couples an [`Atlas`] (mapping points to spans of a flat
//! buffer) with a [`Storage`] buffer holding the actual values. All access
//! goes through fallible `try_*` methods keyed by `PointId`.

use crate::data::atlas::Atlas;
use crate::data::storage::{Storage, VecStorage};
use crate::error::MeshCoordsError;
use crate::topology::point::PointId;

/// Per-point field data, backed by an `Atlas` and a flat buffer.
#[derive(Clone, Debug)]
pub struct Section<V, S: Storage<V> = VecStorage<V>> {
    atlas: Atlas,
    data: S,
    _marker: std::marker::PhantomData<V>,
}

impl<V, S> Section<V, S>
where
    V: Clone + Default,
    S: Storage<V>,
{
    /// Construct a section over `atlas`, zero-initialized with `V::default()`.
    pub fn new(atlas: Atlas) -> Self {
        let data = S::with_len(atlas.total_len(), V::default());
        Self {
            atlas,
            data,
            _marker: std::marker::PhantomData,
        }
    }

    /// Overwrite the slice at point `p` with `val`.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` is not registered;
    /// `SliceLengthMismatch` if `val` has the wrong length.
    pub fn try_set(&mut self, p: PointId, val: &[V]) -> Result<(), MeshCoordsError> {
        let target = self.try_restrict_mut(p)?;
        if target.len() != val.len() {
            return Err(MeshCoordsError::SliceLengthMismatch {
                point: p,
                expected: target.len(),
                found: val.len(),
            });
        }
        target.clone_from_slice(val);
        Ok(())
    }
}

impl<V, S: Storage<V>> Section<V, S> {
    /// Read-only view of the data slice for point `p`.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` is not registered in the atlas.
    #[inline]
    pub fn try_restrict(&self, p: PointId) -> Result<&[V], MeshCoordsError> {
        let (offset, len) = self
            .atlas
            .get(p)
            .ok_or(MeshCoordsError::MissingAtlasPoint(p))?;
        Ok(&self.data.as_slice()[offset..offset + len])
    }

    /// Mutable view of the data slice for point `p`.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` is not registered in the atlas.
    #[inline]
    pub fn try_restrict_mut(&mut self, p: PointId) -> Result<&mut [V], MeshCoordsError> {
        let (offset, len) = self
            .atlas
            .get(p)
            .ok_or(MeshCoordsError::MissingAtlasPoint(p))?;
        Ok(&mut self.data.as_mut_slice()[offset..offset + len])
    }

    /// The layout this section is built over.
    #[inline]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Entire flat buffer, in atlas order.
    #[inline]
    pub fn values(&self) -> &[V] {
        self.data.as_slice()
    }

    /// Entire flat buffer, mutable.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [V] {
        self.data.as_mut_slice()
    }

    /// Iterate `(PointId, &[V])` in deterministic atlas order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &[V])> + '_ {
        self.atlas.iter_entries().map(move |(p, (offset, len))| {
            (p, &self.data.as_slice()[offset..offset + len])
        })
    }
}
