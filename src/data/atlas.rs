//! Atlas: mapping mesh points to contiguous slices in a flat dof buffer.
//!
//! The `Atlas` provides a bijective mapping between topological points
//! (`PointId`) and sub-slices of a flat data buffer, packing per-point
//! degrees of freedom contiguously for storage and iteration.

use std::collections::HashMap;

use crate::data::debug_invariants::DebugInvariants;
use crate::error::MeshCoordsError;
use crate::topology::point::PointId;

/// Point-to-slice layout for a flat dof buffer.
///
/// # Invariants
/// - Each point appears exactly once in `order`, and `map` contains exactly
///   the keys listed in `order`.
/// - Every slice has `len > 0` and `offset + len` fits in `usize`.
/// - Offsets are contiguous in insertion order and `total_len` equals the
///   sum of all lengths.
///
/// Checked after mutations in debug builds; can be verified manually via
/// [`validate_invariants`](DebugInvariants::validate_invariants).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Atlas {
    /// Slice descriptor per point: (starting offset, length).
    map: HashMap<PointId, (usize, usize)>,
    /// Insertion order of points for deterministic iteration.
    order: Vec<PointId>,
    /// Total length of all slices; also the next free offset.
    total_len: usize,
    /// Monotonic version bumped on structural modification.
    version: u64,
}

impl Atlas {
    /// Insert a brand-new point `p` with a slice of length `len`, returning
    /// the starting offset of its slice.
    ///
    /// # Errors
    /// `ZeroLengthSlice` if `len == 0`; `DuplicatePoint(p)` if `p` is
    /// already present.
    pub fn try_insert(&mut self, p: PointId, len: usize) -> Result<usize, MeshCoordsError> {
        if len == 0 {
            return Err(MeshCoordsError::ZeroLengthSlice);
        }
        if self.map.contains_key(&p) {
            return Err(MeshCoordsError::DuplicatePoint(p));
        }
        let offset = self.total_len;
        self.map.insert(p, (offset, len));
        self.order.push(p);
        self.total_len += len;
        self.version = self.version.wrapping_add(1);
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
        Ok(offset)
    }

    /// Slice descriptor `(offset, len)` for `p`, if registered.
    #[inline]
    pub fn get(&self, p: PointId) -> Option<(usize, usize)> {
        self.map.get(&p).copied()
    }

    /// Whether `p` is registered in the atlas.
    #[inline]
    pub fn contains(&self, p: PointId) -> bool {
        self.map.contains_key(&p)
    }

    /// Number of registered points (not dofs; see [`total_len`](Self::total_len)).
    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.order.len(), self.map.len());
        self.order.len()
    }

    /// Whether the atlas has zero points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total length of all registered slices; the size of the flat buffer.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Monotonic version, bumped whenever the structure changes.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Registered points in insertion (deterministic) order.
    #[inline]
    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.order.iter().copied()
    }

    /// `(PointId, (offset, len))` entries in insertion order.
    pub fn iter_entries(&self) -> impl Iterator<Item = (PointId, (usize, usize))> + '_ {
        self.order.iter().map(move |&p| (p, self.map[&p]))
    }
}

impl PartialEq for Atlas {
    /// Layout equality: same points in the same order with the same spans.
    /// The version counter is bookkeeping, not layout.
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.total_len == other.total_len
            && self
                .order
                .iter()
                .all(|p| self.map.get(p) == other.map.get(p))
    }
}

impl DebugInvariants for Atlas {
    fn debug_assert_invariants(&self) {
        crate::debug_assert_ok!(self.validate_invariants(), "Atlas invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshCoordsError> {
        use std::collections::HashSet;

        let set: HashSet<_> = self.order.iter().copied().collect();
        if set.len() != self.order.len() {
            let mut seen = HashSet::new();
            let dup = self
                .order
                .iter()
                .copied()
                .find(|p| !seen.insert(*p))
                .expect("duplicate exists when set is smaller than order");
            return Err(MeshCoordsError::DuplicatePoint(dup));
        }

        if let Some(&p) = self.order.iter().find(|&&p| !self.map.contains_key(&p)) {
            return Err(MeshCoordsError::MissingAtlasPoint(p));
        }
        if let Some(&p) = self.map.keys().find(|p| !set.contains(p)) {
            return Err(MeshCoordsError::DuplicatePoint(p));
        }

        let mut expected_off = 0usize;
        let mut sum = 0usize;
        for &p in &self.order {
            let (off, len) = self.map[&p];
            if len == 0 {
                return Err(MeshCoordsError::ZeroLengthSlice);
            }
            if off != expected_off {
                return Err(MeshCoordsError::StorageChunkMismatch { offset: off, len });
            }
            expected_off = off
                .checked_add(len)
                .ok_or(MeshCoordsError::StorageChunkMismatch { offset: off, len })?;
            sum += len;
        }
        if sum != self.total_len {
            return Err(MeshCoordsError::StorageLengthMismatch {
                expected: sum,
                found: self.total_len,
            });
        }
        Ok(())
    }
}
