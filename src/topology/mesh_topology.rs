//! Validated, immutable mesh topology shared by meshes and function spaces.
//!
//! A `MeshTopology` freezes an [`InMemorySieve`] after checking that the
//! incidence relation is a DAG with at least one vertex. Meshes and function
//! spaces hold it behind an `Arc`; two meshes "share topology" when they hold
//! the same `Arc` or structurally identical point sets and arrows.

use std::sync::Arc;

use log::debug;

use crate::error::MeshCoordsError;
use crate::topology::point::PointId;
use crate::topology::sieve::{InMemorySieve, Sieve};
use crate::topology::stratum::StrataCache;

/// Immutable mesh topology: a validated incidence DAG plus its dimension.
#[derive(Clone, Debug)]
pub struct MeshTopology {
    sieve: InMemorySieve<PointId, ()>,
    dimension: usize,
}

impl MeshTopology {
    /// Freeze `sieve` as a topology of the given topological dimension.
    ///
    /// Adjacency is sorted so traversal order is deterministic, and the
    /// strata are computed eagerly so cyclic input fails here rather than at
    /// first query.
    ///
    /// # Errors
    /// - `EmptyTopology` if the sieve has no points.
    /// - `CycleDetected` if the incidence relation is not a DAG.
    pub fn try_from_sieve(
        mut sieve: InMemorySieve<PointId, ()>,
        dimension: usize,
    ) -> Result<Arc<Self>, MeshCoordsError> {
        if sieve.point_count() == 0 {
            return Err(MeshCoordsError::EmptyTopology);
        }
        sieve.sort_adjacency();
        let cache = sieve.strata_cache()?;
        debug!(
            "mesh topology frozen: {} points, {} vertices, diameter {}",
            sieve.point_count(),
            cache.depth_stratum(0).len(),
            cache.diameter
        );
        Ok(Arc::new(Self { sieve, dimension }))
    }

    /// Topological dimension of the mesh cells.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of topological points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.sieve.point_count()
    }

    fn strata(&self) -> &StrataCache<PointId> {
        // Strata were computed during construction; the sieve is never
        // mutated afterwards, so the cache cannot have been invalidated.
        self.sieve
            .strata_cache()
            .expect("strata validated at construction")
    }

    /// Points at topological depth `d`, sorted ascending (depth 0 = vertices).
    pub fn depth_stratum(&self, d: u32) -> &[PointId] {
        self.strata().depth_stratum(d)
    }

    /// Vertices of the mesh (depth-0 stratum), sorted ascending.
    pub fn vertices(&self) -> &[PointId] {
        self.depth_stratum(0)
    }

    /// Cells of the mesh (maximal-depth stratum), sorted ascending.
    pub fn cells(&self) -> &[PointId] {
        self.depth_stratum(self.strata().diameter)
    }

    /// Maximum depth of the incidence DAG.
    pub fn max_depth(&self) -> u32 {
        self.strata().diameter
    }

    /// Outgoing incidence of `p` (e.g. a cell's vertices), without payloads.
    pub fn cone(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.sieve.cone(p).map(|(q, _)| q)
    }

    /// Incoming incidence of `p` (e.g. the cells touching a vertex).
    pub fn support(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.sieve.support(p).map(|(q, _)| q)
    }

    /// Transitive closure of `p` along cone arrows.
    pub fn closure(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.sieve.closure([p])
    }

    /// Vertices in the closure of `p`, sorted ascending.
    pub fn cell_vertices(&self, p: PointId) -> Vec<PointId> {
        let depth = &self.strata().depth;
        let mut vertices: Vec<_> = self
            .closure(p)
            .filter(|q| depth.get(q).copied() == Some(0))
            .collect();
        vertices.sort_unstable();
        vertices
    }

    /// Structural equality: same point set, same arrows, same dimension.
    ///
    /// Used for migration checks when two topologies are distinct `Arc`s but
    /// describe the same mesh.
    pub fn same_shape(&self, other: &Self) -> bool {
        if self.dimension != other.dimension {
            return false;
        }
        let mut mine: Vec<_> = self.sieve.points().collect();
        let mut theirs: Vec<_> = other.sieve.points().collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        if mine != theirs {
            return false;
        }
        // Adjacency was sorted at construction, so cones compare directly.
        mine.iter().all(|&p| {
            let a: Vec<_> = self.cone(p).collect();
            let b: Vec<_> = other.cone(p).collect();
            a == b
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u64) -> PointId {
        PointId::new(i).unwrap()
    }

    fn two_segment_sieve() -> InMemorySieve<PointId, ()> {
        let mut s = InMemorySieve::default();
        s.add_arrow(v(10), v(1), ());
        s.add_arrow(v(10), v(2), ());
        s.add_arrow(v(11), v(2), ());
        s.add_arrow(v(11), v(3), ());
        s
    }

    #[test]
    fn strata_queries() {
        let topo = MeshTopology::try_from_sieve(two_segment_sieve(), 1).unwrap();
        assert_eq!(topo.dimension(), 1);
        assert_eq!(topo.vertices(), &[v(1), v(2), v(3)]);
        assert_eq!(topo.cells(), &[v(10), v(11)]);
        assert_eq!(topo.cell_vertices(v(11)), vec![v(2), v(3)]);
    }

    #[test]
    fn empty_topology_rejected() {
        let s = InMemorySieve::<PointId, ()>::default();
        assert!(matches!(
            MeshTopology::try_from_sieve(s, 1),
            Err(MeshCoordsError::EmptyTopology)
        ));
    }

    #[test]
    fn cyclic_topology_rejected() {
        let mut s = InMemorySieve::<PointId, ()>::default();
        s.add_arrow(v(1), v(2), ());
        s.add_arrow(v(2), v(1), ());
        assert!(matches!(
            MeshTopology::try_from_sieve(s, 1),
            Err(MeshCoordsError::CycleDetected)
        ));
    }

    #[test]
    fn same_shape_across_distinct_arcs() {
        let a = MeshTopology::try_from_sieve(two_segment_sieve(), 1).unwrap();
        let b = MeshTopology::try_from_sieve(two_segment_sieve(), 1).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(a.same_shape(&b));
    }

    #[test]
    fn different_arrows_are_not_same_shape() {
        let a = MeshTopology::try_from_sieve(two_segment_sieve(), 1).unwrap();
        let mut s = two_segment_sieve();
        s.add_arrow(v(11), v(1), ());
        let b = MeshTopology::try_from_sieve(s, 1).unwrap();
        assert!(!a.same_shape(&b));
    }
}
