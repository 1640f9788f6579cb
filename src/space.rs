//! Function spaces: dof layouts over topological strata.
//!
//! A [`FunctionSpace`] binds a shared [`MeshTopology`] to a [`DofLayout`]
//! (how many dof nodes live on each depth stratum) and a [`ValueShape`]
//! (how many components each node carries), and materializes the resulting
//! [`Atlas`]. Fields and coordinate fields are allocated against a space.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::data::atlas::Atlas;
use crate::error::MeshCoordsError;
use crate::topology::mesh_topology::MeshTopology;
use crate::topology::point::PointId;

/// Shape of the value attached to each dof node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ValueShape {
    /// One component per node.
    Scalar,
    /// `n` components per node (e.g. coordinates in `n`-dimensional space).
    Vector(usize),
}

impl ValueShape {
    /// Number of components per node.
    #[inline]
    pub fn components(&self) -> usize {
        match self {
            ValueShape::Scalar => 1,
            ValueShape::Vector(n) => *n,
        }
    }
}

/// Dof nodes per topological depth stratum.
///
/// A piecewise-linear layout puts one node on every vertex
/// (`DofLayout::vertices(1)`); a quadratic geometry layout adds nodes on
/// edges (`.with_depth(1, 1)`).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DofLayout {
    per_depth: BTreeMap<u32, usize>,
}

impl DofLayout {
    /// Layout with `count` nodes on each vertex and nothing elsewhere.
    pub fn vertices(count: usize) -> Self {
        Self::default().with_depth(0, count)
    }

    /// Add (or override) `count` nodes per point at depth `depth`.
    pub fn with_depth(mut self, depth: u32, count: usize) -> Self {
        self.per_depth.insert(depth, count);
        self
    }

    /// Nodes per point at `depth`; zero when the stratum carries none.
    pub fn nodes_at(&self, depth: u32) -> usize {
        self.per_depth.get(&depth).copied().unwrap_or(0)
    }

    /// `(depth, nodes)` entries in ascending depth order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.per_depth.iter().map(|(&d, &n)| (d, n))
    }

    fn has_nodes(&self) -> bool {
        self.per_depth.values().any(|&n| n > 0)
    }
}

/// A discretized function space over a shared mesh topology.
#[derive(Clone, Debug)]
pub struct FunctionSpace {
    topology: Arc<MeshTopology>,
    layout: DofLayout,
    shape: ValueShape,
    atlas: Atlas,
}

impl FunctionSpace {
    /// Build a space over `topology` with the given layout and value shape.
    ///
    /// The atlas is filled stratum by stratum in ascending depth, each
    /// stratum in ascending point order, so two spaces built from the same
    /// layout over topologies with identical strata get identical atlases.
    ///
    /// # Errors
    /// - `ZeroComponentShape` for `Vector(0)`.
    /// - `EmptyDofLayout` if the layout assigns no nodes, or only to strata
    ///   the topology does not have.
    pub fn try_new(
        topology: Arc<MeshTopology>,
        layout: DofLayout,
        shape: ValueShape,
    ) -> Result<Self, MeshCoordsError> {
        let components = shape.components();
        if components == 0 {
            return Err(MeshCoordsError::ZeroComponentShape);
        }
        if !layout.has_nodes() {
            return Err(MeshCoordsError::EmptyDofLayout);
        }
        let mut atlas = Atlas::default();
        for (depth, nodes) in layout.entries() {
            if nodes == 0 {
                continue;
            }
            for &p in topology.depth_stratum(depth) {
                atlas.try_insert(p, nodes * components)?;
            }
        }
        if atlas.is_empty() {
            return Err(MeshCoordsError::EmptyDofLayout);
        }
        debug!(
            "function space built: {} points, {} dofs, {} components/node",
            atlas.len(),
            atlas.total_len(),
            components
        );
        Ok(Self {
            topology,
            layout,
            shape,
            atlas,
        })
    }

    /// The topology this space is anchored to.
    #[inline]
    pub fn topology(&self) -> &Arc<MeshTopology> {
        &self.topology
    }

    /// The per-stratum node layout.
    #[inline]
    pub fn layout(&self) -> &DofLayout {
        &self.layout
    }

    /// The per-node value shape.
    #[inline]
    pub fn shape(&self) -> ValueShape {
        self.shape
    }

    /// The materialized point-to-span layout.
    #[inline]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Total number of scalar dofs.
    #[inline]
    pub fn dof_count(&self) -> usize {
        self.atlas.total_len()
    }

    /// Total number of dof nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.dof_count() / self.shape.components()
    }

    /// Whether `p` carries dofs in this space.
    #[inline]
    pub fn supports_point(&self, p: PointId) -> bool {
        self.atlas.contains(p)
    }

    /// Whether two spaces are anchored to the same topology, by `Arc`
    /// identity or structural equality.
    pub fn same_topology(&self, other: &FunctionSpace) -> bool {
        Arc::ptr_eq(&self.topology, &other.topology)
            || self.topology.same_shape(&other.topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::sieve::{InMemorySieve, Sieve};

    fn v(i: u64) -> PointId {
        PointId::new(i).unwrap()
    }

    fn segment_pair_topology() -> Arc<MeshTopology> {
        let mut s = InMemorySieve::default();
        s.add_arrow(v(10), v(1), ());
        s.add_arrow(v(10), v(2), ());
        s.add_arrow(v(11), v(2), ());
        s.add_arrow(v(11), v(3), ());
        MeshTopology::try_from_sieve(s, 1).unwrap()
    }

    #[test]
    fn vertex_space_counts() {
        let topo = segment_pair_topology();
        let space =
            FunctionSpace::try_new(topo, DofLayout::vertices(1), ValueShape::Vector(2)).unwrap();
        assert_eq!(space.node_count(), 3);
        assert_eq!(space.dof_count(), 6);
        assert!(space.supports_point(v(1)));
        assert!(!space.supports_point(v(10)));
    }

    #[test]
    fn layered_layout_covers_cells_too() {
        let topo = segment_pair_topology();
        let layout = DofLayout::vertices(1).with_depth(1, 1);
        let space = FunctionSpace::try_new(topo, layout, ValueShape::Scalar).unwrap();
        // 3 vertices + 2 cells, one scalar node each.
        assert_eq!(space.dof_count(), 5);
        assert!(space.supports_point(v(10)));
    }

    #[test]
    fn deterministic_atlas_order() {
        let topo = segment_pair_topology();
        let space =
            FunctionSpace::try_new(topo.clone(), DofLayout::vertices(1), ValueShape::Scalar)
                .unwrap();
        let points: Vec<_> = space.atlas().points().collect();
        assert_eq!(points, vec![v(1), v(2), v(3)]);

        let again =
            FunctionSpace::try_new(topo, DofLayout::vertices(1), ValueShape::Scalar).unwrap();
        assert_eq!(space.atlas(), again.atlas());
    }

    #[test]
    fn zero_component_shape_rejected() {
        let topo = segment_pair_topology();
        assert!(matches!(
            FunctionSpace::try_new(topo, DofLayout::vertices(1), ValueShape::Vector(0)),
            Err(MeshCoordsError::ZeroComponentShape)
        ));
    }

    #[test]
    fn empty_layout_rejected() {
        let topo = segment_pair_topology();
        assert!(matches!(
            FunctionSpace::try_new(topo.clone(), DofLayout::default(), ValueShape::Scalar),
            Err(MeshCoordsError::EmptyDofLayout)
        ));
        // A layout aimed at a stratum the topology lacks is also empty.
        let beyond = DofLayout::default().with_depth(7, 1);
        assert!(matches!(
            FunctionSpace::try_new(topo, beyond, ValueShape::Scalar),
            Err(MeshCoordsError::EmptyDofLayout)
        ));
    }

    #[test]
    fn same_topology_structural() {
        let a = segment_pair_topology();
        let b = segment_pair_topology();
        let sa = FunctionSpace::try_new(a, DofLayout::vertices(1), ValueShape::Scalar).unwrap();
        let sb = FunctionSpace::try_new(b, DofLayout::vertices(1), ValueShape::Scalar).unwrap();
        assert!(sa.same_topology(&sb));
    }
}
