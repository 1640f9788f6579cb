//! Mesh: a topology joined with a coordinate field.
//!
//! The coordinate field is readable and mutable *in place* through the mesh;
//! it can never be rebound on an existing mesh. Wholesale replacement goes
//! through [`Mesh::from_field`], which builds a new mesh sharing storage
//! with the replacement field, so later mutations of the field move the new
//! mesh. See [`replace_coordinates`](Mesh::replace_coordinates) for the
//! rejection contract.

use std::sync::Arc;

use log::debug;

use crate::error::MeshCoordsError;
use crate::field::Field;
use crate::geometry;
use crate::space::ValueShape;
use crate::topology::mesh_topology::MeshTopology;
use crate::topology::point::PointId;

/// A mesh: shared topology plus a vector-valued coordinate field.
#[derive(Clone, Debug)]
pub struct Mesh {
    topology: Arc<MeshTopology>,
    coordinates: Field<f64>,
}

impl Mesh {
    /// Construct a mesh whose geometry is the given coordinate field.
    ///
    /// The mesh takes its topology from the field's function space and
    /// *aliases* the field's storage: mutating `field` afterwards moves the
    /// mesh. The field's space may differ from the one a previous mesh used
    /// (e.g. a higher-order layout); only the value shape and vertex
    /// coverage are constrained.
    ///
    /// # Errors
    /// - `ScalarCoordinates` if the field is not vector-valued.
    /// - `VertexNotCovered` if some vertex carries no dofs in the field's
    ///   space.
    pub fn from_field(field: &Field<f64>) -> Result<Self, MeshCoordsError> {
        let space = field.space();
        let ValueShape::Vector(gdim) = space.shape() else {
            return Err(MeshCoordsError::ScalarCoordinates);
        };
        let topology = Arc::clone(space.topology());
        for &vertex in topology.vertices() {
            if !space.supports_point(vertex) {
                return Err(MeshCoordsError::VertexNotCovered(vertex));
            }
        }
        debug!(
            "mesh constructed from field {:?}: gdim {gdim}, {} coordinate nodes",
            field.name(),
            space.node_count()
        );
        Ok(Self {
            topology,
            coordinates: field.clone(),
        })
    }

    /// The shared topology.
    #[inline]
    pub fn topology(&self) -> &Arc<MeshTopology> {
        &self.topology
    }

    /// Dimension of the space the mesh is embedded in, taken from the
    /// coordinate field's value shape.
    #[inline]
    pub fn geometric_dimension(&self) -> usize {
        self.coordinates.space().shape().components()
    }

    /// The coordinate field. Read positions through it, or mutate them in
    /// place to move the mesh; mutations are visible to every handle that
    /// shares the storage.
    #[inline]
    pub fn coordinates(&self) -> &Field<f64> {
        &self.coordinates
    }

    /// Rebinding the coordinate field on an existing mesh is rejected.
    ///
    /// Always returns `Err(CoordinateReassignment)` and never mutates; the
    /// sanctioned path for wholesale replacement is [`Mesh::from_field`].
    pub fn replace_coordinates(
        &mut self,
        _replacement: &Field<f64>,
    ) -> Result<(), MeshCoordsError> {
        Err(MeshCoordsError::CoordinateReassignment)
    }

    /// Move a single dof-carrying point to a new position.
    pub fn try_move_point(
        &self,
        p: PointId,
        position: &[f64],
    ) -> Result<(), MeshCoordsError> {
        self.coordinates.try_set_point(p, position)
    }

    /// Move the whole mesh by adding `displacement` to the coordinates.
    ///
    /// The displacement field must have the same atlas layout as the
    /// coordinate field (same points, same spans).
    ///
    /// # Errors
    /// `TopologyMismatch` if the layouts differ.
    pub fn try_displace(&self, displacement: &Field<f64>) -> Result<(), MeshCoordsError> {
        // Snapshot first: the displacement may alias the coordinate storage,
        // and the write lock below is not reentrant.
        let (delta, delta_atlas) =
            displacement.with_values(|s| (s.values().to_vec(), s.atlas().clone()));
        self.coordinates.with_values_mut(|coords| {
            if *coords.atlas() != delta_atlas {
                return Err(MeshCoordsError::TopologyMismatch(
                    "displacement layout differs from coordinate layout".into(),
                ));
            }
            for (c, d) in coords.values_mut().iter_mut().zip(delta.iter()) {
                *c += d;
            }
            Ok(())
        })
    }

    /// Component-wise extent of all coordinate nodes: `(min, max)`.
    pub fn bounding_box(&self) -> Result<(Vec<f64>, Vec<f64>), MeshCoordsError> {
        let gdim = self.geometric_dimension();
        self.coordinates
            .with_values(|s| geometry::bounding_box(s.values(), gdim))
    }

    /// Mean position of the vertices in the closure of `cell`.
    pub fn cell_centroid(&self, cell: PointId) -> Result<Vec<f64>, MeshCoordsError> {
        let gdim = self.geometric_dimension();
        let vertices = self.topology.cell_vertices(cell);
        if vertices.is_empty() {
            return Err(MeshCoordsError::InvalidGeometry(format!(
                "point {cell} has no vertices in its closure"
            )));
        }
        self.coordinates.with_values(|s| {
            let mut nodes = Vec::with_capacity(vertices.len() * gdim);
            for &v in &vertices {
                let slice = s.try_restrict(v)?;
                // A vertex may carry several nodes in higher-order layouts;
                // all of them enter the average.
                nodes.extend_from_slice(slice);
            }
            geometry::centroid(&nodes, gdim)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{DofLayout, FunctionSpace};
    use crate::topology::sieve::{InMemorySieve, Sieve};

    fn v(i: u64) -> PointId {
        PointId::new(i).unwrap()
    }

    fn segment_topology() -> Arc<MeshTopology> {
        let mut s = InMemorySieve::default();
        s.add_arrow(v(10), v(1), ());
        s.add_arrow(v(10), v(2), ());
        MeshTopology::try_from_sieve(s, 1).unwrap()
    }

    fn coordinate_field(topo: Arc<MeshTopology>) -> Field<f64> {
        let space = Arc::new(
            FunctionSpace::try_new(topo, DofLayout::vertices(1), ValueShape::Vector(1)).unwrap(),
        );
        let field = Field::new(space).with_name("coordinates");
        field.try_set_point(v(1), &[0.0]).unwrap();
        field.try_set_point(v(2), &[2.0]).unwrap();
        field
    }

    #[test]
    fn from_field_shares_storage() {
        let field = coordinate_field(segment_topology());
        let mesh = Mesh::from_field(&field).unwrap();
        assert!(mesh.coordinates().shares_storage_with(&field));
        assert_eq!(mesh.geometric_dimension(), 1);

        field.try_set_point(v(2), &[3.0]).unwrap();
        assert_eq!(
            mesh.coordinates().try_get_point(v(2)).unwrap(),
            vec![3.0]
        );
    }

    #[test]
    fn scalar_field_rejected() {
        let topo = segment_topology();
        let space = Arc::new(
            FunctionSpace::try_new(topo, DofLayout::vertices(1), ValueShape::Scalar).unwrap(),
        );
        let field = Field::new(space);
        assert!(matches!(
            Mesh::from_field(&field),
            Err(MeshCoordsError::ScalarCoordinates)
        ));
    }

    #[test]
    fn replace_coordinates_always_rejected() {
        let field = coordinate_field(segment_topology());
        let mut mesh = Mesh::from_field(&field).unwrap();
        let replacement = field.deep_copy();
        let before = mesh.coordinates().try_get_point(v(1)).unwrap();
        assert_eq!(
            mesh.replace_coordinates(&replacement).unwrap_err(),
            MeshCoordsError::CoordinateReassignment
        );
        // The mesh is untouched and still aliases the original field.
        assert_eq!(mesh.coordinates().try_get_point(v(1)).unwrap(), before);
        assert!(mesh.coordinates().shares_storage_with(&field));
    }

    #[test]
    fn displace_moves_every_vertex() {
        let field = coordinate_field(segment_topology());
        let mesh = Mesh::from_field(&field).unwrap();
        let displacement = field.deep_copy();
        displacement.try_set_point(v(1), &[0.5]).unwrap();
        displacement.try_set_point(v(2), &[0.5]).unwrap();
        mesh.try_displace(&displacement).unwrap();
        assert_eq!(mesh.coordinates().try_get_point(v(1)).unwrap(), vec![0.5]);
        assert_eq!(mesh.coordinates().try_get_point(v(2)).unwrap(), vec![2.5]);
    }

    #[test]
    fn self_displacement_doubles_coordinates() {
        let field = coordinate_field(segment_topology());
        let mesh = Mesh::from_field(&field).unwrap();
        // Aliasing displacement: must not deadlock.
        mesh.try_displace(&field).unwrap();
        assert_eq!(mesh.coordinates().try_get_point(v(2)).unwrap(), vec![4.0]);
    }

    #[test]
    fn bounding_box_and_centroid() {
        let field = coordinate_field(segment_topology());
        let mesh = Mesh::from_field(&field).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, vec![0.0]);
        assert_eq!(max, vec![2.0]);
        assert_eq!(mesh.cell_centroid(v(10)).unwrap(), vec![1.0]);
    }
}
