//! Structured mesh generators.
//!
//! Generators build a validated topology plus a vertex coordinate field and
//! return the assembled [`Mesh`]. Point numbering is deterministic: vertices
//! first (row-major where applicable), then cells.

use std::sync::Arc;

use itertools::iproduct;
use log::debug;

use crate::error::MeshCoordsError;
use crate::field::Field;
use crate::mesh::Mesh;
use crate::space::{DofLayout, FunctionSpace, ValueShape};
use crate::topology::mesh_topology::MeshTopology;
use crate::topology::point::PointId;
use crate::topology::sieve::{InMemorySieve, Sieve};

fn invalid_geometry(message: impl Into<String>) -> MeshCoordsError {
    MeshCoordsError::InvalidGeometry(message.into())
}

fn assemble(
    dimension: usize,
    vertex_coords: &[Vec<f64>],
    cells: &[Vec<usize>],
) -> Result<Mesh, MeshCoordsError> {
    let mut sieve = InMemorySieve::<PointId, ()>::default();
    let mut next_id = 1u64;

    let mut vertex_points = Vec::with_capacity(vertex_coords.len());
    for _ in 0..vertex_coords.len() {
        let pid = PointId::new(next_id)?;
        next_id += 1;
        sieve.add_point(pid);
        vertex_points.push(pid);
    }

    for (cell_idx, vertices) in cells.iter().enumerate() {
        let cell_point = PointId::new(next_id)?;
        next_id += 1;
        for &vidx in vertices {
            let vpoint = *vertex_points.get(vidx).ok_or_else(|| {
                invalid_geometry(format!("cell {cell_idx} references missing vertex {vidx}"))
            })?;
            sieve.add_arrow(cell_point, vpoint, ());
        }
    }

    let topology = MeshTopology::try_from_sieve(sieve, dimension)?;
    let space = Arc::new(FunctionSpace::try_new(
        topology,
        DofLayout::vertices(1),
        ValueShape::Vector(dimension),
    )?);
    let field = Field::new(space).with_name("coordinates");
    field.try_update_points(
        vertex_points
            .iter()
            .zip(vertex_coords.iter())
            .map(|(&p, coord)| (p, coord.clone())),
    )?;
    Mesh::from_field(&field)
}

/// Uniform 1D mesh of `cells` segments over `[0, length]`.
///
/// # Errors
/// `InvalidGeometry` if `cells == 0` or `length` is not a positive finite
/// number.
pub fn interval_mesh(cells: usize, length: f64) -> Result<Mesh, MeshCoordsError> {
    if cells == 0 {
        return Err(invalid_geometry("interval mesh needs at least one cell"));
    }
    if !(length.is_finite() && length > 0.0) {
        return Err(invalid_geometry(format!(
            "interval length must be positive and finite, got {length}"
        )));
    }
    let step = length / cells as f64;
    let vertex_coords: Vec<Vec<f64>> = (0..=cells).map(|i| vec![i as f64 * step]).collect();
    let cell_vertices: Vec<Vec<usize>> = (0..cells).map(|i| vec![i, i + 1]).collect();
    let mesh = assemble(1, &vertex_coords, &cell_vertices)?;
    debug!("generated interval mesh: {cells} cells over [0, {length}]");
    Ok(mesh)
}

/// Structured quadrilateral mesh of the unit square with `nx * ny` cells.
///
/// Vertices are numbered row-major from the origin; each cell's cone lists
/// its corners counter-clockwise.
///
/// # Errors
/// `InvalidGeometry` if `nx == 0` or `ny == 0`.
pub fn unit_square_mesh(nx: usize, ny: usize) -> Result<Mesh, MeshCoordsError> {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry(
            "unit square mesh needs at least one cell per direction",
        ));
    }
    let vertex_coords: Vec<Vec<f64>> = iproduct!(0..=ny, 0..=nx)
        .map(|(j, i)| vec![i as f64 / nx as f64, j as f64 / ny as f64])
        .collect();
    let stride = nx + 1;
    let cell_vertices: Vec<Vec<usize>> = iproduct!(0..ny, 0..nx)
        .map(|(j, i)| {
            let sw = j * stride + i;
            vec![sw, sw + 1, sw + stride + 1, sw + stride]
        })
        .collect();
    let mesh = assemble(2, &vertex_coords, &cell_vertices)?;
    debug!("generated unit square mesh: {nx}x{ny} quadrilaterals");
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_mesh_counts_and_extent() {
        let mesh = interval_mesh(4, 2.0).unwrap();
        assert_eq!(mesh.topology().vertices().len(), 5);
        assert_eq!(mesh.topology().cells().len(), 4);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, vec![0.0]);
        assert_eq!(max, vec![2.0]);
    }

    #[test]
    fn zero_cells_rejected() {
        assert!(matches!(
            interval_mesh(0, 1.0),
            Err(MeshCoordsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            unit_square_mesh(0, 3),
            Err(MeshCoordsError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn non_finite_length_rejected() {
        assert!(matches!(
            interval_mesh(2, f64::NAN),
            Err(MeshCoordsError::InvalidGeometry(_))
        ));
        assert!(matches!(
            interval_mesh(2, -1.0),
            Err(MeshCoordsError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn unit_square_counts_and_centroid() {
        let mesh = unit_square_mesh(2, 2).unwrap();
        assert_eq!(mesh.topology().vertices().len(), 9);
        assert_eq!(mesh.topology().cells().len(), 4);
        assert_eq!(mesh.geometric_dimension(), 2);

        let first_cell = mesh.topology().cells()[0];
        let centroid = mesh.cell_centroid(first_cell).unwrap();
        assert_eq!(centroid.len(), 2);
        // Every quadrant centroid sits strictly inside the unit square.
        assert!(centroid.iter().all(|&c| c > 0.0 && c < 1.0));
    }

    #[test]
    fn unit_square_bounding_box_is_unit() {
        let mesh = unit_square_mesh(3, 1).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, vec![0.0, 0.0]);
        assert_eq!(max, vec![1.0, 1.0]);
    }
}
