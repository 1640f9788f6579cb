//! Geometry queries over flat coordinate buffers.
//!
//! Helpers operate on a flat buffer of node positions laid out as
//! consecutive `components`-sized chunks, generic over the scalar type.

use num_traits::{Float, NumCast};

use crate::error::MeshCoordsError;

fn check_layout<T>(nodes: &[T], components: usize) -> Result<(), MeshCoordsError> {
    if components == 0 {
        return Err(MeshCoordsError::InvalidGeometry(
            "components must be non-zero".into(),
        ));
    }
    if nodes.is_empty() {
        return Err(MeshCoordsError::InvalidGeometry(
            "no coordinate nodes".into(),
        ));
    }
    if nodes.len() % components != 0 {
        return Err(MeshCoordsError::InvalidGeometry(format!(
            "buffer of {} scalars is not a multiple of {components} components",
            nodes.len()
        )));
    }
    Ok(())
}

/// Component-wise minimum and maximum over all node positions.
pub fn bounding_box<T: Float>(
    nodes: &[T],
    components: usize,
) -> Result<(Vec<T>, Vec<T>), MeshCoordsError> {
    check_layout(nodes, components)?;
    let mut min = nodes[..components].to_vec();
    let mut max = min.clone();
    for chunk in nodes.chunks_exact(components) {
        for (c, &x) in chunk.iter().enumerate() {
            min[c] = min[c].min(x);
            max[c] = max[c].max(x);
        }
    }
    Ok((min, max))
}

/// Component-wise mean of all node positions.
pub fn centroid<T: Float>(nodes: &[T], components: usize) -> Result<Vec<T>, MeshCoordsError> {
    check_layout(nodes, components)?;
    let count = nodes.len() / components;
    let denom: T = NumCast::from(count).ok_or_else(|| {
        MeshCoordsError::InvalidGeometry(format!("node count {count} not representable"))
    })?;
    let mut sum = vec![T::zero(); components];
    for chunk in nodes.chunks_exact(components) {
        for (c, &x) in chunk.iter().enumerate() {
            sum[c] = sum[c] + x;
        }
    }
    for s in &mut sum {
        *s = *s / denom;
    }
    Ok(sum)
}
