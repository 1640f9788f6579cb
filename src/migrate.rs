//! Field migration between meshes that share a topology.
//!
//! Constructing a new mesh from a coordinate field leaves existing fields
//! anchored to the old mesh's geometry. Because both meshes share topology,
//! those fields can be re-anchored to the new mesh without touching their
//! values: the migrated field's space is rebuilt against the target mesh's
//! topology and the value buffer is shared (or copied on request).

use std::sync::Arc;

use log::debug;

use crate::error::MeshCoordsError;
use crate::field::Field;
use crate::mesh::Mesh;
use crate::space::FunctionSpace;

fn target_space<V: Clone + Default>(
    field: &Field<V>,
    target: &Mesh,
) -> Result<Arc<FunctionSpace>, MeshCoordsError> {
    let src_space = field.space();
    let src_topo = src_space.topology();
    let dst_topo = target.topology();

    if Arc::ptr_eq(src_topo, dst_topo) {
        return Ok(Arc::clone(src_space));
    }
    if !src_topo.same_shape(dst_topo) {
        return Err(MeshCoordsError::TopologyMismatch(
            "field and target mesh do not share a topology".into(),
        ));
    }
    let rebuilt = FunctionSpace::try_new(
        Arc::clone(dst_topo),
        src_space.layout().clone(),
        src_space.shape(),
    )?;
    // Identical strata and layout yield identical atlases; anything else
    // means the buffers cannot be reinterpreted on the target.
    if rebuilt.atlas() != src_space.atlas() {
        return Err(MeshCoordsError::TopologyMismatch(
            "rebuilt dof layout does not match the source field".into(),
        ));
    }
    Ok(Arc::new(rebuilt))
}

/// Re-anchor `field` onto `target`, sharing the value buffer.
///
/// The returned field aliases the source: mutations through either handle
/// are visible to both.
///
/// # Errors
/// `TopologyMismatch` unless the field's topology and the target mesh's
/// topology are the same `Arc` or structurally identical.
pub fn migrate_field<V: Clone + Default>(
    field: &Field<V>,
    target: &Mesh,
) -> Result<Field<V>, MeshCoordsError> {
    let space = target_space(field, target)?;
    debug!(
        "migrated field {:?} onto target mesh ({} dofs, shared values)",
        field.name(),
        space.dof_count()
    );
    Ok(Field::from_parts(
        space,
        Arc::clone(field.values_arc()),
        field.name().map(str::to_owned),
    ))
}

/// Re-anchor `field` onto `target` with a detached copy of the values.
pub fn migrate_field_copied<V: Clone + Default>(
    field: &Field<V>,
    target: &Mesh,
) -> Result<Field<V>, MeshCoordsError> {
    let migrated = migrate_field(field, target)?;
    Ok(migrated.deep_copy())
}
