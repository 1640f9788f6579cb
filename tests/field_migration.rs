use std::sync::Arc;

use mesh_coords::error::MeshCoordsError;
use mesh_coords::field::Field;
use mesh_coords::generation::interval_mesh;
use mesh_coords::mesh::Mesh;
use mesh_coords::migrate::{migrate_field, migrate_field_copied};
use mesh_coords::space::{DofLayout, FunctionSpace, ValueShape};
use mesh_coords::topology::point::PointId;

fn pid(id: u64) -> PointId {
    PointId::new(id).unwrap()
}

/// A scalar field on the mesh's vertices, seeded with recognizable values.
fn temperature_on(mesh: &Mesh) -> Field<f64> {
    let space = Arc::new(
        FunctionSpace::try_new(
            Arc::clone(mesh.topology()),
            DofLayout::vertices(1),
            ValueShape::Scalar,
        )
        .unwrap(),
    );
    let field = Field::new(space).with_name("temperature");
    for (i, &v) in mesh.topology().vertices().iter().enumerate() {
        field.try_set_point(v, &[i as f64 * 10.0]).unwrap();
    }
    field
}

#[test]
fn migration_onto_a_moved_mesh_shares_values() {
    let mesh = interval_mesh(3, 1.0).unwrap();
    let temperature = temperature_on(&mesh);

    // Replace the geometry wholesale: new mesh from a stretched field.
    let stretched = mesh.coordinates().deep_copy();
    stretched.map_values_mut(|x| *x *= 2.0);
    let moved = Mesh::from_field(&stretched).unwrap();

    let migrated = migrate_field(&temperature, &moved).unwrap();
    assert!(migrated.shares_storage_with(&temperature));
    assert_eq!(migrated.name(), Some("temperature"));
    assert!(Arc::ptr_eq(migrated.space().topology(), moved.topology()));

    // Values read back identically, and writes flow both ways.
    assert_eq!(migrated.try_get_point(pid(2)).unwrap(), vec![10.0]);
    migrated.try_set_point(pid(2), &[42.0]).unwrap();
    assert_eq!(temperature.try_get_point(pid(2)).unwrap(), vec![42.0]);
}

#[test]
fn migration_across_structurally_identical_topologies() {
    // Two independent generator runs produce distinct Arcs with the same
    // points and arrows.
    let a = interval_mesh(3, 1.0).unwrap();
    let b = interval_mesh(3, 4.0).unwrap();
    assert!(!Arc::ptr_eq(a.topology(), b.topology()));

    let temperature = temperature_on(&a);
    let migrated = migrate_field(&temperature, &b).unwrap();
    assert!(migrated.shares_storage_with(&temperature));
    assert!(Arc::ptr_eq(migrated.space().topology(), b.topology()));
    assert_eq!(migrated.try_get_point(pid(4)).unwrap(), vec![30.0]);
}

#[test]
fn migration_across_different_topologies_fails() {
    let a = interval_mesh(3, 1.0).unwrap();
    let b = interval_mesh(4, 1.0).unwrap();
    let temperature = temperature_on(&a);
    assert!(matches!(
        migrate_field(&temperature, &b),
        Err(MeshCoordsError::TopologyMismatch(_))
    ));
}

#[test]
fn copied_migration_detaches_the_values() {
    let mesh = interval_mesh(2, 1.0).unwrap();
    let temperature = temperature_on(&mesh);

    let moved = Mesh::from_field(&mesh.coordinates().deep_copy()).unwrap();
    let copied = migrate_field_copied(&temperature, &moved).unwrap();
    assert!(!copied.shares_storage_with(&temperature));

    copied.try_set_point(pid(1), &[-1.0]).unwrap();
    assert_eq!(temperature.try_get_point(pid(1)).unwrap(), vec![0.0]);
}

#[test]
fn coordinate_fields_migrate_too() {
    // The old mesh's own coordinates can be re-anchored to the new mesh.
    let mesh = interval_mesh(2, 1.0).unwrap();
    let moved = Mesh::from_field(&mesh.coordinates().deep_copy()).unwrap();
    let migrated = migrate_field(mesh.coordinates(), &moved).unwrap();
    assert!(migrated.shares_storage_with(mesh.coordinates()));
    assert_eq!(migrated.try_get_point(pid(3)).unwrap(), vec![1.0]);
}
