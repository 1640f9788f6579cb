use criterion::{Criterion, criterion_group, criterion_main};

use mesh_coords::generation::unit_square_mesh;

fn bench_mesh_movement(c: &mut Criterion) {
    let mesh = unit_square_mesh(64, 64).expect("generate bench mesh");
    let displacement = mesh.coordinates().deep_copy();
    displacement.map_values_mut(|x| *x = 1e-6);

    c.bench_function("displace_64x64_square", |b| {
        b.iter(|| mesh.try_displace(&displacement).expect("displace"));
    });

    c.bench_function("scale_64x64_square_in_place", |b| {
        b.iter(|| mesh.coordinates().map_values_mut(|x| *x *= 1.000001));
    });
}

criterion_group!(benches, bench_mesh_movement);
criterion_main!(benches);
