use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3, Vec4};

use graphics_mesh::{AttributeLocation, Mesh, MeshDescriptor, Primitive, RecordingBackend};

fn build_mesh(backend: &Rc<RecordingBackend>, buffers: u32, interleaved: bool) -> Mesh {
    let mut mesh = Mesh::new(
        backend.clone(),
        MeshDescriptor::new(Primitive::Triangles, 3 * 1024),
    );
    let mut location = 0;
    for _ in 0..buffers {
        let buffer = mesh.add_buffer(interleaved).unwrap();
        mesh.bind_attribute::<Vec3>(buffer, AttributeLocation::new(location))
            .unwrap();
        mesh.bind_attribute::<Vec3>(buffer, AttributeLocation::new(location + 1))
            .unwrap();
        mesh.bind_attribute::<Vec2>(buffer, AttributeLocation::new(location + 2))
            .unwrap();
        mesh.bind_attribute::<Vec4>(buffer, AttributeLocation::new(location + 3))
            .unwrap();
        location += 4;
    }
    mesh
}

// ---------------------------------------------------------------------------
// Finalize
// ---------------------------------------------------------------------------

fn bench_finalize_interleaved(c: &mut Criterion) {
    let backend = Rc::new(RecordingBackend::new());
    c.bench_function("mesh_finalize_4_interleaved_buffers", |b| {
        b.iter_with_setup(
            || build_mesh(&backend, 4, true),
            |mut mesh| {
                mesh.finalize();
                black_box(&mesh);
            },
        );
    });
}

fn bench_finalize_separate(c: &mut Criterion) {
    let backend = Rc::new(RecordingBackend::new());
    c.bench_function("mesh_finalize_4_separate_buffers", |b| {
        b.iter_with_setup(
            || build_mesh(&backend, 4, false),
            |mut mesh| {
                mesh.finalize();
                black_box(&mesh);
            },
        );
    });
}

// ---------------------------------------------------------------------------
// Draw submission
// ---------------------------------------------------------------------------

fn bench_draw(c: &mut Criterion) {
    let backend = Rc::new(RecordingBackend::new());
    let mut mesh = build_mesh(&backend, 4, true);
    mesh.finalize();
    c.bench_function("mesh_draw_16_attributes", |b| {
        b.iter(|| {
            mesh.draw(backend.as_ref()).unwrap();
            black_box(backend.take_commands());
        });
    });
}

criterion_group!(
    benches,
    bench_finalize_interleaved,
    bench_finalize_separate,
    bench_draw
);
criterion_main!(benches);
