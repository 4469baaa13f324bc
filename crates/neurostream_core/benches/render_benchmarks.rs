use criterion::{black_box, criterion_group, criterion_main, Criterion};
use neurostream_core::{GridStateStore, InstancedRenderer};
use neurostream_data::{CellCoordinate, CellState, CellType, CorticalLayer, GridConfig};

fn populated_store(width: u32, height: u32) -> GridStateStore {
    let mut store = GridStateStore::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let cell_type = if (x + y) % 5 == 0 {
                CellType::Inhibitory
            } else {
                CellType::Excitatory
            };
            store.set(
                CellState::new(CellCoordinate::new(x, y), cell_type, CorticalLayer::L5)
                    .with_activation(((x * y) % 10) as f64 / 10.0)
                    .with_firing((x + y) % 17 == 0),
            );
        }
    }
    store
}

fn bench_instance_update_full(c: &mut Criterion) {
    let store = populated_store(100, 100);
    let mut renderer = InstancedRenderer::new();
    renderer.establish(GridConfig::new(100, 100));

    c.bench_function("instance_update_100x100_full", |b| {
        b.iter(|| black_box(renderer.update(black_box(&store))))
    });
}

fn bench_instance_update_sparse(c: &mut Criterion) {
    let store = populated_store(20, 20);
    let mut renderer = InstancedRenderer::new();
    renderer.establish(GridConfig::new(100, 100));

    c.bench_function("instance_update_100x100_sparse", |b| {
        b.iter(|| black_box(renderer.update(black_box(&store))))
    });
}

criterion_group!(
    benches,
    bench_instance_update_full,
    bench_instance_update_sparse
);
criterion_main!(benches);
