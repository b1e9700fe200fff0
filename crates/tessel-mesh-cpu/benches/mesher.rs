use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tessel_blocks::BlockRegistry;
use tessel_chunk::{Face, Neighborhood, VoxelGrid, WorldPos};
use tessel_lighting::{DEFAULT_FALLOFF, compute_light};
use tessel_mesh_cpu::{build_chunk_mesh, reduce_collider};
use tessel_world::{TerrainGenerator, WorldConfig};

fn terrain_neighborhood(reg: &BlockRegistry) -> Neighborhood {
    let cfg = WorldConfig::default();
    let terrain = TerrainGenerator::from_config(&cfg, reg).unwrap();
    let at = |x: i32, y: i32, z: i32| {
        let origin = WorldPos::new(x, y, z);
        let mut grid = terrain.generate(origin);
        terrain.place_structures(origin, &mut grid);
        Arc::new(grid)
    };
    let mut nb = Neighborhood::isolated(at(0, 32, 0));
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        nb = nb.with_neighbor(face, at(dx * 16, 32 + dy * 16, dz * 16));
    }
    nb
}

fn bench_mesh_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_terrain");
    let reg = BlockRegistry::builtin().unwrap();
    let nb = terrain_neighborhood(&reg);
    let light = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    group.bench_function("build_chunk_mesh", |b| {
        b.iter(|| black_box(build_chunk_mesh(&nb, &reg, Some(&light))))
    });
    group.bench_function("reduce_collider", |b| {
        b.iter(|| black_box(reduce_collider(&nb, &reg)))
    });
    group.bench_function("compute_light", |b| {
        b.iter(|| black_box(compute_light(&nb, &reg, DEFAULT_FALLOFF)))
    });
    group.finish();
}

fn bench_mesh_checker(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_checker");
    let reg = BlockRegistry::builtin().unwrap();
    let stone = reg.block("stone");
    let mut grid = VoxelGrid::default();
    for y in 0..16 {
        for z in 0..16 {
            for x in 0..16 {
                if (x + y + z) % 2 == 0 {
                    grid.set(x, y, z, stone);
                }
            }
        }
    }
    let nb = Neighborhood::isolated(Arc::new(grid));
    group.bench_function("worst_case_faces", |b| {
        b.iter(|| black_box(build_chunk_mesh(&nb, &reg, None)))
    });
    group.finish();
}

criterion_group!(benches, bench_mesh_terrain, bench_mesh_checker);
criterion_main!(benches);
