use std::sync::Arc;

use tessel_blocks::{Block, BlockRegistry};
use tessel_chunk::{CHUNK_SIZE, Face, Neighborhood, VoxelGrid};

use super::*;

fn registry() -> BlockRegistry {
    BlockRegistry::builtin().expect("builtin registry")
}

fn roof(reg: &BlockRegistry, y: usize) -> VoxelGrid {
    let mut g = VoxelGrid::default();
    for z in 0..CHUNK_SIZE {
        for x in 0..CHUNK_SIZE {
            g.set(x, y, z, reg.block("stone"));
        }
    }
    g
}

#[test]
fn open_sky_is_fully_lit() {
    let reg = registry();
    let nb = Neighborhood::isolated(Arc::new(VoxelGrid::default()));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    assert!(f.values().iter().all(|v| *v == SKY));
}

#[test]
fn closed_roof_blocks_everything_below() {
    let reg = registry();
    let nb = Neighborhood::isolated(Arc::new(roof(&reg, 8)));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    assert_eq!(f.get(3, 9, 3), SKY);
    assert_eq!(f.get(3, 8, 3), 0.0);
    assert_eq!(f.get(3, 2, 3), 0.0);
}

#[test]
fn light_spreads_under_a_hole() {
    let reg = registry();
    let mut g = roof(&reg, 8);
    g.set(5, 8, 5, Block::AIR);
    let nb = Neighborhood::isolated(Arc::new(g));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    assert_eq!(f.get(5, 0, 5), SKY);
    assert_eq!(f.get(6, 7, 5), SKY - DEFAULT_FALLOFF);
    assert_eq!(f.get(7, 7, 5), SKY - DEFAULT_FALLOFF - DEFAULT_FALLOFF);
    assert!(f.get(15, 7, 15) < f.get(7, 7, 5));
}

#[test]
fn transparent_layer_dims_the_ray() {
    let reg = registry();
    let mut g = VoxelGrid::default();
    for z in 0..CHUNK_SIZE {
        for x in 0..CHUNK_SIZE {
            g.set(x, 8, z, reg.block("leaves"));
        }
    }
    let nb = Neighborhood::isolated(Arc::new(g));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    let leaves = reg.transparency(reg.block("leaves"));
    let f1 = SKY - DEFAULT_FALLOFF;
    assert_eq!(f.get(3, 8, 3), f1);
    assert_eq!(f.get(3, 7, 3), f1 - DEFAULT_FALLOFF);
    assert_eq!(f.get(3, 6, 3), f1 - DEFAULT_FALLOFF - DEFAULT_FALLOFF);
    assert_eq!(f.get(3, 2, 3), leaves);
}

#[test]
fn chunk_above_shades_the_center() {
    let reg = registry();
    let nb = Neighborhood::isolated(Arc::new(VoxelGrid::default()))
        .with_neighbor(Face::Up, Arc::new(roof(&reg, 0)));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    assert!(f.values().iter().all(|v| *v == 0.0));
}

#[test]
fn lateral_neighbor_leaks_light_sideways() {
    let reg = registry();
    let roofed = Arc::new(roof(&reg, 15));
    let isolated = compute_light(&Neighborhood::isolated(Arc::clone(&roofed)), &reg, DEFAULT_FALLOFF);
    assert_eq!(isolated.get(15, 10, 4), 0.0);

    let nb = Neighborhood::isolated(roofed).with_neighbor(Face::Right, Arc::new(VoxelGrid::default()));
    let f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    assert_eq!(f.get(15, 10, 4), SKY - DEFAULT_FALLOFF);
    assert_eq!(f.get(14, 10, 4), SKY - DEFAULT_FALLOFF - DEFAULT_FALLOFF);
    assert_eq!(f.get(0, 10, 4), 0.0);
}

#[test]
fn relaxation_is_idempotent() {
    let reg = registry();
    let mut g = roof(&reg, 12);
    g.set(0, 12, 0, Block::AIR);
    g.set(9, 12, 3, reg.block("glass"));
    let nb = Neighborhood::isolated(Arc::new(g.clone()));
    let mut f = compute_light(&nb, &reg, DEFAULT_FALLOFF);
    let before = f.clone();
    assert_eq!(relax_all(&mut f, &g, &reg, DEFAULT_FALLOFF), 0);
    assert_eq!(f, before);
}
