use std::sync::{Arc, Mutex};

use tessel_chunk::{ChunkState, Column, ColumnPos, DrawingState, LocalPos};

use super::*;

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
}

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

impl JobSink for Recorder {
    fn pass_begin(&self) {
        self.log.lock().unwrap().push("begin".into());
    }

    fn add(&self, column: Arc<Column>, run_with_noise: bool) {
        let o = column.origin();
        self.log
            .lock()
            .unwrap()
            .push(format!("add {} {} {}", o.x, o.z, run_with_noise));
    }

    fn pass_end(&self) {
        self.log.lock().unwrap().push("end".into());
    }
}

fn assert_consistent(g: &Grid) {
    let o = g.origin();
    let d = g.dimension() as i32;
    for z in 0..d {
        for x in 0..d {
            let col = g.get_chunk_column(x, z).expect("in range");
            assert_eq!(col.slot(), (x, z));
            assert_eq!(col.origin(), o.offset_chunks(x, z));
            for (ly, c) in col.chunks().iter().enumerate() {
                assert_eq!(c.local(), LocalPos::new(x, ly as i32, z));
            }
        }
    }
}

#[test]
fn window_is_centered() {
    let g = Grid::new(2, 0, 64, ColumnPos::new(160, -32));
    assert_eq!(g.dimension(), 5);
    assert_eq!(g.chunks_vertically(), 4);
    assert_eq!(g.chunks_in_total(), 100);
    assert_eq!(g.origin(), ColumnPos::new(128, -64));
    assert_eq!(g.center(), ColumnPos::new(160, -32));
    assert_consistent(&g);
}

#[test]
fn get_chunk_out_of_range_is_none() {
    let g = Grid::new(1, -32, 32, ColumnPos::new(0, 0));
    assert!(g.get_chunk(LocalPos::new(1, 4, 1)).is_none());
    assert!(g.get_chunk(LocalPos::new(1, -1, 1)).is_none());
    assert!(g.get_chunk(LocalPos::new(3, 0, 1)).is_none());
    assert!(g.get_chunk_column(-1, 0).is_none());
    let c = g.get_chunk(LocalPos::new(1, 0, 1)).expect("chunk");
    assert_eq!(c.origin().y, -32);
}

#[test]
fn desired_excludes_outer_ring() {
    let g = Grid::new(2, 0, 16, ColumnPos::new(0, 0));
    let desired = g
        .columns()
        .iter()
        .filter(|c| c.desired_for_visualization())
        .count();
    assert_eq!(desired, 9);
    assert!(!g.get_chunk_column(0, 2).unwrap().desired_for_visualization());
    assert!(g.get_chunk_column(1, 2).unwrap().desired_for_visualization());
}

#[test]
fn shift_right_submits_edges_in_one_pass() {
    let g = Grid::new(1, 0, 16, ColumnPos::new(0, 0));
    let sink = Recorder::default();
    let out = g.shift(Direction::Right, &sink);
    assert_eq!(out.evicted.len(), 3);
    assert!(out.evicted.iter().all(|c| c.origin().x == -16));
    assert!(out.created.iter().all(|c| c.origin().x == 32));
    assert!(out.rebuilt.iter().all(|c| c.origin().x == 16));
    assert!(out.created.iter().all(|c| c.state() == DrawingState::InNoiseQueue));
    assert!(out.created[0].chunks()[0].state() == ChunkState::NoiseQueued);
    assert_eq!(
        sink.take(),
        vec![
            "begin",
            "add 16 -16 false",
            "add 32 -16 true",
            "add 16 0 false",
            "add 32 0 true",
            "add 16 16 false",
            "add 32 16 true",
            "end",
        ]
    );
    assert_consistent(&g);
    assert!(out.evicted.iter().all(|c| !g.is_resident(c)));
    assert!(out.created.iter().all(|c| g.is_resident(c)));
}

#[test]
fn shift_and_back_restores_positions() {
    for dir in Direction::ALL {
        let g = Grid::new(2, 0, 32, ColumnPos::new(48, 48));
        let before: Vec<_> = g.columns().iter().map(|c| c.origin()).collect();
        let survivors: Vec<_> = g.columns();
        let sink = Recorder::default();
        g.shift(dir, &sink);
        g.shift(dir.opposite(), &sink);
        let after: Vec<_> = g.columns().iter().map(|c| c.origin()).collect();
        assert_eq!(before, after, "{dir:?}");
        assert_consistent(&g);
        // the re-created trailing edge is fresh, the interior is preserved
        let preserved = survivors
            .iter()
            .zip(g.columns())
            .filter(|(a, b)| Arc::ptr_eq(a, b))
            .count();
        assert_eq!(preserved, 25 - 5, "{dir:?}");
    }
}

#[test]
fn neighborhood_matches_window() {
    let g = Grid::new(1, 0, 32, ColumnPos::new(0, 0));
    let center = g.get_chunk(LocalPos::new(1, 0, 1)).unwrap();
    let nb = g.neighborhood(&center);
    assert!(nb.neighbors.iter().filter(|n| n.is_some()).count() == 5);
    assert!(nb.neighbor(tessel_chunk::Face::Down).is_none());

    let corner = g.get_chunk(LocalPos::new(0, 1, 0)).unwrap();
    let nb = g.neighborhood(&corner);
    assert_eq!(nb.neighbors.iter().filter(|n| n.is_some()).count(), 3);
}

#[test]
fn draw_gate_needs_all_lateral_neighbors() {
    let g = Grid::new(1, 0, 16, ColumnPos::new(0, 0));
    let mid = g.get_chunk_column(1, 1).unwrap();
    mid.set_state(DrawingState::NoiseReady);
    assert!(!g.draw_eligible(&mid));
    for c in g.columns() {
        c.set_state(DrawingState::NoiseReady);
    }
    g.get_chunk_column(2, 1).unwrap().set_state(DrawingState::Drawn);
    assert!(g.draw_eligible(&mid));
    g.get_chunk_column(1, 0).unwrap().set_state(DrawingState::InNoiseQueue);
    assert!(!g.draw_eligible(&mid));
    // border columns lack a neighbour
    assert!(!g.draw_eligible(&g.get_chunk_column(0, 1).unwrap()));
}
