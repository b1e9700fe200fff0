mod config;
mod logging;
mod stats;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::unbounded;
use tessel_blocks::BlockRegistry;
use tessel_chunk::{CHUNK_SIZE, ColumnPos, DrawingState};
use tessel_grid::Grid;
use tessel_runtime::{ChunkStreamer, JobContext, ObserverEvent};
use tessel_world::{ChunkStore, MemoryChunkStore, TerrainGenerator};

use crate::config::TesselConfig;
use crate::stats::StatsSink;

#[derive(Parser, Debug)]
#[command(name = "tessel", about = "Headless voxel streaming pipeline")]
struct Args {
    /// TOML file with `[world]` and `[scheduler]` tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Block table replacing the built-in one
    #[arg(long)]
    blocks: Option<PathBuf>,
    #[arg(long)]
    seed: Option<i32>,
    #[arg(long)]
    draw_distance: Option<usize>,
    /// Frames to simulate
    #[arg(long, default_value_t = 400)]
    ticks: usize,
    /// Observer path, one chunk per letter: f(orward), b(ack), l(eft), r(ight)
    #[arg(long, default_value = "ffrrbl")]
    walk: String,
    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Also write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_walk(walk: &str) -> Result<Vec<ObserverEvent>, Box<dyn Error>> {
    let step = CHUNK_SIZE as f32;
    walk.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_lowercase() {
            'f' => Ok(ObserverEvent::Moved { dx: 0.0, dz: step }),
            'b' => Ok(ObserverEvent::Moved { dx: 0.0, dz: -step }),
            'l' => Ok(ObserverEvent::Moved { dx: -step, dz: 0.0 }),
            'r' => Ok(ObserverEvent::Moved { dx: step, dz: 0.0 }),
            other => Err(format!("unknown walk step '{other}', expected f/b/l/r").into()),
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let mut cfg = match &args.config {
        Some(p) => TesselConfig::load_from_path(p)?,
        None => TesselConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(dd) = args.draw_distance {
        cfg.world.draw_distance = dd;
    }
    cfg.validate()?;
    let walk = parse_walk(&args.walk)?;

    let reg = Arc::new(match &args.blocks {
        Some(p) => BlockRegistry::load_from_path(p)?,
        None => BlockRegistry::builtin()?,
    });
    let terrain = Arc::new(TerrainGenerator::from_config(&cfg.world, &reg)?);
    let grid = Arc::new(Grid::from_config(&cfg.world, ColumnPos::new(0, 0)));
    let store: Arc<dyn ChunkStore> = Arc::new(MemoryChunkStore::new());
    let ctx = Arc::new(JobContext::new(
        Arc::clone(&grid),
        reg,
        terrain,
        store,
        cfg.world.light_falloff,
    ));
    log::info!(
        "seed {} draw distance {} ({}x{} columns, {} chunks high)",
        cfg.world.seed,
        cfg.world.draw_distance,
        grid.dimension(),
        grid.dimension(),
        grid.chunks_vertically()
    );

    let (tx, rx) = unbounded();
    let mut streamer = ChunkStreamer::new(ctx, &cfg.scheduler, rx)?;
    streamer.bootstrap();

    let step_every = (args.ticks / (walk.len() + 1)).max(1);
    let mut steps = walk.into_iter();
    let mut sink = StatsSink::default();
    let t0 = Instant::now();
    for tick in 1..=args.ticks {
        if tick % step_every == 0 {
            if let Some(ev) = steps.next() {
                tx.send(ev)?;
            }
        }
        streamer.tick(&mut sink);
        thread::sleep(Duration::from_millis(args.tick_ms));
    }
    streamer.shutdown();

    let drawn = grid
        .columns()
        .iter()
        .filter(|c| c.state() == DrawingState::Drawn)
        .count();
    let (px, pz) = streamer.position();
    log::info!(
        "{} ticks in {:.2?}: observer at ({px:.0}, {pz:.0}), {drawn} columns drawn",
        args.ticks,
        t0.elapsed()
    );
    log::info!(
        "uploads {} (empty {}), vertices {}, triangles {} opaque / {} transparent, collider quads {}, released columns {}",
        sink.uploads,
        sink.empty_chunks,
        sink.vertices,
        sink.opaque_triangles,
        sink.transparent_triangles,
        sink.collider_quads,
        sink.released_columns
    );
    Ok(())
}
