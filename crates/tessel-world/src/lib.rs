//! World configuration, terrain generation and the external services it
//! consumes (noise sampling, biome classification, chunk persistence).
#![forbid(unsafe_code)]

pub mod biome;
pub mod config;
pub mod noise;
pub mod store;
pub mod terrain;

pub use biome::{BiomeClassifier, BiomeDef, BiomeParams, BiomeTable};
pub use config::WorldConfig;
pub use noise::{FastNoiseSampler, NoiseSampler};
pub use store::{ChunkStore, LoadError, MemoryChunkStore, NullStore, load_or_generate};
pub use terrain::{ColumnProfile, TerrainGenerator};
