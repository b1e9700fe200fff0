//! Block ids, material table and registry crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType, UvRect};
pub use types::{Block, BlockId};
