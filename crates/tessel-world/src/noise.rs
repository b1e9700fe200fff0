use fastnoise_lite::{CellularReturnType, FastNoiseLite, FractalType, NoiseType};

/// Deterministic scalar field in roughly `[-1, 1]`.
pub trait NoiseSampler: Send + Sync {
    fn sample(&self, seed: i32, x: f32, y: f32, z: f32) -> f32;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Kind {
    SimplexFractal,
    Cellular,
}

/// `FastNoiseLite`-backed sampler. Frequency is fixed at 1 so callers pass
/// pre-scaled coordinates.
pub struct FastNoiseSampler {
    kind: Kind,
    seed: i32,
    noise: FastNoiseLite,
}

impl FastNoiseSampler {
    pub fn simplex_fractal(seed: i32) -> Self {
        Self::with_kind(Kind::SimplexFractal, seed)
    }

    /// Cell-value noise used for biome regions.
    pub fn cellular(seed: i32) -> Self {
        Self::with_kind(Kind::Cellular, seed)
    }

    fn with_kind(kind: Kind, seed: i32) -> Self {
        Self {
            kind,
            seed,
            noise: build(kind, seed),
        }
    }
}

fn build(kind: Kind, seed: i32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_frequency(Some(1.0));
    match kind {
        Kind::SimplexFractal => {
            n.set_noise_type(Some(NoiseType::OpenSimplex2));
            n.set_fractal_type(Some(FractalType::FBm));
            n.set_fractal_octaves(Some(3));
        }
        Kind::Cellular => {
            n.set_noise_type(Some(NoiseType::Cellular));
            n.set_cellular_return_type(Some(CellularReturnType::CellValue));
        }
    }
    n
}

impl NoiseSampler for FastNoiseSampler {
    fn sample(&self, seed: i32, x: f32, y: f32, z: f32) -> f32 {
        if seed == self.seed {
            self.noise.get_noise_3d(x, y, z)
        } else {
            build(self.kind, seed).get_noise_3d(x, y, z)
        }
    }
}
