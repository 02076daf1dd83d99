use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::config::FixtureConfig;
use crate::model::{Payload, Point};

/// Synthesizes fixture records from an injected random source.
pub struct RecordGenerator<R> {
    rng: R,
    categories: Vec<String>,
    // scores are drawn as whole hundredths so they never need rounding
    score_hundredths: u64,
}

impl RecordGenerator<StdRng> {
    /// Deterministic generator: same seed, same records.
    pub fn seeded(seed: u64, config: &FixtureConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), config)
    }

    pub fn from_entropy(config: &FixtureConfig) -> Self {
        Self::new(StdRng::from_entropy(), config)
    }
}

impl<R: Rng> RecordGenerator<R> {
    pub fn new(rng: R, config: &FixtureConfig) -> Self {
        Self {
            rng,
            categories: config.categories.clone(),
            score_hundredths: u64::from(config.score_max) * 100,
        }
    }

    /// Returns `count` points with ids 0..count and vectors of length `dimension`.
    pub fn generate(&mut self, dimension: usize, count: usize) -> Vec<Point> {
        (0..count as u64).map(|id| self.point(id, dimension)).collect()
    }

    fn point(&mut self, id: u64, dimension: usize) -> Point {
        // Uniform on [0, 1)
        let vector = (0..dimension).map(|_| self.rng.gen::<f32>()).collect();

        let category = self.categories
        .choose(&mut self.rng)
        .cloned()
        .unwrap_or_default();

        let score = self.rng.gen_range(0..self.score_hundredths.max(1)) as f64 / 100.0;

        Point {
            id,
            vector,
            payload: Payload {
                name: format!("Item {}", id),
                category,
                score,
            },
        }
    }
}
