use rand::Rng;
use tracing::{info, warn};

use crate::client::VectorStore;
use crate::config::FixtureConfig;
use crate::error::SeedError;
use crate::generator::RecordGenerator;
use crate::model::CollectionSpec;

/// Outcome for one fixture collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededCollection {
    pub name: String,
    pub points: usize,
    /// True when an older collection of the same name was dropped first
    pub replaced: bool,
}

/// Drops, recreates and fills every configured collection, one after another.
pub struct Seeder<'a, S, R> {
    store: &'a S,
    config: &'a FixtureConfig,
    generator: RecordGenerator<R>,
}

impl<'a, S: VectorStore, R: Rng> Seeder<'a, S, R> {
    pub fn new(store: &'a S, config: &'a FixtureConfig, generator: RecordGenerator<R>) -> Self {
        Self { store, config, generator }
    }

    /// Processes the collections in declaration order. The first failure aborts the pass;
    /// collections already written are left as they are.
    pub async fn run(&mut self) -> Result<Vec<SeededCollection>, SeedError> {
        let config = self.config;
        config.validate()?;

        let mut seeded = Vec::with_capacity(config.collections.len());
        for spec in &config.collections {
            println!("Creating collection: {}...", spec.name);
            let outcome = self.seed_collection(spec).await?;
            println!("  [\u{2713}] Created {} with {} points\n", outcome.name, outcome.points);
            seeded.push(outcome);
        }
        Ok(seeded)
    }

    async fn seed_collection(&mut self, spec: &CollectionSpec) -> Result<SeededCollection, SeedError> {
        // 1. Clear out any previous run
        let replaced = self.reset(spec).await?;

        // 2. Fresh collection
        self.store.create_collection(&spec.name, &spec.vector_params()).await?;
        info!(collection = %spec.name, size = spec.size, distance = %spec.distance, "collection created");

        // 3. Generate & upload in one bulk call
        let points = self.generator.generate(spec.size, self.config.points_per_collection);
        self.store.upsert(&spec.name, &points).await?;
        info!(collection = %spec.name, points = points.len(), "points upserted");

        Ok(SeededCollection {
            name: spec.name.clone(),
            points: points.len(),
            replaced,
        })
    }

    async fn reset(&self, spec: &CollectionSpec) -> Result<bool, SeedError> {
        if !self.store.collection_exists(&spec.name).await? {
            return Ok(false);
        }

        println!("  [\u{26a0}\u{fe0f}] Collection already exists, deleting...");
        warn!(collection = %spec.name, "dropping existing collection");
        self.store.delete_collection(&spec.name).await?;
        Ok(true)
    }
}
