pub mod model;
pub mod api;
pub mod error;
pub mod config;
pub mod client;
pub mod generator;
pub mod seeder;
pub mod verify;

pub use client::{QdrantClient, VectorStore};
pub use config::{Endpoint, FixtureConfig};
pub use error::{ConfigError, SeedError, StoreError};
pub use generator::RecordGenerator;
pub use model::{CollectionSpec, Distance, Point};
pub use seeder::{SeededCollection, Seeder};
