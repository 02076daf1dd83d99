use std::collections::BTreeSet;
use std::fmt;

use crate::client::VectorStore;
use crate::config::FixtureConfig;
use crate::error::{SeedError, StoreError};
use crate::model::{CollectionSpec, Distance, PointId};

const SCROLL_PAGE: usize = 256;

/// A way in which a collection differs from its fixture definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Missing,
    Dimension { expected: usize, actual: usize },
    Distance { expected: Distance, actual: Distance },
    /// Not a single dense vector per point, e.g. named or sparse-only vectors
    Schema(String),
    PointCount { expected: u64, actual: u64 },
    MissingIds(Vec<u64>),
    UnexpectedId(PointId),
    VectorLength { id: PointId, expected: usize, actual: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Missing => write!(f, "collection does not exist"),
            Mismatch::Dimension { expected, actual } => write!(f, "vector size {} (expected {})", actual, expected),
            Mismatch::Distance { expected, actual } => write!(f, "distance {} (expected {})", actual, expected),
            Mismatch::PointCount { expected, actual } => write!(f, "{} points (expected {})", actual, expected),
            Mismatch::Schema(found) => write!(f, "{} (expected a single dense vector)", found),
            Mismatch::MissingIds(ids) => match ids.first() {
                Some(first) => write!(f, "{} ids missing, first {}", ids.len(), first),
                None => write!(f, "ids missing"),
            },
            Mismatch::UnexpectedId(id) => write!(f, "unexpected point id {}", id),
            Mismatch::VectorLength { id, expected, actual } => {
                write!(f, "point {} has vector length {} (expected {})", id, actual, expected)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub name: String,
    pub mismatches: Vec<Mismatch>,
}

impl CollectionReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Checks every configured collection. Mismatches are reported, store errors abort.
pub async fn verify<S: VectorStore>(store: &S, config: &FixtureConfig) -> Result<Vec<CollectionReport>, SeedError> {
    config.validate()?;

    let mut reports = Vec::with_capacity(config.collections.len());
    for spec in &config.collections {
        let mismatches = verify_collection(store, spec, config.points_per_collection as u64).await?;
        reports.push(CollectionReport { name: spec.name.clone(), mismatches });
    }
    Ok(reports)
}

pub async fn verify_collection<S: VectorStore>(
    store: &S,
    spec: &CollectionSpec,
    expected_points: u64,
) -> Result<Vec<Mismatch>, StoreError> {
    let info = match store.get_collection(&spec.name).await {
        Ok(info) => info,
        Err(e) if e.is_not_found() => return Ok(vec![Mismatch::Missing]),
        Err(e) => return Err(e),
    };

    let mut mismatches = Vec::new();

    let count = store.count(&spec.name).await?;
    if count != expected_points {
        mismatches.push(Mismatch::PointCount { expected: expected_points, actual: count });
    }

    let Some(vectors) = info.config.params.vectors.single() else {
        // stored vectors would not be plain lists either, so stop before scrolling
        mismatches.insert(0, Mismatch::Schema(info.config.params.vectors.describe()));
        return Ok(mismatches);
    };
    if vectors.size != spec.size {
        mismatches.push(Mismatch::Dimension { expected: spec.size, actual: vectors.size });
    }
    if vectors.distance != spec.distance {
        mismatches.push(Mismatch::Distance { expected: spec.distance, actual: vectors.distance });
    }

    // Walk every point: ids must be exactly 0..expected_points
    let mut seen = BTreeSet::new();
    let mut offset: Option<PointId> = None;
    loop {
        let page = store.scroll(&spec.name, offset.as_ref(), SCROLL_PAGE).await?;
        for point in page.points {
            match point.id {
                PointId::Num(n) if n < expected_points => {
                    seen.insert(n);
                }
                ref other => mismatches.push(Mismatch::UnexpectedId(other.clone())),
            }
            let len = point.vector.as_ref().map_or(0, Vec::len);
            if len != spec.size {
                mismatches.push(Mismatch::VectorLength { id: point.id, expected: spec.size, actual: len });
            }
        }

        match page.next_page_offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    let missing: Vec<u64> = (0..expected_points).filter(|id| !seen.contains(id)).collect();
    if !missing.is_empty() {
        mismatches.push(Mismatch::MissingIds(missing));
    }

    Ok(mismatches)
}
