//! The read-only record store behind the resource service.

use std::path::{Path, PathBuf};

use serde_json::Number;
use tracing::info;

use crate::model::{Archer, ArcherId, ArcherSummary, Shot};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid archer data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The two read operations the service needs. Both return records in the
/// store's natural order, and both return the same records.
pub trait ArcherStore: Send + Sync + 'static {
    fn list_summaries(&self) -> Result<Vec<ArcherSummary>, StoreError>;
    fn list_full(&self) -> Result<Vec<Archer>, StoreError>;
}

/// A fixed, pre-populated collection held in memory.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    archers: Vec<Archer>,
}

impl MemoryStore {
    pub fn new(archers: Vec<Archer>) -> Self {
        Self { archers }
    }

    /// Parses a JSON array of archer records.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_owned(),
            source,
        })?;
        let store = Self::from_json(&json)?;
        info!(path = %path.display(), records = store.archers.len(), "loaded archer data");
        Ok(store)
    }

    /// The ten-archer reference fixture.
    pub fn reference() -> Self {
        Self::new(reference_archers())
    }
}

impl ArcherStore for MemoryStore {
    fn list_summaries(&self) -> Result<Vec<ArcherSummary>, StoreError> {
        Ok(self.archers.iter().map(Archer::summary).collect())
    }

    fn list_full(&self) -> Result<Vec<Archer>, StoreError> {
        Ok(self.archers.clone())
    }
}

fn archer(
    id: u64,
    name: &str,
    surname: &str,
    nationality: &str,
    age: u32,
    shot: (&str, u32, &str),
    scores: [u32; 6],
) -> Archer {
    let (bow, distance, arrow) = shot;
    Archer {
        id: ArcherId::Int(id),
        name: name.to_owned(),
        surname: surname.to_owned(),
        nationality: nationality.to_owned(),
        age,
        shot: Shot {
            bow: bow.to_owned(),
            distance: Number::from(distance),
            arrow: arrow.to_owned(),
        },
        scores: scores.into_iter().map(Number::from).collect(),
    }
}

fn reference_archers() -> Vec<Archer> {
    vec![
        archer(1, "Carmen", "Huesa Guardiola", "España", 22, ("Recurvo", 70, "Carbono"), [10, 9, 9, 8, 10, 7]),
        archer(2, "Miguel", "Alvariño García", "España", 29, ("Recurvo", 70, "Carbono"), [9, 9, 10, 10, 8, 9]),
        archer(3, "Brady", "Ellison", "Estados Unidos", 35, ("Recurvo", 70, "Carbono"), [10, 10, 9, 9, 10, 8]),
        archer(4, "An", "San", "Corea del Sur", 22, ("Recurvo", 70, "Carbono"), [10, 10, 10, 9, 9, 10]),
        archer(5, "Mete", "Gazoz", "Turquía", 24, ("Recurvo", 70, "Aluminio-carbono"), [9, 10, 8, 10, 9, 9]),
        archer(6, "Sara", "López", "Colombia", 28, ("Compuesto", 50, "Aluminio"), [10, 10, 10, 10, 9, 10]),
        archer(7, "Mike", "Schloesser", "Países Bajos", 29, ("Compuesto", 50, "Aluminio"), [10, 10, 9, 10, 10, 10]),
        archer(8, "Elia", "Canales", "España", 25, ("Recurvo", 70, "Carbono"), [8, 9, 9, 10, 7, 9]),
        archer(9, "Deepika", "Kumari", "India", 29, ("Recurvo", 70, "Carbono"), [9, 10, 9, 9, 10, 8]),
        archer(10, "Lisa", "Unruh", "Alemania", 35, ("Recurvo", 70, "Carbono"), [9, 8, 10, 9, 9, 9]),
    ]
}
