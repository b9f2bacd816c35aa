use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use vista_core::{Airport, AirportDirectory, DirectoryError, IataCode};

use crate::seed::{read_json, SeedError};

/// Airport reference data held in memory, ordered by city.
pub struct InMemoryAirportDirectory {
    airports: Vec<Airport>,
}

impl InMemoryAirportDirectory {
    pub fn new(mut airports: Vec<Airport>) -> Result<Self, SeedError> {
        let mut seen = HashSet::new();
        for airport in &airports {
            if !seen.insert(airport.code.clone()) {
                return Err(SeedError::Invalid(format!("duplicate airport code {}", airport.code)));
            }
        }

        airports.sort_by(|a, b| a.city.cmp(&b.city).then_with(|| a.code.cmp(&b.code)));
        Ok(Self { airports })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let airports: Vec<Airport> = read_json(path).await?;
        let directory = Self::new(airports)?;
        info!(count = directory.airports.len(), "Airport directory loaded");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

#[async_trait]
impl AirportDirectory for InMemoryAirportDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, DirectoryError> {
        Ok(self
            .airports
            .iter()
            .filter(|airport| airport.matches(query))
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, code: &IataCode) -> Result<Option<Airport>, DirectoryError> {
        Ok(self.airports.iter().find(|airport| &airport.code == code).cloned())
    }
}
