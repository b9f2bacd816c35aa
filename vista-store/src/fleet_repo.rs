use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use vista_catalog::{Aircraft, AircraftCategory, AssetError, FleetCatalog, Yacht, YachtSize};

use crate::seed::{read_json, SeedError};

#[derive(Debug, Deserialize, Default)]
pub struct FleetSeed {
    #[serde(default)]
    pub aircraft: Vec<Aircraft>,
    #[serde(default)]
    pub yachts: Vec<Yacht>,
}

pub struct InMemoryFleetCatalog {
    aircraft: Vec<Aircraft>,
    yachts: Vec<Yacht>,
}

impl InMemoryFleetCatalog {
    pub fn new(seed: FleetSeed) -> Self {
        let FleetSeed { mut aircraft, mut yachts } = seed;
        aircraft.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        yachts.sort_by(|a, b| a.size_category.cmp(&b.size_category).then_with(|| a.name.cmp(&b.name)));
        Self { aircraft, yachts }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let seed: FleetSeed = read_json(path).await?;
        let catalog = Self::new(seed);
        info!(
            aircraft = catalog.aircraft.len(),
            yachts = catalog.yachts.len(),
            "Fleet catalog loaded"
        );
        Ok(catalog)
    }
}

#[async_trait]
impl FleetCatalog for InMemoryFleetCatalog {
    async fn list_aircraft(&self, category: Option<AircraftCategory>) -> Result<Vec<Aircraft>, AssetError> {
        Ok(self
            .aircraft
            .iter()
            .filter(|a| a.is_available)
            .filter(|a| category.map_or(true, |c| a.category == c))
            .cloned()
            .collect())
    }

    async fn get_aircraft(&self, id: Uuid) -> Result<Aircraft, AssetError> {
        self.aircraft
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("aircraft {}", id)))
    }

    async fn list_yachts(&self, size: Option<YachtSize>) -> Result<Vec<Yacht>, AssetError> {
        Ok(self
            .yachts
            .iter()
            .filter(|y| y.is_available)
            .filter(|y| size.map_or(true, |s| y.size_category == s))
            .cloned()
            .collect())
    }

    async fn get_yacht(&self, id: Uuid) -> Result<Yacht, AssetError> {
        self.yachts
            .iter()
            .find(|y| y.id == id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(format!("yacht {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bundled() -> InMemoryFleetCatalog {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/seed/fleet.json");
        InMemoryFleetCatalog::from_path(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_bundled_fleet_filters_by_category() {
        let catalog = bundled().await;

        let light = catalog.list_aircraft(Some(AircraftCategory::Light)).await.unwrap();
        assert!(!light.is_empty());
        assert!(light.iter().all(|a| a.category == AircraftCategory::Light));

        let all = catalog.list_aircraft(None).await.unwrap();
        assert!(all.len() > light.len());
        assert!(all.windows(2).all(|w| w[0].category <= w[1].category));

        let superyachts = catalog.list_yachts(Some(YachtSize::Superyacht)).await.unwrap();
        assert!(superyachts.iter().all(|y| y.size_category == YachtSize::Superyacht));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let catalog = bundled().await;
        let first = catalog.list_aircraft(None).await.unwrap().remove(0);

        assert_eq!(catalog.get_aircraft(first.id).await.unwrap().name, first.name);
        assert!(matches!(catalog.get_aircraft(Uuid::new_v4()).await, Err(AssetError::NotFound(_))));
        assert!(matches!(catalog.get_yacht(Uuid::new_v4()).await, Err(AssetError::NotFound(_))));
    }
}
