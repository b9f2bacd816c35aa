use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate, GeoError};
use crate::iata::IataCode;

/// Immutable airport reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: IataCode,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Airport {
    /// Position of the airport. Missing latitude or longitude is a hard error, never defaulted.
    pub fn coordinate(&self) -> Result<Coordinate, GeoError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
            _ => Err(GeoError::MissingCoordinates {
                code: self.code.to_string(),
            }),
        }
    }

    /// Case-insensitive match against code, name, city or country.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [self.code.as_str(), self.name.as_str(), self.city.as_str(), self.country.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Great-circle distance between two airports.
pub fn route_distance_km(origin: &Airport, destination: &Airport) -> Result<f64, GeoError> {
    let from = origin.coordinate()?;
    let to = destination.coordinate()?;
    Ok(geo::distance_km(from, to))
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Airport directory unavailable: {0}")]
    Unavailable(String),
}

/// Lookup contract for airport reference data.
///
/// An unmatched query yields an empty list; errors are reserved for the
/// directory itself being unreachable.
#[async_trait]
pub trait AirportDirectory: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, DirectoryError>;

    async fn find_by_code(&self, code: &IataCode) -> Result<Option<Airport>, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(code: &str, lat: Option<f64>, lon: Option<f64>) -> Airport {
        Airport {
            code: IataCode::parse(code).unwrap(),
            name: format!("{} Airport", code),
            city: "Somewhere".to_string(),
            country: "Nowhere".to_string(),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn test_missing_coordinates_is_an_error() {
        let origin = airport("JFK", Some(40.6413), Some(-73.7781));
        let destination = airport("XXX", Some(51.47), None);

        let err = route_distance_km(&origin, &destination).unwrap_err();
        assert_eq!(err, GeoError::MissingCoordinates { code: "XXX".to_string() });
    }

    #[test]
    fn test_matches_any_field() {
        let a = Airport {
            code: IataCode::parse("NCE").unwrap(),
            name: "Nice Côte d'Azur Airport".to_string(),
            city: "Nice".to_string(),
            country: "France".to_string(),
            latitude: Some(43.6584),
            longitude: Some(7.2159),
        };
        assert!(a.matches("nce"));
        assert!(a.matches("FRANCE"));
        assert!(a.matches("azur"));
        assert!(!a.matches("London"));
    }
}
