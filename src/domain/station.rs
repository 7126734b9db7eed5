//! Station records as served by the station directory.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::StationId;
use crate::error::GatewayError;

/// A physical station in the catalog.
///
/// Owned by the station store; the realtime core only ever reads
/// snapshots of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Station {
    /// Store-assigned identifier.
    #[schema(value_type = i32)]
    pub id: StationId,
    /// Display name (e.g. `"Rabat Agdal"`).
    pub name: String,
    /// City the station serves.
    pub city: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Station fields supplied on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationDraft {
    /// Display name.
    pub name: String,
    /// City the station serves.
    pub city: String,
    /// Latitude in decimal degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in decimal degrees, within `[-180, 180]`.
    pub longitude: f64,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl StationDraft {
    /// Checks required fields and coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("name is required".to_string()));
        }
        if self.city.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("city is required".to_string()));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GatewayError::InvalidRequest(
                "latitude must be within [-90, 90]".to_string(),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GatewayError::InvalidRequest(
                "longitude must be within [-180, 180]".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the stored record once the store has assigned an id.
    #[must_use]
    pub fn into_station(self, id: StationId) -> Station {
        Station {
            id,
            name: self.name,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone,
            description: self.description,
        }
    }
}

/// The twelve stations loaded into an empty catalog.
#[must_use]
pub fn default_catalog() -> Vec<StationDraft> {
    const SEED: [(&str, &str, f64, f64, &str, &str); 12] = [
        ("Tanger Ville", "Tanger", 35.7801, -5.8125, "+212-539-001", "Gare maritime moderne au nord du Maroc"),
        ("Casablanca Voyageurs", "Casablanca", 33.5731, -7.5898, "+212-522-002", "Plus grande gare ferroviaire du Maroc"),
        ("Rabat Ville", "Rabat", 34.0209, -6.8416, "+212-537-003", "Gare historique du centre-ville"),
        ("Rabat Agdal", "Rabat", 34.0025, -6.8469, "+212-537-004", "Gare moderne pour les trains Al Boraq (TGV)"),
        ("Fès", "Fès", 34.0331, -5.0003, "+212-535-005", "Gare historique et hub ferroviaire du Maroc"),
        ("Marrakech", "Marrakech", 31.6295, -7.9811, "+212-524-006", "Gare touristique et emblématique"),
        ("Oujda", "Oujda", 34.6867, -1.9114, "+212-536-007", "Gare de l'Oriental, terminus est du réseau ONCF"),
        ("Kénitra", "Kénitra", 34.2610, -6.5790, "+212-537-008", "Gare importante pour le TGV"),
        ("Settat", "Settat", 33.0001, -7.6200, "+212-523-009", "Gare régionale entre Casa et Marrakech"),
        ("Oued Zem", "Oued Zem", 32.8662, -6.5653, "+212-523-010", "Petite gare régionale"),
        ("Mohammedia", "Mohammedia", 33.6835, -7.3843, "+212-523-011", "Gare côtière entre Rabat et Casa"),
        ("El Jadida", "El Jadida", 33.2560, -8.5081, "+212-523-012", "Gare touristique sur la côte Atlantique"),
    ];

    SEED.iter()
        .map(|(name, city, latitude, longitude, phone, description)| StationDraft {
            name: (*name).to_string(),
            city: (*city).to_string(),
            latitude: *latitude,
            longitude: *longitude,
            phone: Some((*phone).to_string()),
            description: Some((*description).to_string()),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> StationDraft {
        StationDraft {
            name: "Rabat Ville".to_string(),
            city: "Rabat".to_string(),
            latitude: 34.0209,
            longitude: -6.8416,
            phone: None,
            description: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let mut d = draft();
        d.latitude = 91.0;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.longitude = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.iter().all(|d| d.validate().is_ok()));
    }
}
