//! Database row shapes for the `stations` table.

use crate::domain::{Station, StationId};
use crate::error::GatewayError;

/// Column list shared by every station query, in [`StationRow`] order.
pub const STATION_COLUMNS: &str = "id, name, city, latitude, longitude, phone, description";

/// A row of the `stations` table as fetched by `sqlx::query_as`.
pub type StationRow = (
    i32,
    String,
    String,
    f64,
    f64,
    Option<String>,
    Option<String>,
);

/// Converts a fetched row into a domain [`Station`].
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the stored id is not a
/// positive integer.
pub fn station_from_row(row: StationRow) -> Result<Station, GatewayError> {
    let (id, name, city, latitude, longitude, phone, description) = row;
    let id = StationId::new(i64::from(id))
        .map_err(|_| GatewayError::PersistenceError(format!("invalid stored station id {id}")))?;
    Ok(Station {
        id,
        name,
        city,
        latitude,
        longitude,
        phone,
        description,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn converts_valid_row() {
        let row: StationRow = (
            3,
            "Rabat Ville".to_string(),
            "Rabat".to_string(),
            34.0209,
            -6.8416,
            Some("+212-537-003".to_string()),
            None,
        );
        let Ok(station) = station_from_row(row) else {
            panic!("row should convert");
        };
        assert_eq!(station.id.get(), 3);
        assert_eq!(station.city, "Rabat");
        assert!(station.description.is_none());
    }

    #[test]
    fn rejects_non_positive_id() {
        let row: StationRow = (0, String::new(), String::new(), 0.0, 0.0, None, None);
        assert!(station_from_row(row).is_err());
    }
}
