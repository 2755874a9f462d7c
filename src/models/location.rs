//! Ubicaciones ("floors") del concesionario
//!
//! Define las ubicaciones físicas/lógicas de un vehículo y la tabla de
//! destinos permitidos para cada origen.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;

/// Ubicación del vehículo - mapea al ENUM vehicle_location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "vehicle_location", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    CarInventory,
    #[serde(rename = "SHOWROOM_1")]
    #[sqlx(rename = "SHOWROOM_1")]
    Showroom1,
    #[serde(rename = "SHOWROOM_2")]
    #[sqlx(rename = "SHOWROOM_2")]
    Showroom2,
    GarageInventory,
    Schedule,
    /// Vehículos pedidos que todavía no forman parte de la flota.
    OrderedCars,
}

impl Location {
    /// Las cinco ubicaciones de la flota activa
    pub const LIVE: [Location; 5] = [
        Location::CarInventory,
        Location::Showroom1,
        Location::Showroom2,
        Location::GarageInventory,
        Location::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::CarInventory => "CAR_INVENTORY",
            Location::Showroom1 => "SHOWROOM_1",
            Location::Showroom2 => "SHOWROOM_2",
            Location::GarageInventory => "GARAGE_INVENTORY",
            Location::Schedule => "SCHEDULE",
            Location::OrderedCars => "ORDERED_CARS",
        }
    }

    pub fn is_live(&self) -> bool {
        !matches!(self, Location::OrderedCars)
    }

    /// Destinos permitidos desde este origen.
    ///
    /// Cada ubicación activa puede moverse a cualquier otra ubicación activa.
    /// `ORDERED_CARS` no tiene salidas: se admite con la operación de recepción.
    pub fn allowed_destinations(&self) -> Vec<Location> {
        if !self.is_live() {
            return Vec::new();
        }
        Location::LIVE
            .iter()
            .copied()
            .filter(|destination| destination != self)
            .collect()
    }

    pub fn can_move_to(&self, destination: Location) -> bool {
        self.allowed_destinations().contains(&destination)
    }
}

/// Destinos permitidos desde `origin`
pub fn allowed_destinations(origin: Location) -> Vec<Location> {
    origin.allowed_destinations()
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAR_INVENTORY" => Ok(Location::CarInventory),
            "SHOWROOM_1" => Ok(Location::Showroom1),
            "SHOWROOM_2" => Ok(Location::Showroom2),
            "GARAGE_INVENTORY" => Ok(Location::GarageInventory),
            "SCHEDULE" => Ok(Location::Schedule),
            "ORDERED_CARS" => Ok(Location::OrderedCars),
            other => Err(format!("Unknown location: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_locations_have_four_destinations() {
        for origin in Location::LIVE {
            let destinations = allowed_destinations(origin);
            assert_eq!(destinations.len(), 4, "origin {}", origin);
            assert!(!destinations.contains(&origin));
            assert!(!destinations.contains(&Location::OrderedCars));
        }
    }

    #[test]
    fn test_ordered_cars_has_no_destinations() {
        assert!(allowed_destinations(Location::OrderedCars).is_empty());
        for destination in Location::LIVE {
            assert!(!Location::OrderedCars.can_move_to(destination));
        }
    }

    #[test]
    fn test_showroom_destinations() {
        assert_eq!(
            allowed_destinations(Location::Showroom1),
            vec![
                Location::CarInventory,
                Location::Showroom2,
                Location::GarageInventory,
                Location::Schedule,
            ]
        );
    }

    #[test]
    fn test_location_serde_names() {
        let json = serde_json::to_string(&Location::Showroom1).unwrap();
        assert_eq!(json, "\"SHOWROOM_1\"");
        let parsed: Location = serde_json::from_str("\"GARAGE_INVENTORY\"").unwrap();
        assert_eq!(parsed, Location::GarageInventory);
        assert_eq!("showroom_2".parse::<Location>().unwrap(), Location::Showroom2);
        assert!("ROOFTOP".parse::<Location>().is_err());
    }
}
