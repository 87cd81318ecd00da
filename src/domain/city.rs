//! City override configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Location;

/// A named locality that either fixes an all-inclusive shipping price
/// (`is_custom_rate`) or pins the travel distance fed into zone pricing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub province: String,
    pub distance_km: f64,
    pub is_custom_rate: bool,
    pub custom_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    /// Whether `location` names this city, by city name or by province.
    pub fn is_named(&self, location: &Location) -> bool {
        location.matches(&self.name) || location.matches(&self.province)
    }
}

/// Payload for creating or fully updating a city.
#[derive(Debug, Deserialize, Validate)]
pub struct CityInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub province: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub distance_km: f64,
    #[serde(default)]
    pub is_custom_rate: bool,
    #[validate(range(min = 0.0))]
    pub custom_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, province: &str) -> City {
        let now = Utc::now();
        City {
            id: Uuid::new_v4(),
            name: name.into(),
            province: province.into(),
            distance_km: 0.0,
            is_custom_rate: false,
            custom_price: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn named_by_city_or_province() {
        let cuenca = city("Cuenca", "Azuay");
        assert!(cuenca.is_named(&Location::normalize("cuenca")));
        assert!(cuenca.is_named(&Location::normalize("AZUAY")));
        assert!(!cuenca.is_named(&Location::normalize("quito")));
    }

    #[test]
    fn input_rejects_negative_distance() {
        let input = CityInput {
            name: "Loja".into(),
            province: "Loja".into(),
            distance_km: -1.0,
            is_custom_rate: false,
            custom_price: None,
        };
        assert!(input.validate().is_err());
    }
}
