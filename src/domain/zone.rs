//! Pricing zones

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Location;

/// Administrative grouping of provinces sharing a per-kilometer rate.
///
/// A zone owns no cities directly; matching is by province-name membership.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub provinces: Vec<String>,
    pub multiplier: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    /// Whether any member province is named by the input location or, when a
    /// city already matched, by that city's province.
    pub fn covers(&self, location: &Location, city_province: Option<&Location>) -> bool {
        self.provinces.iter().any(|p| {
            let p = Location::normalize(p);
            p == *location || city_province.map_or(false, |cp| p == *cp)
        })
    }
}

/// Payload for creating or fully updating a zone.
#[derive(Debug, Deserialize, Validate)]
pub struct ZoneInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub provinces: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub multiplier: f64,
    #[serde(default = "super::default_true")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(provinces: &[&str]) -> Zone {
        let now = Utc::now();
        Zone {
            id: Uuid::new_v4(),
            name: "Sierra".into(),
            provinces: provinces.iter().map(|p| p.to_string()).collect(),
            multiplier: 0.35,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn covers_by_input_or_city_province() {
        let z = zone(&["Loja", "Azuay"]);
        assert!(z.covers(&Location::normalize("Provincia de Loja"), None));
        assert!(!z.covers(&Location::normalize("cuenca"), None));
        let azuay = Location::normalize("Azuay");
        assert!(z.covers(&Location::normalize("cuenca"), Some(&azuay)));
    }

    #[test]
    fn empty_zone_covers_nothing() {
        let z = zone(&[]);
        assert!(!z.covers(&Location::normalize("loja"), None));
    }
}
