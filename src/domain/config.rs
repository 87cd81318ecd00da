//! Global fallback pricing config

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Singleton fallback pricing model used when no city or zone matches.
///
/// At most one row is treated as canonical: queried without filter, oldest
/// first. `rate_per_km` and `iva_rate` are carried for the admin surface but
/// the fallback formula consumes only `base_rate` and `rate_per_kg`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GlobalConfig {
    pub id: Uuid,
    pub base_rate: f64,
    pub rate_per_km: f64,
    pub rate_per_kg: f64,
    pub iva_rate: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for overwriting the global config.
#[derive(Debug, Deserialize, Validate)]
pub struct GlobalConfigInput {
    #[validate(range(min = 0.0))]
    pub base_rate: f64,
    #[validate(range(min = 0.0))]
    pub rate_per_km: f64,
    #[validate(range(min = 0.0))]
    pub rate_per_kg: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub iva_rate: f64,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Default for GlobalConfigInput {
    /// Seed values for a fresh install; overwritten through the config API.
    fn default() -> Self {
        Self {
            base_rate: 5.0,
            rate_per_km: 0.1,
            rate_per_kg: 0.5,
            iva_rate: 0.15,
            is_active: true,
        }
    }
}
