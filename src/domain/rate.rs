//! Weight-banded zone rates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A weight-banded base price scoped to one zone. Bands are inclusive on both
/// ends; multiple rates per zone are non-overlapping by convention only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rate {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
    pub price: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rate {
    pub fn covers_weight(&self, weight_kg: f64) -> bool {
        self.min_weight_kg <= weight_kg && weight_kg <= self.max_weight_kg
    }
}

/// Payload for creating or fully updating a rate.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "weight_band"))]
pub struct RateInput {
    #[validate(range(min = 0.0))]
    pub min_weight_kg: f64,
    #[validate(range(min = 0.0))]
    pub max_weight_kg: f64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default = "super::default_true")]
    pub active: bool,
}

fn weight_band(input: &RateInput) -> Result<(), ValidationError> {
    if input.min_weight_kg > input.max_weight_kg {
        return Err(ValidationError::new("inverted_weight_band"));
    }
    Ok(())
}
