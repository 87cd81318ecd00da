//! Postgres-backed shipping store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ShippingStore;
use crate::domain::{
    City, CityInput, GlobalConfig, GlobalConfigInput, Location, Rate, RateInput, Zone, ZoneInput,
};
use crate::error::{Result, ShippingError};

/// [`ShippingStore`] over a Postgres pool. Tables are created by the embedded
/// migrations in `migrations/`.
#[derive(Clone)]
pub struct PgShippingStore {
    pool: PgPool,
}

impl PgShippingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_config(&self, input: GlobalConfigInput) -> Result<GlobalConfig> {
        let config = sqlx::query_as::<_, GlobalConfig>(
            "INSERT INTO shipping_config (id, base_rate, rate_per_km, rate_per_kg, iva_rate, is_active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(input.base_rate)
        .bind(input.rate_per_km)
        .bind(input.rate_per_kg)
        .bind(input.iva_rate)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }
}

#[async_trait]
impl ShippingStore for PgShippingStore {
    async fn find_city(&self, location: &Location) -> Result<Option<City>> {
        // Normalization happens at comparison time and is never persisted, so
        // the match runs in process over the (small) city table.
        let cities = self.list_cities().await?;
        Ok(cities.into_iter().find(|c| c.is_named(location)))
    }

    async fn list_active_zones(&self) -> Result<Vec<Zone>> {
        let zones = sqlx::query_as::<_, Zone>(
            "SELECT * FROM shipping_zones WHERE active ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(zones)
    }

    async fn find_rate(&self, zone_id: Uuid, weight_kg: f64) -> Result<Option<Rate>> {
        let rate = sqlx::query_as::<_, Rate>(
            "SELECT * FROM shipping_rates WHERE zone_id = $1 AND active AND min_weight_kg <= $2 AND max_weight_kg >= $2 ORDER BY created_at, id LIMIT 1",
        )
        .bind(zone_id)
        .bind(weight_kg)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn global_config(&self) -> Result<GlobalConfig> {
        let existing = sqlx::query_as::<_, GlobalConfig>(
            "SELECT * FROM shipping_config ORDER BY created_at, id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        match existing {
            Some(config) => Ok(config),
            None => self.insert_config(GlobalConfigInput::default()).await,
        }
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        let cities = sqlx::query_as::<_, City>(
            "SELECT * FROM shipping_cities ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cities)
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>> {
        let city = sqlx::query_as::<_, City>("SELECT * FROM shipping_cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(city)
    }

    async fn create_city(&self, input: CityInput) -> Result<City> {
        let city = sqlx::query_as::<_, City>(
            "INSERT INTO shipping_cities (id, name, province, distance_km, is_custom_rate, custom_price, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.province)
        .bind(input.distance_km)
        .bind(input.is_custom_rate)
        .bind(input.custom_price)
        .fetch_one(&self.pool)
        .await?;
        Ok(city)
    }

    async fn update_city(&self, id: Uuid, input: CityInput) -> Result<Option<City>> {
        let city = sqlx::query_as::<_, City>(
            "UPDATE shipping_cities SET name = $2, province = $3, distance_km = $4, is_custom_rate = $5, custom_price = $6, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.province)
        .bind(input.distance_km)
        .bind(input.is_custom_rate)
        .bind(input.custom_price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(city)
    }

    async fn delete_city(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shipping_cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones = sqlx::query_as::<_, Zone>(
            "SELECT * FROM shipping_zones ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(zones)
    }

    async fn get_zone(&self, id: Uuid) -> Result<Option<Zone>> {
        let zone = sqlx::query_as::<_, Zone>("SELECT * FROM shipping_zones WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(zone)
    }

    async fn create_zone(&self, input: ZoneInput) -> Result<Zone> {
        let zone = sqlx::query_as::<_, Zone>(
            "INSERT INTO shipping_zones (id, name, provinces, multiplier, active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.provinces)
        .bind(input.multiplier)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(zone)
    }

    async fn update_zone(&self, id: Uuid, input: ZoneInput) -> Result<Option<Zone>> {
        let zone = sqlx::query_as::<_, Zone>(
            "UPDATE shipping_zones SET name = $2, provinces = $3, multiplier = $4, active = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.provinces)
        .bind(input.multiplier)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(zone)
    }

    async fn delete_zone(&self, id: Uuid) -> Result<bool> {
        // Rates go with the zone (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM shipping_zones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_zone_rates(&self, zone_id: Uuid) -> Result<Vec<Rate>> {
        let rates = sqlx::query_as::<_, Rate>(
            "SELECT * FROM shipping_rates WHERE zone_id = $1 ORDER BY created_at, id",
        )
        .bind(zone_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rates)
    }

    async fn create_rate(&self, zone_id: Uuid, input: RateInput) -> Result<Rate> {
        if self.get_zone(zone_id).await?.is_none() {
            return Err(ShippingError::ZoneNotFound);
        }
        let rate = sqlx::query_as::<_, Rate>(
            "INSERT INTO shipping_rates (id, zone_id, min_weight_kg, max_weight_kg, price, active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(zone_id)
        .bind(input.min_weight_kg)
        .bind(input.max_weight_kg)
        .bind(input.price)
        .bind(input.active)
        .fetch_one(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn update_rate(&self, id: Uuid, input: RateInput) -> Result<Option<Rate>> {
        let rate = sqlx::query_as::<_, Rate>(
            "UPDATE shipping_rates SET min_weight_kg = $2, max_weight_kg = $3, price = $4, active = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(input.min_weight_kg)
        .bind(input.max_weight_kg)
        .bind(input.price)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn delete_rate(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shipping_rates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_global_config(&self, input: GlobalConfigInput) -> Result<GlobalConfig> {
        let current = self.global_config().await?;
        let config = sqlx::query_as::<_, GlobalConfig>(
            "UPDATE shipping_config SET base_rate = $2, rate_per_km = $3, rate_per_kg = $4, iva_rate = $5, is_active = $6, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(current.id)
        .bind(input.base_rate)
        .bind(input.rate_per_km)
        .bind(input.rate_per_kg)
        .bind(input.iva_rate)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }
}
