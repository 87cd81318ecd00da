//! shipcalc - Shipping Cost Calculation Service

use anyhow::Result;
use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post, put}, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

use shipcalc::domain::{City, CityInput, GlobalConfig, GlobalConfigInput, Rate, RateInput, Zone, ZoneInput};
use shipcalc::{PgShippingStore, ShippingCostResolver, ShippingError, ShippingStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShippingStore>,
    pub resolver: ShippingCostResolver,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let store: Arc<dyn ShippingStore> = Arc::new(PgShippingStore::new(db));
    let state = AppState { resolver: ShippingCostResolver::new(store.clone()), store };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "shipcalc"})) }))
        .route("/shipping/calculate", post(calculate_shipping))
        .route("/shipping/cities", get(list_cities).post(create_city))
        .route("/shipping/cities/:id", get(get_city).put(update_city).delete(delete_city))
        .route("/shipping/zones", get(list_zones).post(create_zone))
        .route("/shipping/zones/:id", get(get_zone).put(update_zone).delete(delete_zone))
        .route("/shipping/zones/:id/rates", get(list_zone_rates).post(create_zone_rate))
        .route("/shipping/rates/:id", put(update_rate).delete(delete_rate))
        .route("/shipping/config", get(get_config).put(update_config))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("🚀 shipcalc listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

type ApiError = (StatusCode, String);

fn store_error(e: ShippingError) -> ApiError {
    match e {
        ShippingError::ZoneNotFound => (StatusCode::NOT_FOUND, e.to_string()),
        ShippingError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn bad_request(e: validator::ValidationErrors) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

#[derive(Debug, Deserialize, Validate)] pub struct CalculateShippingRequest { #[validate(length(min = 1))] pub province: String, #[validate(range(min = 0.0))] pub weight: f64 }
#[derive(Debug, Serialize)] pub struct CalculateShippingResponse { pub cost: f64 }

async fn calculate_shipping(State(s): State<AppState>, Json(r): Json<CalculateShippingRequest>) -> Result<Json<CalculateShippingResponse>, ApiError> {
    r.validate().map_err(bad_request)?;
    let cost = s.resolver.calculate(&r.province, r.weight).await.map_err(store_error)?;
    Ok(Json(CalculateShippingResponse { cost }))
}

async fn list_cities(State(s): State<AppState>) -> Result<Json<Vec<City>>, ApiError> {
    let cities = s.store.list_cities().await.map_err(store_error)?;
    Ok(Json(cities))
}

async fn get_city(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<City>, ApiError> {
    s.store.get_city(id).await.map_err(store_error)?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn create_city(State(s): State<AppState>, Json(r): Json<CityInput>) -> Result<(StatusCode, Json<City>), ApiError> {
    r.validate().map_err(bad_request)?;
    let city = s.store.create_city(r).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(city)))
}

async fn update_city(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<CityInput>) -> Result<Json<City>, ApiError> {
    r.validate().map_err(bad_request)?;
    s.store.update_city(id, r).await.map_err(store_error)?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn delete_city(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if s.store.delete_city(id).await.map_err(store_error)? { Ok(StatusCode::NO_CONTENT) } else { Err((StatusCode::NOT_FOUND, "Not found".to_string())) }
}

async fn list_zones(State(s): State<AppState>) -> Result<Json<Vec<Zone>>, ApiError> {
    let zones = s.store.list_zones().await.map_err(store_error)?;
    Ok(Json(zones))
}

async fn get_zone(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Zone>, ApiError> {
    s.store.get_zone(id).await.map_err(store_error)?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn create_zone(State(s): State<AppState>, Json(r): Json<ZoneInput>) -> Result<(StatusCode, Json<Zone>), ApiError> {
    r.validate().map_err(bad_request)?;
    let zone = s.store.create_zone(r).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(zone)))
}

async fn update_zone(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ZoneInput>) -> Result<Json<Zone>, ApiError> {
    r.validate().map_err(bad_request)?;
    s.store.update_zone(id, r).await.map_err(store_error)?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn delete_zone(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if s.store.delete_zone(id).await.map_err(store_error)? { Ok(StatusCode::NO_CONTENT) } else { Err((StatusCode::NOT_FOUND, "Not found".to_string())) }
}

async fn list_zone_rates(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Vec<Rate>>, ApiError> {
    if s.store.get_zone(id).await.map_err(store_error)?.is_none() { return Err((StatusCode::NOT_FOUND, "Not found".to_string())); }
    let rates = s.store.list_zone_rates(id).await.map_err(store_error)?;
    Ok(Json(rates))
}

async fn create_zone_rate(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<RateInput>) -> Result<(StatusCode, Json<Rate>), ApiError> {
    r.validate().map_err(bad_request)?;
    let rate = s.store.create_rate(id, r).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(rate)))
}

async fn update_rate(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<RateInput>) -> Result<Json<Rate>, ApiError> {
    r.validate().map_err(bad_request)?;
    s.store.update_rate(id, r).await.map_err(store_error)?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

async fn delete_rate(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if s.store.delete_rate(id).await.map_err(store_error)? { Ok(StatusCode::NO_CONTENT) } else { Err((StatusCode::NOT_FOUND, "Not found".to_string())) }
}

async fn get_config(State(s): State<AppState>) -> Result<Json<GlobalConfig>, ApiError> {
    let config = s.store.global_config().await.map_err(store_error)?;
    Ok(Json(config))
}

async fn update_config(State(s): State<AppState>, Json(r): Json<GlobalConfigInput>) -> Result<Json<GlobalConfig>, ApiError> {
    r.validate().map_err(bad_request)?;
    let config = s.store.update_global_config(r).await.map_err(store_error)?;
    Ok(Json(config))
}
