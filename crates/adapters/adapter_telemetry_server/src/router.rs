//! Collector routes.
//!
//! - `GET /` — samples retained by the current session
//! - `POST /` — ingest one sample wrapped in `temperature_data`
//! - `POST /batch` — ingest a batch wrapped in `temperatures_batch`
//! - `GET /health` — liveness probe
//!
//! Both ingest endpoints answer with the subset of submitted samples that
//! survived the 3-sigma filter; rejected bodies get a 422 with an `error`
//! field.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use homenode_domain::telemetry::TemperatureSample;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::IngressError;
use crate::state::AppState;

/// One sample as submitted on the wire, before validation.
#[derive(Debug, Deserialize)]
pub struct SampleBody {
    pub temperature: f64,
    pub time: String,
}

impl SampleBody {
    fn validate(self) -> Result<TemperatureSample, IngressError> {
        if !self.temperature.is_finite() {
            return Err(IngressError::validation("temperature is not a finite number"));
        }
        let time: DateTime<Utc> = self
            .time
            .parse()
            .map_err(|_| IngressError::validation(format!("time `{}` is not RFC 3339", self.time)))?;
        Ok(TemperatureSample::new(self.temperature, time))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub temperature_data: SampleBody,
}

#[derive(Debug, Deserialize)]
pub struct AddBatchRequest {
    pub temperatures_batch: Vec<SampleBody>,
}

/// Build the collector router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(add))
        .route("/batch", axum::routing::post(add_batch))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list(State(state): State<AppState>) -> Json<Vec<TemperatureSample>> {
    Json(state.retained())
}

async fn add(
    State(state): State<AppState>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> Result<Json<Vec<TemperatureSample>>, IngressError> {
    let Json(request) = body.map_err(|err| IngressError::validation(err.body_text()))?;
    let sample = request.temperature_data.validate()?;
    ingest(&state, vec![sample]).await
}

async fn add_batch(
    State(state): State<AppState>,
    body: Result<Json<AddBatchRequest>, JsonRejection>,
) -> Result<Json<Vec<TemperatureSample>>, IngressError> {
    let Json(request) = body.map_err(|err| IngressError::validation(err.body_text()))?;
    let samples = request
        .temperatures_batch
        .into_iter()
        .map(SampleBody::validate)
        .collect::<Result<Vec<_>, _>>()?;
    ingest(&state, samples).await
}

async fn ingest(
    state: &AppState,
    samples: Vec<TemperatureSample>,
) -> Result<Json<Vec<TemperatureSample>>, IngressError> {
    let submitted = samples.len();
    let accepted = state.ingest(samples);
    if accepted.len() < submitted {
        tracing::info!(
            submitted,
            accepted = accepted.len(),
            "outlier filter rejected samples"
        );
    }
    state.store().append(&accepted).await?;
    Ok(Json(accepted))
}
