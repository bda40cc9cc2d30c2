//! Management HTTP transport.
//!
//! A thin remote-config surface over the nodes' shared
//! [`ConfigChannel`](homenode_app::config_channel::ConfigChannel)s:
//!
//! - `GET /nodes` — registered node names
//! - `GET /nodes/{node}/settings` — the node's schema with current values
//! - `PUT /nodes/{node}/settings/{name}` — external write of one setting
//!
//! Writes land in the channel immediately; the owning node picks them up at
//! the top of its next poll.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use homenode_app::config_channel::ConfigChannel;
use homenode_domain::config::{SettingSchema, SettingValue};
use homenode_domain::error::ConfigRejection;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Registry of node config channels, keyed by node name.
#[derive(Clone, Default)]
pub struct ManagementState {
    channels: Arc<BTreeMap<String, Arc<ConfigChannel>>>,
}

impl ManagementState {
    #[must_use]
    pub fn new(channels: BTreeMap<String, Arc<ConfigChannel>>) -> Self {
        Self {
            channels: Arc::new(channels),
        }
    }

    fn channel(&self, node: &str) -> Result<&Arc<ConfigChannel>, ApiError> {
        self.channels
            .get(node)
            .ok_or_else(|| ApiError::UnknownNode(node.to_string()))
    }
}

/// Management API failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error(transparent)]
    Rejected(#[from] ConfigRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownNode(_)
            | Self::Rejected(ConfigRejection::UnknownSetting { .. }) => StatusCode::NOT_FOUND,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// One setting as reported to management clients: schema plus current value.
#[derive(Debug, Serialize)]
struct SettingView<'a> {
    #[serde(flatten)]
    schema: &'a SettingSchema,
    value: SettingValue,
}

/// Body of a settings write. Accepts the value as a string or a bare number.
#[derive(Debug, Deserialize)]
struct SetRequest {
    value: RawValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    fn into_raw(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(value) => value.to_string(),
        }
    }
}

/// Build the management router over the given state.
pub fn router(state: ManagementState) -> Router {
    Router::new()
        .route("/nodes", get(list_nodes))
        .route("/nodes/{node}/settings", get(list_settings))
        .route("/nodes/{node}/settings/{name}", axum::routing::put(put_setting))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_nodes(State(state): State<ManagementState>) -> Json<Vec<String>> {
    Json(state.channels.keys().cloned().collect())
}

async fn list_settings(
    State(state): State<ManagementState>,
    Path(node): Path<String>,
) -> Result<Response, ApiError> {
    let channel = state.channel(&node)?;
    let values = channel.snapshot();
    let views: Vec<SettingView<'_>> = channel
        .schema()
        .zip(values)
        .map(|(schema, value)| SettingView { schema, value })
        .collect();
    Ok(Json(views).into_response())
}

async fn put_setting(
    State(state): State<ManagementState>,
    Path((node, name)): Path<(String, String)>,
    Json(request): Json<SetRequest>,
) -> Result<StatusCode, ApiError> {
    let channel = state.channel(&node)?;
    channel.set(&name, &request.value.into_raw())?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use homenode_domain::config::NumberSpec;
    use homenode_domain::mode::SwitchMode;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn state() -> ManagementState {
        let channel = ConfigChannel::new(vec![
            (
                SettingSchema::options("Mode", SwitchMode::options(), true),
                SettingValue::Code(SwitchMode::Auto.code().to_string()),
            ),
            (
                SettingSchema::number("Auto Duration", NumberSpec::bounded(1.0, 43200.0), true),
                SettingValue::Number(15.0),
            ),
        ]);
        let mut channels = BTreeMap::new();
        channels.insert("door-light".to_string(), Arc::new(channel));
        ManagementState::new(channels)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn put(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_list_registered_nodes() {
        let response = router(state())
            .oneshot(Request::builder().uri("/nodes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!(["door-light"]));
    }

    #[tokio::test]
    async fn should_report_schema_with_current_values() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .uri("/nodes/door-light/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let settings = json_body(response).await;
        assert_eq!(settings[0]["name"], "Mode");
        assert_eq!(settings[0]["value"], "2");
        assert_eq!(settings[1]["name"], "Auto Duration");
        assert_eq!(settings[1]["kind"]["type"], "number");
        assert_eq!(settings[1]["value"], 15.0);
    }

    #[tokio::test]
    async fn should_apply_setting_write() {
        let state = state();
        let response = router(state.clone())
            .oneshot(put(
                "/nodes/door-light/settings/Auto%20Duration",
                json!({ "value": 120 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            state.channel("door-light").unwrap().number("Auto Duration"),
            Some(120.0)
        );
    }

    #[tokio::test]
    async fn should_accept_value_as_string() {
        let state = state();
        let response = router(state.clone())
            .oneshot(put(
                "/nodes/door-light/settings/Mode",
                json!({ "value": "0" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            state.channel("door-light").unwrap().code("Mode").as_deref(),
            Some("0")
        );
    }

    #[tokio::test]
    async fn should_answer_404_for_unknown_node() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .uri("/nodes/toaster/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_answer_404_for_unknown_setting() {
        let response = router(state())
            .oneshot(put(
                "/nodes/door-light/settings/Moodlight",
                json!({ "value": "1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_answer_422_for_rejected_value() {
        let response = router(state())
            .oneshot(put(
                "/nodes/door-light/settings/Mode",
                json!({ "value": "9" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error = json_body(response).await;
        assert!(error["error"].as_str().unwrap().contains("invalid value"));
    }
}
