//! api.rs
//! Rutas HTTP: /health, /spots, /lot/* (escena, resumen, más cercana) y /admin/*
//! (popups, alta/baja/actualización, entrada y geometría).
//!
//! Las mutaciones toman el write lock durante todo el viaje a la API remota:
//! las acciones de admin quedan serializadas y el recálculo siempre va
//! después de la reconciliación.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};

use crate::admin::{AdminCoordinator, Popup};
use crate::error::LotError;
use crate::fetch::SpotApi;
use crate::models::types::{Point, SpotStatus, SubColumn};
use crate::scene::build_scene;

pub struct ApiState<A> {
    pub lot: Arc<RwLock<AdminCoordinator<A>>>,
}

impl<A> Clone for ApiState<A> {
    fn clone(&self) -> Self { Self { lot: self.lot.clone() } }
}

pub fn router<A: SpotApi + 'static>(state: ApiState<A>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/spots", get(list_spots::<A>))
        .route("/lot/scene", get(get_scene::<A>))
        .route("/lot/summary", get(get_summary::<A>))
        .route("/lot/nearest", get(get_nearest::<A>))
        .route("/admin/popup", get(get_popup::<A>))
        .route("/admin/popup/:kind", post(open_popup::<A>).delete(close_popup::<A>))
        .route("/admin/submit", post(submit_pending::<A>))
        .route(
            "/admin/spots",
            post(add_spot::<A>).delete(remove_spot::<A>).put(update_spot::<A>),
        )
        .route("/admin/entrance", put(set_entrance::<A>))
        .route("/admin/layout", put(set_layout::<A>))
        .fallback_service(ServeDir::new("web"))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

impl IntoResponse for LotError {
    fn into_response(self) -> Response {
        let (code, remote_status) = match &self {
            LotError::InvalidIdentifier(_) | LotError::InvalidLayout(_) => (StatusCode::BAD_REQUEST, None),
            LotError::DuplicateKey { .. } => (StatusCode::CONFLICT, None),
            LotError::RemoteOperationFailed { status, .. } => (StatusCode::BAD_GATEWAY, Some(*status)),
            LotError::Http(_) => (StatusCode::BAD_GATEWAY, None),
        };
        let body = json!({ "error": self.to_string(), "remoteStatus": remote_status });
        (code, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, LotError>;

async fn list_spots<A: SpotApi>(State(st): State<ApiState<A>>) -> impl IntoResponse {
    let lot = st.lot.read().await;
    Json(lot.store().spots().to_vec())
}

async fn get_scene<A: SpotApi>(State(st): State<ApiState<A>>) -> ApiResult<Json<serde_json::Value>> {
    let lot = st.lot.read().await;
    let scene = build_scene(lot.store().spots(), lot.reference_point(), lot.layout(), lot.derived())?;
    Ok(Json(scene))
}

async fn get_summary<A: SpotApi>(State(st): State<ApiState<A>>) -> impl IntoResponse {
    let lot = st.lot.read().await;
    Json(lot.derived().clone())
}

/// 204 si no queda ninguna plaza libre
async fn get_nearest<A: SpotApi>(State(st): State<ApiState<A>>) -> Response {
    let lot = st.lot.read().await;
    match lot.nearest_spot() {
        Some(spot) => Json(spot.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn get_popup<A: SpotApi>(State(st): State<ApiState<A>>) -> impl IntoResponse {
    let lot = st.lot.read().await;
    Json(json!({ "popup": lot.popup(), "form": lot.form() }))
}

fn parse_popup(kind: &str) -> Result<Popup, StatusCode> {
    serde_json::from_value(json!(kind)).map_err(|_| StatusCode::NOT_FOUND)
}

async fn open_popup<A: SpotApi>(State(st): State<ApiState<A>>, Path(kind): Path<String>) -> Response {
    match parse_popup(&kind) {
        Ok(popup) => {
            let mut lot = st.lot.write().await;
            lot.open(popup);
            Json(json!({ "popup": lot.popup() })).into_response()
        }
        Err(code) => code.into_response(),
    }
}

async fn close_popup<A: SpotApi>(State(st): State<ApiState<A>>, Path(kind): Path<String>) -> Response {
    match parse_popup(&kind) {
        Ok(popup) => {
            let mut lot = st.lot.write().await;
            lot.close(popup);
            Json(json!({ "popup": lot.popup() })).into_response()
        }
        Err(code) => code.into_response(),
    }
}

/// Cuerpo de las operaciones de plaza; `status` sólo aplica a la actualización
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotForm {
    pub spot_id: String,
    #[serde(default, alias = "subCol")]
    pub sub_column: SubColumn,
    #[serde(default)]
    pub status: SpotStatus,
}

async fn submit_pending<A: SpotApi>(
    State(st): State<ApiState<A>>,
    form: Option<Json<SpotForm>>,
) -> ApiResult<Response> {
    let mut lot = st.lot.write().await;
    if let Some(Json(f)) = form {
        let pending = lot.form_mut();
        pending.spot_id = f.spot_id;
        pending.sub_column = f.sub_column;
        pending.status = f.status;
    }
    Ok(match lot.submit_pending().await? {
        Some(spot) => Json(spot).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn add_spot<A: SpotApi>(State(st): State<ApiState<A>>, Json(f): Json<SpotForm>) -> ApiResult<impl IntoResponse> {
    let mut lot = st.lot.write().await;
    let spot = lot.submit_add(&f.spot_id, f.sub_column).await?;
    Ok((StatusCode::CREATED, Json(spot)))
}

async fn remove_spot<A: SpotApi>(State(st): State<ApiState<A>>, Json(f): Json<SpotForm>) -> ApiResult<impl IntoResponse> {
    let mut lot = st.lot.write().await;
    let spot = lot.submit_remove(&f.spot_id, f.sub_column).await?;
    Ok(Json(spot))
}

async fn update_spot<A: SpotApi>(State(st): State<ApiState<A>>, Json(f): Json<SpotForm>) -> ApiResult<impl IntoResponse> {
    let mut lot = st.lot.write().await;
    let spot = lot.submit_update(&f.spot_id, f.sub_column, f.status).await?;
    Ok(Json(spot))
}

async fn set_entrance<A: SpotApi>(State(st): State<ApiState<A>>, Json(p): Json<Point>) -> ApiResult<impl IntoResponse> {
    let mut lot = st.lot.write().await;
    lot.submit_entrance(p)?;
    Ok(Json(lot.derived().clone()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutForm {
    pub unit_width: f64,
}

async fn set_layout<A: SpotApi>(State(st): State<ApiState<A>>, Json(f): Json<LayoutForm>) -> ApiResult<impl IntoResponse> {
    let mut lot = st.lot.write().await;
    lot.set_unit_width(f.unit_width)?;
    Ok(Json(lot.derived().clone()))
}
