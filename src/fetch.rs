//! fetch.rs
//! Cliente de la API remota de plazas (listar / alta / baja / actualización).
//! Respuestas no-2xx se convierten en `RemoteOperationFailed` con el cuerpo como mensaje.

use std::future::Future;

use reqwest::{Client, Response};
use serde::Serialize;

use crate::error::{LotError, Result};
use crate::models::types::{ParkingSpot, SpotStatus, SubColumn};

/// Colaborador CRUD. El coordinador sólo conoce este trait.
/// Futuros `Send` para poder usarse detrás de los handlers de axum.
pub trait SpotApi: Send + Sync {
    fn list_spots(&self) -> impl Future<Output = Result<Vec<ParkingSpot>>> + Send;
    fn create_spot(&self, spot_id: &str, sub_column: SubColumn) -> impl Future<Output = Result<ParkingSpot>> + Send;
    fn delete_spot(&self, spot_id: &str, sub_column: SubColumn) -> impl Future<Output = Result<ParkingSpot>> + Send;
    fn update_spot(
        &self,
        spot_id: &str,
        sub_column: SubColumn,
        status: SpotStatus,
    ) -> impl Future<Output = Result<ParkingSpot>> + Send;
}

// El backend espera `subCol` en las peticiones de admin
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpotReq<'a> {
    spot_id: &'a str,
    sub_col: SubColumn,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SpotStatus>,
}

#[derive(Clone)]
pub struct HttpSpotApi {
    http: Client,
    base_url: String,
}

impl HttpSpotApi {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/parking-spots{}", self.base_url, path)
    }
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(LotError::RemoteOperationFailed { status: status.as_u16(), message })
}

impl SpotApi for HttpSpotApi {
    async fn list_spots(&self) -> Result<Vec<ParkingSpot>> {
        let resp = check(self.http.get(self.url("")).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn create_spot(&self, spot_id: &str, sub_column: SubColumn) -> Result<ParkingSpot> {
        let body = SpotReq { spot_id, sub_col: sub_column, status: None };
        let resp = self.http.post(self.url("/admin/add")).json(&body).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn delete_spot(&self, spot_id: &str, sub_column: SubColumn) -> Result<ParkingSpot> {
        let body = SpotReq { spot_id, sub_col: sub_column, status: None };
        let resp = self.http.delete(self.url("/admin/delete")).json(&body).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn update_spot(&self, spot_id: &str, sub_column: SubColumn, status: SpotStatus) -> Result<ParkingSpot> {
        let body = SpotReq { spot_id, sub_col: sub_column, status: Some(status) };
        let resp = self.http.put(self.url("/admin/update")).json(&body).send().await?;
        Ok(check(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_backend_field_names() {
        let body = SpotReq { spot_id: "C3", sub_col: SubColumn::Right, status: None };
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({"spotId":"C3","subCol":"right"}));

        let body = SpotReq { spot_id: "C3", sub_col: SubColumn::Left, status: Some(SpotStatus::Occupied) };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"spotId":"C3","subCol":"left","status":"occupied"})
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let api = HttpSpotApi::new(Client::new(), "http://localhost:3000/");
        assert_eq!(api.url("/admin/add"), "http://localhost:3000/api/parking-spots/admin/add");
    }
}
