//! main.rs — Servicio del parking: carga inicial de plazas + API HTTP

use anyhow::Result;
use reqwest::Client;
use std::{env, sync::Arc};
use tokio::{signal, sync::RwLock};
use tracing::{info, warn, Level};

use parkgrid::api::{self, ApiState};
use parkgrid::{AdminCoordinator, AppCfg, HttpSpotApi, Layout};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs
    tracing_subscriber::fmt().with_env_filter("info").with_max_level(Level::INFO).init();

    let cfg = app_cfg_from_env();

    // HTTP client con compresión
    let client = Client::builder().brotli(true).gzip(true).deflate(true).build()?;
    let spots_api = HttpSpotApi::new(client, cfg.api_url.clone());

    let mut lot = AdminCoordinator::new(spots_api, Layout::new(cfg.unit_width), cfg.reference_point());

    // Una sola carga, sin reintentos: si falla se arranca con el parking vacío
    info!("Cargando plazas de {}", cfg.api_url);
    if let Err(e) = lot.load().await {
        warn!("carga inicial fallida, parking vacío: {e}");
    }

    let app = api::router(ApiState { lot: Arc::new(RwLock::new(lot)) });
    info!("Escuchando en http://{}", cfg.bind);
    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}

fn app_cfg_from_env() -> AppCfg {
    let mut c = AppCfg::default();
    if let Ok(v) = env::var("BIND") { c.bind = v; }
    if let Ok(v) = env::var("SPOTS_API_URL") { c.api_url = v; }
    if let Ok(v) = env::var("UNIT_WIDTH") { c.unit_width = v.parse().ok().filter(|w: &f64| *w > 0.0).unwrap_or(c.unit_width); }
    if let Ok(v) = env::var("CAR_X") { c.car_x = v.parse().unwrap_or(c.car_x); }
    if let Ok(v) = env::var("CAR_Y") { c.car_y = v.parse().unwrap_or(c.car_y); }
    c
}
