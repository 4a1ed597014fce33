//! types.rs
//! Modelos de datos compartidos: plazas de aparcamiento tal y como las
//! devuelve la API remota, punto de referencia (coche / entrada),
//! configuración del servicio y estado derivado

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sub-columna dentro de una columna con letra: dos bahías físicas por letra.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubColumn {
    #[default]
    Left,
    Right,
}

impl fmt::Display for SubColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubColumn::Left => f.write_str("left"),
            SubColumn::Right => f.write_str("right"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    #[default]
    Free,
    Occupied,
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotStatus::Free => f.write_str("free"),
            SpotStatus::Occupied => f.write_str("occupied"),
        }
    }
}

/// Registro de plaza (copia local del documento remoto).
/// Campos extra del backend (p.ej. `_id`) se ignoran al deserializar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    /// `<Letra><Entero>`, p.ej. "C3"
    pub spot_id: String,
    pub sub_column: SubColumn,
    pub status: SpotStatus,
}

impl ParkingSpot {
    pub fn new(spot_id: impl Into<String>, sub_column: SubColumn, status: SpotStatus) -> Self {
        Self { spot_id: spot_id.into(), sub_column, status }
    }

    pub fn key(&self) -> SpotKey {
        SpotKey { spot_id: self.spot_id.clone(), sub_column: self.sub_column }
    }

    #[inline]
    pub fn matches(&self, spot_id: &str, sub_column: SubColumn) -> bool {
        self.spot_id == spot_id && self.sub_column == sub_column
    }

    #[inline]
    pub fn is_free(&self) -> bool { self.status == SpotStatus::Free }
}

/// Clave natural de una plaza: (spotId, subColumn)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotKey {
    pub spot_id: String,
    pub sub_column: SubColumn,
}

impl SpotKey {
    pub fn new(spot_id: impl Into<String>, sub_column: SubColumn) -> Self {
        Self { spot_id: spot_id.into(), sub_column }
    }
}

impl fmt::Display for SpotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.spot_id, self.sub_column)
    }
}

/// Punto 2D en píxeles del lienzo
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Conteo libre/ocupado. Invariante: free + occupied == total de plazas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub free_count: usize,
    pub occupied_count: usize,
}

impl OccupancySummary {
    pub fn total(&self) -> usize { self.free_count + self.occupied_count }
}

/// Estado derivado: se recalcula entero tras cada cambio en plazas o punto de referencia
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    pub nearest: Option<SpotKey>,
    pub summary: OccupancySummary,
    pub updated_at: String,
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    /// Dirección/puerto del servidor HTTP (Axum)
    pub bind: String,

    /// Base de la API remota de plazas (CRUD)
    pub api_url: String,

    /// Ancho de plaza en píxeles; toda la geometría sale de aquí
    pub unit_width: f64,

    /// Posición inicial del coche / entrada
    pub car_x: f64,
    pub car_y: f64,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            api_url: "http://localhost:3000".into(),
            unit_width: 80.0,
            car_x: 400.0,
            car_y: 500.0,
        }
    }
}

impl AppCfg {
    pub fn reference_point(&self) -> Point { Point::new(self.car_x, self.car_y) }
}
