//! nearest.rs
//! Plaza libre más cercana al punto de referencia y conteo libre/ocupado.
//! Recorrido completo O(n) en cada recálculo, sin caché de distancias.

use crate::error::Result;
use crate::layout::Layout;
use crate::models::types::{OccupancySummary, ParkingSpot, Point, SpotStatus};

/// Devuelve la plaza libre con distancia euclídea mínima a `reference`.
/// Empates: gana la primera en el orden de `spots`.
/// Un identificador inválido en una plaza libre propaga `InvalidIdentifier`.
pub fn select_nearest<'a>(
    spots: &'a [ParkingSpot],
    reference: Point,
    layout: &Layout,
) -> Result<Option<&'a ParkingSpot>> {
    let mut nearest: Option<&ParkingSpot> = None;
    let mut min_distance = f64::INFINITY;
    for spot in spots.iter().filter(|s| s.is_free()) {
        let pos = layout.position(&spot.spot_id, spot.sub_column)?;
        let d = reference.distance(&pos);
        if d < min_distance {
            min_distance = d;
            nearest = Some(spot);
        }
    }
    Ok(nearest)
}

pub fn summarize(spots: &[ParkingSpot]) -> OccupancySummary {
    spots.iter().fold(OccupancySummary::default(), |mut acc, s| {
        match s.status {
            SpotStatus::Free => acc.free_count += 1,
            SpotStatus::Occupied => acc.occupied_count += 1,
        }
        acc
    })
}
