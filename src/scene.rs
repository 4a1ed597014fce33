//! scene.rs
//! Escena para el lienzo: rectángulo + etiqueta por plaza y el coche como círculo.
//! Colores: verde la más cercana, blanco libre, rojo ocupada.

use serde_json::json;

use crate::error::Result;
use crate::layout::Layout;
use crate::models::types::{Derived, ParkingSpot, Point, SpotKey, SpotStatus};

const STROKE: &str = "black";
const SPOT_STROKE_WIDTH: u32 = 4;
const LABEL_FONT_SIZE: u32 = 15;
const CAR_RADIUS: f64 = 20.0;

fn fill_for(spot: &ParkingSpot, nearest: Option<&SpotKey>) -> &'static str {
    let is_nearest = nearest.is_some_and(|k| spot.matches(&k.spot_id, k.sub_column));
    match (is_nearest, spot.status) {
        (true, _) => "green",
        (false, SpotStatus::Free) => "white",
        (false, SpotStatus::Occupied) => "red",
    }
}

/// Construye la escena completa. Falla con `InvalidIdentifier` antes que
/// pintar una plaza en una coordenada basura.
pub fn build_scene(
    spots: &[ParkingSpot],
    reference: Point,
    layout: &Layout,
    derived: &Derived,
) -> Result<serde_json::Value> {
    let mut shapes = Vec::with_capacity(spots.len());
    for spot in spots {
        let pos = layout.position(&spot.spot_id, spot.sub_column)?;
        let label = layout.label_anchor(&spot.spot_id, spot.sub_column)?;
        shapes.push(json!({
            "key": format!("{}{}", spot.spot_id, spot.sub_column),
            "spotId": spot.spot_id,
            "subColumn": spot.sub_column,
            "status": spot.status,
            "rect": {
                "x": pos.x, "y": pos.y,
                "width": layout.spot_width(), "height": layout.spot_height(),
                "fill": fill_for(spot, derived.nearest.as_ref()),
                "stroke": STROKE, "strokeWidth": SPOT_STROKE_WIDTH
            },
            "label": {
                "x": label.x, "y": label.y,
                "text": spot.spot_id, "fontSize": LABEL_FONT_SIZE, "align": "center"
            }
        }));
    }

    Ok(json!({
        "unitWidth": layout.unit_width,
        "car": {
            "x": reference.x, "y": reference.y, "radius": CAR_RADIUS,
            "fill": "yellow", "stroke": STROKE, "strokeWidth": 2
        },
        "spots": shapes,
        "nearest": derived.nearest,
        "summary": derived.summary,
        "updatedAt": derived.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LotError;
    use crate::models::types::SubColumn::{Left, Right};
    use crate::models::types::SpotStatus::{Free, Occupied};
    use crate::nearest::{select_nearest, summarize};

    #[test]
    fn colours_follow_nearest_and_status() {
        let layout = Layout::default();
        let spots = vec![
            ParkingSpot::new("A1", Left, Free),
            ParkingSpot::new("A1", Right, Occupied),
            ParkingSpot::new("B1", Left, Free),
        ];
        let reference = layout.position("A1", Left).unwrap();
        let derived = Derived {
            nearest: select_nearest(&spots, reference, &layout).unwrap().map(ParkingSpot::key),
            summary: summarize(&spots),
            updated_at: String::new(),
        };

        let scene = build_scene(&spots, reference, &layout, &derived).unwrap();
        let fills: Vec<_> = scene["spots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["rect"]["fill"].as_str().unwrap())
            .collect();
        assert_eq!(fills, ["green", "red", "white"]);
        assert_eq!(scene["spots"][1]["key"], "A1right");
        assert_eq!(scene["spots"][0]["rect"]["height"], 40.0);
        assert_eq!(scene["car"]["radius"], 20.0);
        assert_eq!(scene["summary"]["freeCount"], 2);
        assert_eq!(scene["nearest"]["spotId"], "A1");
    }

    #[test]
    fn empty_lot_has_no_nearest() {
        let scene = build_scene(&[], Point::new(400.0, 500.0), &Layout::default(), &Derived::default()).unwrap();
        assert!(scene["nearest"].is_null());
        assert_eq!(scene["spots"].as_array().unwrap().len(), 0);
        assert_eq!(scene["summary"]["occupiedCount"], 0);
    }

    #[test]
    fn invalid_identifier_is_not_drawn() {
        let spots = vec![ParkingSpot::new("9Z", Left, Occupied)];
        let err = build_scene(&spots, Point::default(), &Layout::default(), &Derived::default()).unwrap_err();
        assert!(matches!(err, LotError::InvalidIdentifier(_)));
    }
}
