//! store.rs
//! Colección local de plazas. Orden = orden de inserción (carga inicial y
//! luego altas al final); es el orden que usa el desempate del más cercano.
//! Ninguna operación hace I/O: reciben el resultado ya resuelto de la API.

use crate::error::{LotError, Result};
use crate::models::types::{ParkingSpot, SubColumn};

#[derive(Clone, Debug, Default)]
pub struct SpotStore {
    spots: Vec<ParkingSpot>,
}

impl SpotStore {
    pub fn new() -> Self { Self::default() }

    pub fn spots(&self) -> &[ParkingSpot] { &self.spots }
    pub fn len(&self) -> usize { self.spots.len() }
    pub fn is_empty(&self) -> bool { self.spots.is_empty() }

    pub fn get(&self, spot_id: &str, sub_column: SubColumn) -> Option<&ParkingSpot> {
        self.spots.iter().find(|s| s.matches(spot_id, sub_column))
    }

    pub fn contains(&self, spot_id: &str, sub_column: SubColumn) -> bool {
        self.get(spot_id, sub_column).is_some()
    }

    /// Tras la carga masiva. Si el snapshot trae claves repetidas se queda la primera.
    pub fn replace_all(&mut self, new_spots: Vec<ParkingSpot>) {
        self.spots.clear();
        for spot in new_spots {
            if !self.contains(&spot.spot_id, spot.sub_column) {
                self.spots.push(spot);
            } else {
                tracing::debug!("snapshot con clave repetida {}, se ignora", spot.key());
            }
        }
    }

    /// Tras un alta correcta. Nunca duplica la clave.
    pub fn append(&mut self, spot: ParkingSpot) -> Result<()> {
        if self.contains(&spot.spot_id, spot.sub_column) {
            return Err(LotError::DuplicateKey { spot_id: spot.spot_id, sub_column: spot.sub_column });
        }
        self.spots.push(spot);
        Ok(())
    }

    /// Tras una baja correcta. Clave ausente = no-op (respuesta tardía o duplicada).
    pub fn remove_by_key(&mut self, spot_id: &str, sub_column: SubColumn) -> Option<ParkingSpot> {
        let idx = self.spots.iter().position(|s| s.matches(spot_id, sub_column))?;
        Some(self.spots.remove(idx))
    }

    /// Tras una actualización: reemplaza en su sitio o añade al final.
    pub fn upsert(&mut self, spot: ParkingSpot) {
        match self.spots.iter_mut().find(|s| s.matches(&spot.spot_id, spot.sub_column)) {
            Some(slot) => *slot = spot,
            None => self.spots.push(spot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::SpotStatus::{Free, Occupied};
    use crate::models::types::SubColumn::{Left, Right};

    fn store() -> SpotStore {
        let mut s = SpotStore::new();
        s.replace_all(vec![
            ParkingSpot::new("A1", Left, Free),
            ParkingSpot::new("A1", Right, Occupied),
        ]);
        s
    }

    #[test]
    fn replace_all_discards_previous_contents() {
        let mut s = store();
        s.replace_all(vec![ParkingSpot::new("Z9", Right, Free)]);
        assert_eq!(s.len(), 1);
        assert!(s.contains("Z9", Right));
        assert!(!s.contains("A1", Left));
    }

    #[test]
    fn replace_all_keeps_keys_unique() {
        let mut s = SpotStore::new();
        s.replace_all(vec![
            ParkingSpot::new("A1", Left, Free),
            ParkingSpot::new("A1", Left, Occupied),
        ]);
        assert_eq!(s.spots(), &[ParkingSpot::new("A1", Left, Free)]);
    }

    #[test]
    fn append_adds_once_then_refuses() {
        let mut s = store();
        s.append(ParkingSpot::new("B1", Left, Free)).unwrap();
        assert_eq!(s.len(), 3);
        assert!(s.contains("B1", Left));

        let before = s.spots().to_vec();
        let err = s.append(ParkingSpot::new("B1", Left, Occupied)).unwrap_err();
        assert!(matches!(err, LotError::DuplicateKey { ref spot_id, sub_column: Left } if spot_id == "B1"));
        assert_eq!(s.spots(), before.as_slice());
    }

    #[test]
    fn remove_absent_key_is_a_noop() {
        let mut s = store();
        let before = s.spots().to_vec();
        assert!(s.remove_by_key("Q7", Left).is_none());
        assert!(s.remove_by_key("A1", Right).is_some());
        assert!(s.remove_by_key("A1", Right).is_none());
        assert_eq!(s.len(), before.len() - 1);
        assert_eq!(s.spots(), &before[..1]);
    }

    #[test]
    fn upsert_replaces_in_place_or_appends() {
        let mut s = store();
        s.upsert(ParkingSpot::new("A1", Left, Occupied));
        assert_eq!(s.len(), 2);
        assert_eq!(s.spots()[0], ParkingSpot::new("A1", Left, Occupied));

        s.upsert(ParkingSpot::new("C4", Right, Free));
        assert_eq!(s.len(), 3);
        assert_eq!(s.spots()[2].spot_id, "C4");
    }
}
