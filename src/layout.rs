//! layout.rs
//!
//! Geometría del parking: de identificador de plaza a posición en el lienzo.
//!
//! - `A..Z` es la columna (A=0), el entero es la fila (1-based).
//! - Cada columna con letra tiene dos bahías (`left` / `right`), la derecha
//!   desplazada exactamente `unit_width` en x.
//! - Todo depende de `unit_width`: cambiarlo reescala el parking entero.
//!
//! Funciones puras y deterministas; no tocan red ni estado.

use crate::error::{LotError, Result};
use crate::models::types::{Point, SubColumn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub unit_width: f64,
}

impl Default for Layout {
    fn default() -> Self { Self { unit_width: 80.0 } }
}

/// (columna, fila) ambas 0-based
pub fn parse_spot_id(spot_id: &str) -> Result<(u32, u32)> {
    let invalid = || LotError::InvalidIdentifier(spot_id.to_string());

    let mut chars = spot_id.chars();
    let letter = chars.next().filter(|c| c.is_ascii_uppercase()).ok_or_else(invalid)?;
    let rest = chars.as_str();
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let row: u32 = rest.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    Ok((letter as u32 - 'A' as u32, row - 1))
}

impl Layout {
    pub fn new(unit_width: f64) -> Self { Self { unit_width } }

    /// Como `new`, pero rechaza anchos nulos, negativos o no finitos
    pub fn checked(unit_width: f64) -> Result<Self> {
        if !(unit_width.is_finite() && unit_width > 0.0) {
            return Err(LotError::InvalidLayout(unit_width));
        }
        Ok(Self { unit_width })
    }

    #[inline] pub fn spot_width(&self) -> f64 { self.unit_width }
    #[inline] pub fn spot_height(&self) -> f64 { self.unit_width / 2.0 }
    #[inline] fn x_multiplier(&self) -> f64 { self.unit_width * 2.0 + self.unit_width / 3.0 }
    #[inline] fn x_offset(&self) -> f64 { self.unit_width / 6.0 }
    #[inline] fn y_offset(&self) -> f64 { self.unit_width }
    #[inline] fn y_multiplier(&self) -> f64 { self.unit_width / 2.0 }

    /// Esquina superior izquierda del rectángulo de la plaza.
    pub fn position(&self, spot_id: &str, sub_column: SubColumn) -> Result<Point> {
        let (column, row) = parse_spot_id(spot_id)?;
        let right_shift = match sub_column {
            SubColumn::Right => self.unit_width,
            SubColumn::Left => 0.0,
        };
        Ok(Point::new(
            self.x_offset() + column as f64 * self.x_multiplier() + right_shift,
            self.y_offset() + row as f64 * self.y_multiplier(),
        ))
    }

    /// Ancla de la etiqueta: reutiliza `x_offset` en ambos ejes para centrar el texto
    pub fn label_anchor(&self, spot_id: &str, sub_column: SubColumn) -> Result<Point> {
        let p = self.position(spot_id, sub_column)?;
        Ok(Point::new(p.x + self.x_offset(), p.y + self.x_offset()))
    }
}
