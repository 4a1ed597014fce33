//! error.rs
//! Errores del núcleo. Identificadores inválidos fallan alto;
//! los fallos remotos son condiciones esperadas y se muestran al admin.

use thiserror::Error;

use crate::models::types::SubColumn;

#[derive(Debug, Error)]
pub enum LotError {
    #[error("identificador de plaza inválido: {0:?} (esperado <Letra><Entero>, p.ej. C3)")]
    InvalidIdentifier(String),

    #[error("la plaza {spot_id}/{sub_column} ya existe")]
    DuplicateKey { spot_id: String, sub_column: SubColumn },

    #[error("ancho de plaza inválido: {0} (debe ser finito y > 0)")]
    InvalidLayout(f64),

    #[error("HTTP error! status: {status}, message: {message}")]
    RemoteOperationFailed { status: u16, message: String },

    #[error("fallo de transporte: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LotError>;
