//! parkgrid
//! Parking en rejilla: geometría de plazas, plaza libre más cercana al coche
//! y reconciliación local de las operaciones de admin contra la API remota.

pub mod admin;
pub mod api;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod models;
pub mod nearest;
pub mod scene;
pub mod store;

pub use admin::{AdminCoordinator, PendingForm, Popup};
pub use error::{LotError, Result};
pub use fetch::{HttpSpotApi, SpotApi};
pub use layout::Layout;
pub use models::types::{AppCfg, Derived, OccupancySummary, ParkingSpot, Point, SpotKey, SpotStatus, SubColumn};
pub use store::SpotStore;
