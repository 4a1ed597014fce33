//! admin.rs
//!
//! Coordinador de operaciones de administración.
//!
//! - Máquina de estados de popups: como mucho uno abierto (add / remove /
//!   update / entrance). Abrir uno cierra el resto.
//! - Alta / baja / actualización contra la API remota y reconciliación de la
//!   colección local con la respuesta del servidor (no con lo tecleado).
//! - Recalcula el estado derivado (más cercana + conteos) justo después de
//!   cada cambio en plazas, punto de referencia o geometría.
//!
//! Pensado para acciones humanas secuenciales: sin cancelación ni bloqueo
//! optimista. Dos operaciones en carrera sobre la misma clave → gana la
//! última respuesta.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LotError, Result};
use crate::fetch::SpotApi;
use crate::layout::{parse_spot_id, Layout};
use crate::models::types::{Derived, ParkingSpot, Point, SpotStatus, SubColumn};
use crate::nearest::{select_nearest, summarize};
use crate::store::SpotStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Popup {
    #[default]
    #[serde(rename = "none")]
    Closed,
    Add,
    Remove,
    Update,
    Entrance,
}

/// Campos del formulario pendiente, compartidos por los popups de plazas
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingForm {
    pub spot_id: String,
    pub sub_column: SubColumn,
    pub status: SpotStatus,
}

pub struct AdminCoordinator<A> {
    api: A,
    store: SpotStore,
    layout: Layout,
    reference: Point,
    popup: Popup,
    form: PendingForm,
    derived: Derived,
}

impl<A: SpotApi> AdminCoordinator<A> {
    pub fn new(api: A, layout: Layout, reference: Point) -> Self {
        Self {
            api,
            store: SpotStore::new(),
            layout,
            reference,
            popup: Popup::Closed,
            form: PendingForm::default(),
            derived: Derived::default(),
        }
    }

    pub fn api(&self) -> &A { &self.api }
    pub fn store(&self) -> &SpotStore { &self.store }
    pub fn layout(&self) -> &Layout { &self.layout }
    pub fn reference_point(&self) -> Point { self.reference }
    pub fn popup(&self) -> Popup { self.popup }
    pub fn form(&self) -> &PendingForm { &self.form }
    pub fn form_mut(&mut self) -> &mut PendingForm { &mut self.form }
    pub fn derived(&self) -> &Derived { &self.derived }

    pub fn nearest_spot(&self) -> Option<&ParkingSpot> {
        let key = self.derived.nearest.as_ref()?;
        self.store.get(&key.spot_id, key.sub_column)
    }

    // --------------
    // Popups
    // --------------

    /// Abre `popup` y cierra cualquier otro. `Closed` equivale a cerrar todo.
    pub fn open(&mut self, popup: Popup) {
        self.popup = popup;
    }

    /// Cierra `popup` sólo si es el activo
    pub fn close(&mut self, popup: Popup) {
        if self.popup == popup {
            self.popup = Popup::Closed;
        }
    }

    // --------------
    // Estado derivado
    // --------------

    /// Recalcula más cercana + conteos. Con datos reconciliados no falla;
    /// si alguien mete un identificador inválido en la colección, deja
    /// `nearest = None` y lo propaga.
    pub fn recompute(&mut self) -> Result<()> {
        self.derived.summary = summarize(self.store.spots());
        self.derived.updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.derived.nearest = None;
        let nearest = select_nearest(self.store.spots(), self.reference, &self.layout)?;
        self.derived.nearest = nearest.map(ParkingSpot::key);
        Ok(())
    }

    /// Carga inicial. Sin reintentos: si falla (red o algún identificador
    /// inválido en el snapshot) la colección queda vacía y el estado derivado
    /// en "sin plazas".
    pub async fn load(&mut self) -> Result<usize> {
        let snapshot = self
            .api
            .list_spots()
            .await
            .and_then(|spots| spots.iter().try_for_each(check_record).map(|_| spots));
        match snapshot {
            Ok(spots) => {
                self.store.replace_all(spots);
                info!("plazas cargadas: {}", self.store.len());
                self.recompute()?;
                Ok(self.store.len())
            }
            Err(e) => {
                warn!("carga inicial: {e}");
                self.store.replace_all(Vec::new());
                self.recompute()?;
                Err(e)
            }
        }
    }

    pub fn set_reference_point(&mut self, reference: Point) -> Result<()> {
        self.reference = reference;
        self.recompute()
    }

    pub fn set_unit_width(&mut self, unit_width: f64) -> Result<()> {
        self.layout = Layout::checked(unit_width)?;
        self.recompute()
    }

    // --------------
    // Operaciones de admin
    // --------------

    /// Cualquier fallo descarta lo tecleado; el popup sigue abierto.
    pub async fn submit_add(&mut self, spot_id: &str, sub_column: SubColumn) -> Result<ParkingSpot> {
        let result = self.try_add(spot_id, sub_column).await;
        match &result {
            Ok(created) => {
                info!("alta ok: {}", created.key());
                self.finish(Popup::Add)?;
            }
            Err(e) => {
                warn!("alta {spot_id}/{sub_column}: {e}");
                self.form = PendingForm::default();
            }
        }
        result
    }

    async fn try_add(&mut self, spot_id: &str, sub_column: SubColumn) -> Result<ParkingSpot> {
        parse_spot_id(spot_id)?;
        let created = self.api.create_spot(spot_id, sub_column).await?;
        check_record(&created)?;
        self.store.append(created.clone())?;
        Ok(created)
    }

    /// Reconciliación con la clave que devuelve el servidor.
    pub async fn submit_remove(&mut self, spot_id: &str, sub_column: SubColumn) -> Result<ParkingSpot> {
        require_id(spot_id)?;
        let deleted = self.api.delete_spot(spot_id, sub_column).await.inspect_err(|e| {
            warn!("baja {spot_id}/{sub_column}: {e}");
        })?;
        if self.store.remove_by_key(&deleted.spot_id, deleted.sub_column).is_none() {
            info!("baja de {} ya aplicada localmente", deleted.key());
        } else {
            info!("baja ok: {}", deleted.key());
        }
        self.finish(Popup::Remove)?;
        Ok(deleted)
    }

    pub async fn submit_update(
        &mut self,
        spot_id: &str,
        sub_column: SubColumn,
        status: SpotStatus,
    ) -> Result<ParkingSpot> {
        require_id(spot_id)?;
        let updated = self.api.update_spot(spot_id, sub_column, status).await.inspect_err(|e| {
            warn!("actualización {spot_id}/{sub_column}: {e}");
        })?;
        check_record(&updated).inspect_err(|e| warn!("actualización {spot_id}/{sub_column}: {e}"))?;
        self.store.upsert(updated.clone());
        info!("actualización ok: {} -> {}", updated.key(), updated.status);
        self.finish(Popup::Update)?;
        Ok(updated)
    }

    /// Aplica el formulario pendiente a la operación del popup abierto.
    /// `entrance` no toca plazas (ver `submit_entrance`); sin popup → `Ok(None)`.
    pub async fn submit_pending(&mut self) -> Result<Option<ParkingSpot>> {
        let PendingForm { spot_id, sub_column, status } = self.form.clone();
        let spot = match self.popup {
            Popup::Add => self.submit_add(&spot_id, sub_column).await?,
            Popup::Remove => self.submit_remove(&spot_id, sub_column).await?,
            Popup::Update => self.submit_update(&spot_id, sub_column, status).await?,
            Popup::Entrance | Popup::Closed => return Ok(None),
        };
        Ok(Some(spot))
    }

    pub fn submit_entrance(&mut self, reference: Point) -> Result<()> {
        self.close(Popup::Entrance);
        self.set_reference_point(reference)
    }

    fn finish(&mut self, popup: Popup) -> Result<()> {
        self.form = PendingForm::default();
        self.close(popup);
        self.recompute()
    }
}

/// Un registro del servidor sólo entra en la colección si su identificador
/// es válido; así `recompute` nunca falla sobre datos reconciliados.
fn check_record(spot: &ParkingSpot) -> Result<()> {
    parse_spot_id(&spot.spot_id).map(|_| ())
}

fn require_id(spot_id: &str) -> Result<()> {
    if spot_id.trim().is_empty() {
        return Err(LotError::InvalidIdentifier(spot_id.to_string()));
    }
    Ok(())
}
