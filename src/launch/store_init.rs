// ============================================================================
// STORE INITIALIZER - Carga de la tienda condicionada a la sesión
// ============================================================================

use crate::launch::{AuthReadinessGate, LaunchError};
use crate::models::StoreInfo;
use crate::state::StoreState;

#[derive(Clone)]
pub struct StoreInitializer {
    gate: AuthReadinessGate,
    store: StoreState,
}

impl StoreInitializer {
    pub fn new(gate: AuthReadinessGate, store: StoreState) -> Self {
        Self { gate, store }
    }

    /// Espera la sesión y carga la tienda (`None` = tienda actual)
    pub async fn init_store(&self, store_id: Option<&str>) -> Result<StoreInfo, LaunchError> {
        if !self.gate.ensure_auth().await {
            return Err(LaunchError::Authentication(
                "user is not authenticated, cannot load store".to_string(),
            ));
        }
        self.store
            .fetch_store_info(store_id)
            .await
            .map_err(LaunchError::Hydration)
    }

    /// Recarga aunque la sesión no esté lista (modo degradado)
    pub async fn refresh_store(&self) -> Result<StoreInfo, LaunchError> {
        if !self.gate.ensure_auth().await {
            log::warn!("⚠️ [STORE] Refrescando tienda sin sesión confirmada");
        }
        self.store
            .refresh_store_info()
            .await
            .map_err(LaunchError::Hydration)
    }

    pub async fn set_store_id(&self, store_id: &str) -> Result<StoreInfo, LaunchError> {
        log::info!("🏪 [STORE] Cambio de tienda → {}", store_id);
        self.store.set_store_id(store_id);
        self.init_store(Some(store_id)).await
    }
}
