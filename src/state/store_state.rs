// ============================================================================
// STORE STATE - Tienda actual (solo el id se persiste en "store-info")
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use serde::{Deserialize, Serialize};
use crate::models::StoreInfo;
use crate::services::BackendApi;
use crate::utils::storage::{load_from_storage, save_to_storage, StorageBackend, STORAGE_KEY_STORE_INFO};

const NO_ADDRESS_LABEL: &str = "No address available";
const NO_HOURS_LABEL: &str = "Business hours not set";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStoreState {
    current_store_id: String,
}

#[derive(Clone)]
pub struct StoreState {
    store_id: Rc<RefCell<String>>,
    store_info: Rc<RefCell<Option<StoreInfo>>>,
    loading: Rc<Cell<bool>>,
    error: Rc<RefCell<Option<String>>>,
    backend: Rc<dyn BackendApi>,
    storage: Rc<dyn StorageBackend>,
}

impl StoreState {
    pub fn new(backend: Rc<dyn BackendApi>, storage: Rc<dyn StorageBackend>, default_store_id: &str) -> Self {
        let store_id = load_from_storage::<PersistedStoreState>(storage.as_ref(), STORAGE_KEY_STORE_INFO)
            .map(|p| p.current_store_id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| default_store_id.to_string());
        Self {
            store_id: Rc::new(RefCell::new(store_id)),
            store_info: Rc::new(RefCell::new(None)),
            loading: Rc::new(Cell::new(false)),
            error: Rc::new(RefCell::new(None)),
            backend,
            storage,
        }
    }

    pub fn current_store_id(&self) -> String {
        self.store_id.borrow().clone()
    }

    /// Cambia de tienda y descarta la info anterior
    pub fn set_store_id(&self, store_id: &str) {
        *self.store_id.borrow_mut() = store_id.to_string();
        *self.store_info.borrow_mut() = None;
        let persisted = PersistedStoreState {
            current_store_id: store_id.to_string(),
        };
        if let Err(e) = save_to_storage(self.storage.as_ref(), STORAGE_KEY_STORE_INFO, &persisted) {
            log::warn!("⚠️ [STORE] No se pudo persistir store-info: {}", e);
        }
    }

    pub fn store_info(&self) -> Option<StoreInfo> {
        self.store_info.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Info siempre en vivo (sin caché); `None` = tienda actual
    pub async fn fetch_store_info(&self, store_id: Option<&str>) -> Result<StoreInfo, String> {
        let target = store_id
            .map(str::to_string)
            .unwrap_or_else(|| self.current_store_id());

        self.loading.set(true);
        *self.error.borrow_mut() = None;

        let result = self.backend.fetch_store_info(&target).await;
        self.loading.set(false);

        match result {
            Ok(info) => {
                *self.store_info.borrow_mut() = Some(info.clone());
                Ok(info)
            }
            Err(e) => {
                log::error!("❌ [STORE] Error obteniendo tienda {}: {}", target, e);
                *self.error.borrow_mut() = Some(e.clone());
                Err(e)
            }
        }
    }

    pub async fn refresh_store_info(&self) -> Result<StoreInfo, String> {
        self.fetch_store_info(None).await
    }

    pub fn clear_store_info(&self) {
        *self.store_info.borrow_mut() = None;
        *self.error.borrow_mut() = None;
    }

    pub fn is_store_open(&self) -> bool {
        self.store_info
            .borrow()
            .as_ref()
            .map(StoreInfo::is_open)
            .unwrap_or(false)
    }

    pub fn store_address(&self) -> String {
        self.store_info
            .borrow()
            .as_ref()
            .map(|info| info.address.clone())
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| NO_ADDRESS_LABEL.to_string())
    }

    /// Primera franja horaria como "inicio - fin"
    pub fn business_hours_label(&self) -> String {
        self.store_info
            .borrow()
            .as_ref()
            .and_then(|info| info.business_hours.first().cloned())
            .map(|hours| format!("{} - {}", hours.start, hours.end))
            .unwrap_or_else(|| NO_HOURS_LABEL.to_string())
    }
}
