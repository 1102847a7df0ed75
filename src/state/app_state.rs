// ============================================================================
// APP STATE - Estado del arranque + contexto de tienda (persistido en "app-state")
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use serde::{Deserialize, Serialize};
use crate::models::{BootstrapPhase, BootstrapState, StoreContext};
use crate::state::ReactiveState;
use crate::utils::storage::{load_from_storage, save_to_storage, StorageBackend, STORAGE_KEY_APP_STATE};

const REDIRECT_STEP: &str = "Redirecting to authorization...";

/// Parte persistida entre recargas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAppState {
    #[serde(default)]
    store_context: Option<StoreContext>,
    #[serde(default)]
    platform: String,
}

/// Estado de arranque; lo muta solo el orquestador
#[derive(Clone)]
pub struct AppState {
    bootstrap: ReactiveState<BootstrapState>,
    store_context: Rc<RefCell<Option<StoreContext>>>,
    platform: Rc<RefCell<String>>,
    storage: Rc<dyn StorageBackend>,
}

impl AppState {
    pub fn new(storage: Rc<dyn StorageBackend>) -> Self {
        let persisted = load_from_storage::<PersistedAppState>(storage.as_ref(), STORAGE_KEY_APP_STATE)
            .unwrap_or_default();
        Self {
            bootstrap: ReactiveState::new(BootstrapState::default()),
            store_context: Rc::new(RefCell::new(persisted.store_context)),
            platform: Rc::new(RefCell::new(persisted.platform)),
            storage,
        }
    }

    // ------------------------------------------------------------------
    // Bootstrap
    // ------------------------------------------------------------------

    pub fn bootstrap(&self) -> BootstrapState {
        self.bootstrap.get()
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.bootstrap.with(|s| s.phase)
    }

    pub fn is_initialized(&self) -> bool {
        self.bootstrap.with(|s| s.initialized)
    }

    pub fn error(&self) -> Option<String> {
        self.bootstrap.with(|s| s.error.clone())
    }

    pub fn redirect_url(&self) -> Option<String> {
        self.bootstrap.with(|s| s.redirect_url.clone())
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&BootstrapState) + 'static,
    {
        self.bootstrap.subscribe(callback);
    }

    /// Entra en una fase con su etiqueta por defecto
    pub fn transition(&self, phase: BootstrapPhase) {
        log::debug!("🔀 [APP] {:?} → {:?}", self.phase(), phase);
        self.bootstrap.update(|s| {
            s.phase = phase;
            s.step = phase.default_step().to_string();
            s.redirect_url = None;
        });
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.bootstrap.update(|s| {
            s.initialized = initialized;
            if initialized {
                s.error = None;
                s.step = BootstrapPhase::Ready.default_step().to_string();
            } else if s.phase == BootstrapPhase::Ready {
                s.phase = BootstrapPhase::Idle;
                s.step = BootstrapPhase::Idle.default_step().to_string();
            }
        });
    }

    pub fn set_error(&self, message: Option<String>) {
        self.bootstrap.update(|s| {
            if message.is_some() {
                s.initialized = false;
            }
            s.error = message;
        });
    }

    pub fn mark_ready(&self) {
        self.bootstrap.update(|s| {
            s.phase = BootstrapPhase::Ready;
            s.step = BootstrapPhase::Ready.default_step().to_string();
            s.initialized = true;
            s.error = None;
            s.redirect_url = None;
        });
    }

    pub fn fail(&self, message: &str) {
        self.bootstrap.update(|s| {
            s.phase = BootstrapPhase::Failed;
            s.step = BootstrapPhase::Failed.default_step().to_string();
            s.initialized = false;
            s.error = Some(message.to_string());
            s.redirect_url = None;
        });
    }

    /// La fase se queda en Authenticating: la página va a navegar fuera
    pub fn set_redirect_pending(&self, url: &str) {
        self.bootstrap.update(|s| {
            s.step = REDIRECT_STEP.to_string();
            s.redirect_url = Some(url.to_string());
        });
    }

    pub fn reset(&self) {
        self.bootstrap.set(BootstrapState::default());
        log::info!("🔄 [APP] Estado de arranque reiniciado");
    }

    // ------------------------------------------------------------------
    // Contexto de tienda / plataforma
    // ------------------------------------------------------------------

    pub fn store_context(&self) -> Option<StoreContext> {
        self.store_context.borrow().clone()
    }

    /// Código de tienda guardado en una visita anterior
    pub fn stored_store_code(&self) -> Option<String> {
        self.store_context
            .borrow()
            .as_ref()
            .map(|c| c.store_code.clone())
            .filter(|code| !code.is_empty())
    }

    pub fn set_store_context(&self, context: StoreContext) {
        log::info!("🏪 [APP] Contexto de tienda: {:?}", context);
        *self.store_context.borrow_mut() = Some(context);
        self.persist();
    }

    pub fn platform(&self) -> String {
        self.platform.borrow().clone()
    }

    pub fn set_platform(&self, name: &str) {
        *self.platform.borrow_mut() = name.to_string();
        self.persist();
    }

    fn persist(&self) {
        let persisted = PersistedAppState {
            store_context: self.store_context(),
            platform: self.platform(),
        };
        if let Err(e) = save_to_storage(self.storage.as_ref(), STORAGE_KEY_APP_STATE, &persisted) {
            log::warn!("⚠️ [APP] No se pudo persistir app-state: {}", e);
        }
    }
}
