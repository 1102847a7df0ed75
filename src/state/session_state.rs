// ============================================================================
// SESSION STATE - Credencial de sesión (persistida en "user-info")
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::SessionCredential;
use crate::utils::storage::{load_from_storage, remove_from_storage, save_to_storage, StorageBackend, STORAGE_KEY_USER_INFO};

/// Estado de sesión; solo el orquestador y las estrategias escriben
#[derive(Clone)]
pub struct SessionState {
    credential: Rc<RefCell<Option<SessionCredential>>>,
    storage: Rc<dyn StorageBackend>,
}

impl SessionState {
    /// Crea el estado restaurando la credencial persistida si existe
    pub fn new(storage: Rc<dyn StorageBackend>) -> Self {
        let restored = load_from_storage::<SessionCredential>(storage.as_ref(), STORAGE_KEY_USER_INFO)
            .filter(SessionCredential::is_valid);
        if let Some(ref credential) = restored {
            log::info!("💾 [SESSION] Credencial restaurada (userId={})", credential.user_id);
        }
        Self {
            credential: Rc::new(RefCell::new(restored)),
            storage,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential
            .borrow()
            .as_ref()
            .map(SessionCredential::is_valid)
            .unwrap_or(false)
    }

    pub fn set_credential(&self, credential: SessionCredential) {
        if let Err(e) = save_to_storage(self.storage.as_ref(), STORAGE_KEY_USER_INFO, &credential) {
            log::warn!("⚠️ [SESSION] No se pudo persistir la credencial: {}", e);
        }
        log::info!("✅ [SESSION] Credencial guardada (userId={}, rol={})", credential.user_id, credential.role);
        *self.credential.borrow_mut() = Some(credential);
    }

    pub fn clear_credential(&self) {
        *self.credential.borrow_mut() = None;
        if let Err(e) = remove_from_storage(self.storage.as_ref(), STORAGE_KEY_USER_INFO) {
            log::warn!("⚠️ [SESSION] No se pudo borrar la credencial persistida: {}", e);
        }
        log::info!("🗑️ [SESSION] Credencial eliminada");
    }

    pub fn current_credential(&self) -> Option<SessionCredential> {
        self.credential.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.credential.borrow().as_ref().map(|c| c.token.clone())
    }
}
