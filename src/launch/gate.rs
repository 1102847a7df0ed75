// ============================================================================
// AUTH READINESS GATE - ensureAuth: espera acotada hasta tener sesión
// ============================================================================
// Sondeo a intervalo fijo (200ms por defecto) hasta un máximo (10s). El
// timeout devuelve false: el llamador sigue en modo degradado.
// ============================================================================

use std::rc::Rc;
use std::time::Duration;
use serde::Serialize;
use crate::config::AppConfig;
use crate::models::BootstrapPhase;
use crate::services::Scheduler;
use crate::state::{AppState, SessionState};

/// Resumen del estado de autenticación para la UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_ready: bool,
    pub is_initialized: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AuthReadinessGate {
    session: SessionState,
    app: AppState,
    scheduler: Rc<dyn Scheduler>,
    interval: Duration,
    max_attempts: u64,
}

impl AuthReadinessGate {
    pub fn new(session: SessionState, app: AppState, scheduler: Rc<dyn Scheduler>, config: &AppConfig) -> Self {
        Self {
            session,
            app,
            scheduler,
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts(),
        }
    }

    pub async fn ensure_auth(&self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }

        for attempt in 0..self.max_attempts {
            let phase = self.app.phase();
            if phase.is_terminal() {
                if phase == BootstrapPhase::Failed {
                    log::warn!("⚠️ [GATE] El arranque falló, sin sesión");
                }
                return self.session.is_authenticated();
            }

            if attempt == 0 {
                log::debug!("⏳ [GATE] Esperando autenticación...");
            }
            self.scheduler.sleep(self.interval).await;

            if self.session.is_authenticated() {
                log::debug!("✅ [GATE] Sesión disponible tras {} sondeos", attempt + 1);
                return true;
            }
        }

        log::warn!(
            "⏰ [GATE] Timeout esperando autenticación ({}ms)",
            self.interval.as_millis() * u128::from(self.max_attempts)
        );
        false
    }

    pub fn auth_status(&self) -> AuthStatus {
        let is_initialized = self.app.is_initialized();
        AuthStatus {
            is_ready: is_initialized && self.session.is_authenticated(),
            is_initialized,
            error: self.app.error(),
        }
    }
}
