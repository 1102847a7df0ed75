// ============================================================================
// STOREFRONT LAUNCH - ARRANQUE DEL CLIENTE DE TIENDA (RUST + WASM)
// ============================================================================
// Capas:
// - Models: Estructuras compartidas con backend
// - Services: Navegador, API y temporizadores detrás de traits
// - State: Sesión, arranque y tienda con Rc<RefCell>
// - Auth: Estrategias de login por plataforma + selector
// - Launch: Orquestador, ensureAuth e inicialización de tienda
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod auth;
pub mod launch;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use crate::config::CONFIG;
use crate::launch::LaunchOrchestrator;
use crate::models::BootstrapPhase;
use crate::services::AppServices;

pub use crate::launch::{AuthReadinessGate, AuthStatus, LaunchError, StoreInitializer};
pub use crate::models::LaunchStatus;

const APP_READY_EVENT: &str = "appReady";

// Instancia única del orquestador para esta carga de página
thread_local! {
    static LAUNCHER: RefCell<Option<Rc<LaunchOrchestrator>>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(Config::new(CONFIG.log_level()));
    log::info!("🚀 Storefront launch ({})", CONFIG.environment);

    let orchestrator = Rc::new(LaunchOrchestrator::with_services(
        CONFIG.clone(),
        AppServices::browser(&CONFIG.api_base),
    ));

    // Avisar a la página cuando el arranque llega a Ready
    orchestrator.app().subscribe(|state| {
        if state.phase == BootstrapPhase::Ready {
            dispatch_window_event(APP_READY_EVENT);
        }
    });

    LAUNCHER.with(|cell| {
        *cell.borrow_mut() = Some(orchestrator.clone());
    });

    wasm_bindgen_futures::spawn_local(async move {
        let status = orchestrator.launch().await;
        log::info!("🏁 [MAIN] Resultado del arranque: {:?}", status);
    });

    Ok(())
}

fn launcher() -> Result<Rc<LaunchOrchestrator>, JsValue> {
    LAUNCHER
        .with(|cell| cell.borrow().clone())
        .ok_or_else(|| JsValue::from_str("Launcher not initialized"))
}

fn dispatch_window_event(name: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::Event::new(name) {
        Ok(event) => {
            if let Err(e) = window.dispatch_event(&event) {
                log::warn!("⚠️ [MAIN] No se pudo emitir {}: {:?}", name, e);
            }
        }
        Err(e) => log::warn!("⚠️ [MAIN] No se pudo crear el evento {}: {:?}", name, e),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// API EXPORTADA A JS
// ============================================================================

/// Espera acotada a que haya sesión (false = seguir en modo degradado)
#[wasm_bindgen]
pub async fn ensure_auth() -> Result<bool, JsValue> {
    let gate = launcher()?.gate();
    Ok(gate.ensure_auth().await)
}

#[wasm_bindgen]
pub async fn perform_login(force_reauth: bool) -> Result<bool, JsValue> {
    let orchestrator = launcher()?;
    Ok(orchestrator.perform_login(force_reauth).await)
}

#[wasm_bindgen]
pub async fn reinitialize() -> Result<bool, JsValue> {
    let orchestrator = launcher()?;
    Ok(orchestrator.reinitialize().await.is_ready())
}

#[wasm_bindgen]
pub async fn check_session() -> Result<bool, JsValue> {
    let orchestrator = launcher()?;
    Ok(orchestrator.check_session().await)
}

/// `{ isReady, isInitialized, error }` como JSON
#[wasm_bindgen]
pub fn auth_status() -> Result<String, JsValue> {
    to_json(&launcher()?.gate().auth_status())
}

#[wasm_bindgen]
pub fn platform_debug_info() -> Result<String, JsValue> {
    to_json(&launcher()?.platform_debug_info())
}

#[wasm_bindgen]
pub fn strategy_debug_info() -> Result<String, JsValue> {
    to_json(&launcher()?.strategy_debug_info())
}

/// Solo desarrollo: "wechat" | "dev"
#[wasm_bindgen]
pub fn switch_auth_strategy(name: &str) -> Result<bool, JsValue> {
    Ok(launcher()?.switch_auth_strategy(name))
}

/// Carga la tienda (la actual si no se indica) cuando hay sesión
#[wasm_bindgen]
pub async fn init_store(store_id: Option<String>) -> Result<String, JsValue> {
    let initializer = launcher()?.store_initializer();
    let info = initializer
        .init_store(store_id.as_deref())
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&info)
}
