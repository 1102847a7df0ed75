// ============================================================================
// BROWSER - Acceso a location/history/navigator
// ============================================================================
// Sin navegador (lado servidor) todo devuelve None/false en vez de fallar
// ============================================================================

use wasm_bindgen::JsValue;
use web_sys::window;

/// Superficie del navegador que necesita el arranque
pub trait Browser {
    /// true si hay globals de navegador (lado cliente)
    fn is_client(&self) -> bool;

    fn user_agent(&self) -> Option<String>;

    fn location_href(&self) -> Option<String>;

    /// Navegación de página completa (termina el contexto de ejecución actual)
    fn navigate(&self, url: &str) -> Result<(), String>;

    /// history.replaceState sin recargar
    fn replace_url(&self, url: &str) -> Result<(), String>;

    fn alert(&self, message: &str);
}

/// Navegador real vía web-sys
#[derive(Clone, Default)]
pub struct WebBrowser;

impl WebBrowser {
    pub fn new() -> Self {
        Self
    }
}

impl Browser for WebBrowser {
    fn is_client(&self) -> bool {
        window().is_some()
    }

    fn user_agent(&self) -> Option<String> {
        window()?.navigator().user_agent().ok()
    }

    fn location_href(&self) -> Option<String> {
        window()?.location().href().ok()
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        let win = window().ok_or("No window available")?;
        win.location()
            .set_href(url)
            .map_err(|e| format!("Navigation error: {:?}", e))
    }

    fn replace_url(&self, url: &str) -> Result<(), String> {
        let win = window().ok_or("No window available")?;
        let history = win
            .history()
            .map_err(|e| format!("History API unavailable: {:?}", e))?;
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|e| format!("replaceState error: {:?}", e))
    }

    fn alert(&self, message: &str) {
        if let Some(win) = window() {
            let _ = win.alert_with_message(message);
        }
    }
}

/// Entorno sin navegador (SSR / tests de servidor)
#[derive(Clone, Default)]
pub struct HeadlessBrowser;

impl Browser for HeadlessBrowser {
    fn is_client(&self) -> bool {
        false
    }

    fn user_agent(&self) -> Option<String> {
        None
    }

    fn location_href(&self) -> Option<String> {
        None
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        Err(format!("Cannot navigate to {} without a browser", url))
    }

    fn replace_url(&self, _url: &str) -> Result<(), String> {
        Err("History API unavailable on the server".to_string())
    }

    fn alert(&self, message: &str) {
        log::error!("❌ {}", message);
    }
}
