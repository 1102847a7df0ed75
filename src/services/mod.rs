pub mod api_client;
pub mod browser;
pub mod scheduler;

pub use api_client::{ApiClient, BackendApi};
pub use browser::{Browser, HeadlessBrowser, WebBrowser};
pub use scheduler::{BrowserScheduler, Scheduler};

use std::rc::Rc;
use crate::utils::storage::{LocalStorage, StorageBackend};

/// Colaboradores externos del arranque, compartidos por Rc
#[derive(Clone)]
pub struct AppServices {
    pub browser: Rc<dyn Browser>,
    pub backend: Rc<dyn BackendApi>,
    pub scheduler: Rc<dyn Scheduler>,
    pub storage: Rc<dyn StorageBackend>,
}

impl AppServices {
    /// Colaboradores reales del navegador
    pub fn browser(api_base: &str) -> Self {
        Self {
            browser: Rc::new(WebBrowser::new()),
            backend: Rc::new(ApiClient::new(api_base)),
            scheduler: Rc::new(BrowserScheduler),
            storage: Rc::new(LocalStorage),
        }
    }
}
