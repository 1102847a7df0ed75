// Dobles de prueba compartidos por los tests de módulo

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;
use async_trait::async_trait;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use url::Url;
use crate::models::{AuthCheckResponse, BusinessHours, SessionCredential, StoreContext, StoreInfo, StoreStatus};
use crate::services::{AppServices, BackendApi, Browser, Scheduler};
use crate::utils::storage::{MemoryStorage, StorageBackend};

pub const DESKTOP_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const WECHAT_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 \
    (KHTML, like Gecko) Mobile/15E148 MicroMessenger/8.0.40(0x18002831) NetType/WIFI Language/zh_CN";

pub fn credential(token: &str) -> SessionCredential {
    SessionCredential {
        token: token.to_string(),
        user_id: 1,
        open_id: "o1".to_string(),
        role: "user".to_string(),
        name: None,
        avatar_url: None,
    }
}

pub fn store_info(code: &str) -> StoreInfo {
    StoreInfo {
        id: 1,
        store_code: code.to_string(),
        name: format!("Store {}", code),
        address: "Calle Mayor 1".to_string(),
        phone: "555-0101".to_string(),
        status: StoreStatus::Open,
        store_type: None,
        province: None,
        city: None,
        district: None,
        description: None,
        logo_url: None,
        banner_url: None,
        business_hours: vec![BusinessHours {
            start: "09:00".to_string(),
            end: "21:00".to_string(),
        }],
        config: Vec::new(),
    }
}

/// Cede el control una vez (punto de suspensión)
#[derive(Default)]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

// ----------------------------------------------------------------------------
// Navegador
// ----------------------------------------------------------------------------

pub struct FakeBrowser {
    client: bool,
    user_agent: String,
    href: RefCell<String>,
    replace_sticks: Cell<bool>,
    navigations: RefCell<Vec<String>>,
    replacements: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl FakeBrowser {
    pub fn new(user_agent: &str, href: &str) -> Self {
        Self {
            client: true,
            user_agent: user_agent.to_string(),
            href: RefCell::new(href.to_string()),
            replace_sticks: Cell::new(true),
            navigations: RefCell::new(Vec::new()),
            replacements: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }

    pub fn set_replace_sticks(&self, sticks: bool) {
        self.replace_sticks.set(sticks);
    }

    /// Simula una navegación dentro de la misma página
    pub fn set_href(&self, href: &str) {
        *self.href.borrow_mut() = href.to_string();
    }

    pub fn href(&self) -> String {
        self.href.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn replacements(&self) -> Vec<String> {
        self.replacements.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Browser for FakeBrowser {
    fn is_client(&self) -> bool {
        self.client
    }

    fn user_agent(&self) -> Option<String> {
        Some(self.user_agent.clone())
    }

    fn location_href(&self) -> Option<String> {
        Some(self.href())
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        self.navigations.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn replace_url(&self, url: &str) -> Result<(), String> {
        self.replacements.borrow_mut().push(url.to_string());
        if self.replace_sticks.get() {
            let base = Url::parse(&self.href()).map_err(|e| e.to_string())?;
            let resolved = base.join(url).map_err(|e| e.to_string())?;
            *self.href.borrow_mut() = resolved.to_string();
        }
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

// ----------------------------------------------------------------------------
// Backend
// ----------------------------------------------------------------------------

/// Backend simulado que registra cada llamada
#[derive(Default)]
pub struct MockBackend {
    calls: RefCell<Vec<String>>,
    dev_login: RefCell<Option<Result<SessionCredential, String>>>,
    auth_url: RefCell<Option<Result<String, String>>>,
    store_info: RefCell<Option<Result<StoreInfo, String>>>,
    check: RefCell<Option<Result<AuthCheckResponse, String>>>,
}

impl MockBackend {
    pub const AUTH_URL: &'static str =
        "https://api.example.com/auth/wechat/login?scope=snsapi_base&originApp=H5A_user";

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(':').next() == Some(endpoint))
            .count()
    }

    pub fn set_dev_login(&self, credential: SessionCredential) {
        *self.dev_login.borrow_mut() = Some(Ok(credential));
    }

    pub fn fail_dev_login(&self, message: &str) {
        *self.dev_login.borrow_mut() = Some(Err(message.to_string()));
    }

    pub fn fail_auth_url(&self, message: &str) {
        *self.auth_url.borrow_mut() = Some(Err(message.to_string()));
    }

    pub fn set_store_info(&self, info: StoreInfo) {
        *self.store_info.borrow_mut() = Some(Ok(info));
    }

    pub fn fail_store_info(&self, message: &str) {
        *self.store_info.borrow_mut() = Some(Err(message.to_string()));
    }

    pub fn fail_check(&self, message: &str) {
        *self.check.borrow_mut() = Some(Err(message.to_string()));
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl BackendApi for MockBackend {
    async fn dev_login(&self, open_id: &str, context: &StoreContext) -> Result<SessionCredential, String> {
        self.record(format!("dev_login:{}:{}", open_id, context.store_code));
        YieldNow::default().await;
        self.dev_login
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(credential("t1")))
    }

    async fn wechat_auth_url(&self, final_redirect_uri: &str, _context: &StoreContext) -> Result<String, String> {
        self.record(format!("wechat_auth_url:{}", final_redirect_uri));
        YieldNow::default().await;
        self.auth_url
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(Self::AUTH_URL.to_string()))
    }

    async fn check_auth(&self) -> Result<AuthCheckResponse, String> {
        self.record("check_auth".to_string());
        self.check.borrow().clone().unwrap_or_else(|| {
            Ok(AuthCheckResponse {
                success: true,
                message: Some("Auth check passed".to_string()),
                timestamp: None,
            })
        })
    }

    async fn fetch_store_info(&self, store_code: &str) -> Result<StoreInfo, String> {
        self.record(format!("fetch_store_info:{}", store_code));
        YieldNow::default().await;
        self.store_info
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(store_info(store_code)))
    }
}

// ----------------------------------------------------------------------------
// Scheduler con reloj virtual
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct ManualScheduler {
    elapsed: Cell<Duration>,
    sleeps: Cell<usize>,
    queued: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl ManualScheduler {
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }

    pub fn queued(&self) -> usize {
        self.queued.borrow().len()
    }

    /// Ejecuta las tareas lanzadas (y las que lancen ellas)
    pub fn run_spawned(&self) {
        loop {
            let tasks: Vec<_> = self.queued.borrow_mut().drain(..).collect();
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                block_on(task);
            }
        }
    }
}

#[async_trait(?Send)]
impl Scheduler for ManualScheduler {
    async fn sleep(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
        self.sleeps.set(self.sleeps.get() + 1);
        YieldNow::default().await;
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.queued.borrow_mut().push(task);
    }
}

/// Servicios de prueba con almacenamiento en memoria
pub fn services(browser: Rc<FakeBrowser>, backend: Rc<MockBackend>) -> (AppServices, Rc<ManualScheduler>) {
    let storage: Rc<dyn StorageBackend> = Rc::new(MemoryStorage::new());
    services_with_storage(browser, backend, storage)
}

pub fn services_with_storage(
    browser: Rc<FakeBrowser>,
    backend: Rc<MockBackend>,
    storage: Rc<dyn StorageBackend>,
) -> (AppServices, Rc<ManualScheduler>) {
    let scheduler = Rc::new(ManualScheduler::default());
    let services = AppServices {
        browser,
        backend,
        scheduler: scheduler.clone(),
        storage,
    };
    (services, scheduler)
}
