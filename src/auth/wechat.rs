// ============================================================================
// WECHAT H5 STRATEGY - Autorización OAuth por redirección
// ============================================================================
// Primera visita: pide la URL de autorización y devuelve RedirectRequired.
// Vuelta del proveedor: token+openId+userId en la query → credencial directa.
// ============================================================================

use std::time::Duration;
use async_trait::async_trait;
use crate::auth::AuthStrategy;
use crate::config::AppConfig;
use crate::models::{LoginOutcome, SessionCredential, StoreContext};
use crate::services::{AppServices, Browser};
use crate::utils::platform::PlatformDetector;
use crate::utils::url::{cleaned_relative_url, query_pairs, query_param, with_query, FORCE_STRATEGY_PARAMS, PRESERVED_PARAMS};

/// Parámetros del callback de autorización ya parseados
#[derive(Debug, Clone, PartialEq)]
pub struct WechatCallback {
    pub token: String,
    pub open_id: String,
    pub user_id: String,
    pub role: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl WechatCallback {
    /// Solo es callback si vienen los tres: token, openId y userId
    pub fn parse(href: &str) -> Option<Self> {
        let pairs = query_pairs(href);
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        let non_empty = |name: &str| get(name).filter(|v| !v.is_empty());

        Some(Self {
            token: get("token")?,
            open_id: get("openId")?,
            user_id: get("userId")?,
            role: non_empty("role"),
            name: non_empty("name"),
            avatar_url: non_empty("avatarUrl"),
        })
    }

    pub fn into_credential(self) -> Result<SessionCredential, String> {
        if self.token.is_empty() {
            return Err("Authorization callback carried an empty token".to_string());
        }
        let user_id = self
            .user_id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid userId in authorization callback: '{}'", self.user_id))?;

        Ok(SessionCredential {
            token: self.token,
            user_id,
            open_id: self.open_id,
            role: self.role.unwrap_or_else(|| "user".to_string()),
            name: self.name,
            avatar_url: self.avatar_url,
        })
    }
}

pub struct WechatRedirectStrategy {
    services: AppServices,
    cleanup_delay: Duration,
    verify_delay: Duration,
}

impl WechatRedirectStrategy {
    pub const NAME: &'static str = "wechat_h5";

    pub fn new(services: AppServices, config: &AppConfig) -> Self {
        Self {
            services,
            cleanup_delay: Duration::from_millis(config.url_cleanup_delay_ms),
            verify_delay: Duration::from_millis(config.url_cleanup_verify_delay_ms),
        }
    }

    /// Vuelta del proveedor: credencial directa sin tocar el backend
    fn resume(&self, callback: WechatCallback) -> LoginOutcome {
        log::info!("📥 [WECHAT] Callback de autorización detectado (openId={})", callback.open_id);
        match callback.into_credential() {
            Ok(credential) => {
                self.schedule_cleanup();
                LoginOutcome::Success { credential }
            }
            Err(e) => {
                log::error!("❌ [WECHAT] Callback inválido: {}", e);
                LoginOutcome::failure(e)
            }
        }
    }

    async fn initiate(&self, href: &str, context: &StoreContext) -> LoginOutcome {
        // storeCode viaja en la ruta; se reenvían mesa, dirección y el override
        // (sin él, un build de desarrollo volvería a la estrategia de desarrollo)
        let forced = FORCE_STRATEGY_PARAMS
            .iter()
            .find_map(|name| query_param(href, name));
        let mut params = context.carried_params();
        if let Some(name) = forced.as_deref() {
            params.push((FORCE_STRATEGY_PARAMS[0], name));
        }
        let final_redirect_uri = match with_query(href, &params) {
            Ok(uri) => uri,
            Err(e) => return LoginOutcome::failure(format!("Cannot build callback URL: {}", e)),
        };
        log::info!("🔗 [WECHAT] Callback construido: {}", final_redirect_uri);

        match self.services.backend.wechat_auth_url(&final_redirect_uri, context).await {
            Ok(url) => {
                log::info!("➡️ [WECHAT] Autorización requerida: {}", url);
                LoginOutcome::RedirectRequired { url }
            }
            Err(e) => {
                log::error!("❌ [WECHAT] No se pudo obtener la URL de autorización: {}", e);
                LoginOutcome::failure(format!("Failed to start WeChat authorization: {}", e))
            }
        }
    }

    /// Limpieza diferida de los parámetros del callback (un único intento)
    fn schedule_cleanup(&self) {
        let browser = self.services.browser.clone();
        let scheduler = self.services.scheduler.clone();
        let cleanup_delay = self.cleanup_delay;
        let verify_delay = self.verify_delay;

        self.services.scheduler.spawn(Box::pin(async move {
            scheduler.sleep(cleanup_delay).await;
            if !cleanup_url(browser.as_ref(), &[]) {
                return;
            }
            scheduler.sleep(verify_delay).await;
            verify_cleanup(browser.as_ref());
        }));
    }
}

/// Quita de la URL todo lo que no esté en la lista de conservación
/// (storeCode/tableId/addressId + `extra_keep`). Devuelve true si se aplicó.
pub fn cleanup_url(browser: &dyn Browser, extra_keep: &[&str]) -> bool {
    let Some(href) = browser.location_href() else {
        log::warn!("⚠️ [WECHAT] Sin location, no se limpia la URL");
        return false;
    };
    let keep: Vec<&str> = PRESERVED_PARAMS.iter().copied().chain(extra_keep.iter().copied()).collect();

    let cleaned = match cleaned_relative_url(&href, &keep) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            log::warn!("⚠️ [WECHAT] No se pudo limpiar la URL: {}", e);
            return false;
        }
    };

    match browser.replace_url(&cleaned) {
        Ok(()) => {
            log::info!("✅ [WECHAT] URL limpiada: {}", cleaned);
            true
        }
        Err(e) => {
            log::warn!("⚠️ [WECHAT] replaceState falló: {}", e);
            false
        }
    }
}

fn verify_cleanup(browser: &dyn Browser) {
    let still_dirty = browser
        .location_href()
        .map(|href| query_pairs(&href).iter().any(|(k, _)| k == "token"))
        .unwrap_or(false);
    if still_dirty {
        log::warn!(
            "⚠️ [WECHAT] La URL sigue con parámetros del callback (posible restricción del navegador). UA: {}",
            browser.user_agent().unwrap_or_default()
        );
    }
}

#[async_trait(?Send)]
impl AuthStrategy for WechatRedirectStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["wechat"]
    }

    fn matches(&self, platform: &PlatformDetector) -> bool {
        let forced = FORCE_STRATEGY_PARAMS
            .iter()
            .filter_map(|name| platform.query_param(name))
            .any(|requested| self.answers_to(requested));
        if forced {
            log::info!("🔧 [WECHAT] Estrategia forzada por parámetro de URL");
            return true;
        }
        platform.is_wechat_browser()
    }

    fn redirects(&self) -> bool {
        true
    }

    async fn login(&self, context: &StoreContext) -> LoginOutcome {
        let Some(href) = self.services.browser.location_href() else {
            return LoginOutcome::failure("WeChat login requires a browser location");
        };

        match WechatCallback::parse(&href) {
            Some(callback) => self.resume(callback),
            None => {
                log::info!("🔐 [WECHAT] Iniciando autorización (tienda={})", context.store_code);
                self.initiate(&href, context).await
            }
        }
    }

    fn report_failure(&self, message: &str) {
        log::error!("❌ [WECHAT] {}", message);
        self.services.browser.alert(message);
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        log::info!("➡️ [WECHAT] Navegando a {}", url);
        self.services.browser.navigate(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{services, FakeBrowser, MockBackend, DESKTOP_UA, WECHAT_UA};
    use futures::executor::block_on;
    use std::rc::Rc;

    const CALLBACK: &str =
        "https://shop.example.com/store/S1?token=tk&openId=o1&userId=42&role=admin&tableId=4&code=abc";

    fn strategy(href: &str) -> (WechatRedirectStrategy, Rc<FakeBrowser>, Rc<MockBackend>, Rc<crate::testing::ManualScheduler>) {
        let browser = Rc::new(FakeBrowser::new(WECHAT_UA, href));
        let backend = Rc::new(MockBackend::default());
        let (services, scheduler) = services(browser.clone(), backend.clone());
        (WechatRedirectStrategy::new(services, &AppConfig::default()), browser, backend, scheduler)
    }

    #[test]
    fn callback_requires_all_three_params() {
        assert!(WechatCallback::parse(CALLBACK).is_some());
        assert!(WechatCallback::parse("https://x.test/?token=t&openId=o").is_none());
        assert!(WechatCallback::parse("https://x.test/?token=t&userId=1").is_none());
        assert!(WechatCallback::parse("https://x.test/?openId=o&userId=1").is_none());
    }

    #[test]
    fn callback_builds_credential_without_backend_call() {
        let (strategy, _, backend, _) = strategy(CALLBACK);

        match block_on(strategy.login(&StoreContext::new("S1"))) {
            LoginOutcome::Success { credential } => {
                assert_eq!(credential.token, "tk");
                assert_eq!(credential.user_id, 42);
                assert_eq!(credential.open_id, "o1");
                assert_eq!(credential.role, "admin");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn non_numeric_user_id_is_a_failure() {
        let (strategy, _, _, scheduler) = strategy("https://shop.example.com/?token=t&openId=o&userId=abc");

        assert!(matches!(
            block_on(strategy.login(&StoreContext::new("S1"))),
            LoginOutcome::Failure { .. }
        ));
        assert_eq!(scheduler.queued(), 0);
    }

    #[test]
    fn partial_callback_requests_fresh_authorization() {
        let (strategy, browser, backend, _) = strategy("https://shop.example.com/store/S1?token=t&openId=o");
        let context = StoreContext::new("S1").with_table(Some("4".to_string()));

        let outcome = block_on(strategy.login(&context));

        assert_eq!(
            outcome,
            LoginOutcome::RedirectRequired { url: MockBackend::AUTH_URL.to_string() }
        );
        assert_eq!(
            backend.calls(),
            vec!["wechat_auth_url:https://shop.example.com/store/S1?tableId=4".to_string()]
        );
        // login no navega; eso lo decide el orquestador
        assert!(browser.navigations().is_empty());
    }

    #[test]
    fn callback_url_keeps_strategy_override() {
        let (strategy, _, backend, _) = strategy("https://shop.example.com/store/S1?force_strategy=wechat&code=old");
        let context = StoreContext::new("S1").with_table(Some("4".to_string()));

        block_on(strategy.login(&context));

        assert_eq!(
            backend.calls(),
            vec!["wechat_auth_url:https://shop.example.com/store/S1?tableId=4&forceStrategy=wechat".to_string()]
        );
    }

    #[test]
    fn auth_url_error_is_a_failure() {
        let (strategy, _, backend, _) = strategy("https://shop.example.com/store/S1");
        backend.fail_auth_url("HTTP error 500: upstream");

        match block_on(strategy.login(&StoreContext::new("S1"))) {
            LoginOutcome::Failure { reason } => assert!(reason.contains("upstream")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn cleanup_runs_after_delay_and_keeps_allow_list() {
        let (strategy, browser, _, scheduler) = strategy(CALLBACK);
        block_on(strategy.login(&StoreContext::new("S1")));

        assert!(browser.replacements().is_empty());
        scheduler.run_spawned();

        assert_eq!(browser.replacements(), vec!["/store/S1?tableId=4".to_string()]);
        assert_eq!(scheduler.elapsed(), Duration::from_millis(600));
    }

    #[test]
    fn cleanup_that_does_not_stick_is_not_retried() {
        let (strategy, browser, _, scheduler) = strategy(CALLBACK);
        browser.set_replace_sticks(false);
        block_on(strategy.login(&StoreContext::new("S1")));
        scheduler.run_spawned();

        assert_eq!(browser.replacements().len(), 1);
        assert!(browser.navigations().is_empty());
        assert!(browser.href().contains("token=tk"));
    }

    #[test]
    fn matches_wechat_browser_or_explicit_override() {
        let config = AppConfig::default();
        let (strategy, _, _, _) = strategy("https://shop.example.com/");

        let wechat = FakeBrowser::new(WECHAT_UA, "https://shop.example.com/");
        assert!(strategy.matches(&PlatformDetector::capture(&wechat, &config)));

        let desktop = FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/");
        assert!(!strategy.matches(&PlatformDetector::capture(&desktop, &config)));

        let forced = FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/?forceStrategy=wechat_h5");
        assert!(strategy.matches(&PlatformDetector::capture(&forced, &config)));
        assert!(strategy.redirects());
    }
}
