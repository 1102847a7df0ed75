// ============================================================================
// DEVELOPMENT STRATEGY - Login con identidad fija de desarrollo
// ============================================================================

use async_trait::async_trait;
use crate::auth::AuthStrategy;
use crate::models::{LoginOutcome, StoreContext};
use crate::services::AppServices;
use crate::utils::platform::PlatformDetector;

pub struct DevelopmentStrategy {
    services: AppServices,
    open_id: String,
}

impl DevelopmentStrategy {
    pub const NAME: &'static str = "development";

    pub fn new(services: AppServices, open_id: &str) -> Self {
        Self {
            services,
            open_id: open_id.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl AuthStrategy for DevelopmentStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["dev"]
    }

    fn matches(&self, platform: &PlatformDetector) -> bool {
        // En desarrollo siempre es candidata, esté o no dentro de WeChat
        platform.is_development()
    }

    async fn login(&self, context: &StoreContext) -> LoginOutcome {
        log::info!("🧪 [DEV] Login de desarrollo (openId={}, tienda={})", self.open_id, context.store_code);

        match self.services.backend.dev_login(&self.open_id, context).await {
            Ok(credential) if credential.is_valid() => {
                log::info!("✅ [DEV] Login correcto: userId={}", credential.user_id);
                LoginOutcome::Success { credential }
            }
            Ok(_) => LoginOutcome::failure("Development login returned an empty token"),
            Err(e) => {
                log::error!("❌ [DEV] Login de desarrollo fallido: {}", e);
                LoginOutcome::failure(format!("Development login failed: {}", e))
            }
        }
    }

    fn report_failure(&self, message: &str) {
        log::error!("❌ [DEV] {}", message);
        self.services.browser.alert(&format!("Development error: {}", message));
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        log::info!("➡️ [DEV] Navegando a {}", url);
        self.services.browser.navigate(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::{credential, services, FakeBrowser, MockBackend, DESKTOP_UA};
    use futures::executor::block_on;
    use std::rc::Rc;

    #[test]
    fn login_exchanges_fixed_identity() {
        let backend = Rc::new(MockBackend::default());
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        let strategy = DevelopmentStrategy::new(services(browser, backend.clone()).0, "857346");

        let outcome = block_on(strategy.login(&StoreContext::new("S1")));

        assert_eq!(outcome, LoginOutcome::Success { credential: credential("t1") });
        assert_eq!(backend.calls(), vec!["dev_login:857346:S1".to_string()]);
    }

    #[test]
    fn network_error_becomes_failure_never_redirect() {
        let backend = Rc::new(MockBackend::default());
        backend.fail_dev_login("Network error: connection refused");
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        let strategy = DevelopmentStrategy::new(services(browser, backend).0, "857346");

        match block_on(strategy.login(&StoreContext::new("S1"))) {
            LoginOutcome::Failure { reason } => assert!(reason.contains("connection refused")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!strategy.redirects());
    }

    #[test]
    fn matches_only_in_development_builds() {
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        let strategy = DevelopmentStrategy::new(services(browser.clone(), Rc::new(MockBackend::default())).0, "857346");

        let dev = PlatformDetector::capture(browser.as_ref(), &AppConfig::default());
        let prod = PlatformDetector::capture(
            browser.as_ref(),
            &AppConfig { environment: "production".to_string(), ..AppConfig::default() },
        );
        assert!(strategy.matches(&dev));
        assert!(!strategy.matches(&prod));
        assert!(strategy.answers_to("DEV"));
    }

    #[test]
    fn failure_is_shown_to_the_user() {
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        let strategy = DevelopmentStrategy::new(services(browser.clone(), Rc::new(MockBackend::default())).0, "857346");

        strategy.report_failure("boom");
        assert_eq!(browser.alerts(), vec!["Development error: boom".to_string()]);
    }
}
