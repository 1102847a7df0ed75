// ============================================================================
// STRATEGY SELECTOR - Elige exactamente una estrategia por arranque
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use serde::Serialize;
use crate::auth::{AuthStrategy, DevelopmentStrategy, WechatRedirectStrategy};
use crate::config::{AppConfig, StrategyPriority};
use crate::launch::LaunchError;
use crate::services::AppServices;
use crate::utils::platform::PlatformDetector;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMatch {
    pub name: String,
    pub is_match: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDebugInfo {
    pub total_strategies: usize,
    pub strategies: Vec<StrategyMatch>,
    pub override_name: Option<String>,
    pub current_strategy: String,
}

/// Lista ordenada de candidatos + estrategia por defecto (nunca con redirección)
pub struct StrategySelector {
    candidates: RefCell<Vec<Rc<dyn AuthStrategy>>>,
    fallback: Rc<dyn AuthStrategy>,
}

impl StrategySelector {
    pub fn new(candidates: Vec<Rc<dyn AuthStrategy>>, fallback: Rc<dyn AuthStrategy>) -> Result<Self, LaunchError> {
        if fallback.redirects() {
            return Err(LaunchError::Configuration(format!(
                "default strategy '{}' must not require a redirect",
                fallback.name()
            )));
        }
        Ok(Self {
            candidates: RefCell::new(candidates),
            fallback,
        })
    }

    /// Desarrollo + WeChat en el orden que marque la configuración
    pub fn with_defaults(config: &AppConfig, services: &AppServices) -> Self {
        let development: Rc<dyn AuthStrategy> =
            Rc::new(DevelopmentStrategy::new(services.clone(), &config.dev_open_id));
        let wechat: Rc<dyn AuthStrategy> = Rc::new(WechatRedirectStrategy::new(services.clone(), config));

        let candidates = match config.strategy_priority {
            StrategyPriority::DevelopmentFirst => vec![development.clone(), wechat],
            StrategyPriority::PlatformFirst => vec![wechat, development.clone()],
        };
        Self {
            candidates: RefCell::new(candidates),
            fallback: development,
        }
    }

    /// Registra una estrategia con la máxima prioridad
    pub fn register(&self, strategy: Rc<dyn AuthStrategy>) {
        log::info!("➕ [SELECTOR] Estrategia registrada: {}", strategy.name());
        self.candidates.borrow_mut().insert(0, strategy);
    }

    pub fn candidates(&self) -> Vec<Rc<dyn AuthStrategy>> {
        self.candidates.borrow().clone()
    }

    pub fn fallback(&self) -> Rc<dyn AuthStrategy> {
        self.fallback.clone()
    }

    /// Busca por nombre o alias (candidatos y luego la de por defecto)
    pub fn find(&self, name: &str) -> Option<Rc<dyn AuthStrategy>> {
        self.candidates
            .borrow()
            .iter()
            .find(|s| s.answers_to(name))
            .cloned()
            .or_else(|| Some(self.fallback.clone()).filter(|s| s.answers_to(name)))
    }

    /// Selección con el override que trae el propio entorno
    pub fn select(&self, platform: &PlatformDetector) -> Rc<dyn AuthStrategy> {
        self.select_with_override(platform, platform.force_strategy())
    }

    /// Override conocido → se devuelve sin mirar `matches()`;
    /// si no, el primer candidato que encaje; si ninguno, el de por defecto.
    pub fn select_with_override(&self, platform: &PlatformDetector, override_name: Option<&str>) -> Rc<dyn AuthStrategy> {
        if let Some(requested) = override_name {
            match self.find(requested) {
                Some(strategy) => {
                    log::info!("🔧 [SELECTOR] Override '{}' → {}", requested, strategy.name());
                    return strategy;
                }
                None => log::warn!("⚠️ [SELECTOR] Override desconocido '{}', se ignora", requested),
            }
        }

        if let Some(strategy) = self.candidates.borrow().iter().find(|s| s.matches(platform)) {
            log::info!("🎯 [SELECTOR] Estrategia detectada: {}", strategy.name());
            return strategy.clone();
        }

        log::warn!(
            "⚠️ [SELECTOR] Ninguna estrategia encaja, se usa la de por defecto: {}",
            self.fallback.name()
        );
        self.fallback.clone()
    }

    pub fn debug_info(&self, platform: &PlatformDetector) -> StrategyDebugInfo {
        let strategies: Vec<StrategyMatch> = self
            .candidates
            .borrow()
            .iter()
            .map(|s| StrategyMatch {
                name: s.name().to_string(),
                is_match: s.matches(platform),
            })
            .collect();

        StrategyDebugInfo {
            total_strategies: strategies.len(),
            strategies,
            override_name: platform.force_strategy().map(str::to_string),
            current_strategy: self.select(platform).name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoginOutcome, StoreContext};
    use crate::testing::{services, FakeBrowser, MockBackend, DESKTOP_UA, WECHAT_UA};
    use async_trait::async_trait;

    /// Estrategia que nunca encaja
    struct NeverMatches(&'static str);

    #[async_trait(?Send)]
    impl AuthStrategy for NeverMatches {
        fn name(&self) -> &'static str {
            self.0
        }
        fn matches(&self, _platform: &PlatformDetector) -> bool {
            false
        }
        async fn login(&self, _context: &StoreContext) -> LoginOutcome {
            LoginOutcome::failure("unused")
        }
        fn report_failure(&self, _message: &str) {}
        fn navigate(&self, _url: &str) -> Result<(), String> {
            Ok(())
        }
    }

    fn production() -> AppConfig {
        AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        }
    }

    fn selector(config: &AppConfig) -> StrategySelector {
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        StrategySelector::with_defaults(config, &services(browser, Rc::new(MockBackend::default())).0)
    }

    fn platform(ua: &str, href: &str, config: &AppConfig) -> PlatformDetector {
        PlatformDetector::capture(&FakeBrowser::new(ua, href), config)
    }

    #[test]
    fn known_override_bypasses_matches() {
        let config = production();
        let selector = selector(&config);
        selector.register(Rc::new(NeverMatches("kiosk")));
        let desktop = platform(DESKTOP_UA, "https://shop.example.com/", &config);

        for (requested, expected) in [
            ("wechat", WechatRedirectStrategy::NAME),
            ("dev", DevelopmentStrategy::NAME),
            ("kiosk", "kiosk"),
        ] {
            let chosen = selector.select_with_override(&desktop, Some(requested));
            assert_eq!(chosen.name(), expected);
        }
    }

    #[test]
    fn unknown_override_is_ignored() {
        let config = production();
        let wechat = platform(WECHAT_UA, "https://shop.example.com/?forceStrategy=alipay", &config);

        assert_eq!(selector(&config).select(&wechat).name(), WechatRedirectStrategy::NAME);
    }

    #[test]
    fn no_match_falls_back_to_non_redirecting_default() {
        let config = production();
        let desktop = platform(DESKTOP_UA, "https://shop.example.com/", &config);
        let chosen = selector(&config).select(&desktop);

        assert_eq!(chosen.name(), DevelopmentStrategy::NAME);
        assert!(!chosen.redirects());
    }

    #[test]
    fn priority_decides_wechat_browser_in_development() {
        let dev_first = AppConfig::default();
        let wechat = platform(WECHAT_UA, "https://shop.example.com/", &dev_first);
        assert_eq!(selector(&dev_first).select(&wechat).name(), DevelopmentStrategy::NAME);

        let platform_first = AppConfig {
            strategy_priority: StrategyPriority::PlatformFirst,
            ..AppConfig::default()
        };
        assert_eq!(selector(&platform_first).select(&wechat).name(), WechatRedirectStrategy::NAME);
    }

    #[test]
    fn redirecting_default_is_rejected() {
        let browser = Rc::new(FakeBrowser::new(DESKTOP_UA, "https://shop.example.com/"));
        let (services, _) = services(browser, Rc::new(MockBackend::default()));
        let wechat: Rc<dyn AuthStrategy> = Rc::new(WechatRedirectStrategy::new(services, &AppConfig::default()));

        assert!(matches!(
            StrategySelector::new(Vec::new(), wechat),
            Err(LaunchError::Configuration(_))
        ));
    }

    #[test]
    fn registered_strategy_takes_precedence() {
        let config = production();
        let selector = selector(&config);
        selector.register(Rc::new(NeverMatches("kiosk")));

        let info = selector.debug_info(&platform(WECHAT_UA, "https://shop.example.com/", &config));
        assert_eq!(info.total_strategies, 3);
        assert_eq!(info.strategies[0].name, "kiosk");
        assert!(!info.strategies[0].is_match);
        assert_eq!(info.current_strategy, WechatRedirectStrategy::NAME);
    }
}
