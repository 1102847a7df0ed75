// ============================================================================
// PLATFORM - Detección del entorno de ejecución
// ============================================================================
// Predicados puros sobre una foto del entorno. Sin navegador (servidor)
// todo lo que depende del navegador devuelve false.
// ============================================================================

use serde::Serialize;
use crate::config::AppConfig;
use crate::services::Browser;
use crate::utils::url::{query_pairs, FORCE_STRATEGY_PARAMS};

const MOBILE_MARKERS: [&str; 8] = [
    "android", "webos", "iphone", "ipad", "ipod", "blackberry", "iemobile", "opera mini",
];
const IOS_MARKERS: [&str; 3] = ["iPad", "iPhone", "iPod"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionSide {
    Client,
    Server,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDebugInfo {
    pub is_client: bool,
    pub is_server: bool,
    pub is_wechat_browser: bool,
    pub is_development: bool,
    pub is_production: bool,
    pub is_mobile: bool,
    pub is_ios: bool,
    pub is_android: bool,
    pub user_agent: String,
    pub platform_name: String,
    pub force_strategy: Option<String>,
}

/// Foto inmutable de las señales del entorno
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    side: ExecutionSide,
    user_agent: String,
    href: Option<String>,
    query: Vec<(String, String)>,
    environment: String,
    env_override: Option<String>,
}

impl PlatformDetector {
    /// Captura las señales actuales (navegador + configuración de build)
    pub fn capture(browser: &dyn Browser, config: &AppConfig) -> Self {
        if !browser.is_client() {
            return Self::server(config);
        }
        let href = browser.location_href();
        Self {
            side: ExecutionSide::Client,
            user_agent: browser.user_agent().unwrap_or_default(),
            query: href.as_deref().map(query_pairs).unwrap_or_default(),
            href,
            environment: config.environment.clone(),
            env_override: config.force_strategy.clone(),
        }
    }

    pub fn server(config: &AppConfig) -> Self {
        Self {
            side: ExecutionSide::Server,
            user_agent: String::new(),
            href: None,
            query: Vec::new(),
            environment: config.environment.clone(),
            env_override: config.force_strategy.clone(),
        }
    }

    pub fn side(&self) -> ExecutionSide {
        self.side
    }

    pub fn is_client(&self) -> bool {
        self.side == ExecutionSide::Client
    }

    pub fn is_server(&self) -> bool {
        self.side == ExecutionSide::Server
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn user_agent(&self) -> &str {
        if self.is_server() {
            return "";
        }
        &self.user_agent
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Navegador interno de WeChat (MicroMessenger, sin distinguir mayúsculas)
    pub fn is_wechat_browser(&self) -> bool {
        self.is_client() && self.user_agent.to_ascii_lowercase().contains("micromessenger")
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_mobile(&self) -> bool {
        if !self.is_client() {
            return false;
        }
        let ua = self.user_agent.to_ascii_lowercase();
        MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
    }

    pub fn is_ios(&self) -> bool {
        self.is_client() && IOS_MARKERS.iter().any(|marker| self.user_agent.contains(marker))
    }

    pub fn is_android(&self) -> bool {
        self.is_client() && self.user_agent.contains("Android")
    }

    /// Override de estrategia: query (`forceStrategy`/`force_strategy`) antes que variable de entorno
    pub fn force_strategy(&self) -> Option<&str> {
        FORCE_STRATEGY_PARAMS
            .iter()
            .find_map(|name| self.query_param(name))
            .or(self.env_override.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn platform_name(&self) -> &'static str {
        if self.is_server() {
            "Server"
        } else if self.is_wechat_browser() {
            "WeChat H5"
        } else if self.is_development() {
            "Development"
        } else if self.is_mobile() {
            "Mobile browser"
        } else {
            "Desktop browser"
        }
    }

    pub fn debug_info(&self) -> PlatformDebugInfo {
        PlatformDebugInfo {
            is_client: self.is_client(),
            is_server: self.is_server(),
            is_wechat_browser: self.is_wechat_browser(),
            is_development: self.is_development(),
            is_production: self.is_production(),
            is_mobile: self.is_mobile(),
            is_ios: self.is_ios(),
            is_android: self.is_android(),
            user_agent: self.user_agent().to_string(),
            platform_name: self.platform_name().to_string(),
            force_strategy: self.force_strategy().map(str::to_string),
        }
    }
}
