use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orden de candidatos cuando no hay override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPriority {
    /// Desarrollo primero: en builds de desarrollo nunca se redirige a WeChat sin override
    DevelopmentFirst,
    /// Plataforma primero: el navegador de WeChat gana incluso en desarrollo
    PlatformFirst,
}

impl StrategyPriority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development_first" | "dev_first" => Some(StrategyPriority::DevelopmentFirst),
            "platform_first" => Some(StrategyPriority::PlatformFirst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base: String,
    pub environment: String,
    pub force_strategy: Option<String>,
    pub default_store_code: String,
    pub dev_open_id: String,
    pub strategy_priority: StrategyPriority,
    pub store_route_segment: String,
    pub auth_poll_interval_ms: u64,
    pub auth_max_wait_ms: u64,
    pub url_cleanup_delay_ms: u64,
    pub url_cleanup_verify_delay_ms: u64,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            environment: "development".to_string(),
            force_strategy: None,
            default_store_code: "TEST001".to_string(),
            dev_open_id: "857346".to_string(),
            strategy_priority: StrategyPriority::DevelopmentFirst,
            store_route_segment: "store".to_string(),
            auth_poll_interval_ms: 200,
            auth_max_wait_ms: 10_000,
            url_cleanup_delay_ms: 100,
            url_cleanup_verify_delay_ms: 500,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: option_env!("API_BASE")
                .unwrap_or("/api").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            force_strategy: option_env!("FORCE_STRATEGY")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            default_store_code: option_env!("DEFAULT_STORE_CODE")
                .unwrap_or("TEST001").trim().to_string(),
            dev_open_id: option_env!("DEV_OPEN_ID")
                .unwrap_or("857346").to_string(),
            strategy_priority: option_env!("STRATEGY_PRIORITY")
                .and_then(StrategyPriority::parse)
                .unwrap_or(defaults.strategy_priority),
            store_route_segment: option_env!("STORE_ROUTE_SEGMENT")
                .unwrap_or("store").to_string(),
            auth_poll_interval_ms: option_env!("AUTH_POLL_INTERVAL_MS")
                .unwrap_or("200").parse().unwrap_or(defaults.auth_poll_interval_ms),
            auth_max_wait_ms: option_env!("AUTH_MAX_WAIT_MS")
                .unwrap_or("10000").parse().unwrap_or(defaults.auth_max_wait_ms),
            url_cleanup_delay_ms: option_env!("URL_CLEANUP_DELAY_MS")
                .unwrap_or("100").parse().unwrap_or(defaults.url_cleanup_delay_ms),
            url_cleanup_verify_delay_ms: option_env!("URL_CLEANUP_VERIFY_DELAY_MS")
                .unwrap_or("500").parse().unwrap_or(defaults.url_cleanup_verify_delay_ms),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Código de tienda por defecto; vacío = sin valor por defecto
    pub fn default_store_code(&self) -> Option<&str> {
        Some(self.default_store_code.as_str()).filter(|code| !code.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.auth_poll_interval_ms)
    }

    /// Número de sondeos que caben en la espera máxima (al menos uno)
    pub fn max_poll_attempts(&self) -> u64 {
        if self.auth_poll_interval_ms == 0 {
            return 1;
        }
        (self.auth_max_wait_ms / self.auth_poll_interval_ms).max(1)
    }

    pub fn log_level(&self) -> log::Level {
        if !self.enable_logging {
            log::Level::Warn
        } else if self.is_development() {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
