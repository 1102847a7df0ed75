// ============================================================================
// LAUNCH ORCHESTRATOR - Secuencia de arranque (una vez por carga de página)
// ============================================================================
// Idle → ResolvingContext → Authenticating → HydratingStore → Ready
// Cualquier paso puede acabar en Failed; Failed no es terminal (launch() de nuevo).
// RedirectRequired deja la fase en Authenticating y la página navega fuera.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use crate::auth::{AuthStrategy, StrategyDebugInfo, StrategySelector};
use crate::config::AppConfig;
use crate::launch::{AuthReadinessGate, LaunchError, StoreInitializer};
use crate::models::{BootstrapPhase, LaunchStatus, LoginOutcome, StoreContext, StoreInfo};
use crate::services::AppServices;
use crate::state::{AppState, SessionState, StoreState};
use crate::utils::platform::{PlatformDebugInfo, PlatformDetector};
use crate::utils::url::{route_store_code, set_query_param, FORCE_STRATEGY_PARAMS};

/// Marca de ejecución en curso; se libera al soltarse (también si el future se descarta)
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Resultado de la fase de autenticación
enum AuthStep {
    Authenticated,
    Redirecting(String),
}

pub struct LaunchOrchestrator {
    config: AppConfig,
    services: AppServices,
    session: SessionState,
    app: AppState,
    store: StoreState,
    selector: StrategySelector,
    active: RefCell<Option<Rc<dyn AuthStrategy>>>,
    in_flight: Cell<bool>,
}

impl LaunchOrchestrator {
    pub fn new(config: AppConfig, services: AppServices, selector: StrategySelector) -> Self {
        let session = SessionState::new(services.storage.clone());
        let app = AppState::new(services.storage.clone());
        let default_store = config.default_store_code().unwrap_or_default().to_string();
        let store = StoreState::new(services.backend.clone(), services.storage.clone(), &default_store);

        Self {
            config,
            services,
            session,
            app,
            store,
            selector,
            active: RefCell::new(None),
            in_flight: Cell::new(false),
        }
    }

    /// Estrategias por defecto (desarrollo + WeChat) según la configuración
    pub fn with_services(config: AppConfig, services: AppServices) -> Self {
        let selector = StrategySelector::with_defaults(&config, &services);
        Self::new(config, services, selector)
    }

    // ------------------------------------------------------------------
    // Arranque
    // ------------------------------------------------------------------

    pub async fn launch(&self) -> LaunchStatus {
        if self.session.is_authenticated() && self.app.phase() == BootstrapPhase::Ready {
            log::debug!("✅ [LAUNCH] Ya inicializado, nada que hacer");
            return LaunchStatus::AlreadyReady;
        }
        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            log::debug!("⏳ [LAUNCH] Arranque ya en curso");
            return LaunchStatus::InProgress;
        };

        log::info!("🚀 [LAUNCH] Iniciando arranque");
        let platform = self.capture_platform();
        let strategy = self.activate(&platform);

        match self.run_sequence(&platform, strategy.as_ref()).await {
            Ok(AuthStep::Authenticated) => {
                log::info!("🎉 [LAUNCH] Arranque completado");
                LaunchStatus::Ready
            }
            Ok(AuthStep::Redirecting(url)) => LaunchStatus::RedirectPending { url },
            Err(error) => self.fail(strategy.as_ref(), error),
        }
    }

    async fn run_sequence(
        &self,
        platform: &PlatformDetector,
        strategy: &dyn AuthStrategy,
    ) -> Result<AuthStep, LaunchError> {
        self.app.set_error(None);

        self.app.transition(BootstrapPhase::ResolvingContext);
        let context = self.resolve_context(platform)?;
        self.app.set_store_context(context.clone());

        self.app.transition(BootstrapPhase::Authenticating);
        if self.session.is_authenticated() {
            log::info!("🔑 [LAUNCH] Sesión existente, se omite el login");
        } else if let AuthStep::Redirecting(url) = self.authenticate(strategy, &context).await? {
            return Ok(AuthStep::Redirecting(url));
        }

        self.app.transition(BootstrapPhase::HydratingStore);
        match self.hydrate(&context).await {
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => log::warn!("⚠️ [LAUNCH] {} (se continúa sin datos de tienda)", e),
            Ok(_) => {}
        }

        self.app.mark_ready();
        Ok(AuthStep::Authenticated)
    }

    /// Ruta → tienda guardada → `storeCode` en la query → valor por defecto
    fn resolve_context(&self, platform: &PlatformDetector) -> Result<StoreContext, LaunchError> {
        let query = |name: &str| {
            platform
                .query_param(name)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let store_code = platform
            .href()
            .and_then(|href| route_store_code(href, &self.config.store_route_segment))
            .or_else(|| self.app.stored_store_code())
            .or_else(|| query("storeCode"))
            .or_else(|| self.config.default_store_code().map(str::to_string))
            .ok_or_else(|| {
                LaunchError::ContextResolution("no store code in route, storage, query or defaults".to_string())
            })?;

        Ok(StoreContext::new(store_code)
            .with_table(query("tableId"))
            .with_address(query("addressId")))
    }

    /// Un único intento de login con la estrategia activa
    async fn authenticate(&self, strategy: &dyn AuthStrategy, context: &StoreContext) -> Result<AuthStep, LaunchError> {
        log::info!("🔐 [LAUNCH] Login con estrategia {}", strategy.name());

        match strategy.login(context).await {
            LoginOutcome::Success { credential } => {
                self.session.set_credential(credential);
                Ok(AuthStep::Authenticated)
            }
            LoginOutcome::RedirectRequired { url } => {
                log::info!("↪️ [LAUNCH] Redirección de autorización pendiente");
                self.app.set_redirect_pending(&url);
                strategy
                    .navigate(&url)
                    .map_err(|e| LaunchError::Authentication(format!("cannot navigate to authorization page: {}", e)))?;
                Ok(AuthStep::Redirecting(url))
            }
            LoginOutcome::Failure { reason } => Err(LaunchError::Authentication(reason)),
        }
    }

    async fn hydrate(&self, context: &StoreContext) -> Result<StoreInfo, LaunchError> {
        self.store.set_store_id(&context.store_code);
        self.store
            .fetch_store_info(Some(&context.store_code))
            .await
            .map_err(LaunchError::Hydration)
    }

    /// Failed + aviso de la estrategia (una sola vez por fallo)
    fn fail(&self, strategy: &dyn AuthStrategy, error: LaunchError) -> LaunchStatus {
        let message = error.to_string();
        log::error!("❌ [LAUNCH] {}", message);
        self.app.fail(&message);
        strategy.report_failure(&message);
        LaunchStatus::Failed { message }
    }

    fn capture_platform(&self) -> PlatformDetector {
        PlatformDetector::capture(self.services.browser.as_ref(), &self.config)
    }

    /// La selección se repite en cada llamada: el override puede cambiar entre navegaciones
    fn activate(&self, platform: &PlatformDetector) -> Rc<dyn AuthStrategy> {
        let strategy = self.selector.select(platform);
        self.app.set_platform(platform.platform_name());
        *self.active.borrow_mut() = Some(strategy.clone());
        strategy
    }

    // ------------------------------------------------------------------
    // Recuperación
    // ------------------------------------------------------------------

    /// Repite solo la autenticación; `force_reauth` descarta antes la credencial
    pub async fn perform_login(&self, force_reauth: bool) -> bool {
        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            log::warn!("⚠️ [LAUNCH] Login ignorado: arranque en curso");
            return false;
        };

        if force_reauth {
            self.session.clear_credential();
            self.app.set_initialized(false);
        } else if self.session.is_authenticated() {
            return true;
        }

        let platform = self.capture_platform();
        let strategy = self.activate(&platform);

        let context = match self.app.store_context() {
            Some(context) => context,
            None => match self.resolve_context(&platform) {
                Ok(context) => {
                    self.app.set_store_context(context.clone());
                    context
                }
                Err(error) => {
                    self.fail(strategy.as_ref(), error);
                    return false;
                }
            },
        };

        self.app.set_error(None);
        self.app.transition(BootstrapPhase::Authenticating);
        match self.authenticate(strategy.as_ref(), &context).await {
            Ok(AuthStep::Authenticated) => {
                self.app.mark_ready();
                true
            }
            Ok(AuthStep::Redirecting(_)) => false,
            Err(error) => {
                self.fail(strategy.as_ref(), error);
                false
            }
        }
    }

    /// Reinicio completo (recuperación manual de errores)
    pub async fn reinitialize(&self) -> LaunchStatus {
        if self.in_flight.get() {
            return LaunchStatus::InProgress;
        }
        log::info!("🔄 [LAUNCH] Reinicializando");
        self.app.reset();
        self.session.clear_credential();
        self.store.clear_store_info();
        *self.active.borrow_mut() = None;
        self.launch().await
    }

    /// Comprobación remota de la sesión; cualquier fallo cuenta como false
    pub async fn check_session(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        match self.services.backend.check_auth().await {
            Ok(response) => response.success,
            Err(e) => {
                log::warn!("⚠️ [LAUNCH] Comprobación de sesión fallida: {}", e);
                false
            }
        }
    }

    /// Solo desarrollo: fija `forceStrategy` y recarga tras una pausa
    pub fn switch_auth_strategy(&self, name: &str) -> bool {
        if !self.config.is_development() {
            log::warn!("⚠️ [LAUNCH] Cambio de estrategia solo disponible en desarrollo");
            return false;
        }
        let Some(strategy) = self.selector.find(name) else {
            log::warn!("⚠️ [LAUNCH] Estrategia desconocida: {}", name);
            return false;
        };
        let Some(href) = self.services.browser.location_href() else {
            return false;
        };
        let target = match set_query_param(&href, &FORCE_STRATEGY_PARAMS, Some(("forceStrategy", strategy.name()))) {
            Ok(target) => target,
            Err(e) => {
                log::warn!("⚠️ [LAUNCH] No se pudo preparar la URL: {}", e);
                return false;
            }
        };

        log::info!("🔀 [LAUNCH] Cambiando a estrategia {}", strategy.name());
        self.session.clear_credential();
        self.app.reset();

        let browser = self.services.browser.clone();
        let scheduler = self.services.scheduler.clone();
        let delay = Duration::from_millis(self.config.url_cleanup_delay_ms);
        self.services.scheduler.spawn(Box::pin(async move {
            scheduler.sleep(delay).await;
            if let Err(e) = browser.navigate(&target) {
                log::warn!("⚠️ [LAUNCH] Navegación fallida: {}", e);
            }
        }));
        true
    }

    // ------------------------------------------------------------------
    // Accesores
    // ------------------------------------------------------------------

    pub fn gate(&self) -> AuthReadinessGate {
        AuthReadinessGate::new(
            self.session.clone(),
            self.app.clone(),
            self.services.scheduler.clone(),
            &self.config,
        )
    }

    pub fn store_initializer(&self) -> StoreInitializer {
        StoreInitializer::new(self.gate(), self.store.clone())
    }

    pub fn register_strategy(&self, strategy: Rc<dyn AuthStrategy>) {
        self.selector.register(strategy);
    }

    /// Estrategia usada en el último arranque
    pub fn current_strategy(&self) -> Option<Rc<dyn AuthStrategy>> {
        self.active.borrow().clone()
    }

    pub fn platform_debug_info(&self) -> PlatformDebugInfo {
        self.capture_platform().debug_info()
    }

    pub fn strategy_debug_info(&self) -> StrategyDebugInfo {
        self.selector.debug_info(&self.capture_platform())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn store(&self) -> &StoreState {
        &self.store
    }
}
