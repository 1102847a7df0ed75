use serde::{Deserialize, Serialize};

/// Fase del arranque de la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapPhase {
    Idle,
    ResolvingContext,
    Authenticating,
    HydratingStore,
    Ready,
    Failed,
}

impl BootstrapPhase {
    /// Ready y Failed son las únicas fases en las que el arranque se detiene
    pub fn is_terminal(&self) -> bool {
        matches!(self, BootstrapPhase::Ready | BootstrapPhase::Failed)
    }

    pub fn default_step(&self) -> &'static str {
        match self {
            BootstrapPhase::Idle => "Preparing...",
            BootstrapPhase::ResolvingContext => "Resolving store context...",
            BootstrapPhase::Authenticating => "Authenticating user...",
            BootstrapPhase::HydratingStore => "Loading store information...",
            BootstrapPhase::Ready => "Initialization complete",
            BootstrapPhase::Failed => "Initialization failed",
        }
    }
}

/// Estado observable del arranque: fase + etiqueta + error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapState {
    pub phase: BootstrapPhase,
    pub step: String,
    pub error: Option<String>,
    pub initialized: bool,
    /// URL de autorización pendiente (la página está a punto de navegar)
    pub redirect_url: Option<String>,
}

impl Default for BootstrapState {
    fn default() -> Self {
        Self {
            phase: BootstrapPhase::Idle,
            step: BootstrapPhase::Idle.default_step().to_string(),
            error: None,
            initialized: false,
            redirect_url: None,
        }
    }
}

/// Resultado de `launch()`; nunca es un error en bruto
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchStatus {
    /// Sesión ya autenticada y arranque ya completado en esta página
    AlreadyReady,
    /// Otro `launch()` está en curso
    InProgress,
    Ready,
    RedirectPending { url: String },
    Failed { message: String },
}

impl LaunchStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LaunchStatus::Ready | LaunchStatus::AlreadyReady)
    }
}
