use async_trait::async_trait;
use crate::models::{LoginOutcome, StoreContext};
use crate::utils::platform::PlatformDetector;

/// Estrategia de login específica de plataforma
///
/// `login` es la única operación con efectos: como mucho una llamada de red y
/// nunca reintenta (los reintentos son cosa del orquestador).
#[async_trait(?Send)]
pub trait AuthStrategy {
    /// Identificador estable (logs y override)
    fn name(&self) -> &'static str;

    /// Nombres alternativos aceptados por el override
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn answers_to(&self, requested: &str) -> bool {
        let requested = requested.trim();
        self.name().eq_ignore_ascii_case(requested)
            || self.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(requested))
    }

    /// Candidatura: función pura del entorno actual
    fn matches(&self, platform: &PlatformDetector) -> bool;

    /// true si `login` puede devolver `RedirectRequired`
    fn redirects(&self) -> bool {
        false
    }

    async fn login(&self, context: &StoreContext) -> LoginOutcome;

    /// Aviso visible al usuario; nunca falla
    fn report_failure(&self, message: &str);

    /// Navegación de página completa
    fn navigate(&self, url: &str) -> Result<(), String>;
}
