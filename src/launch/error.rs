use thiserror::Error;

/// Fallos del arranque
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaunchError {
    /// Ninguna fuente da un código de tienda
    #[error("Could not resolve a store context: {0}")]
    ContextResolution(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No fatal: solo se registra
    #[error("Store information unavailable: {0}")]
    Hydration(String),

    #[error("Invalid strategy configuration: {0}")]
    Configuration(String),
}

impl LaunchError {
    /// Solo los fallos de hidratación dejan llegar a Ready
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LaunchError::Hydration(_))
    }
}
