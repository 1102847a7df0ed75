// ============================================================================
// LAUNCH MODULE - Orquestación del arranque
// ============================================================================

pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod store_init;

pub use error::LaunchError;
pub use gate::{AuthReadinessGate, AuthStatus};
pub use orchestrator::LaunchOrchestrator;
pub use store_init::StoreInitializer;
