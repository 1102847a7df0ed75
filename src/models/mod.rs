pub mod auth;
pub mod bootstrap;
pub mod store_context;
pub mod store_info;

pub use auth::{AuthCheckResponse, LoginOutcome, SessionCredential};
pub use bootstrap::{BootstrapPhase, BootstrapState, LaunchStatus};
pub use store_context::StoreContext;
pub use store_info::{BusinessHours, OrderType, StoreConfig, StoreInfo, StoreStatus};
