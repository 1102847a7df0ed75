pub mod strategy;
pub mod development;
pub mod wechat;
pub mod selector;

pub use strategy::AuthStrategy;
pub use development::DevelopmentStrategy;
pub use wechat::{cleanup_url, WechatCallback, WechatRedirectStrategy};
pub use selector::{StrategyDebugInfo, StrategyMatch, StrategySelector};
