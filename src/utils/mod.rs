// Utils compartidos

pub mod platform;
pub mod storage;
pub mod url;

pub use platform::{ExecutionSide, PlatformDebugInfo, PlatformDetector};
