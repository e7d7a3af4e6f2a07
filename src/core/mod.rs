pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, MovementConfig};
pub use error::{MovementError, Result};
