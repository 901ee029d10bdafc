pub mod aggregate;
pub mod capability;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::GraphConfig;
pub use error::{GraphError, Result};
