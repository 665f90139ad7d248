pub mod config;
pub mod error;
pub mod error_utils;
pub mod forum;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use forum::*;
pub use types::*;
