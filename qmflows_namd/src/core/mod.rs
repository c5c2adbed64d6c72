pub mod config;
pub use config::*;

pub mod constants;
pub use constants::*;
