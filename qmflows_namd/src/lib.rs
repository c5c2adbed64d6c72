pub mod version;
pub mod logging;
pub mod cli;
pub use cli::OptProcess;

pub mod core;
pub mod workflow;
pub mod distribute;
pub mod store;
