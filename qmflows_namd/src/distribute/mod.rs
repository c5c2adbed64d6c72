pub mod chunk;
pub use chunk::{
    Chunk,
    ChunkPlan,
};

pub mod launch;
pub use launch::LaunchScript;

pub mod distribute_impl;
pub use distribute_impl::Distributor;

pub mod command;
pub use command::DistributeCommand;
