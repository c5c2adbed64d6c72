pub mod layout;
pub use layout::Entry;

mod payload;

pub mod store_impl;
pub use store_impl::{
    merge_stores,
    Hdf5Store,
    MergeStats,
    ProjectSummary,
    RemovalReport,
};

pub mod command;
pub use command::{
    InspectCommand,
    MergeCommand,
    RemoveCommand,
};
