pub mod pagination;
pub mod pipeline;
pub mod resolver;
pub mod selection;
pub mod view_sync;
pub mod worker;

pub use pipeline::{Explorer, ExplorerConfig, ListView, Snapshot};
pub use resolver::GeocodeBatch;
pub use view_sync::MapFrame;
pub use worker::{run_batch, spawn_batch, SharedExplorer};
