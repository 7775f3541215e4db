//! An in-memory [`Graph`](triplestream_common::Graph) with snapshot isolation for readers.
mod scan;
mod snapshot;
mod storage;

pub use scan::MemGraphScan;
pub use snapshot::MemGraphSnapshot;
pub use storage::MemGraph;
