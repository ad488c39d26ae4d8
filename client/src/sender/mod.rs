pub mod cache_sink;
pub mod exporter;
pub mod network_sink;
pub mod snapshot;
