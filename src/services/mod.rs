//! Services for loading and aggregating the input tables

pub mod aggregator;
pub mod data_loader;

pub use aggregator::{Aggregator, LoadedTables};
pub use data_loader::DataLoaderService;
