//! Service directory: static metadata and per-service capabilities.

mod descriptor;
#[allow(clippy::module_inception)]
mod directory;

#[cfg(test)]
mod directory_test;

pub use descriptor::{Operation, ServiceDescriptor, UnknownOperation};
pub use directory::{Directory, EMBEDDING_PROCESSOR, HDFS_WATCHER, TEXT_PROCESSOR};
