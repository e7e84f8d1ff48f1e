use anyhow::{Context, Result};
use std::sync::Arc;

use super::{Operation, ServiceDescriptor};
use crate::config::{Config, ConfigTrait, ServiceEntry};

pub const HDFS_WATCHER: &str = "hdfswatcher";
pub const TEXT_PROCESSOR: &str = "textproc";
pub const EMBEDDING_PROCESSOR: &str = "embedproc";

/// Immutable, ordered set of known services keyed by logical name.
#[derive(Debug, Clone)]
pub struct Directory {
    services: Vec<Arc<ServiceDescriptor>>,
}

impl Directory {
    /// Builds a directory, rejecting duplicate names.
    pub fn new(services: Vec<ServiceDescriptor>) -> Result<Self> {
        let mut out: Vec<Arc<ServiceDescriptor>> = Vec::with_capacity(services.len());
        for descriptor in services {
            if out.iter().any(|d| d.name() == descriptor.name()) {
                anyhow::bail!("duplicate service in directory: {}", descriptor.name());
            }
            out.push(Arc::new(descriptor));
        }
        Ok(Self { services: out })
    }

    /// The RAG pipeline services this dashboard was built for.
    pub fn builtin() -> Self {
        use Operation::*;

        let services = vec![
            ServiceDescriptor::new(
                HDFS_WATCHER,
                "HDFS Watcher",
                "Monitors document storage for new files",
                &[Start, Stop, Toggle, State, Files, FilesProcessed, Reprocess, Reset, Clear],
            )
            .with_endpoint(FilesProcessed, "/files/processed"),
            ServiceDescriptor::new(
                TEXT_PROCESSOR,
                "Text Processor",
                "Extracts and processes text from documents",
                &[Start, Stop, Toggle, State, Files, FilesProcessed, Reprocess, Reset],
            ),
            ServiceDescriptor::new(
                EMBEDDING_PROCESSOR,
                "Embedding Processor",
                "Generates vector embeddings from processed text",
                &[Start, Stop, Toggle, State],
            ),
        ];

        Self {
            services: services.into_iter().map(Arc::new).collect(),
        }
    }

    /// Uses the `services` section when present, the built-in set otherwise.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        match cfg.services() {
            None => Ok(Self::builtin()),
            Some(entries) => {
                let descriptors = entries
                    .iter()
                    .map(Self::descriptor_from_entry)
                    .collect::<Result<Vec<_>>>()?;
                Self::new(descriptors)
            }
        }
    }

    fn descriptor_from_entry(entry: &ServiceEntry) -> Result<ServiceDescriptor> {
        let operations = entry
            .operations
            .iter()
            .map(|raw| {
                raw.parse::<Operation>()
                    .with_context(|| format!("services.{}.operations", entry.name))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut descriptor = ServiceDescriptor::new(
            entry.name.clone(),
            entry.display_name.clone().unwrap_or_else(|| entry.name.clone()),
            entry
                .description
                .clone()
                .unwrap_or_else(|| "RAG Pipeline Service".to_string()),
            &operations,
        );

        for (raw_op, path) in &entry.endpoints {
            let op = raw_op
                .parse::<Operation>()
                .with_context(|| format!("services.{}.endpoints", entry.name))?;
            if !path.starts_with('/') {
                anyhow::bail!(
                    "services.{}.endpoints.{}: path must start with '/', got {:?}",
                    entry.name,
                    raw_op,
                    path
                );
            }
            descriptor = descriptor.with_endpoint(op, path.clone());
        }

        Ok(descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter().map(|d| d.as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|d| d.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
