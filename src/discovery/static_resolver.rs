use parking_lot::RwLock;
use std::collections::HashMap;

use super::{normalize_addr, Resolver};

/// Resolver backed by a fixed name -> addresses table.
///
/// The table can be swapped at runtime, which is how tests simulate
/// instances appearing and disappearing between polls.
#[derive(Default)]
pub struct StaticResolver {
    table: RwLock<HashMap<String, Vec<String>>>,
}

impl StaticResolver {
    pub fn new(table: HashMap<String, Vec<String>>) -> Self {
        Self {
            table: RwLock::new(Self::normalize(table)),
        }
    }

    /// Registers or replaces the addresses of one service.
    pub fn set(&self, name: &str, addrs: Vec<String>) {
        let addrs = addrs.iter().map(|a| normalize_addr(a)).filter(|a| !a.is_empty()).collect();
        self.table.write().insert(name.to_string(), addrs);
    }

    /// Forgets every address of one service.
    pub fn remove(&self, name: &str) {
        self.table.write().remove(name);
    }

    fn normalize(table: HashMap<String, Vec<String>>) -> HashMap<String, Vec<String>> {
        table
            .into_iter()
            .map(|(name, addrs)| {
                let addrs = addrs
                    .iter()
                    .map(|a| normalize_addr(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                (name, addrs)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, name: &str) -> Vec<String> {
        self.table.read().get(name).cloned().unwrap_or_default()
    }
}
