//! Root persisted document: environments holding host records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::host::HostRecord;

/// Current schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_ENVIRONMENT_ID: &str = "default";
pub const DEFAULT_ENVIRONMENT_NAME: &str = "Default";

/// A named grouping of hosts. Host order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<HostRecord>,
}

impl Environment {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            items: Vec::new(),
        }
    }

    pub fn default_environment() -> Self {
        Self::new(DEFAULT_ENVIRONMENT_ID, DEFAULT_ENVIRONMENT_NAME)
    }

    pub fn position(&self, host_id: &str) -> Option<usize> {
        self.items.iter().position(|h| h.id == host_id)
    }
}

/// Counts shown on the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub hosts: usize,
    pub environments: usize,
    pub tags: usize,
}

/// Root persisted object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub envs: Vec<Environment>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            envs: vec![Environment::default_environment()],
        }
    }
}

impl Document {
    pub fn environment(&self, env_id: &str) -> Option<&Environment> {
        self.envs.iter().find(|e| e.id == env_id)
    }

    pub fn environment_mut(&mut self, env_id: &str) -> Option<&mut Environment> {
        self.envs.iter_mut().find(|e| e.id == env_id)
    }

    /// Display name for an environment id, "Default" when it does not resolve.
    pub fn environment_name(&self, env_id: &str) -> &str {
        self.environment(env_id)
            .map(|e| e.name.as_str())
            .unwrap_or(DEFAULT_ENVIRONMENT_NAME)
    }

    /// All hosts in document order.
    pub fn hosts(&self) -> impl Iterator<Item = &HostRecord> {
        self.envs.iter().flat_map(|e| e.items.iter())
    }

    pub fn hosts_mut(&mut self) -> impl Iterator<Item = &mut HostRecord> {
        self.envs.iter_mut().flat_map(|e| e.items.iter_mut())
    }

    pub fn host_count(&self) -> usize {
        self.envs.iter().map(|e| e.items.len()).sum()
    }

    pub fn contains_host(&self, host_id: &str) -> bool {
        self.hosts().any(|h| h.id == host_id)
    }

    /// Locate a host as (environment index, item index). Linear scan, first match.
    pub fn locate(&self, host_id: &str) -> Option<(usize, usize)> {
        self.envs
            .iter()
            .enumerate()
            .find_map(|(ei, env)| env.position(host_id).map(|hi| (ei, hi)))
    }

    pub fn host(&self, host_id: &str) -> Option<&HostRecord> {
        self.locate(host_id).map(|(ei, hi)| &self.envs[ei].items[hi])
    }

    pub fn host_mut(&mut self, host_id: &str) -> Option<&mut HostRecord> {
        self.locate(host_id)
            .map(move |(ei, hi)| &mut self.envs[ei].items[hi])
    }

    /// Distinct tags across every environment, sorted.
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.hosts()
            .flat_map(|h| h.tags.iter().map(|t| t.as_str()))
            .collect()
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            hosts: self.host_count(),
            environments: self.envs.len(),
            tags: self.all_tags().len(),
        }
    }

    /// Make every host's `environment` field name the environment that holds
    /// it, and guarantee at least one environment exists.
    pub fn normalize(&mut self) -> usize {
        if self.envs.is_empty() {
            self.envs.push(Environment::default_environment());
        }

        let mut fixed = 0;
        for env in &mut self.envs {
            for host in &mut env.items {
                if host.environment_id != env.id {
                    host.environment_id = env.id.clone();
                    fixed += 1;
                }
            }
        }
        fixed
    }
}
