//! Whole-document config store.
//!
//! The store is a single JSON document keyed `environment →
//! workspace_alias → {pipelines|dataflows|notebooks} → artifact_name →
//! {variables}`. Every mutation is a wholesale read-modify-write: one
//! operation loads the document, edits it in memory, and persists it back.
//! There is no partial-write protocol; holding the document in memory for
//! the duration of one operation is the atomicity boundary.

use crate::schema::{DataflowVariable, NotebookVariable, PipelineVariable};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConfigStore {
    #[serde(flatten)]
    environments: BTreeMap<String, Environment>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Environment {
    #[serde(flatten)]
    workspaces: BTreeMap<String, Workspace>,
}

/// Per-workspace artifact maps. Keys the engine does not own (workspace
/// metadata written by orchestration) pass through `extra` untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pipelines: BTreeMap<String, ArtifactEntry<PipelineVariable>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dataflows: BTreeMap<String, ArtifactEntry<DataflowVariable>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notebooks: BTreeMap<String, ArtifactEntry<NotebookVariable>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry<T> {
    pub variables: Vec<T>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl<T> ArtifactEntry<T> {
    fn new(variables: Vec<T>) -> Self {
        ArtifactEntry {
            variables,
            extra: BTreeMap::new(),
        }
    }
}

impl ConfigStore {
    /// Load an existing store document. Absence of the file is an error:
    /// replace operations have nothing to substitute without one.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config store {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parse config store {}", path.display()))
    }

    /// Load the store, or start an empty document when the file does not
    /// exist yet. Used by extract, which creates keys on first write.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(ConfigStore::default())
        }
    }

    /// Rewrite the whole document in place.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize config store")?;
        fs::write(path, json)
            .with_context(|| format!("write config store {}", path.display()))?;
        Ok(())
    }

    fn workspace(&self, env: &str, workspace: &str) -> Result<&Workspace> {
        let environment = self
            .environments
            .get(env)
            .ok_or_else(|| anyhow!("environment '{env}' not found in config store"))?;
        environment
            .workspaces
            .get(workspace)
            .ok_or_else(|| anyhow!("workspace '{workspace}' not found under environment '{env}'"))
    }

    fn workspace_mut(&mut self, env: &str, workspace: &str) -> &mut Workspace {
        self.environments
            .entry(env.to_string())
            .or_default()
            .workspaces
            .entry(workspace.to_string())
            .or_default()
    }

    pub fn pipeline_variables(
        &self,
        env: &str,
        workspace: &str,
        name: &str,
    ) -> Result<&[PipelineVariable]> {
        let entry = self.workspace(env, workspace)?.pipelines.get(name);
        let entry = entry.ok_or_else(|| {
            anyhow!("no variables stored for pipeline '{name}' under {env}/{workspace}")
        })?;
        Ok(&entry.variables)
    }

    pub fn dataflow_variables(
        &self,
        env: &str,
        workspace: &str,
        name: &str,
    ) -> Result<&[DataflowVariable]> {
        let entry = self.workspace(env, workspace)?.dataflows.get(name);
        let entry = entry.ok_or_else(|| {
            anyhow!("no variables stored for dataflow '{name}' under {env}/{workspace}")
        })?;
        Ok(&entry.variables)
    }

    pub fn notebook_variables(
        &self,
        env: &str,
        workspace: &str,
        name: &str,
    ) -> Result<&[NotebookVariable]> {
        let entry = self.workspace(env, workspace)?.notebooks.get(name);
        let entry = entry.ok_or_else(|| {
            anyhow!("no variables stored for notebook '{name}' under {env}/{workspace}")
        })?;
        Ok(&entry.variables)
    }

    /// Replace the stored list wholesale, creating intermediate keys as
    /// needed. Re-extraction is the only update path.
    pub fn set_pipeline_variables(
        &mut self,
        env: &str,
        workspace: &str,
        name: &str,
        variables: Vec<PipelineVariable>,
    ) {
        let pipelines = &mut self.workspace_mut(env, workspace).pipelines;
        match pipelines.get_mut(name) {
            Some(entry) => entry.variables = variables,
            None => {
                pipelines.insert(name.to_string(), ArtifactEntry::new(variables));
            }
        }
    }

    pub fn set_dataflow_variables(
        &mut self,
        env: &str,
        workspace: &str,
        name: &str,
        variables: Vec<DataflowVariable>,
    ) {
        let dataflows = &mut self.workspace_mut(env, workspace).dataflows;
        match dataflows.get_mut(name) {
            Some(entry) => entry.variables = variables,
            None => {
                dataflows.insert(name.to_string(), ArtifactEntry::new(variables));
            }
        }
    }

    pub fn set_notebook_variables(
        &mut self,
        env: &str,
        workspace: &str,
        name: &str,
        variables: Vec<NotebookVariable>,
    ) {
        let notebooks = &mut self.workspace_mut(env, workspace).notebooks;
        match notebooks.get_mut(name) {
            Some(entry) => entry.variables = variables,
            None => {
                notebooks.insert(name.to_string(), ArtifactEntry::new(variables));
            }
        }
    }
}
