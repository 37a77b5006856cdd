//! Round-trip driver: the entry operations orchestration invokes per
//! artifact.
//!
//! Each operation is one artifact read plus at most one artifact write,
//! and one store read plus at most one store write. The store document is
//! held in memory for the duration of the operation; that whole-document
//! read-modify-write is the consistency boundary.

use crate::schema::ArtifactKind;
use crate::store::ConfigStore;
use crate::{dataflow, notebook, pipeline};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One artifact addressed by its path components.
#[derive(Debug, Clone)]
pub struct ArtifactTarget {
    pub project_root: PathBuf,
    pub workspace_path: String,
    pub name: String,
    pub kind: ArtifactKind,
}

impl ArtifactTarget {
    /// Full path of the artifact's content file, e.g.
    /// `<project>/<workspace_path>/CopyData.DataPipeline/pipeline-content.json`.
    pub fn content_path(&self) -> PathBuf {
        self.project_root
            .join(&self.workspace_path)
            .join(self.kind.content_rel_path(&self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// No designated fields were present; the store is left untouched.
    Empty,
    Extracted(usize),
}

/// Run the extractor for the artifact kind and persist the variable list
/// into the store, replacing any previous list wholesale. Zero extracted
/// records is a benign no-op: the store is neither created nor modified.
pub fn extract(
    target: &ArtifactTarget,
    config_path: &Path,
    env: &str,
    workspace: &str,
) -> Result<ExtractOutcome> {
    let content = read_artifact(target)?;
    let mut store = ConfigStore::load_or_empty(config_path)?;

    let count = match target.kind {
        ArtifactKind::Pipeline => {
            let variables = pipeline::extract(&content)?;
            if variables.is_empty() {
                return Ok(ExtractOutcome::Empty);
            }
            let count = variables.len();
            store.set_pipeline_variables(env, workspace, &target.name, variables);
            count
        }
        ArtifactKind::Dataflow => {
            let variables = dataflow::extract(&content);
            if variables.is_empty() {
                return Ok(ExtractOutcome::Empty);
            }
            let count = variables.len();
            store.set_dataflow_variables(env, workspace, &target.name, variables);
            count
        }
        ArtifactKind::Notebook => {
            let variables = notebook::extract(&content);
            if variables.is_empty() {
                return Ok(ExtractOutcome::Empty);
            }
            let count = variables.len();
            store.set_notebook_variables(env, workspace, &target.name, variables);
            count
        }
    };

    store.persist(config_path)?;
    tracing::info!(
        artifact = %target.name,
        count,
        "extracted variables into config store"
    );
    Ok(ExtractOutcome::Extracted(count))
}

/// Forward rewrite: load the stored variables (absence is a hard failure)
/// and overwrite the artifact file with its templated form.
pub fn templatize(
    target: &ArtifactTarget,
    config_path: &Path,
    env: &str,
    workspace: &str,
) -> Result<()> {
    let content = read_artifact(target)?;
    let store = ConfigStore::load(config_path)?;

    let rewritten = match target.kind {
        ArtifactKind::Pipeline => {
            let variables = store.pipeline_variables(env, workspace, &target.name)?;
            pipeline::templatize(&content, variables)?
        }
        ArtifactKind::Dataflow => {
            let variables = store.dataflow_variables(env, workspace, &target.name)?;
            dataflow::templatize(&content, variables, &target.name)
        }
        ArtifactKind::Notebook => {
            let variables = store.notebook_variables(env, workspace, &target.name)?;
            notebook::templatize(&content, variables, &target.name)
        }
    };

    write_artifact(target, &rewritten)
}

/// Inverse rewrite: restore the stored literal values in place of their
/// placeholder tokens and overwrite the artifact file.
pub fn detemplatize(
    target: &ArtifactTarget,
    config_path: &Path,
    env: &str,
    workspace: &str,
) -> Result<()> {
    let content = read_artifact(target)?;
    let store = ConfigStore::load(config_path)?;

    let rewritten = match target.kind {
        ArtifactKind::Pipeline => {
            let variables = store.pipeline_variables(env, workspace, &target.name)?;
            pipeline::detemplatize(&content, variables)
        }
        ArtifactKind::Dataflow => {
            let variables = store.dataflow_variables(env, workspace, &target.name)?;
            dataflow::detemplatize(&content, variables, &target.name)
        }
        ArtifactKind::Notebook => {
            let variables = store.notebook_variables(env, workspace, &target.name)?;
            notebook::detemplatize(&content, variables, &target.name)
        }
    };

    write_artifact(target, &rewritten)
}

/// Stored variable list for one artifact, as JSON.
pub fn stored_variables(
    config_path: &Path,
    env: &str,
    workspace: &str,
    name: &str,
    kind: ArtifactKind,
) -> Result<serde_json::Value> {
    let store = ConfigStore::load(config_path)?;
    let value = match kind {
        ArtifactKind::Pipeline => {
            serde_json::to_value(store.pipeline_variables(env, workspace, name)?)
        }
        ArtifactKind::Dataflow => {
            serde_json::to_value(store.dataflow_variables(env, workspace, name)?)
        }
        ArtifactKind::Notebook => {
            serde_json::to_value(store.notebook_variables(env, workspace, name)?)
        }
    };
    value.context("serialize stored variables")
}

fn read_artifact(target: &ArtifactTarget) -> Result<String> {
    let path = target.content_path();
    fs::read_to_string(&path).with_context(|| format!("read artifact {}", path.display()))
}

fn write_artifact(target: &ArtifactTarget, content: &str) -> Result<()> {
    let path = target.content_path();
    fs::write(&path, content).with_context(|| format!("write artifact {}", path.display()))?;
    tracing::info!(artifact = %path.display(), "rewrote artifact");
    Ok(())
}
