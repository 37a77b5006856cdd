//! Variable-record types shared by the extractors, the placeholder codec,
//! and the config store.

use serde::{Deserialize, Serialize};

/// The three artifact encodings the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactKind {
    Pipeline,
    Dataflow,
    Notebook,
}

impl ArtifactKind {
    /// Key under which this kind's artifacts live in the config store.
    pub fn store_key(self) -> &'static str {
        match self {
            ArtifactKind::Pipeline => "pipelines",
            ArtifactKind::Dataflow => "dataflows",
            ArtifactKind::Notebook => "notebooks",
        }
    }

    /// Path of the artifact's content file relative to the workspace
    /// directory, e.g. `CopyData.DataPipeline/pipeline-content.json`.
    pub fn content_rel_path(self, artifact_name: &str) -> String {
        match self {
            ArtifactKind::Pipeline => {
                format!("{artifact_name}.DataPipeline/pipeline-content.json")
            }
            ArtifactKind::Dataflow => format!("{artifact_name}.Dataflow/mashup.pq"),
            ArtifactKind::Notebook => format!("{artifact_name}.Notebook/notebook-content.py"),
        }
    }
}

/// One parameterizable location inside a pipeline definition.
///
/// Identity is `(activity_index, subactivity_index)`: activity names are
/// not unique within a pipeline, so the indices are what locate the record
/// in the source document. The names only feed placeholder scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineVariable {
    pub activity_index: usize,
    pub activity_name: String,
    pub subactivity_index: usize,
    pub subactivity_name: String,
    pub source_database: String,
    pub source_connection: String,
    pub sink_name: String,
    pub sink_workspace_id: String,
    pub sink_artifact_id: String,
}

/// One data destination inside a dataflow script.
///
/// Identity is `query_name`. The id fields keep their source spellings in
/// the stored JSON; exactly one destination id is present in well-formed
/// scripts, and `destination_type` records which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataflowVariable {
    pub destination_name: String,
    pub query_name: String,
    #[serde(rename = "workspaceId", skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(rename = "lakehouseId", skip_serializing_if = "Option::is_none")]
    pub lakehouse_id: Option<String>,
    #[serde(rename = "warehouseId", skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    #[serde(rename = "semanticModelId", skip_serializing_if = "Option::is_none")]
    pub semantic_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<DestinationType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationType {
    Lakehouse,
    Warehouse,
    SemanticModel,
}

/// One assignment in a notebook's parameter cell. Identity is
/// `variable_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookVariable {
    pub variable_name: String,
    pub variable_value: String,
    pub parameter_type: ParameterType,
}

/// Literal type inferred from the textual form of a parameter assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    String,
    Numeric,
    Boolean,
}
