//! Placeholder grammar.
//!
//! A placeholder is `#{<scope>}#` where the scope joins artifact-identity
//! components with underscores. Scopes embed the owning record's identity,
//! so tokens are unique per artifact by construction.

use crate::schema::PipelineVariable;

/// Pipeline fields that are rewritten to placeholders. `sink_name` is
/// extracted for readability but never templatized.
pub const PIPELINE_FIELDS: [&str; 4] = [
    "source_database",
    "source_connection",
    "sink_workspace_id",
    "sink_artifact_id",
];

/// Render a scope as its in-artifact token form.
pub fn token(scope: &str) -> String {
    format!("#{{{scope}}}#")
}

/// Pipeline scopes carry the record's `(activity_index, subactivity_index)`
/// identity alongside the names. Names repeat within real pipelines; the
/// indices keep tokens distinct when they do.
pub fn pipeline_scope(variable: &PipelineVariable, field: &str) -> String {
    format!(
        "{}{}_{}{}_{}",
        variable.activity_name,
        variable.activity_index,
        variable.subactivity_name,
        variable.subactivity_index,
        field
    )
}

pub fn dataflow_scope(dataflow_name: &str, query_name: &str, field: &str) -> String {
    format!("{dataflow_name}_{query_name}_{field}")
}

pub fn notebook_scope(notebook_name: &str, variable_name: &str) -> String {
    format!("{notebook_name}_{variable_name}")
}

/// (token, literal value) pairs for one pipeline record, in field order.
pub fn pipeline_pairs(variable: &PipelineVariable) -> Vec<(String, String)> {
    PIPELINE_FIELDS
        .iter()
        .map(|&field| {
            let value = match field {
                "source_database" => &variable.source_database,
                "source_connection" => &variable.source_connection,
                "sink_workspace_id" => &variable.sink_workspace_id,
                "sink_artifact_id" => &variable.sink_artifact_id,
                other => unreachable!("unknown pipeline field {other}"),
            };
            (token(&pipeline_scope(variable, field)), value.clone())
        })
        .collect()
}
