//! Positional extractor and codec for pipeline definitions.
//!
//! A pipeline definition nests an `activities` array whose entries each
//! carry their own `typeProperties.activities` array of subactivities.
//! Records are identified by `(activity_index, subactivity_index)`, never
//! by name: names repeat within real pipelines. Placeholder scopes embed
//! those indices, so each record's tokens stay distinct even between
//! same-named subactivities. The forward rewrite is structural (edit the
//! parsed document, re-serialize); the inverse rewrite is a plain token
//! replace on the raw text.

use crate::placeholder;
use crate::schema::PipelineVariable;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;

/// Walk every (activity, subactivity) pair in array order and pull the
/// five designated fields. A subactivity that does not carry the expected
/// shape fails the whole extraction; no partial records are produced.
pub fn extract(content: &str) -> Result<Vec<PipelineVariable>> {
    let document: Value = serde_json::from_str(content).context("parse pipeline definition")?;
    let activities = array(&document, "/properties/activities")?;

    let mut variables = Vec::new();
    for (activity_index, activity) in activities.iter().enumerate() {
        let at = format!("/properties/activities/{activity_index}");
        let activity_name = string(activity, "/name", &at)?;
        let subactivities = array(activity, "/typeProperties/activities")
            .with_context(|| format!("at {at}"))?;

        for (subactivity_index, subactivity) in subactivities.iter().enumerate() {
            let at = format!("{at}/typeProperties/activities/{subactivity_index}");
            let source = "/typeProperties/source/datasetSettings";
            let sink = "/typeProperties/sink/datasetSettings/linkedService";

            variables.push(PipelineVariable {
                activity_index,
                activity_name: activity_name.to_string(),
                subactivity_index,
                subactivity_name: string(subactivity, "/name", &at)?.to_string(),
                source_database: string(
                    subactivity,
                    &format!("{source}/typeProperties/database"),
                    &at,
                )?
                .to_string(),
                source_connection: string(
                    subactivity,
                    &format!("{source}/externalReferences/connection"),
                    &at,
                )?
                .to_string(),
                sink_name: string(subactivity, &format!("{sink}/name"), &at)?.to_string(),
                sink_workspace_id: string(
                    subactivity,
                    &format!("{sink}/properties/typeProperties/workspaceId"),
                    &at,
                )?
                .to_string(),
                sink_artifact_id: string(
                    subactivity,
                    &format!("{sink}/properties/typeProperties/artifactId"),
                    &at,
                )?
                .to_string(),
            });
        }
    }

    Ok(variables)
}

/// Forward rewrite: overwrite the four environment-bound fields of each
/// record with its placeholder tokens, addressed by the record's index
/// path. The re-serialized document is semantically equal to the input
/// but not byte-stable (indentation and key order may differ).
pub fn templatize(content: &str, variables: &[PipelineVariable]) -> Result<String> {
    let mut document: Value =
        serde_json::from_str(content).context("parse pipeline definition")?;

    for variable in variables {
        let at = format!(
            "/properties/activities/{}/typeProperties/activities/{}",
            variable.activity_index, variable.subactivity_index
        );
        let subactivity = document
            .pointer_mut(&at)
            .ok_or_else(|| anyhow!("no subactivity at {at}"))?;

        set_string(
            subactivity,
            "/typeProperties/source/datasetSettings/typeProperties/database",
            &at,
            placeholder::token(&placeholder::pipeline_scope(variable, "source_database")),
        )?;
        set_string(
            subactivity,
            "/typeProperties/source/datasetSettings/externalReferences/connection",
            &at,
            placeholder::token(&placeholder::pipeline_scope(variable, "source_connection")),
        )?;
        set_string(
            subactivity,
            "/typeProperties/sink/datasetSettings/linkedService/properties/typeProperties/workspaceId",
            &at,
            placeholder::token(&placeholder::pipeline_scope(variable, "sink_workspace_id")),
        )?;
        set_string(
            subactivity,
            "/typeProperties/sink/datasetSettings/linkedService/properties/typeProperties/artifactId",
            &at,
            placeholder::token(&placeholder::pipeline_scope(variable, "sink_artifact_id")),
        )?;
    }

    serde_json::to_string_pretty(&document).context("serialize pipeline definition")
}

/// Inverse rewrite: replace each record's placeholder tokens with the
/// stored literal values. Tokens embed the record's index identity, so
/// this direction is unambiguous and can run on the raw text.
pub fn detemplatize(content: &str, variables: &[PipelineVariable]) -> String {
    let mut content = content.to_string();
    for variable in variables {
        for (token, value) in placeholder::pipeline_pairs(variable) {
            content = content.replace(&token, &value);
        }
    }
    content
}

fn array<'a>(value: &'a Value, pointer: &str) -> Result<&'a Vec<Value>> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("missing array {pointer} in pipeline definition"))
}

fn string<'a>(value: &'a Value, pointer: &str, at: &str) -> Result<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing string field {pointer} at {at}"))
}

fn set_string(value: &mut Value, pointer: &str, at: &str, replacement: String) -> Result<()> {
    let slot = value
        .pointer_mut(pointer)
        .ok_or_else(|| anyhow!("missing field {pointer} at {at}"))?;
    *slot = Value::String(replacement);
    Ok(())
}
