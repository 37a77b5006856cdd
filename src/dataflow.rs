//! Textual extractor and codec for dataflow scripts.
//!
//! A dataflow script declares one `shared <Query>_DataDestination = let …
//! in <name>;` block per destination. Extraction scopes the id searches to
//! each block's span; the rewrite works on literal `field = "<value>"`
//! patterns over the whole file. Two destinations sharing an identical
//! value therefore get rewritten together by the first record that claims
//! the literal, an ambiguity inherent to the format. The inverse direction
//! is unambiguous because tokens embed the record's query name.

use crate::placeholder;
use crate::schema::{DataflowVariable, DestinationType};
use regex::Regex;

/// Locate every destination block and pull its id assignments. A block
/// contributes a record only if at least one id-suffixed field matched.
pub fn extract(content: &str) -> Vec<DataflowVariable> {
    let destination = Regex::new(r"(?s)shared\s+(\w+)_DataDestination\s*=\s*let(.*?)in\s*\w+;")
        .expect("regex for destination blocks");

    let mut variables = Vec::new();
    for captures in destination.captures_iter(content) {
        let query_name = &captures[1];
        let block = &captures[2];

        let mut variable = DataflowVariable {
            destination_name: format!("{query_name}_DataDestination"),
            query_name: query_name.to_string(),
            workspace_id: capture_id(block, "workspaceId"),
            lakehouse_id: None,
            warehouse_id: None,
            semantic_model_id: None,
            destination_type: None,
        };

        // Checked in extraction order; a later match overwrites the type.
        // The id fields are mutually exclusive in well-formed scripts.
        if let Some(id) = capture_id(block, "lakehouseId") {
            variable.lakehouse_id = Some(id);
            variable.destination_type = Some(DestinationType::Lakehouse);
        }
        if let Some(id) = capture_id(block, "warehouseId") {
            variable.warehouse_id = Some(id);
            variable.destination_type = Some(DestinationType::Warehouse);
        }
        if let Some(id) = capture_id(block, "semanticModelId") {
            variable.semantic_model_id = Some(id);
            variable.destination_type = Some(DestinationType::SemanticModel);
        }

        let matched_any = variable.workspace_id.is_some()
            || variable.lakehouse_id.is_some()
            || variable.warehouse_id.is_some()
            || variable.semantic_model_id.is_some();
        if matched_any {
            variables.push(variable);
        }
    }

    variables
}

/// Forward rewrite: swap each extracted id literal for its placeholder,
/// wherever the `field = "<value>"` pattern occurs in the file.
pub fn templatize(content: &str, variables: &[DataflowVariable], dataflow_name: &str) -> String {
    rewrite(content, variables, dataflow_name, Direction::ToPlaceholder)
}

/// Inverse rewrite: restore each placeholder to its stored literal value.
pub fn detemplatize(content: &str, variables: &[DataflowVariable], dataflow_name: &str) -> String {
    rewrite(content, variables, dataflow_name, Direction::ToValue)
}

#[derive(Clone, Copy)]
enum Direction {
    ToPlaceholder,
    ToValue,
}

fn rewrite(
    content: &str,
    variables: &[DataflowVariable],
    dataflow_name: &str,
    direction: Direction,
) -> String {
    let mut content = content.to_string();
    for variable in variables {
        for (field, value) in id_fields(variable) {
            let Some(value) = value else {
                continue;
            };
            let token = placeholder::token(&placeholder::dataflow_scope(
                dataflow_name,
                &variable.query_name,
                field,
            ));
            let (needle, replacement) = match direction {
                Direction::ToPlaceholder => (
                    format!("{field} = \"{value}\""),
                    format!("{field} = \"{token}\""),
                ),
                Direction::ToValue => (
                    format!("{field} = \"{token}\""),
                    format!("{field} = \"{value}\""),
                ),
            };
            if !content.contains(&needle) {
                // Skip-and-continue per field: an absent literal (already
                // claimed by another record's rewrite) is not an error.
                tracing::debug!(field, query = %variable.query_name, "substitution pattern not found");
                continue;
            }
            content = content.replace(&needle, &replacement);
        }
    }
    content
}

fn id_fields(variable: &DataflowVariable) -> [(&'static str, Option<&String>); 4] {
    [
        ("workspaceId", variable.workspace_id.as_ref()),
        ("lakehouseId", variable.lakehouse_id.as_ref()),
        ("warehouseId", variable.warehouse_id.as_ref()),
        ("semanticModelId", variable.semantic_model_id.as_ref()),
    ]
}

fn capture_id(block: &str, field: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r#"{field}\s*=\s*"([a-f0-9-]+)""#))
        .expect("regex for destination id field");
    pattern
        .captures(block)
        .map(|captures| captures[1].to_string())
}
