//! Textual extractor and codec for notebook sources.
//!
//! Parameters live in a single cell delimited by a `# PARAMETERS CELL`
//! marker; the span runs to the next section marker or end of text.
//! Within the span, ordered pattern rules infer each literal's type:
//! string forms first (plain and formatted, double- and single-quoted),
//! then numeric, then boolean. A name captured by an earlier rule is not
//! re-evaluated by a later one (first-match-wins), and a string whose
//! value embeds substitution syntax is derived from another variable and
//! is not parameterized.

use crate::placeholder;
use crate::schema::{NotebookVariable, ParameterType};
use regex::Regex;
use std::collections::BTreeSet;

const STRING_PATTERNS: [&str; 4] = [
    r#"(\w+)\s*=\s*"([^"]*)""#,
    r#"(\w+)\s*=\s*f"([^"]*)""#,
    r"(\w+)\s*=\s*'([^']*)'",
    r"(\w+)\s*=\s*f'([^']*)'",
];

pub fn extract(content: &str) -> Vec<NotebookVariable> {
    let Some(span) = parameter_cell_span(content) else {
        return Vec::new();
    };

    let mut variables = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    let derived = Regex::new(r"\{[^}]+\}").expect("regex for substitution syntax");
    for pattern in STRING_PATTERNS {
        let assignment = Regex::new(pattern).expect("regex for string assignment");
        for captures in assignment.captures_iter(span) {
            let name = &captures[1];
            let value = &captures[2];
            // Values computed from other variables are not parameterized.
            if derived.is_match(value) {
                continue;
            }
            if !seen.insert(name.to_string()) {
                continue;
            }
            variables.push(NotebookVariable {
                variable_name: name.to_string(),
                variable_value: value.to_string(),
                parameter_type: ParameterType::String,
            });
        }
    }

    let numeric = Regex::new(r"(\w+)\s*=\s*(\d+(?:\.\d+)?)").expect("regex for numeric assignment");
    for captures in numeric.captures_iter(span) {
        let name = &captures[1];
        if !seen.insert(name.to_string()) {
            continue;
        }
        variables.push(NotebookVariable {
            variable_name: name.to_string(),
            variable_value: captures[2].to_string(),
            parameter_type: ParameterType::Numeric,
        });
    }

    let boolean = Regex::new(r"(\w+)\s*=\s*(True|False)").expect("regex for boolean assignment");
    for captures in boolean.captures_iter(span) {
        let name = &captures[1];
        if !seen.insert(name.to_string()) {
            continue;
        }
        variables.push(NotebookVariable {
            variable_name: name.to_string(),
            variable_value: captures[2].to_string(),
            parameter_type: ParameterType::Boolean,
        });
    }

    variables
}

/// Forward rewrite: each parameter assignment becomes
/// `name = "#{<notebook>_<name>}#"`, whatever literal form it had. The
/// templated form is always a double-quoted string, so detemplatize
/// restores formatted or single-quoted strings in normalized form.
pub fn templatize(content: &str, variables: &[NotebookVariable], notebook_name: &str) -> String {
    let mut content = content.to_string();
    for variable in variables {
        let token = placeholder::token(&placeholder::notebook_scope(
            notebook_name,
            &variable.variable_name,
        ));
        let replacement = format!("{} = \"{token}\"", variable.variable_name);
        let candidates = assignment_forms(variable);
        let Some(needle) = candidates.iter().find(|needle| content.contains(*needle)) else {
            tracing::debug!(name = %variable.variable_name, "substitution pattern not found");
            continue;
        };
        content = content.replace(needle, &replacement);
    }
    content
}

/// Inverse rewrite: restore the literal in its stored syntactic form.
pub fn detemplatize(content: &str, variables: &[NotebookVariable], notebook_name: &str) -> String {
    let mut content = content.to_string();
    for variable in variables {
        let token = placeholder::token(&placeholder::notebook_scope(
            notebook_name,
            &variable.variable_name,
        ));
        let needle = format!("{} = \"{token}\"", variable.variable_name);
        let replacement = match variable.parameter_type {
            ParameterType::String => format!(
                "{} = \"{}\"",
                variable.variable_name, variable.variable_value
            ),
            ParameterType::Numeric | ParameterType::Boolean => {
                format!("{} = {}", variable.variable_name, variable.variable_value)
            }
        };
        if !content.contains(&needle) {
            tracing::debug!(name = %variable.variable_name, "placeholder not found");
            continue;
        }
        content = content.replace(&needle, &replacement);
    }
    content
}

fn parameter_cell_span(content: &str) -> Option<&str> {
    let span = Regex::new(r"(?s)# PARAMETERS CELL \*+\s*\n(.*?)(?:# METADATA|# CELL|# MARKDOWN|\z)")
        .expect("regex for parameter cell");
    span.captures(content)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
}

fn assignment_forms(variable: &NotebookVariable) -> Vec<String> {
    let name = &variable.variable_name;
    let value = &variable.variable_value;
    match variable.parameter_type {
        ParameterType::String => vec![
            format!("{name} = \"{value}\""),
            format!("{name} = f\"{value}\""),
            format!("{name} = '{value}'"),
            format!("{name} = f'{value}'"),
        ],
        ParameterType::Numeric | ParameterType::Boolean => {
            vec![format!("{name} = {value}")]
        }
    }
}
