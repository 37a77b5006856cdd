//! CLI argument parsing for the parameter round-trip workflow.
//!
//! The CLI is intentionally thin: every subcommand maps to one driver
//! operation, so orchestration scripts can call the same engine the tests
//! exercise.

use crate::schema::ArtifactKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the parameter round-trip workflow.
#[derive(Parser, Debug)]
#[command(
    name = "fabp",
    version,
    about = "Parameter extraction and placeholder substitution for Fabric artifacts",
    after_help = "Commands:\n  extract       Pull environment-bound values out of an artifact into the config store\n  templatize    Replace stored values with placeholders in the artifact file\n  detemplatize  Replace placeholders with the stored values for an environment\n  show          Print the stored variable list for one artifact\n\nExamples:\n  fabp extract --project . --workspace-path PF_002_Live/Engineering --name CopyData --kind pipeline --config config.json --env prd --workspace PF_002_Live\n  fabp templatize --project . --workspace-path PF_002_Live/Engineering --name TransformAndLoad --kind notebook --config config.json --env prd --workspace PF_002_Live\n  fabp show --config config.json --env prd --workspace PF_002_Live --name CopyData --kind pipeline",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract variables from an artifact into the config store
    Extract(OpArgs),
    /// Rewrite an artifact, replacing stored values with placeholders
    Templatize(OpArgs),
    /// Rewrite an artifact, replacing placeholders with stored values
    Detemplatize(OpArgs),
    /// Print the stored variable list for one artifact as JSON
    Show(ShowArgs),
}

/// Shared inputs of the three rewrite operations.
#[derive(Parser, Debug)]
pub struct OpArgs {
    /// Project root containing workspace directories
    #[arg(long, value_name = "DIR")]
    pub project: PathBuf,

    /// Directory holding the artifact, relative to the project root
    /// (e.g. PF_002_Live/Engineering)
    #[arg(long, value_name = "REL")]
    pub workspace_path: String,

    /// Artifact name without its kind suffix
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Artifact kind
    #[arg(long, value_enum)]
    pub kind: ArtifactKind,

    /// Path to the config store document
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Environment/branch key in the config store
    #[arg(long, value_name = "ENV")]
    pub env: String,

    /// Workspace alias key in the config store
    #[arg(long, value_name = "ALIAS")]
    pub workspace: String,
}

/// Inputs of the read-only show command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to the config store document
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Environment/branch key in the config store
    #[arg(long, value_name = "ENV")]
    pub env: String,

    /// Workspace alias key in the config store
    #[arg(long, value_name = "ALIAS")]
    pub workspace: String,

    /// Artifact name without its kind suffix
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Artifact kind
    #[arg(long, value_enum)]
    pub kind: ArtifactKind,
}
