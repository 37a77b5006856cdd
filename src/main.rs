use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod dataflow;
mod notebook;
mod ops;
mod pipeline;
mod placeholder;
mod schema;
mod store;

use cli::{Command, OpArgs, RootArgs, ShowArgs};
use ops::{ArtifactTarget, ExtractOutcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Extract(args) => cmd_extract(args),
        Command::Templatize(args) => cmd_templatize(args),
        Command::Detemplatize(args) => cmd_detemplatize(args),
        Command::Show(args) => cmd_show(args),
    }
}

fn target_from(args: &OpArgs) -> ArtifactTarget {
    ArtifactTarget {
        project_root: args.project.clone(),
        workspace_path: args.workspace_path.clone(),
        name: args.name.clone(),
        kind: args.kind,
    }
}

fn cmd_extract(args: OpArgs) -> Result<()> {
    let target = target_from(&args);
    match ops::extract(&target, &args.config, &args.env, &args.workspace)? {
        ExtractOutcome::Empty => {
            println!("No variables found in {}.", args.name);
        }
        ExtractOutcome::Extracted(count) => {
            println!(
                "Extracted {count} variables from {} into {}.",
                args.name,
                args.config.display()
            );
        }
    }
    Ok(())
}

fn cmd_templatize(args: OpArgs) -> Result<()> {
    let target = target_from(&args);
    ops::templatize(&target, &args.config, &args.env, &args.workspace)?;
    println!(
        "Variables replaced with placeholders in {}.",
        target.content_path().display()
    );
    Ok(())
}

fn cmd_detemplatize(args: OpArgs) -> Result<()> {
    let target = target_from(&args);
    ops::detemplatize(&target, &args.config, &args.env, &args.workspace)?;
    println!(
        "Placeholders replaced with variables in {}.",
        target.content_path().display()
    );
    Ok(())
}

fn cmd_show(args: ShowArgs) -> Result<()> {
    let variables =
        ops::stored_variables(&args.config, &args.env, &args.workspace, &args.name, args.kind)?;
    println!("{}", serde_json::to_string_pretty(&variables)?);
    Ok(())
}
