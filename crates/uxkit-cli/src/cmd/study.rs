use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use uxkit_core::{paths, study::Study};

#[derive(Subcommand)]
pub enum StudySubcommand {
    /// Create a new study
    Create {
        name: String,
        /// One-line description of what the study investigates
        #[arg(long)]
        description: Option<String>,
    },
    /// List all studies
    List,
    /// Show study details
    Show {
        /// Study id, slug or sequence number
        id: String,
    },
    /// Delete a study and all of its artifacts
    Delete {
        id: String,
        /// Required; deletion cannot be undone
        #[arg(long)]
        confirm: bool,
    },
}

pub fn run(root: &Path, subcmd: StudySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        StudySubcommand::Create { name, description } => create(root, &name, description, json),
        StudySubcommand::List => list(root, json),
        StudySubcommand::Show { id } => show(root, &id, json),
        StudySubcommand::Delete { id, confirm } => delete(root, &id, confirm, json),
    }
}

fn create(
    root: &Path,
    name: &str,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let study = Study::create(root, name, description)
        .with_context(|| format!("failed to create study '{name}'"))?;

    if json {
        print_json(&serde_json::json!({
            "success": true,
            "message": format!("Created study {}", study.id),
            "data": {
                "id": study.id,
                "name": study.name,
                "base_path": paths::display_relative(root, &study.base_path(root)),
            },
        }))?;
    } else {
        println!("Created study: {} — {}", study.id, study.name);
        println!("Path: {}", paths::display_relative(root, &study.base_path(root)));
        println!(
            "Next: uxkit research questions --study {} --topic \"...\"",
            study.id
        );
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let studies = Study::list(root).context("failed to list studies")?;

    if json {
        print_json(&studies)?;
        return Ok(());
    }

    if studies.is_empty() {
        println!("No studies yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = studies
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.created_at.format("%Y-%m-%d").to_string(),
                s.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "CREATED", "NAME"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let study = Study::load(root, id).with_context(|| format!("failed to load study '{id}'"))?;
    let artifacts = study.artifacts(root);

    if json {
        let present: Vec<&str> = artifacts
            .iter()
            .filter(|(_, exists)| *exists)
            .map(|(name, _)| *name)
            .collect();
        print_json(&serde_json::json!({
            "study": study,
            "artifacts": present,
        }))?;
        return Ok(());
    }

    println!("Study:   {} — {}", study.id, study.name);
    if let Some(ref desc) = study.description {
        println!("Desc:    {desc}");
    }
    println!("Created: {}", study.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", study.updated_at.format("%Y-%m-%d %H:%M"));

    println!("\nArtifacts:");
    for (name, exists) in artifacts {
        let mark = if exists { "x" } else { " " };
        println!("  [{mark}] {name}");
    }
    Ok(())
}

fn delete(root: &Path, id: &str, confirm: bool, json: bool) -> anyhow::Result<()> {
    if !confirm {
        anyhow::bail!("refusing to delete study '{id}' without --confirm");
    }
    let study = Study::delete(root, id).with_context(|| format!("failed to delete study '{id}'"))?;

    if json {
        print_json(&serde_json::json!({ "id": study.id, "deleted": true }))?;
    } else {
        println!("Deleted study: {}", study.id);
    }
    Ok(())
}
