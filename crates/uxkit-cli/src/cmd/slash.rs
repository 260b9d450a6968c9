use crate::output::{print_json, print_table, Reported};
use clap::ValueEnum;
use std::path::Path;
use uxkit_core::{
    paths,
    slash::{formatter, CommandResponse, SlashCommandHandler, WorkspaceBackend, COMMANDS},
    UxkitError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlashFormat {
    Display,
    Json,
    Markdown,
}

pub fn run(
    root: &Path,
    command: &str,
    preview: bool,
    format: SlashFormat,
    json: bool,
) -> anyhow::Result<()> {
    let handler = if preview {
        SlashCommandHandler::new()
    } else {
        if !paths::uxkit_dir(root).is_dir() {
            return Err(UxkitError::NotInitialized.into());
        }
        SlashCommandHandler::with_backend(WorkspaceBackend::new(root))
    };

    let response = handler.handle_command(command);
    tracing::debug!(summary = %formatter::response_summary(&response), "slash command handled");
    emit(&response, if json { SlashFormat::Json } else { format })
}

/// `uxkit commands`
pub fn list(json: bool) -> anyhow::Result<()> {
    if json {
        let response = SlashCommandHandler::new().list_commands();
        return emit(&response, SlashFormat::Json);
    }
    let rows = COMMANDS
        .iter()
        .map(|c| vec![format!("/{}", c.name), c.description.to_string()])
        .collect();
    print_table(&["COMMAND", "DESCRIPTION"], rows);
    Ok(())
}

/// `uxkit help-command [name]`
pub fn help(name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let response = SlashCommandHandler::new().help(name);
    if json {
        return emit(&response, SlashFormat::Json);
    }
    if response.success {
        print!("{}", response.body());
        Ok(())
    } else {
        eprintln!("error: {}", response.body());
        Err(Reported.into())
    }
}

fn emit(response: &CommandResponse, format: SlashFormat) -> anyhow::Result<()> {
    match format {
        SlashFormat::Display => println!("{}", formatter::format_for_display(response)),
        SlashFormat::Json => print_json(response)?,
        SlashFormat::Markdown => print!("{}", formatter::format_as_markdown(response)),
    }
    if response.success {
        Ok(())
    } else {
        Err(Reported.into())
    }
}
