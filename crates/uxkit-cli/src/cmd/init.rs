use anyhow::Context;
use std::path::Path;
use uxkit_core::{
    config::Config,
    io, paths,
    slash::catalog::{CommandSpec, COMMANDS},
    templates,
};

/// Version of the uxkit binary embedded at compile time.
pub const UXKIT_BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run(root: &Path, codex: bool) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing uxkit in: {}", root.display());

    // 1. Directory structure
    let dirs = [
        paths::UXKIT_DIR,
        paths::STUDIES_DIR,
        paths::TEMPLATES_DIR,
        paths::MEMORY_DIR,
    ];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. config.yaml
    let config_path = paths::config_path(root);
    let mut config = if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config.yaml")?
    } else {
        println!("  created: {}", paths::CONFIG_FILE);
        Config::new(&project_name)
    };
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }
    if codex {
        config.codex.enabled = true;
    }
    config.uxkit_version = Some(UXKIT_BINARY_VERSION.to_string());
    config.save(root).context("failed to write config.yaml")?;

    // 3. Templates (never overwrite project edits)
    let created = templates::install_defaults(root).context("failed to install templates")?;
    for name in created {
        println!("  created: {}/{name}", paths::TEMPLATES_DIR);
    }

    // 4. Keep working memory out of version control
    io::ensure_gitignore_entry(root, &format!("{}/", paths::MEMORY_DIR))
        .context("failed to update .gitignore")?;

    // 5. Codex prompt files (managed content, always refreshed)
    if codex {
        println!("\nInstalling Codex prompts:");
        write_codex_prompts(root)?;
        let client = codex_agent::CodexClient::new(&config.codex.command);
        if !client.is_available() {
            println!(
                "  note: '{}' is not on PATH; {}",
                config.codex.command,
                codex_agent::ErrorCategory::NotInstalled.suggestion()
            );
        }
    }

    println!("\nuxkit initialized successfully.");
    println!("Next: uxkit study create \"<study name>\"");
    Ok(())
}

/// Prompt filename for a slash command, e.g. `uxkit-research-questions.md`.
pub fn codex_prompt_filename(command: &str) -> String {
    format!("uxkit-{}.md", command.replace(':', "-"))
}

fn write_codex_prompts(root: &Path) -> anyhow::Result<()> {
    let dir = paths::codex_prompts_dir(root);
    for spec in COMMANDS {
        let path = dir.join(codex_prompt_filename(spec.name));
        io::atomic_write(&path, render_codex_prompt(spec).as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  wrote:   {}", paths::display_relative(root, &path));
    }
    Ok(())
}

fn render_codex_prompt(spec: &CommandSpec) -> String {
    let mut out = format!(
        "---\ndescription: {desc}\n---\n\n# /{name}\n\n{desc}\n\n## Parameters\n\n",
        desc = spec.description,
        name = spec.name
    );
    for p in spec.params {
        let presence = if p.required { "required" } else { "optional" };
        out.push_str(&format!("- `--{}` ({presence}, {})\n", p.name, p.kind));
    }
    out.push_str("\n## Examples\n\n");
    for ex in spec.examples {
        out.push_str(&format!("- `{ex}`\n"));
    }
    out.push_str(&format!(
        "\n## Run\n\n```sh\nuxkit slash \"/{} $ARGUMENTS\"\n```\n\nReport the command's response to the user verbatim.\n",
        spec.name
    ));
    out
}
