use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use codex_agent::{CodexClient, CodexError};
use std::path::Path;
use std::time::Duration;
use uxkit_core::{
    config::{CodexConfig, Config},
    UxkitError,
};

#[derive(Subcommand)]
pub enum CodexSubcommand {
    /// Report whether the Codex CLI is installed and which version
    Status,
    /// Run `codex exec` with a prompt in the project root
    Run {
        prompt: String,
        /// Seconds before the process is killed (default: codex.timeout_secs)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

pub fn run(root: &Path, subcmd: CodexSubcommand, json: bool) -> anyhow::Result<()> {
    let cfg = load_codex_config(root)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    match subcmd {
        CodexSubcommand::Status => status(&rt, &cfg, json),
        CodexSubcommand::Run { prompt, timeout } => {
            let secs = timeout.unwrap_or(cfg.timeout_secs);
            let client = client_for(&cfg)
                .with_timeout(Duration::from_secs(secs))
                .with_cwd(root);
            if !cfg.enabled {
                tracing::warn!("codex integration is disabled in config; run 'uxkit init --codex' to enable");
            }
            exec(&rt, &client, &prompt, json)
        }
    }
}

/// Codex settings from `.uxkit/config.yaml`, or defaults when the project
/// has not been initialized.
fn load_codex_config(root: &Path) -> anyhow::Result<CodexConfig> {
    match Config::load(root) {
        Ok(c) => Ok(c.codex),
        Err(UxkitError::NotInitialized) => Ok(CodexConfig::default()),
        Err(e) => Err(e).context("failed to load config"),
    }
}

fn client_for(cfg: &CodexConfig) -> CodexClient {
    CodexClient::new(&cfg.command).with_model(cfg.model.clone())
}

fn status(rt: &tokio::runtime::Runtime, cfg: &CodexConfig, json: bool) -> anyhow::Result<()> {
    let client = client_for(cfg).with_timeout(Duration::from_secs(10));
    let path = client.resolve();
    let version = match &path {
        Some(_) => match rt.block_on(client.version()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "could not read codex version");
                None
            }
        },
        None => None,
    };

    if json {
        return print_json(&serde_json::json!({
            "command": cfg.command,
            "enabled": cfg.enabled,
            "available": path.is_some(),
            "path": path.as_ref().map(|p| p.display().to_string()),
            "version": version,
        }));
    }

    println!("Command:   {}", cfg.command);
    println!("Enabled:   {}", if cfg.enabled { "yes" } else { "no" });
    match &path {
        Some(p) => {
            println!("Available: yes ({})", p.display());
            println!("Version:   {}", version.as_deref().unwrap_or("unknown"));
        }
        None => {
            println!("Available: no");
            println!(
                "Hint:      {}",
                codex_agent::ErrorCategory::NotInstalled.suggestion()
            );
        }
    }
    Ok(())
}

fn exec(
    rt: &tokio::runtime::Runtime,
    client: &CodexClient,
    prompt: &str,
    json: bool,
) -> anyhow::Result<()> {
    let out = rt.block_on(client.exec(prompt)).map_err(with_suggestion)?;
    if json {
        print_json(&out)?;
    } else {
        print!("{}", out.stdout);
        if !out.stdout.is_empty() && !out.stdout.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn with_suggestion(e: CodexError) -> anyhow::Error {
    anyhow::anyhow!("{e}\n  suggestion: {}", e.suggestion())
}
