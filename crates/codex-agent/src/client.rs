use std::path::PathBuf;
use std::time::Duration;

use crate::classify::classify;
use crate::process::{execute_command, ExecOptions, ExecutionResult};
use crate::{CodexError, Result};

pub const DEFAULT_COMMAND: &str = "codex";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Handle on the external `codex` binary.
#[derive(Debug, Clone)]
pub struct CodexClient {
    command: String,
    timeout: Duration,
    model: Option<String>,
    cwd: Option<PathBuf>,
}

impl Default for CodexClient {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl CodexClient {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_TIMEOUT,
            model: None,
            cwd: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Full path of the binary, if it can be found on PATH.
    pub fn resolve(&self) -> Option<PathBuf> {
        which::which(&self.command).ok()
    }

    pub fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    /// `codex --version`, trimmed.
    pub async fn version(&self) -> Result<String> {
        let out = self.run(&["--version".to_string()]).await?;
        Ok(out.stdout.trim().to_string())
    }

    /// `codex exec [--model <m>] <prompt>`.
    pub async fn exec(&self, prompt: &str) -> Result<ExecutionResult> {
        let mut args = vec!["exec".to_string()];
        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args.push(prompt.to_string());
        self.run(&args).await
    }

    async fn run(&self, args: &[String]) -> Result<ExecutionResult> {
        let opts = ExecOptions {
            timeout: Some(self.timeout),
            capture_output: true,
            cwd: self.cwd.clone(),
            env: Vec::new(),
        };
        let out = execute_command(&self.command, args, &opts).await?;
        if out.success {
            return Ok(out);
        }

        let category = classify(&out.stderr, out.exit_code);
        let detail = out
            .stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match out.exit_code {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            });
        tracing::warn!(command = %self.command, %category, "codex invocation failed");
        Err(CodexError::Failed {
            program: self.command.clone(),
            category,
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;

    #[test]
    fn availability_uses_path_lookup() {
        assert!(CodexClient::new("sh").is_available());
        assert!(!CodexClient::new("uxkit-no-such-binary").is_available());
    }

    #[tokio::test]
    async fn version_returns_trimmed_stdout() {
        // `echo --version` prints its argument back.
        let v = CodexClient::new("echo").version().await.unwrap();
        assert_eq!(v, "--version");
    }

    #[tokio::test]
    async fn exec_passes_model_and_prompt() {
        let client = CodexClient::new("echo").with_model(Some("o4-mini".into()));
        let out = client.exec("summarize notes").await.unwrap();
        assert_eq!(out.stdout.trim(), "exec --model o4-mini summarize notes");
    }

    #[tokio::test]
    async fn failure_is_classified() {
        let err = CodexClient::new("false").exec("hi").await.unwrap_err();
        match &err {
            CodexError::Failed { category, detail, .. } => {
                assert_eq!(*category, ErrorCategory::Unknown);
                assert_eq!(detail, "exit code 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary() {
        let err = CodexClient::new("uxkit-no-such-binary").exec("hi").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotInstalled);
    }
}
