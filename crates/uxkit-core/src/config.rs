use crate::error::{Result, UxkitError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ResearchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_source_limit")]
    pub source_limit: u32,
}

fn default_format() -> String {
    "markdown".to_string()
}

fn default_question_count() -> u32 {
    5
}

fn default_source_limit() -> u32 {
    10
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            question_count: default_question_count(),
            source_limit: default_source_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// CodexConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodexConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_codex_command")]
    pub command: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_codex_command() -> String {
    "codex".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_codex_command(),
            timeout_secs: default_timeout_secs(),
            model: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub codex: CodexConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uxkit_version: Option<String>,
}

const SUPPORTED_FORMATS: &[&str] = &["markdown", "json", "text"];

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            research: ResearchConfig::default(),
            codex: CodexConfig::default(),
            uxkit_version: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(UxkitError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project.name must not be empty".to_string(),
            });
        }

        if !SUPPORTED_FORMATS.contains(&self.research.default_format.as_str()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "research.default_format '{}' is not one of: {}",
                    self.research.default_format,
                    SUPPORTED_FORMATS.join(", ")
                ),
            });
        }

        if self.research.question_count == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "research.question_count is 0; question files will be empty".to_string(),
            });
        }

        if self.codex.enabled && self.codex.command.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "codex.enabled is true but codex.command is empty".to_string(),
            });
        }

        if self.codex.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "codex.timeout_secs is 0; every codex call will time out".to_string(),
            });
        }

        warnings
    }
}
