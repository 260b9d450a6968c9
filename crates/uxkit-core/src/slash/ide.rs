//! IDE-facing façade: command discovery, registration, simulated execution
//! and help text.

use super::catalog::{self, CommandRegistration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeRequest {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub execution_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl HelpRequest {
    pub fn for_command(command: Option<&str>) -> Self {
        Self {
            kind: "help".to_string(),
            command: command.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpResponse {
    pub success: bool,
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    pub success: bool,
    pub registered_commands: Vec<String>,
    pub errors: Vec<String>,
}

/// Acknowledgement returned by simulated IDE execution, per command.
fn simulated_ack(command: &str) -> &'static str {
    match command {
        "research:questions" => "Research questions generated successfully",
        "research:sources" => "Research sources collected successfully",
        "research:summarize" => "Research summary generated successfully",
        "research:interview" => "Interview processed successfully",
        "research:synthesize" => "Research insights synthesized successfully",
        "study:create" => "Study created successfully",
        "study:list" => "Studies listed successfully",
        "study:show" => "Study details retrieved successfully",
        "study:delete" => "Study deleted successfully",
        _ => "Command executed successfully",
    }
}

/// Registration catalog plus the set of commands an IDE host has registered.
///
/// The registered set only grows; it lives as long as this value does.
#[derive(Debug, Clone)]
pub struct IdeIntegration {
    catalog: Vec<CommandRegistration>,
    registered: BTreeSet<String>,
}

impl Default for IdeIntegration {
    fn default() -> Self {
        Self::new()
    }
}

impl IdeIntegration {
    pub fn new() -> Self {
        Self {
            catalog: catalog::COMMANDS.iter().map(|c| c.registration()).collect(),
            registered: BTreeSet::new(),
        }
    }

    pub fn register_commands<S: AsRef<str>>(&mut self, names: &[S]) -> RegistrationResult {
        let mut registered_commands = Vec::new();
        let mut errors = Vec::new();
        for name in names {
            let name = name.as_ref();
            if self.command_registration(name).is_some() {
                self.registered.insert(name.to_string());
                registered_commands.push(name.to_string());
            } else {
                errors.push(format!("Unknown command: {name}"));
            }
        }
        tracing::debug!(
            registered = registered_commands.len(),
            errors = errors.len(),
            "ide command registration"
        );
        RegistrationResult {
            success: errors.is_empty(),
            registered_commands,
            errors,
        }
    }

    /// Simulated execution: routes by substring match against catalog names.
    pub fn execute_command(&self, request: &IdeRequest) -> IdeResponse {
        let start = Instant::now();
        let command = request.command.trim();

        let outcome = if command.is_empty() {
            Err("Command is required".to_string())
        } else {
            self.catalog
                .iter()
                .find(|reg| command.contains(reg.command.as_str()))
                .map(|reg| simulated_ack(&reg.command).to_string())
                .ok_or_else(|| format!("Unknown command: {command}"))
        };

        let (success, response, error) = match outcome {
            Ok(text) => (true, Some(text), None),
            Err(e) => (false, None, Some(e)),
        };
        IdeResponse {
            success,
            response,
            error,
            context: request.context.clone(),
            timestamp: Utc::now(),
            execution_time: start.elapsed().as_millis() as u64,
        }
    }

    pub fn help(&self, request: &HelpRequest) -> HelpResponse {
        if request.kind != "help" {
            return HelpResponse {
                success: false,
                help: "Invalid help request".to_string(),
            };
        }

        match request.command.as_deref() {
            Some(name) => match self.command_registration(name) {
                Some(reg) => HelpResponse {
                    success: true,
                    help: render_command_help(reg),
                },
                None => HelpResponse {
                    success: false,
                    help: format!("Command '{name}' not found"),
                },
            },
            None => HelpResponse {
                success: true,
                help: self.render_overview(),
            },
        }
    }

    fn render_overview(&self) -> String {
        let mut out = String::from("# Available Commands\n\n");
        for reg in &self.catalog {
            out.push_str(&format!("- /{}: {}\n", reg.command, reg.description));
        }
        out.push_str("\nUse help with a command name for parameters and examples.\n");
        out
    }

    pub fn is_command_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    /// Registered command names, sorted.
    pub fn registered_commands(&self) -> Vec<String> {
        self.registered.iter().cloned().collect()
    }

    pub fn command_registration(&self, name: &str) -> Option<&CommandRegistration> {
        self.catalog.iter().find(|r| r.command == name)
    }

    pub fn registrations(&self) -> &[CommandRegistration] {
        &self.catalog
    }
}

fn render_command_help(reg: &CommandRegistration) -> String {
    let mut out = format!("# {}\n\n{}\n", reg.command, reg.description);

    out.push_str("\n## Parameters\n\n");
    if reg.parameters.is_empty() {
        out.push_str("- none\n");
    }
    for p in &reg.parameters {
        out.push_str(&format!("- {p}\n"));
    }

    out.push_str("\n## Examples\n\n");
    for ex in &reg.examples {
        out.push_str(&format!("- `{ex}`\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_known_and_unknown() {
        let mut ide = IdeIntegration::new();
        let result = ide.register_commands(&["study:list", "study:archive", "research:questions"]);
        assert!(!result.success);
        assert_eq!(result.registered_commands, vec!["study:list", "research:questions"]);
        assert_eq!(result.errors, vec!["Unknown command: study:archive"]);
        assert!(ide.is_command_registered("study:list"));
        assert!(!ide.is_command_registered("study:archive"));
    }

    #[test]
    fn register_is_idempotent() {
        let mut ide = IdeIntegration::new();
        let first = ide.register_commands(&["study:list", "study:show"]);
        let second = ide.register_commands(&["study:list", "study:show"]);
        assert!(first.success && second.success);
        assert!(second.errors.is_empty());
        assert_eq!(ide.registered_commands(), vec!["study:list", "study:show"]);
    }

    #[test]
    fn execute_requires_command() {
        let ide = IdeIntegration::new();
        let r = ide.execute_command(&IdeRequest {
            command: "  ".into(),
            context: Some(json!({"line": 3})),
        });
        assert!(!r.success);
        assert_eq!(r.error.as_deref(), Some("Command is required"));
        assert_eq!(r.context, Some(json!({"line": 3})));
    }

    #[test]
    fn execute_matches_by_substring() {
        let ide = IdeIntegration::new();
        let r = ide.execute_command(&IdeRequest {
            command: "/research:questions --study=x".into(),
            context: None,
        });
        assert!(r.success);
        assert_eq!(r.response.as_deref(), Some("Research questions generated successfully"));

        let r = ide.execute_command(&IdeRequest {
            command: "research:everything".into(),
            context: None,
        });
        assert!(!r.success);
        assert_eq!(r.error.as_deref(), Some("Unknown command: research:everything"));
    }

    #[test]
    fn help_variants() {
        let ide = IdeIntegration::new();

        let bad = ide.help(&HelpRequest {
            kind: "usage".into(),
            command: None,
        });
        assert_eq!(bad.help, "Invalid help request");
        assert!(!bad.success);

        let one = ide.help(&HelpRequest::for_command(Some("study:delete")));
        assert!(one.success);
        assert!(one.help.starts_with("# study:delete\n"));
        assert!(one.help.contains("- confirm (optional, boolean)"));
        assert!(one.help.contains(r#"/study:delete --name="001-checkout" --confirm"#));

        let missing = ide.help(&HelpRequest::for_command(Some("study:archive")));
        assert!(!missing.success);
        assert_eq!(missing.help, "Command 'study:archive' not found");

        let all = ide.help(&HelpRequest::for_command(None));
        assert!(all.success);
        for reg in ide.registrations() {
            assert!(all.help.contains(&format!("/{}", reg.command)));
        }
    }

    #[test]
    fn help_request_wire_shape() {
        let req: HelpRequest = serde_json::from_str(r#"{"type":"help","command":"study:list"}"#).unwrap();
        assert_eq!(req, HelpRequest::for_command(Some("study:list")));
    }
}
