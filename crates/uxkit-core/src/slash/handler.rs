//! Top-level slash-command dispatcher.
//!
//! [`SlashCommandHandler`] strings the parser, the IDE integration, the
//! backend and the response formatters together. Every entry point returns a
//! [`CommandResponse`]; failures are reported in the record, never raised.

use super::backend::{self, CommandBackend, Invocation, PreviewBackend};
use super::formatter::{self, CommandResponse, Metadata};
use super::ide::{HelpRequest, IdeIntegration, IdeRequest};
use super::parser::{CommandParser, ParamValue, Parameters};
use std::time::Instant;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub struct SlashCommandHandler {
    parser: CommandParser,
    ide: IdeIntegration,
    backend: Box<dyn CommandBackend>,
}

impl Default for SlashCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SlashCommandHandler {
    /// A handler whose command bodies only describe what they would do.
    pub fn new() -> Self {
        Self::with_backend(PreviewBackend)
    }

    pub fn with_backend(backend: impl CommandBackend + 'static) -> Self {
        Self {
            parser: CommandParser::new(),
            ide: IdeIntegration::new(),
            backend: Box::new(backend),
        }
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    pub fn ide(&self) -> &IdeIntegration {
        &self.ide
    }

    pub fn handle_command(&self, command_string: &str) -> CommandResponse {
        let start = Instant::now();

        let parsed = match self.parser.parse(command_string) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(input = command_string, error = %e, "slash parse failed");
                return formatter::format_parsing_error(command_string, e, elapsed_ms(start));
            }
        };

        let Some(invocation) = Invocation::from_parsed(&parsed) else {
            return formatter::format_error(
                &parsed.command,
                parsed.parameters,
                format!("Unknown command: {}", parsed.command),
                elapsed_ms(start),
                None,
            );
        };

        let validation = self.parser.validate(&parsed);
        if !validation.is_valid {
            return formatter::format_validation_error(
                &parsed.command,
                parsed.parameters,
                &validation.errors,
                elapsed_ms(start),
            );
        }

        match backend::execute(self.backend.as_ref(), &invocation) {
            Ok(text) => formatter::format_success(
                &parsed.command,
                parsed.parameters,
                text,
                elapsed_ms(start),
                None,
            ),
            Err(e) => {
                tracing::debug!(command = %parsed.command, error = %e, "slash execution failed");
                formatter::format_execution_error(
                    &parsed.command,
                    parsed.parameters,
                    e,
                    elapsed_ms(start),
                )
            }
        }
    }

    /// Run a request through the simulated IDE path. The request context is
    /// kept under `metadata.context`.
    pub fn handle_ide_command(&self, request: &IdeRequest) -> CommandResponse {
        let start = Instant::now();
        let ide = self.ide.execute_command(request);
        let metadata = ide.context.map(|ctx| {
            let mut m = Metadata::new();
            m.insert("context".to_string(), ctx);
            m
        });
        match (ide.success, ide.response, ide.error) {
            (true, response, _) => formatter::format_success(
                &request.command,
                Parameters::new(),
                response.unwrap_or_default(),
                elapsed_ms(start),
                metadata,
            ),
            (false, _, error) => formatter::format_error(
                &request.command,
                Parameters::new(),
                error.unwrap_or_else(|| "Command failed".to_string()),
                elapsed_ms(start),
                metadata,
            ),
        }
    }

    pub fn help(&self, command: Option<&str>) -> CommandResponse {
        let start = Instant::now();
        let help = self.ide.help(&HelpRequest::for_command(command));
        if help.success {
            formatter::format_help_response(command, help.help, elapsed_ms(start))
        } else {
            let mut params = Parameters::new();
            params.insert(
                "command".to_string(),
                ParamValue::from(command.unwrap_or("all")),
            );
            formatter::format_error("help", params, help.help, elapsed_ms(start), None)
        }
    }

    pub fn list_commands(&self) -> CommandResponse {
        let start = Instant::now();
        let commands = self.parser.available_commands();
        formatter::format_command_list_response(&commands, elapsed_ms(start))
    }

    /// Register `names` with the IDE integration. The registered set belongs
    /// to this handler and only grows.
    pub fn register_commands<S: AsRef<str>>(&mut self, names: &[S]) -> CommandResponse {
        let start = Instant::now();
        let result = self.ide.register_commands(names);

        let mut params = Parameters::new();
        let requested: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        params.insert("commands".to_string(), ParamValue::from(requested.join(",")));

        let mut metadata = Metadata::new();
        metadata.insert(
            "registeredCommands".to_string(),
            serde_json::json!(result.registered_commands),
        );

        if result.success {
            formatter::format_success(
                "register",
                params,
                format!(
                    "Registered {} command(s): {}",
                    result.registered_commands.len(),
                    result.registered_commands.join(", ")
                ),
                elapsed_ms(start),
                Some(metadata),
            )
        } else {
            formatter::format_error(
                "register",
                params,
                format!("Registration failed:\n- {}", result.errors.join("\n- ")),
                elapsed_ms(start),
                Some(metadata),
            )
        }
    }

    pub fn is_command_registered(&self, name: &str) -> bool {
        self.ide.is_command_registered(name)
    }
}
