//! Slash-command layer: parse `/name --key=value` strings, validate them
//! against the command table, run them through a [`CommandBackend`] and
//! format the outcome as a [`CommandResponse`].

pub mod backend;
pub mod catalog;
pub mod formatter;
pub mod handler;
pub mod ide;
pub mod parser;
pub mod workspace;

pub use backend::{execute, CommandBackend, ExecutionError, Invocation, PreviewBackend};
pub use catalog::{CommandRegistration, CommandSchema, CommandSpec, ParamType, COMMANDS};
pub use formatter::CommandResponse;
pub use handler::SlashCommandHandler;
pub use ide::{HelpRequest, HelpResponse, IdeIntegration, IdeRequest, IdeResponse, RegistrationResult};
pub use parser::{CommandParser, ParamValue, Parameters, ParseError, ParsedCommand, ValidationResult};
pub use workspace::WorkspaceBackend;
