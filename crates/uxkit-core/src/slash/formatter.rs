//! Uniform response records for slash-command calls, and their renderings.
//!
//! Every constructor stamps `timestamp` with the current time and takes the
//! elapsed time from the caller; nothing here measures time.

use super::ide::IdeRequest;
use super::parser::{ParamValue, Parameters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub success: bool,
    pub command: String,
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Elapsed milliseconds, as measured by the caller.
    pub execution_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CommandResponse {
    fn ok(command: &str, parameters: Parameters, text: String, ms: u64) -> Self {
        Self {
            success: true,
            command: command.to_string(),
            parameters,
            response: Some(text),
            error: None,
            timestamp: Utc::now(),
            execution_time: ms,
            metadata: None,
        }
    }

    fn failed(command: &str, parameters: Parameters, text: String, ms: u64) -> Self {
        Self {
            success: false,
            command: command.to_string(),
            parameters,
            response: None,
            error: Some(text),
            timestamp: Utc::now(),
            execution_time: ms,
            metadata: None,
        }
    }

    /// The populated body: `response` on success, `error` otherwise.
    pub fn body(&self) -> &str {
        let text = if self.success {
            &self.response
        } else {
            &self.error
        };
        text.as_deref().unwrap_or_default()
    }
}

fn bulleted(lines: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    lines
        .into_iter()
        .map(|l| format!("- {}", l.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

pub fn format_success(
    command: &str,
    parameters: Parameters,
    response: impl Into<String>,
    execution_time: u64,
    metadata: Option<Metadata>,
) -> CommandResponse {
    let mut r = CommandResponse::ok(command, parameters, response.into(), execution_time);
    r.metadata = metadata;
    r
}

pub fn format_error(
    command: &str,
    parameters: Parameters,
    error: impl Into<String>,
    execution_time: u64,
    metadata: Option<Metadata>,
) -> CommandResponse {
    let mut r = CommandResponse::failed(command, parameters, error.into(), execution_time);
    r.metadata = metadata;
    r
}

/// Response for an IDE request; the request context rides along in
/// `metadata.context`.
pub fn format_ide_response(
    request: &IdeRequest,
    success: bool,
    response: Option<String>,
    error: Option<String>,
    execution_time: u64,
) -> CommandResponse {
    let metadata = request.context.as_ref().map(|ctx| {
        let mut m = Metadata::new();
        m.insert("context".to_string(), ctx.clone());
        m
    });
    CommandResponse {
        success,
        command: request.command.clone(),
        parameters: Parameters::new(),
        response: if success { response } else { None },
        error: if success { None } else { error },
        timestamp: Utc::now(),
        execution_time,
        metadata,
    }
}

pub fn format_help_response(
    topic: Option<&str>,
    help: impl Into<String>,
    execution_time: u64,
) -> CommandResponse {
    let mut params = Parameters::new();
    params.insert("command".into(), ParamValue::from(topic.unwrap_or("all")));
    CommandResponse::ok("help", params, help.into(), execution_time)
}

pub fn format_command_list_response(commands: &[String], execution_time: u64) -> CommandResponse {
    let text = format!(
        "Available commands:\n{}",
        bulleted(commands.iter().map(|c| format!("/{c}")))
    );
    CommandResponse::ok("list", Parameters::new(), text, execution_time)
}

pub fn format_validation_error(
    command: &str,
    parameters: Parameters,
    errors: &[String],
    execution_time: u64,
) -> CommandResponse {
    let text = format!("Validation failed:\n{}", bulleted(errors));
    CommandResponse::failed(command, parameters, text, execution_time)
}

pub fn format_parsing_error(
    original: &str,
    error: impl std::fmt::Display,
    execution_time: u64,
) -> CommandResponse {
    let mut params = Parameters::new();
    params.insert("original".into(), ParamValue::from(original));
    CommandResponse::failed(
        "unknown",
        params,
        format!("Parsing error: {error}"),
        execution_time,
    )
}

pub fn format_execution_error(
    command: &str,
    parameters: Parameters,
    error: impl std::fmt::Display,
    execution_time: u64,
) -> CommandResponse {
    CommandResponse::failed(
        command,
        parameters,
        format!("Execution error: {error}"),
        execution_time,
    )
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

pub fn format_for_display(response: &CommandResponse) -> String {
    if response.success {
        format!("✅ {}", response.body())
    } else {
        format!("❌ {}", response.body())
    }
}

pub fn format_as_json(response: &CommandResponse) -> serde_json::Result<String> {
    serde_json::to_string_pretty(response)
}

pub fn format_as_markdown(response: &CommandResponse) -> String {
    let icon = if response.success { "✅" } else { "❌" };
    let mut out = format!("## {icon} /{}\n\n", response.command);

    out.push_str("**Parameters:**\n");
    if response.parameters.is_empty() {
        out.push_str("- _none_\n");
    } else {
        for (key, value) in &response.parameters {
            out.push_str(&format!("- `{key}`: {value}\n"));
        }
    }

    out.push('\n');
    out.push_str(response.body());
    out.push_str(&format!(
        "\n\n_Execution time: {}ms_\n",
        response.execution_time
    ));
    out
}

pub fn response_summary(response: &CommandResponse) -> String {
    let status = if response.success { "SUCCESS" } else { "FAILED" };
    format!(
        "{status} - {} ({}ms)",
        response.command, response.execution_time
    )
}

/// Copy of `response` with `extra` shallow-merged into its metadata;
/// keys in `extra` win.
pub fn add_metadata(response: &CommandResponse, extra: Metadata) -> CommandResponse {
    let mut out = response.clone();
    let mut merged = out.metadata.take().unwrap_or_default();
    merged.extend(extra);
    out.metadata = Some(merged);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, ParamValue)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn success_and_error_populate_one_body() {
        let ok = format_success("study:list", Parameters::new(), "done", 4, None);
        assert!(ok.success);
        assert_eq!(ok.response.as_deref(), Some("done"));
        assert!(ok.error.is_none());

        let err = format_error("study:list", Parameters::new(), "boom", 2, None);
        assert!(!err.success);
        assert!(err.response.is_none());
        assert_eq!(err.body(), "boom");
    }

    #[test]
    fn validation_error_bullets_each_error() {
        let r = format_validation_error(
            "research:questions",
            Parameters::new(),
            &["Required parameter missing: study".into(), "Required parameter missing: topic".into()],
            1,
        );
        assert_eq!(
            r.error.as_deref(),
            Some("Validation failed:\n- Required parameter missing: study\n- Required parameter missing: topic")
        );
    }

    #[test]
    fn parsing_error_records_original() {
        let r = format_parsing_error("study:list", "Command must start with /", 0);
        assert_eq!(r.command, "unknown");
        assert_eq!(r.parameters.get("original"), Some(&ParamValue::from("study:list")));
        assert_eq!(r.error.as_deref(), Some("Parsing error: Command must start with /"));
    }

    #[test]
    fn execution_error_is_prefixed() {
        let r = format_execution_error("study:delete", Parameters::new(), "nope", 3);
        assert_eq!(r.error.as_deref(), Some("Execution error: nope"));
    }

    #[test]
    fn list_and_help_use_fixed_command_names() {
        let list = format_command_list_response(&["study:list".into(), "study:show".into()], 0);
        assert_eq!(list.command, "list");
        assert_eq!(
            list.response.as_deref(),
            Some("Available commands:\n- /study:list\n- /study:show")
        );

        let help = format_help_response(None, "text", 0);
        assert_eq!(help.command, "help");
        assert_eq!(help.parameters.get("command"), Some(&ParamValue::from("all")));
    }

    #[test]
    fn ide_response_carries_context() {
        let req = IdeRequest {
            command: "study:list".into(),
            context: Some(json!({"file": "notes.md"})),
        };
        let r = format_ide_response(&req, true, Some("ok".into()), Some("ignored".into()), 1);
        assert_eq!(r.command, "study:list");
        assert!(r.error.is_none());
        assert_eq!(r.metadata.unwrap()["context"], json!({"file": "notes.md"}));
    }

    #[test]
    fn json_round_trip() {
        let r = format_success(
            "research:questions",
            params(&[("count", ParamValue::Number(10.0)), ("study", "x".into())]),
            "Generated",
            12,
            None,
        );
        let text = format_as_json(&r).unwrap();
        assert!(text.contains("\"executionTime\": 12"));
        assert!(text.contains("\"count\": 10"));
        assert!(!text.contains("\"error\""));

        let back: CommandResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn renderers() {
        let ok = format_success("study:show", params(&[("name", "s".into())]), "Shown", 7, None);
        assert_eq!(format_for_display(&ok), "✅ Shown");
        assert_eq!(response_summary(&ok), "SUCCESS - study:show (7ms)");

        let md = format_as_markdown(&ok);
        assert!(md.starts_with("## ✅ /study:show\n"));
        assert!(md.contains("- `name`: s\n"));
        assert!(md.contains("_Execution time: 7ms_"));

        let err = format_error("study:show", Parameters::new(), "Missing", 0, None);
        assert_eq!(format_for_display(&err), "❌ Missing");
        assert_eq!(response_summary(&err), "FAILED - study:show (0ms)");
        assert!(format_as_markdown(&err).contains("- _none_"));
    }

    #[test]
    fn add_metadata_merges_with_extra_winning() {
        let mut base = Metadata::new();
        base.insert("a".into(), json!(1));
        base.insert("b".into(), json!(2));
        let r = format_success("study:list", Parameters::new(), "x", 0, Some(base));

        let mut extra = Metadata::new();
        extra.insert("b".into(), json!(20));
        extra.insert("c".into(), json!(30));
        let merged = add_metadata(&r, extra);

        let meta = merged.metadata.unwrap();
        assert_eq!(meta["a"], json!(1));
        assert_eq!(meta["b"], json!(20));
        assert_eq!(meta["c"], json!(30));
        assert_eq!(r.metadata.unwrap().len(), 2);
    }
}
