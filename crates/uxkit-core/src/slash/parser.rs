//! Slash-command parsing and schema validation.
//!
//! ```text
//! command-string  := "/" command-name (" " parameter)*
//! parameter       := "--" key ["=" value] | "--" key " " value
//! value           := quoted-string | bare-token
//! ```

use super::catalog::{self, CommandSchema, ParamType};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Largest integer an `f64` holds exactly; integral values up to this size
/// serialize as JSON integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ---------------------------------------------------------------------------
// ParamValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    String(String),
}

pub type Parameters = BTreeMap<String, ParamValue>;

impl ParamValue {
    /// Coerce a raw token: number first, then `true`/`false`, else string.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() {
                return ParamValue::Number(n);
            }
        }
        match raw {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => ParamValue::String(raw.to_string()),
        }
    }

    pub fn kind(&self) -> ParamType {
        match self {
            ParamValue::Bool(_) => ParamType::Boolean,
            ParamValue::Number(_) => ParamType::Number,
            ParamValue::String(_) => ParamType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_safe_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Some(*n as i64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Number(n) => match self.as_safe_integer() {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Number(n) => match self.as_safe_integer() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// ParsedCommand / errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCommand {
    pub command: String,
    pub parameters: Parameters,
}

impl ParsedCommand {
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Command must start with /")]
    MissingSlashPrefix,

    #[error("Invalid command format")]
    InvalidCommandFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split on spaces, keeping quoted runs (and their quote characters) intact.
/// A backslash before a quote stops it from opening or closing a run.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for c in input.chars() {
        let escaped = prev == Some('\\');
        match c {
            '"' | '\'' if !escaped => {
                match open_quote {
                    None => open_quote = Some(c),
                    Some(q) if q == c => open_quote = None,
                    Some(_) => {}
                }
                current.push(c);
            }
            ' ' if open_quote.is_none() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
        prev = Some(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Remove one pair of matching wrapping quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ---------------------------------------------------------------------------
// CommandParser
// ---------------------------------------------------------------------------

/// Parses slash-command strings and validates them against the schemas
/// derived from the command table.
#[derive(Debug, Clone)]
pub struct CommandParser {
    schemas: Vec<CommandSchema>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            schemas: catalog::COMMANDS.iter().map(|c| c.schema()).collect(),
        }
    }

    pub fn parse(&self, command_string: &str) -> Result<ParsedCommand, ParseError> {
        let trimmed = command_string.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyCommand);
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(ParseError::MissingSlashPrefix);
        };

        let tokens = tokenize(rest);
        let command = match tokens.first() {
            Some(name) if !name.is_empty() && !name.starts_with("--") => name.clone(),
            _ => return Err(ParseError::InvalidCommandFormat),
        };

        let mut parameters = Parameters::new();
        let mut i = 1;
        while i < tokens.len() {
            let token = &tokens[i];
            i += 1;
            let Some(flag) = token.strip_prefix("--") else {
                tracing::debug!(token = %token, "ignoring stray token");
                continue;
            };

            let (key, value) = match flag.split_once('=') {
                Some((key, raw)) => (key, ParamValue::coerce(strip_quotes(raw))),
                None => match tokens.get(i) {
                    Some(next) if !next.starts_with("--") => {
                        i += 1;
                        (flag, ParamValue::coerce(strip_quotes(next)))
                    }
                    _ => (flag, ParamValue::Bool(true)),
                },
            };
            if key.is_empty() {
                tracing::debug!(token = %token, "ignoring parameter with empty key");
                continue;
            }
            parameters.insert(key.to_string(), value);
        }

        Ok(ParsedCommand {
            command,
            parameters,
        })
    }

    pub fn validate(&self, parsed: &ParsedCommand) -> ValidationResult {
        let Some(schema) = self.command_schema(&parsed.command) else {
            return ValidationResult {
                is_valid: false,
                errors: vec!["Unknown command".to_string()],
            };
        };

        let mut errors = Vec::new();
        for name in &schema.required {
            if !parsed.parameters.contains_key(name) {
                errors.push(format!("Required parameter missing: {name}"));
            }
        }
        for (key, value) in &parsed.parameters {
            if let Some(expected) = schema.types.get(key) {
                if value.kind() != *expected {
                    errors.push(format!(
                        "Invalid parameter type for {key}: expected {expected}, got {}",
                        value.kind()
                    ));
                }
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn available_commands(&self) -> Vec<String> {
        self.schemas.iter().map(|s| s.name.clone()).collect()
    }

    pub fn command_schema(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParsedCommand {
        CommandParser::new().parse(s).unwrap()
    }

    #[test]
    fn quoted_value_keeps_spaces() {
        let p = parse(r#"/study:show --name="test study""#);
        assert_eq!(p.command, "study:show");
        assert_eq!(p.parameters.len(), 1);
        assert_eq!(p.get("name"), Some(&ParamValue::from("test study")));
    }

    #[test]
    fn single_quotes_and_nested_other_quote() {
        let p = parse(r#"/study:create --name='It"s mine' --description "a 'b' c""#);
        assert_eq!(p.get("name"), Some(&ParamValue::from(r#"It"s mine"#)));
        assert_eq!(p.get("description"), Some(&ParamValue::from("a 'b' c")));
    }

    #[test]
    fn numbers_and_booleans_are_coerced() {
        let p = parse("/research:questions --count=10 --ratio 0.5 --flag=false --on=true");
        assert_eq!(p.get("count"), Some(&ParamValue::Number(10.0)));
        assert_eq!(p.get("ratio"), Some(&ParamValue::Number(0.5)));
        assert_eq!(p.get("flag"), Some(&ParamValue::Bool(false)));
        assert_eq!(p.get("on"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn non_finite_and_empty_stay_strings() {
        let p = parse("/x --a=inf --b=NaN --c=");
        assert_eq!(p.get("a"), Some(&ParamValue::from("inf")));
        assert_eq!(p.get("b"), Some(&ParamValue::from("NaN")));
        assert_eq!(p.get("c"), Some(&ParamValue::from("")));
    }

    #[test]
    fn bare_flags_are_true() {
        let p = parse("/study:delete --confirm --force --name s");
        assert_eq!(p.get("confirm"), Some(&ParamValue::Bool(true)));
        assert_eq!(p.get("force"), Some(&ParamValue::Bool(true)));
        assert_eq!(p.get("name"), Some(&ParamValue::from("s")));
    }

    #[test]
    fn split_on_first_equals_only() {
        let p = parse("/x --query=a=b");
        assert_eq!(p.get("query"), Some(&ParamValue::from("a=b")));
    }

    #[test]
    fn stray_tokens_and_extra_spaces_ignored() {
        let p = parse("  /study:list   stray   --format   json  ");
        assert_eq!(p.command, "study:list");
        assert_eq!(p.parameters.len(), 1);
        assert_eq!(p.get("format"), Some(&ParamValue::from("json")));
    }

    #[test]
    fn escaped_quote_does_not_open_run() {
        let p = parse(r#"/x --a=it\'s --b=c"#);
        assert_eq!(p.get("a"), Some(&ParamValue::from(r"it\'s")));
        assert_eq!(p.get("b"), Some(&ParamValue::from("c")));
    }

    #[test]
    fn parse_errors() {
        let parser = CommandParser::new();
        assert_eq!(parser.parse("   "), Err(ParseError::EmptyCommand));
        assert_eq!(parser.parse("study:list"), Err(ParseError::MissingSlashPrefix));
        assert_eq!(parser.parse("/"), Err(ParseError::InvalidCommandFormat));
        assert_eq!(parser.parse("/ "), Err(ParseError::InvalidCommandFormat));
        assert_eq!(parser.parse("/--name=x"), Err(ParseError::InvalidCommandFormat));
        assert_eq!(ParseError::EmptyCommand.to_string(), "Empty command");
        assert_eq!(
            ParseError::InvalidCommandFormat.to_string(),
            "Invalid command format"
        );
    }

    #[test]
    fn validate_accepts_complete_command() {
        let parser = CommandParser::new();
        let p = parse(r#"/research:questions --study=x --topic="a b" --count=3"#);
        let v = parser.validate(&p);
        assert!(v.is_valid, "{:?}", v.errors);
    }

    #[test]
    fn validate_collects_every_error() {
        let parser = CommandParser::new();
        let p = parse("/research:questions --count=many --format=3 --extra=1");
        let v = parser.validate(&p);
        assert!(!v.is_valid);
        assert_eq!(
            v.errors,
            vec![
                "Required parameter missing: study",
                "Required parameter missing: topic",
                "Invalid parameter type for count: expected number, got string",
                "Invalid parameter type for format: expected string, got number",
            ]
        );
    }

    #[test]
    fn validate_unknown_command() {
        let parser = CommandParser::new();
        let v = parser.validate(&parse("/nope --a=1"));
        assert_eq!(v.errors, vec!["Unknown command"]);
    }

    #[test]
    fn boolean_param_rejects_string() {
        let parser = CommandParser::new();
        let v = parser.validate(&parse("/study:show --name=s --details=yes"));
        assert_eq!(
            v.errors,
            vec!["Invalid parameter type for details: expected boolean, got string"]
        );
    }

    #[test]
    fn schema_accessors() {
        let parser = CommandParser::new();
        assert_eq!(parser.available_commands().len(), 9);
        assert_eq!(parser.available_commands()[0], "research:questions");
        let schema = parser.command_schema("study:delete").unwrap();
        assert!(schema.required.contains("name"));
        assert_eq!(schema.types.get("confirm"), Some(&ParamType::Boolean));
        assert!(parser.command_schema("study:archive").is_none());
    }

    #[test]
    fn number_display_and_json() {
        assert_eq!(ParamValue::Number(10.0).to_string(), "10");
        assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
        assert_eq!(serde_json::to_string(&ParamValue::Number(10.0)).unwrap(), "10");
        assert_eq!(serde_json::to_string(&ParamValue::Number(-0.25)).unwrap(), "-0.25");
        let back: ParamValue = serde_json::from_str("10").unwrap();
        assert_eq!(back, ParamValue::Number(10.0));
        let back: ParamValue = serde_json::from_str("true").unwrap();
        assert_eq!(back, ParamValue::Bool(true));
    }
}
