//! Map a failed `codex` invocation to a category the user can act on.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    NotInstalled,
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Permission,
    InvalidArguments,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::NotInstalled => "not_installed",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Permission => "permission",
            ErrorCategory::InvalidArguments => "invalid_arguments",
            ErrorCategory::Unknown => "unknown",
        }
    }

    pub fn suggestion(self) -> &'static str {
        match self {
            ErrorCategory::NotInstalled => {
                "Install the Codex CLI and make sure it is on PATH, or set codex.command in .uxkit/config.yaml"
            }
            ErrorCategory::Authentication => "Run 'codex login' or check your API key",
            ErrorCategory::RateLimit => "Rate limited by the provider; wait a moment and run the command again",
            ErrorCategory::Network => "Check your network connection and proxy settings",
            ErrorCategory::Timeout => "Increase the timeout with --timeout or codex.timeout_secs",
            ErrorCategory::Permission => "Check file permissions for the codex binary and the project directory",
            ErrorCategory::InvalidArguments => "Check 'codex --help' for the arguments your installed version accepts",
            ErrorCategory::Unknown => "Re-run with RUST_LOG=debug for details",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; the first matching rule wins.
const RULES: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::NotInstalled,
        &["command not found", "no such file or directory"],
    ),
    (
        ErrorCategory::Authentication,
        &["unauthorized", "401", "api key", "not logged in", "authentication", "login required"],
    ),
    (
        ErrorCategory::RateLimit,
        &["rate limit", "rate_limit", "429", "too many requests", "quota"],
    ),
    (ErrorCategory::Timeout, &["timed out", "timeout", "deadline exceeded"]),
    (
        ErrorCategory::Network,
        &["network", "connection refused", "connection reset", "enotfound", "dns", "could not resolve"],
    ),
    (
        ErrorCategory::Permission,
        &["permission denied", "eacces", "operation not permitted"],
    ),
    (
        ErrorCategory::InvalidArguments,
        &["unexpected argument", "unknown option", "invalid argument", "unrecognized", "usage:"],
    ),
];

/// Classify from stderr text first, then from well-known shell exit codes.
pub fn classify(stderr: &str, exit_code: Option<i32>) -> ErrorCategory {
    let lower = stderr.to_lowercase();
    for (category, needles) in RULES {
        if needles.iter().any(|n| lower.contains(n)) {
            return *category;
        }
    }
    match exit_code {
        Some(127) => ErrorCategory::NotInstalled,
        Some(126) => ErrorCategory::Permission,
        Some(2) => ErrorCategory::InvalidArguments,
        _ => ErrorCategory::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_patterns() {
        assert_eq!(classify("Error: 401 Unauthorized", Some(1)), ErrorCategory::Authentication);
        assert_eq!(classify("429 Too Many Requests", Some(1)), ErrorCategory::RateLimit);
        assert_eq!(classify("request timed out after 30s", Some(1)), ErrorCategory::Timeout);
        assert_eq!(classify("getaddrinfo ENOTFOUND api.openai.com", Some(1)), ErrorCategory::Network);
        assert_eq!(classify("sh: codex: Permission denied", Some(1)), ErrorCategory::Permission);
        assert_eq!(
            classify("error: unexpected argument '--bogus' found", Some(1)),
            ErrorCategory::InvalidArguments
        );
    }

    #[test]
    fn exit_code_fallback() {
        assert_eq!(classify("", Some(127)), ErrorCategory::NotInstalled);
        assert_eq!(classify("", Some(126)), ErrorCategory::Permission);
        assert_eq!(classify("", Some(2)), ErrorCategory::InvalidArguments);
        assert_eq!(classify("something odd", Some(1)), ErrorCategory::Unknown);
        assert_eq!(classify("", None), ErrorCategory::Unknown);
    }

    #[test]
    fn stderr_wins_over_exit_code() {
        assert_eq!(classify("rate limit reached", Some(127)), ErrorCategory::RateLimit);
    }

    #[test]
    fn every_category_has_a_suggestion() {
        for c in [
            ErrorCategory::NotInstalled,
            ErrorCategory::Authentication,
            ErrorCategory::RateLimit,
            ErrorCategory::Network,
            ErrorCategory::Timeout,
            ErrorCategory::Permission,
            ErrorCategory::InvalidArguments,
            ErrorCategory::Unknown,
        ] {
            assert!(!c.suggestion().is_empty());
        }
    }
}
