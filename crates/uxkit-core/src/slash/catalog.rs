//! The slash-command table.
//!
//! Every command the slash layer understands is declared once here. The
//! parser's validation schemas and the IDE registration/help catalog are both
//! derived from [`COMMANDS`], so adding a command is a single table edit plus
//! a backend method.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// ParamType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Table entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub examples: &'static [&'static str],
}

/// Required parameters are always strings. Values are coerced before
/// validation, so a bare number such as `--study=2` fails the type check;
/// studies are addressed by id (`001-alpha`), slug or name here, and the
/// numeric shorthand is only available from `uxkit study show 2`.
const fn required(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamType::String,
        required: true,
    }
}

const fn optional(name: &'static str, kind: ParamType) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "research:questions",
        description: "Generate open-ended research questions for a study topic",
        params: &[
            required("study"),
            required("topic"),
            optional("count", ParamType::Number),
            optional("format", ParamType::String),
        ],
        examples: &[
            r#"/research:questions --study="001-checkout" --topic="guest checkout""#,
            r#"/research:questions --study=onboarding --topic=signup --count=8"#,
        ],
    },
    CommandSpec {
        name: "research:sources",
        description: "Collect research sources for a study from keywords",
        params: &[
            required("study"),
            required("keywords"),
            optional("format", ParamType::String),
            optional("limit", ParamType::Number),
        ],
        examples: &[r#"/research:sources --study=onboarding --keywords="activation, churn" --limit=5"#],
    },
    CommandSpec {
        name: "research:summarize",
        description: "Summarize the collected sources of a study",
        params: &[
            required("study"),
            optional("format", ParamType::String),
            optional("length", ParamType::String),
        ],
        examples: &[r#"/research:summarize --study=onboarding --length=short"#],
    },
    CommandSpec {
        name: "research:interview",
        description: "Process an interview transcript for a participant",
        params: &[
            required("study"),
            required("participant"),
            optional("format", ParamType::String),
            optional("template", ParamType::String),
        ],
        examples: &[r#"/research:interview --study=onboarding --participant=p1"#],
    },
    CommandSpec {
        name: "research:synthesize",
        description: "Synthesize insights across a study's research artifacts",
        params: &[
            required("study"),
            required("insights"),
            optional("format", ParamType::String),
            optional("output", ParamType::String),
        ],
        examples: &[r#"/research:synthesize --study=onboarding --insights="pain points" --output=report"#],
    },
    CommandSpec {
        name: "study:create",
        description: "Create a new research study",
        params: &[
            required("name"),
            required("description"),
            optional("template", ParamType::String),
            optional("format", ParamType::String),
        ],
        examples: &[r#"/study:create --name="Checkout Flow" --description="Why users abandon checkout""#],
    },
    CommandSpec {
        name: "study:list",
        description: "List research studies",
        params: &[
            optional("format", ParamType::String),
            optional("filter", ParamType::String),
        ],
        examples: &["/study:list", "/study:list --filter=checkout"],
    },
    CommandSpec {
        name: "study:show",
        description: "Show the details of a research study",
        params: &[
            required("name"),
            optional("format", ParamType::String),
            optional("details", ParamType::Boolean),
        ],
        examples: &[r#"/study:show --name="001-checkout" --details"#],
    },
    CommandSpec {
        name: "study:delete",
        description: "Delete a research study (requires --confirm)",
        params: &[
            required("name"),
            optional("confirm", ParamType::Boolean),
            optional("force", ParamType::Boolean),
        ],
        examples: &[r#"/study:delete --name="001-checkout" --confirm"#],
    },
];

pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Validation view of a command: which parameters must be present and what
/// runtime type each declared parameter must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSchema {
    pub name: String,
    pub required: BTreeSet<String>,
    pub optional: BTreeSet<String>,
    pub types: BTreeMap<String, ParamType>,
}

/// Human-facing view of a command, used for IDE registration and help.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRegistration {
    pub command: String,
    pub description: String,
    pub parameters: Vec<String>,
    pub examples: Vec<String>,
}

impl CommandSpec {
    pub fn schema(&self) -> CommandSchema {
        let mut schema = CommandSchema {
            name: self.name.to_string(),
            required: BTreeSet::new(),
            optional: BTreeSet::new(),
            types: BTreeMap::new(),
        };
        for p in self.params {
            let set = if p.required {
                &mut schema.required
            } else {
                &mut schema.optional
            };
            set.insert(p.name.to_string());
            schema.types.insert(p.name.to_string(), p.kind);
        }
        schema
    }

    pub fn registration(&self) -> CommandRegistration {
        CommandRegistration {
            command: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self
                .params
                .iter()
                .map(|p| {
                    if p.required {
                        format!("{} (required)", p.name)
                    } else {
                        format!("{} (optional, {})", p.name, p.kind)
                    }
                })
                .collect(),
            examples: self.examples.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_nine_unique_commands() {
        let names: BTreeSet<_> = COMMANDS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 9);
        assert_eq!(COMMANDS.len(), 9);
    }

    #[test]
    fn required_params_are_typed() {
        for cmd in COMMANDS {
            let schema = cmd.schema();
            for name in &schema.required {
                assert!(schema.types.contains_key(name), "{}: {name}", cmd.name);
            }
            assert!(schema.required.is_disjoint(&schema.optional));
        }
    }

    #[test]
    fn examples_invoke_their_own_command() {
        for cmd in COMMANDS {
            assert!(!cmd.examples.is_empty());
            for ex in cmd.examples {
                assert!(ex.starts_with(&format!("/{}", cmd.name)), "{ex}");
            }
        }
    }

    #[test]
    fn registration_annotates_parameters() {
        let reg = find("study:show").unwrap().registration();
        assert_eq!(
            reg.parameters,
            vec!["name (required)", "format (optional, string)", "details (optional, boolean)"]
        );
    }
}
