//! Shell dialects and their parameter declaration strategies.
//!
//! A dialect is described by a static [`DialectSyntax`] (file extension,
//! continuation token, comment delimiters) plus a [`Dialect`] implementation
//! that knows how to name, substitute, quote and declare variables. The
//! request assembler only talks to the trait, so supporting another shell
//! means adding a descriptor and an implementation here.
//!
//! # Examples
//!
//! ```
//! use curlgen_core::dialects::ScriptDialect;
//! use std::str::FromStr;
//!
//! let dialect = ScriptDialect::from_str("bash").unwrap();
//! assert_eq!(dialect, ScriptDialect::Bash);
//! assert_eq!(dialect.file_extension(), "sh");
//! assert_eq!(ScriptDialect::PowerShell.to_string(), "powershell");
//! ```

pub mod bash;
pub mod powershell;

// Internal imports (std, crate)
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::body::MediaKind;
use crate::config::Settings;
use crate::openapi::{Operation, Parameter, ParameterLocation};
use crate::utils::{collapse_whitespace, to_snake_identifier};

// External imports (alphabetized)
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Token spelling of a dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectSyntax {
    /// Extension of generated files, without the dot
    pub file_extension: &'static str,
    /// Token ending a line that continues on the next one
    pub continuation: &'static str,
    /// First line of the header comment block
    pub comment_start: &'static str,
    /// Prefix of every line inside the header comment block
    pub comment_continue: &'static str,
    /// Last line of the header comment block
    pub comment_end: &'static str,
}

/// Declaration block of one operation and the identifiers it introduced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Rendered declarations, without a trailing newline. Empty when nothing is declared.
    pub text: String,
    /// Declared name (parameter or form field) to script identifier
    pub variables: HashMap<String, String>,
}

impl Declarations {
    /// Identifier for `name`, falling back to the dialect's naming rule
    pub fn identifier(&self, dialect: &dyn Dialect, name: &str) -> String {
        self.variables
            .get(name)
            .cloned()
            .unwrap_or_else(|| dialect.identifier(name))
    }
}

/// Strategy implemented by every supported shell
pub trait Dialect: Send + Sync {
    /// Static token spelling
    fn syntax(&self) -> &'static DialectSyntax;

    /// Script identifier for a parameter or field name
    fn identifier(&self, name: &str) -> String;

    /// Expression expanding an identifier inside a double-quoted string
    fn substitution(&self, identifier: &str) -> String;

    /// Quote text so the shell passes it through untouched
    fn quote_literal(&self, text: &str) -> String;

    /// Whether parameters at `location` become script variables
    fn exposes(&self, location: ParameterLocation) -> bool;

    /// Names the shell already owns, compared case-insensitively
    fn reserved_identifiers(&self) -> &'static [&'static str] {
        &[]
    }

    /// Single-line text safe to place inside a comment
    fn comment_text(&self, text: &str) -> String {
        collapse_whitespace(text)
    }

    /// Render the declaration block for an operation
    fn emit_declarations(&self, operation: &Operation, settings: &Settings) -> Declarations;
}

/// Identifiers handed out within one declaration block
#[derive(Debug, Default)]
pub struct IdentifierScope {
    taken: HashSet<String>,
}

impl IdentifierScope {
    /// Scope that never hands out any of `reserved`
    pub fn new(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|name| name.to_ascii_lowercase()).collect(),
        }
    }

    /// `candidate`, or `candidate2`, `candidate3`... when it is taken or reserved
    pub fn claim(&mut self, candidate: String) -> String {
        let mut identifier = candidate.clone();
        let mut suffix = 2;
        while !self.taken.insert(identifier.to_ascii_lowercase()) {
            identifier = format!("{}{}", candidate, suffix);
            suffix += 1;
        }
        identifier
    }
}

/// Supported script dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    /// POSIX-style shell script run with bash
    #[default]
    Bash,
    /// PowerShell script driving curl
    PowerShell,
}

impl FromStr for ScriptDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" | "sh" => Ok(ScriptDialect::Bash),
            "powershell" | "pwsh" | "ps1" => Ok(ScriptDialect::PowerShell),
            _ => Err(format!("Unknown script dialect: {}", s)),
        }
    }
}

impl ScriptDialect {
    /// Returns the dialect identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::PowerShell => "powershell",
        }
    }

    /// Returns an iterator over all supported dialects
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Bash, Self::PowerShell].into_iter()
    }

    /// Strategy object implementing this dialect
    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            Self::Bash => Box::new(bash::Bash),
            Self::PowerShell => Box::new(powershell::PowerShell),
        }
    }

    pub fn syntax(&self) -> &'static DialectSyntax {
        match self {
            Self::Bash => &bash::SYNTAX,
            Self::PowerShell => &powershell::SYNTAX,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        self.syntax().file_extension
    }
}

impl fmt::Display for ScriptDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of `operation` the dialect turns into variables
pub fn exposed_parameters<'o>(
    dialect: &dyn Dialect,
    operation: &'o Operation,
) -> Vec<&'o Parameter> {
    operation
        .parameters
        .iter()
        .filter(|p| dialect.exposes(p.location))
        .collect()
}

/// Body properties that get their own variable (form and multipart bodies only)
pub fn form_fields(operation: &Operation) -> Vec<&str> {
    let Some(body) = &operation.request_body else {
        return Vec::new();
    };
    let Some(content_type) = body.first_content_type() else {
        return Vec::new();
    };
    if !MediaKind::of(content_type).is_form() {
        return Vec::new();
    }
    body.schema_for(content_type)
        .map(|schema| schema.property_names())
        .unwrap_or_default()
}

/// Comment text describing a parameter
pub fn parameter_comment(parameter: &Parameter) -> String {
    match parameter.description.as_deref().map(collapse_whitespace) {
        Some(description) if !description.is_empty() => description,
        _ => format!("{} parameter: {}", parameter.location, parameter.name),
    }
}

/// Prefix of every environment variable read in environment mode
pub const ENVIRONMENT_PREFIX: &str = "CURLGEN_";

/// Environment variable a declaration is bound to in environment mode
///
/// The prefix keeps a parameter named `path` or `home` from picking up the
/// process's own `PATH` or `HOME`.
pub fn environment_variable(name: &str) -> String {
    format!(
        "{}{}",
        ENVIRONMENT_PREFIX,
        to_snake_identifier(name).to_ascii_uppercase()
    )
}

/// Text of a declared default value
pub fn default_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
