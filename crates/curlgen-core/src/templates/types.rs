//! Values handed to the script template

use serde::Serialize;

use crate::dialects::DialectSyntax;

/// Everything `script.tera` needs to render one script
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScriptContext {
    pub comment_start: String,
    pub comment_continue: String,
    pub comment_end: String,
    /// `VERB /route`
    pub request_line: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Declaration block, empty when the operation declares nothing
    pub declarations: String,
    /// The curl invocation with its continuation lines
    pub invocation: String,
}

impl ScriptContext {
    /// Context with the comment delimiters of a dialect
    pub fn for_syntax(syntax: &DialectSyntax) -> Self {
        Self {
            comment_start: syntax.comment_start.to_string(),
            comment_continue: syntax.comment_continue.to_string(),
            comment_end: syntax.comment_end.to_string(),
            ..Self::default()
        }
    }
}
