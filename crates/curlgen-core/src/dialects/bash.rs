//! Bash dialect: snake_case variables and runtime guards for required parameters

// Internal imports (std, crate)
use super::{
    default_text, environment_variable, exposed_parameters, form_fields, parameter_comment,
    Declarations, Dialect, DialectSyntax, IdentifierScope,
};
use crate::config::Settings;
use crate::openapi::{Operation, Parameter, ParameterLocation};
use crate::utils::to_snake_identifier;

pub static SYNTAX: DialectSyntax = DialectSyntax {
    file_extension: "sh",
    continuation: "\\",
    comment_start: "#",
    comment_continue: "#",
    comment_end: "#",
};

/// Flag raised by a failed guard
const HALT_FLAG: &str = "__halt";

/// Lower-case names bash gives a meaning of its own, plus the halt flag
static RESERVED: &[&str] = &[HALT_FLAG, "_", "histchars", "auto_resume"];

#[derive(Debug, Default, Clone, Copy)]
pub struct Bash;

impl Bash {
    fn assignment(&self, name: &str, identifier: &str, settings: &Settings) -> String {
        if settings.environment_parameters {
            format!("{}=\"${{{}}}\"", identifier, environment_variable(name))
        } else {
            format!("{}=\"\"", identifier)
        }
    }

    /// Guard for one required parameter, and whether it can halt the script
    fn guard(&self, parameter: &Parameter, identifier: &str, settings: &Settings) -> (String, bool) {
        let test = format!("if [ -z \"{}\" ]; then", self.substitution(identifier));

        match (&parameter.default, settings.required_default) {
            (Some(default), true) => {
                let value = default_text(default);
                let warning = format!(
                    "warning: required parameter {} is not set, using default {}",
                    parameter.name, value
                );
                let lines = [
                    test,
                    format!("  {}={}", identifier, self.quote_literal(&value)),
                    format!("  echo {} >&2", self.quote_literal(&warning)),
                    "fi".to_string(),
                ];
                (lines.join("\n"), false)
            }
            _ => {
                let error = format!("error: required parameter {} is not set", parameter.name);
                let lines = [
                    test,
                    format!("  echo {} >&2", self.quote_literal(&error)),
                    format!("  {}=1", HALT_FLAG),
                    "fi".to_string(),
                ];
                (lines.join("\n"), true)
            }
        }
    }
}

impl Dialect for Bash {
    fn syntax(&self) -> &'static DialectSyntax {
        &SYNTAX
    }

    fn identifier(&self, name: &str) -> String {
        to_snake_identifier(name)
    }

    fn reserved_identifiers(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn substitution(&self, identifier: &str) -> String {
        format!("${{{}}}", identifier)
    }

    fn quote_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', r"'\''"))
    }

    fn exposes(&self, location: ParameterLocation) -> bool {
        matches!(
            location,
            ParameterLocation::Path
                | ParameterLocation::Query
                | ParameterLocation::Header
                | ParameterLocation::Cookie
        )
    }

    fn emit_declarations(&self, operation: &Operation, settings: &Settings) -> Declarations {
        let mut declarations = Declarations::default();
        let mut scope = IdentifierScope::new(self.reserved_identifiers());
        let mut variables = Vec::new();
        let mut guards = Vec::new();
        let mut can_halt = false;

        for parameter in exposed_parameters(self, operation) {
            let identifier = scope.claim(self.identifier(&parameter.name));
            variables.push(format!(
                "# {}\n{}",
                self.comment_text(&parameter_comment(parameter)),
                self.assignment(&parameter.name, &identifier, settings)
            ));

            if parameter.required {
                let (guard, halts) = self.guard(parameter, &identifier, settings);
                can_halt |= halts;
                guards.push(guard);
            }

            declarations
                .variables
                .insert(parameter.name.clone(), identifier);
        }

        for field in form_fields(operation) {
            let identifier = scope.claim(self.identifier(field));
            variables.push(format!(
                "# body field: {}\n{}",
                self.comment_text(field),
                self.assignment(field, &identifier, settings)
            ));
            declarations.variables.insert(field.to_string(), identifier);
        }

        let mut sections = Vec::new();
        if !variables.is_empty() {
            sections.push(variables.join("\n"));
        }
        if !guards.is_empty() {
            if can_halt {
                guards.insert(0, format!("{}=0", HALT_FLAG));
                guards.push(
                    [
                        format!("if [ \"${{{}}}\" -ne 0 ]; then", HALT_FLAG),
                        "  echo 'error: missing required parameters, request not sent' >&2"
                            .to_string(),
                        "  exit 1".to_string(),
                        "fi".to_string(),
                    ]
                    .join("\n"),
                );
            }
            sections.push(guards.join("\n"));
        }

        declarations.text = sections.join("\n\n");
        declarations
    }
}
