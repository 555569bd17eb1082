//! PowerShell dialect: a `param()` block with mandatory annotations

// Internal imports (std, crate)
use super::{
    default_text, environment_variable, exposed_parameters, form_fields, parameter_comment,
    Declarations, Dialect, DialectSyntax, IdentifierScope,
};
use crate::config::Settings;
use crate::openapi::{Operation, ParameterLocation};
use crate::utils::{collapse_whitespace, to_pascal_case};

pub static SYNTAX: DialectSyntax = DialectSyntax {
    file_extension: "ps1",
    continuation: "`",
    comment_start: "<#",
    comment_continue: " ",
    comment_end: "#>",
};

const INDENT: &str = "    ";

/// Automatic and preference variables a script parameter must not shadow
static RESERVED: &[&str] = &[
    "_",
    "Args",
    "ConsoleFileName",
    "Error",
    "ErrorActionPreference",
    "Event",
    "EventArgs",
    "EventSubscriber",
    "ExecutionContext",
    "False",
    "ForEach",
    "Home",
    "Host",
    "Input",
    "IsCoreCLR",
    "IsLinux",
    "IsMacOS",
    "IsWindows",
    "LastExitCode",
    "Matches",
    "MyInvocation",
    "NestedPromptLevel",
    "Null",
    "PID",
    "Profile",
    "PSBoundParameters",
    "PSCmdlet",
    "PSCommandPath",
    "PSCulture",
    "PSDebugContext",
    "PSEdition",
    "PSHome",
    "PSItem",
    "PSScriptRoot",
    "PSSenderInfo",
    "PSUICulture",
    "PSVersionTable",
    "PWD",
    "Sender",
    "ShellId",
    "StackTrace",
    "Switch",
    "This",
    "True",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct PowerShell;

impl PowerShell {
    /// One entry of the `param()` block
    fn entry(&self, comment: &str, identifier: &str, mandatory: bool, initializer: Option<String>) -> String {
        let declaration = match initializer {
            Some(value) => format!("[String] ${} = {}", identifier, value),
            None => format!("[String] ${}", identifier),
        };
        let annotation = if mandatory {
            "[Parameter(Mandatory=$True)]"
        } else {
            "[Parameter(Mandatory=$False)]"
        };
        [
            format!("<# {} #>", self.comment_text(comment)),
            annotation.to_string(),
            declaration,
        ]
        .iter()
        .map(|line| format!("{}{}", INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Dialect for PowerShell {
    fn syntax(&self) -> &'static DialectSyntax {
        &SYNTAX
    }

    fn identifier(&self, name: &str) -> String {
        to_pascal_case(name)
    }

    fn reserved_identifiers(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn substitution(&self, identifier: &str) -> String {
        format!("${{{}}}", identifier)
    }

    fn quote_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    fn exposes(&self, location: ParameterLocation) -> bool {
        matches!(location, ParameterLocation::Path | ParameterLocation::Query)
    }

    fn comment_text(&self, text: &str) -> String {
        collapse_whitespace(text).replace("#>", "# >")
    }

    fn emit_declarations(&self, operation: &Operation, settings: &Settings) -> Declarations {
        let mut declarations = Declarations::default();
        let mut scope = IdentifierScope::new(self.reserved_identifiers());
        let mut entries = Vec::new();

        for parameter in exposed_parameters(self, operation) {
            let identifier = scope.claim(self.identifier(&parameter.name));
            let initializer = if settings.environment_parameters {
                Some(format!("$env:{}", environment_variable(&parameter.name)))
            } else if settings.required_default {
                parameter
                    .default
                    .as_ref()
                    .map(|value| self.quote_literal(&default_text(value)))
            } else {
                None
            };
            let mandatory = parameter.required && initializer.is_none();

            entries.push(self.entry(&parameter_comment(parameter), &identifier, mandatory, initializer));
            declarations
                .variables
                .insert(parameter.name.clone(), identifier);
        }

        for field in form_fields(operation) {
            let identifier = scope.claim(self.identifier(field));
            let initializer = settings
                .environment_parameters
                .then(|| format!("$env:{}", environment_variable(field)));

            entries.push(self.entry(&format!("body field: {}", field), &identifier, false, initializer));
            declarations.variables.insert(field.to_string(), identifier);
        }

        if !entries.is_empty() {
            declarations.text = format!("param(\n{}\n)", entries.join(",\n\n"));
        }
        declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{HttpMethod, MediaType, Parameter, RequestBody, Schema};
    use serde_json::json;

    #[test]
    fn test_syntax_tokens() {
        assert_eq!(PowerShell.syntax().file_extension, "ps1");
        assert_eq!(PowerShell.syntax().continuation, "`");
        assert_eq!(PowerShell.substitution("PetId"), "${PetId}");
        assert_eq!(PowerShell.quote_literal("it's"), "'it''s'");
        assert_eq!(PowerShell.identifier("pet-id"), "PetId");
        assert_eq!(PowerShell.comment_text("ends #> early"), "ends # > early");
    }

    #[test]
    fn test_param_block() {
        let mut op = Operation::new(HttpMethod::Get);
        let mut pet_id = Parameter::new("petId", ParameterLocation::Path);
        pet_id.description = Some("ID of pet".to_string());
        op.parameters = vec![
            pet_id,
            Parameter::new("limit", ParameterLocation::Query),
            Parameter::new("X-Trace-Id", ParameterLocation::Header),
        ];

        let declarations = PowerShell.emit_declarations(&op, &Settings::default());
        assert_eq!(
            declarations.text,
            [
                "param(",
                "    <# ID of pet #>",
                "    [Parameter(Mandatory=$True)]",
                "    [String] $PetId,",
                "",
                "    <# query parameter: limit #>",
                "    [Parameter(Mandatory=$False)]",
                "    [String] $Limit",
                ")",
            ]
            .join("\n")
        );
        assert!(!declarations.variables.contains_key("X-Trace-Id"));
        assert_eq!(declarations.variables["petId"], "PetId");
    }

    #[test]
    fn test_no_exposed_parameters_no_block() {
        let mut op = Operation::new(HttpMethod::Get);
        op.parameters = vec![Parameter::new("session", ParameterLocation::Cookie)];
        assert!(PowerShell
            .emit_declarations(&op, &Settings::default())
            .text
            .is_empty());
    }

    #[test]
    fn test_environment_binding_drops_mandatory() {
        let mut op = Operation::new(HttpMethod::Get);
        op.parameters = vec![Parameter::new("pet-id", ParameterLocation::Path)];
        let settings = Settings {
            environment_parameters: true,
            ..Settings::default()
        };

        let text = PowerShell.emit_declarations(&op, &settings).text;
        assert!(text.contains("[Parameter(Mandatory=$False)]"));
        assert!(text.contains("[String] $PetId = $env:CURLGEN_PET_ID"));
    }

    #[test]
    fn test_automatic_variables_are_not_shadowed() {
        let mut op = Operation::new(HttpMethod::Get);
        op.parameters = vec![
            Parameter::new("host", ParameterLocation::Query),
            Parameter::new("input", ParameterLocation::Query),
            Parameter::new("pid", ParameterLocation::Path),
        ];

        let declarations = PowerShell.emit_declarations(&op, &Settings::default());
        assert!(declarations.text.contains("[String] $Host2"));
        assert!(declarations.text.contains("[String] $Input2"));
        assert!(declarations.text.contains("[String] $Pid2"));
        assert!(!declarations.text.contains("$Host\n"));
        assert_eq!(declarations.variables["host"], "Host2");
    }

    #[test]
    fn test_duplicate_pascal_names_are_suffixed() {
        let mut op = Operation::new(HttpMethod::Get);
        op.parameters = vec![
            Parameter::new("petId", ParameterLocation::Path),
            Parameter::new("pet_id", ParameterLocation::Query),
        ];

        let declarations = PowerShell.emit_declarations(&op, &Settings::default());
        assert_eq!(declarations.variables["petId"], "PetId");
        assert_eq!(declarations.variables["pet_id"], "PetId2");
        assert_eq!(declarations.text.matches("[String] $PetId\n").count(), 0);
        assert!(declarations.text.contains("[String] $PetId,"));
        assert!(declarations.text.contains("[String] $PetId2\n)"));
    }

    #[test]
    fn test_required_default_initializer() {
        let mut op = Operation::new(HttpMethod::Get);
        let mut status = Parameter::new("status", ParameterLocation::Query);
        status.required = true;
        status.default = Some(json!("sold"));
        op.parameters = vec![status];

        let halting = PowerShell.emit_declarations(&op, &Settings::default()).text;
        assert!(halting.contains("[Parameter(Mandatory=$True)]"));

        let settings = Settings {
            required_default: true,
            ..Settings::default()
        };
        let defaulted = PowerShell.emit_declarations(&op, &settings).text;
        assert!(defaulted.contains("[String] $Status = 'sold'"));
        assert!(defaulted.contains("[Parameter(Mandatory=$False)]"));
    }

    #[test]
    fn test_form_fields_join_param_block() {
        let mut op = Operation::new(HttpMethod::Post);
        op.request_body = Some(RequestBody {
            content: vec![MediaType {
                content_type: "multipart/form-data".to_string(),
                schema: Some(Schema::object(vec![(
                    "file".to_string(),
                    Schema::string(Some("binary")),
                )])),
            }],
        });

        let declarations = PowerShell.emit_declarations(&op, &Settings::default());
        assert!(declarations.text.contains("    <# body field: file #>"));
        assert!(declarations.text.contains("    [String] $File\n)"));
        assert_eq!(declarations.variables["file"], "File");
    }
}
