//! Assembly of one request script per operation.
//!
//! The assembler collects the curl invocation as a head plus an ordered list
//! of argument directives and only joins them with the dialect's continuation
//! token at the end, so a script never ends on a dangling continuation.

// Internal imports (std, crate)
use crate::body::BodyStrategy;
use crate::config::Settings;
use crate::dialects::{exposed_parameters, Declarations, Dialect};
use crate::error::Result;
use crate::logging::LogSink;
use crate::openapi::{HttpMethod, Operation, ParameterLocation};
use crate::sample::SampleSynthesizer;
use crate::templates::{ScriptContext, TemplateManager};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PATH_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid path template regex"));

/// A command split into its first line and one argument directive per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub head: String,
    pub directives: Vec<String>,
}

impl Invocation {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            directives: Vec::new(),
        }
    }

    pub fn push(&mut self, directive: impl Into<String>) {
        self.directives.push(directive.into());
    }

    /// Join head and directives, putting `continuation` only between lines
    pub fn render(&self, continuation: &str) -> String {
        let separator = format!(" {}\n  ", continuation);
        std::iter::once(self.head.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

/// Builds the script text of single operations for one dialect
pub struct RequestAssembler<'a> {
    settings: &'a Settings,
    dialect: &'a dyn Dialect,
    templates: &'a TemplateManager,
    synthesizer: SampleSynthesizer,
    sink: &'a dyn LogSink,
}

impl<'a> RequestAssembler<'a> {
    pub fn new(
        settings: &'a Settings,
        dialect: &'a dyn Dialect,
        templates: &'a TemplateManager,
        synthesizer: SampleSynthesizer,
        sink: &'a dyn LogSink,
    ) -> Self {
        Self {
            settings,
            dialect,
            templates,
            synthesizer,
            sink,
        }
    }

    /// Render the complete script for `operation` bound to `route`
    pub fn assemble(&self, base_url: &str, route: &str, operation: &Operation) -> Result<String> {
        let syntax = self.dialect.syntax();
        let declarations = self.dialect.emit_declarations(operation, self.settings);
        let invocation = self.invocation(base_url, route, operation, &declarations);

        let context = ScriptContext {
            request_line: self
                .dialect
                .comment_text(&format!("{} {}", operation.method, route)),
            summary: operation
                .summary
                .as_deref()
                .map(|s| self.dialect.comment_text(s))
                .filter(|s| !s.is_empty()),
            description: operation
                .description
                .as_deref()
                .map(|s| self.dialect.comment_text(s))
                .filter(|s| !s.is_empty()),
            declarations: declarations.text.clone(),
            invocation: invocation.render(syntax.continuation),
            ..ScriptContext::for_syntax(syntax)
        };

        self.templates.render_script(&context)
    }

    fn invocation(
        &self,
        base_url: &str,
        route: &str,
        operation: &Operation,
        declarations: &Declarations,
    ) -> Invocation {
        let settings = self.settings;
        let url = self.request_url(base_url, route, operation, declarations);
        // `-X HEAD` leaves curl waiting for a body that never comes
        let method = match operation.method {
            HttpMethod::Head => "--head".to_string(),
            other => format!("-X {}", other),
        };
        let mut invocation = Invocation::new(format!("curl {} \"{}\"", method, url));

        if settings.skip_certificate_check {
            invocation.push("--insecure");
        }
        if let Some(cookie_file) = &settings.cookie_file {
            invocation.push(format!(
                "--cookie \"{}\" --cookie-jar \"{}\"",
                cookie_file, cookie_file
            ));
        }
        if let Some(extra) = settings.extra_options.as_deref().map(str::trim) {
            if !extra.is_empty() {
                invocation.push(extra);
            }
        }

        let content_type = operation
            .request_content_type()
            .unwrap_or(settings.content_type.as_str());
        self.sink.log(&format!(
            "Request body content type for {} {}: {}",
            operation.method, route, content_type
        ));

        invocation.push(format!("-H \"Accept: {}\"", settings.content_type));
        invocation.push(format!("-H \"Content-Type: {}\"", content_type));
        if let Some(authorization) = &settings.authorization_header {
            invocation.push(format!("-H \"Authorization: {}\"", authorization));
        }

        let exposed = exposed_parameters(self.dialect, operation);
        for header in exposed
            .iter()
            .filter(|p| p.location == ParameterLocation::Header)
        {
            invocation.push(format!(
                "-H \"{}: {}\"",
                header.name,
                self.variable(declarations, &header.name)
            ));
        }

        let cookies: Vec<String> = exposed
            .iter()
            .filter(|p| p.location == ParameterLocation::Cookie)
            .map(|p| format!("{}={}", p.name, self.variable(declarations, &p.name)))
            .collect();
        if !cookies.is_empty() {
            invocation.push(format!("--cookie \"{}\"", cookies.join("; ")));
        }

        let body = BodyStrategy::decide(
            operation,
            content_type,
            settings.read_body_from_stdin,
            &self.synthesizer,
            self.sink,
        );
        for directive in body.directives(self.dialect, declarations) {
            invocation.push(directive);
        }

        invocation
    }

    /// Base URL plus route, with path templates and the query string substituted
    fn request_url(
        &self,
        base_url: &str,
        route: &str,
        operation: &Operation,
        declarations: &Declarations,
    ) -> String {
        let base = if route.starts_with('/') {
            base_url.trim_end_matches('/')
        } else {
            base_url
        };
        let path = PATH_TEMPLATE.replace_all(route, |caps: &Captures| {
            self.variable(declarations, &caps[1])
        });

        let query: Vec<String> = exposed_parameters(self.dialect, operation)
            .into_iter()
            .filter(|p| p.location == ParameterLocation::Query)
            .map(|p| format!("{}={}", p.name, self.variable(declarations, &p.name)))
            .collect();

        if query.is_empty() {
            format!("{}{}", base, path)
        } else {
            format!("{}{}?{}", base, path, query.join("&"))
        }
    }

    fn variable(&self, declarations: &Declarations, name: &str) -> String {
        self.dialect
            .substitution(&declarations.identifier(self.dialect, name))
    }
}
