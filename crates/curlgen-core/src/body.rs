//! How a request body ends up in the generated script.
//!
//! [`BodyStrategy::decide`] picks the embedding strategy from the negotiated
//! media type and the stdin flag. The decision is the same for every dialect;
//! [`BodyStrategy::directives`] then spells it with the dialect's tokens.

// Internal imports (std, crate)
use crate::dialects::{Declarations, Dialect};
use crate::logging::LogSink;
use crate::openapi::Operation;
use crate::sample::SampleSynthesizer;

/// Broad family of a request media type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Json,
    FormUrlEncoded,
    Multipart,
    OctetStream,
    Other,
}

impl MediaKind {
    /// Classify a media type, ignoring case and parameters such as `charset`
    pub fn of(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.is_empty() || essence.contains("json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::FormUrlEncoded
        } else if essence.starts_with("multipart/") {
            Self::Multipart
        } else if essence == "application/octet-stream" {
            Self::OctetStream
        } else {
            Self::Other
        }
    }

    /// Whether bodies of this kind are sent field by field
    pub fn is_form(&self) -> bool {
        matches!(self, Self::FormUrlEncoded | Self::Multipart)
    }
}

/// Body embedding decision for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyStrategy {
    /// The operation declares no request body
    NoBody,
    /// Raw bytes piped through standard input
    StdinBinary,
    /// Body text piped through standard input
    Stdin,
    /// One directive per declared form field
    FormFields { kind: MediaKind, fields: Vec<String> },
    /// Placeholder for a file to upload
    FilePlaceholder,
    /// Sample JSON embedded as a literal
    InlineJson(String),
    /// Media type without a known embedding, nothing is sent
    Unsupported,
}

impl BodyStrategy {
    /// Decide how to embed the body of `operation` sent as `content_type`
    pub fn decide(
        operation: &Operation,
        content_type: &str,
        read_body_from_stdin: bool,
        synthesizer: &SampleSynthesizer,
        sink: &dyn LogSink,
    ) -> Self {
        let Some(body) = &operation.request_body else {
            return Self::NoBody;
        };
        let schema = body.schema_for(content_type);
        let kind = MediaKind::of(content_type);

        if read_body_from_stdin {
            let sample = synthesizer.sample_json(schema);
            sink.log(&format!("Sample body (read from stdin instead): {}", sample));
            return match kind {
                MediaKind::OctetStream => Self::StdinBinary,
                _ => Self::Stdin,
            };
        }

        match kind {
            MediaKind::FormUrlEncoded | MediaKind::Multipart => Self::FormFields {
                kind,
                fields: schema
                    .map(|s| s.property_names().into_iter().map(String::from).collect())
                    .unwrap_or_default(),
            },
            MediaKind::OctetStream => Self::FilePlaceholder,
            MediaKind::Json => Self::InlineJson(synthesizer.sample_json(schema)),
            MediaKind::Other => {
                sink.log(&format!(
                    "No body embedding for content type '{}', omitting body",
                    content_type
                ));
                Self::Unsupported
            }
        }
    }

    /// Curl arguments carrying the body, in dialect syntax
    pub fn directives(&self, dialect: &dyn Dialect, declarations: &Declarations) -> Vec<String> {
        match self {
            Self::NoBody | Self::Unsupported => Vec::new(),
            Self::StdinBinary => vec![format!("--data-binary {}", dialect.quote_literal("@-"))],
            Self::Stdin => vec![format!("-d {}", dialect.quote_literal("@-"))],
            Self::FormFields { kind, fields } => {
                let flag = match kind {
                    MediaKind::Multipart => "-F",
                    _ => "--data-urlencode",
                };
                fields
                    .iter()
                    .map(|field| {
                        let value = dialect.substitution(&declarations.identifier(dialect, field));
                        format!("{} \"{}={}\"", flag, field, value)
                    })
                    .collect()
            }
            Self::FilePlaceholder => {
                vec![format!("--data-binary {}", dialect.quote_literal("@filename"))]
            }
            Self::InlineJson(json) => vec![format!("-d {}", dialect.quote_literal(json))],
        }
    }
}
