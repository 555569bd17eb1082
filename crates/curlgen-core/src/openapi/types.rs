//! Read-only model of an API description
//!
//! These types are produced from the raw document by
//! [`OpenApiContext::description`](super::OpenApiContext::description) and are
//! independent of how the document was written (OpenAPI 3, Swagger 2, JSON or
//! YAML).

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A whole API description, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiDescription {
    /// Declared server URLs, first one wins
    pub servers: Vec<String>,
    /// Routes with their operations
    pub paths: Vec<PathItem>,
}

impl ApiDescription {
    /// URL of the first declared server
    pub fn first_server(&self) -> Option<&str> {
        self.servers.first().map(String::as_str)
    }

    /// Every (route, operation) pair in traversal order
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths.iter().flat_map(|item| {
            item.operations
                .iter()
                .map(move |op| (item.route.as_str(), op))
        })
    }
}

/// One route and the operations bound to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    /// Route template, e.g. `/pets/{id}`
    pub route: String,
    pub operations: Vec<Operation>,
}

/// HTTP methods an operation can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Method name with only its first letter upper-cased (`Get`)
    pub fn capitalized(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Put => "Put",
            Self::Post => "Post",
            Self::Delete => "Delete",
            Self::Options => "Options",
            Self::Head => "Head",
            Self::Patch => "Patch",
            Self::Trace => "Trace",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "put" => Ok(Self::Put),
            "post" => Ok(Self::Post),
            "delete" => Ok(Self::Delete),
            "options" => Ok(Self::Options),
            "head" => Ok(Self::Head),
            "patch" => Ok(Self::Patch),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("Unknown HTTP method: {}", s)),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP method bound to one route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Path-level and operation-level parameters, merged
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

impl Operation {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            operation_id: None,
            summary: None,
            description: None,
            parameters: Vec::new(),
            request_body: None,
        }
    }

    /// The first media type of the request body, if there is one
    pub fn request_content_type(&self) -> Option<&str> {
        self.request_body
            .as_ref()
            .and_then(RequestBody::first_content_type)
    }
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            _ => Err(format!("Unknown parameter location: {}", s)),
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Name as declared, case sensitive
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    /// The schema's `default`, if any
    pub default: Option<JsonValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParameterLocation::Path,
            description: None,
            default: None,
        }
    }
}

/// Request body media types and their schemas, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestBody {
    pub content: Vec<MediaType>,
}

impl RequestBody {
    pub fn first_content_type(&self) -> Option<&str> {
        self.content.first().map(|m| m.content_type.as_str())
    }

    /// Schema declared for a media type
    pub fn schema_for(&self, content_type: &str) -> Option<&Schema> {
        self.content
            .iter()
            .find(|m| m.content_type == content_type)
            .and_then(|m| m.schema.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    pub content_type: String,
    pub schema: Option<Schema>,
}

/// A schema node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub kind: SchemaKind,
    /// Literal example; wins over anything synthesized from `kind`
    pub example: Option<JsonValue>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            example: None,
        }
    }

    pub fn unspecified() -> Self {
        Self::new(SchemaKind::Unspecified)
    }

    pub fn string(format: Option<&str>) -> Self {
        Self::new(SchemaKind::String {
            format: format.map(str::to_string),
        })
    }

    pub fn object(properties: Vec<(String, Schema)>) -> Self {
        Self::new(SchemaKind::Object { properties })
    }

    pub fn array(items: Option<Schema>) -> Self {
        Self::new(SchemaKind::Array {
            items: items.map(Box::new),
        })
    }

    pub fn with_example(mut self, example: JsonValue) -> Self {
        self.example = Some(example);
        self
    }

    /// Declared property names of an object schema, empty for anything else
    pub fn property_names(&self) -> Vec<&str> {
        match &self.kind {
            SchemaKind::Object { properties } => {
                properties.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Closed set of schema shapes understood by the synthesizer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaKind {
    Object { properties: Vec<(String, Schema)> },
    Array { items: Option<Box<Schema>> },
    String { format: Option<String> },
    Integer,
    Number,
    Boolean,
    Unspecified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_names() {
        for method in ["get", "PUT", "Post", "delete", "options", "head", "patch", "trace"] {
            let parsed: HttpMethod = method.parse().unwrap();
            assert_eq!(parsed.as_str(), method.to_ascii_uppercase());
            assert_eq!(parsed.capitalized().to_ascii_uppercase(), parsed.as_str());
        }
        assert!("connect".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_path_parameters_default_to_required() {
        assert!(Parameter::new("id", ParameterLocation::Path).required);
        assert!(!Parameter::new("limit", ParameterLocation::Query).required);
    }

    #[test]
    fn test_request_content_type_uses_first_media_type() {
        let mut op = Operation::new(HttpMethod::Post);
        assert_eq!(op.request_content_type(), None);

        op.request_body = Some(RequestBody {
            content: vec![
                MediaType {
                    content_type: "application/xml".to_string(),
                    schema: None,
                },
                MediaType {
                    content_type: "application/json".to_string(),
                    schema: Some(Schema::object(vec![])),
                },
            ],
        });
        assert_eq!(op.request_content_type(), Some("application/xml"));
        assert!(op
            .request_body
            .as_ref()
            .unwrap()
            .schema_for("application/json")
            .is_some());
    }

    #[test]
    fn test_operations_follow_document_order() {
        let description = ApiDescription {
            servers: vec![],
            paths: vec![
                PathItem {
                    route: "/b".to_string(),
                    operations: vec![
                        Operation::new(HttpMethod::Post),
                        Operation::new(HttpMethod::Get),
                    ],
                },
                PathItem {
                    route: "/a".to_string(),
                    operations: vec![Operation::new(HttpMethod::Delete)],
                },
            ],
        };
        let visited: Vec<(&str, HttpMethod)> = description
            .operations()
            .map(|(route, op)| (route, op.method))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("/b", HttpMethod::Post),
                ("/b", HttpMethod::Get),
                ("/a", HttpMethod::Delete)
            ]
        );
    }
}
