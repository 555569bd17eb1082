//! Conversion of a raw OpenAPI / Swagger document into [`ApiDescription`].
//!
//! The raw document stays a `serde_json::Value`; this module walks it once,
//! resolving local `$ref`s, and produces the closed model the generator works
//! on. Anything it cannot make sense of below the `paths` object degrades to
//! the most neutral value (an unspecified schema, a skipped parameter) rather
//! than failing the whole run.

// Internal imports (std, crate)
use std::collections::HashSet;

use super::types::{
    ApiDescription, HttpMethod, MediaType, Operation, Parameter, ParameterLocation, PathItem,
    RequestBody, Schema, SchemaKind,
};
use super::OpenApiContext;
use crate::Error;

// External imports (alphabetized)
use serde_json::{Map, Value as JsonValue};

/// Maximum schema nesting followed before giving up on a branch
pub const MAX_SCHEMA_DEPTH: usize = 32;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

impl OpenApiContext {
    /// Build the read-only description model from the raw document
    pub fn description(&self) -> crate::Result<ApiDescription> {
        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::openapi("Missing 'paths' object"))?;

        let resolver = Resolver { root: &self.json };
        let mut items = Vec::with_capacity(paths.len());
        for (route, item) in paths {
            let Some(item) = resolver.deref(item).and_then(JsonValue::as_object) else {
                log::warn!("Skipping path '{}': not an object", route);
                continue;
            };
            items.push(PathItem {
                route: route.clone(),
                operations: resolver.operations(item),
            });
        }

        Ok(ApiDescription {
            servers: self.server_urls(),
            paths: items,
        })
    }

    /// Server URLs, from `servers` (OpenAPI 3) or `host`/`basePath` (Swagger 2)
    pub fn server_urls(&self) -> Vec<String> {
        if let Some(servers) = self.json.get("servers").and_then(JsonValue::as_array) {
            return servers.iter().filter_map(expand_server_url).collect();
        }

        let base_path = self
            .json
            .get("basePath")
            .and_then(JsonValue::as_str)
            .unwrap_or("");
        match self.json.get("host").and_then(JsonValue::as_str) {
            Some(host) => {
                let schemes = self.json.get("schemes").and_then(JsonValue::as_array);
                // Prefer https when it is offered
                let scheme = match schemes {
                    Some(list) if list.iter().any(|s| s.as_str() == Some("https")) => "https",
                    Some(list) => list.first().and_then(JsonValue::as_str).unwrap_or("https"),
                    None => "https",
                };
                vec![format!("{}://{}{}", scheme, host, base_path)]
            }
            None if !base_path.is_empty() => vec![base_path.to_string()],
            None => Vec::new(),
        }
    }
}

/// Substitute server variables with their defaults
fn expand_server_url(server: &JsonValue) -> Option<String> {
    let mut url = server.get("url")?.as_str()?.to_string();
    if let Some(variables) = server.get("variables").and_then(JsonValue::as_object) {
        for (name, variable) in variables {
            if let Some(default) = variable.get("default").and_then(JsonValue::as_str) {
                url = url.replace(&format!("{{{}}}", name), default);
            }
        }
    }
    Some(url)
}

struct Resolver<'a> {
    root: &'a JsonValue,
}

impl<'a> Resolver<'a> {
    /// Follow a local `$ref` chain until a concrete node is reached
    fn deref(&self, value: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = value;
        let mut seen = HashSet::new();
        while let Some(reference) = current.get("$ref").and_then(JsonValue::as_str) {
            if !seen.insert(reference) {
                log::warn!("Circular reference '{}'", reference);
                return None;
            }
            current = self.lookup(reference)?;
        }
        Some(current)
    }

    fn lookup(&self, reference: &str) -> Option<&'a JsonValue> {
        let pointer = reference.strip_prefix('#')?;
        let found = self.root.pointer(pointer);
        if found.is_none() {
            log::warn!("Unresolved reference '{}'", reference);
        }
        found
    }

    fn operations(&self, item: &'a Map<String, JsonValue>) -> Vec<Operation> {
        let shared = self.parameter_list(item.get("parameters"));

        item.iter()
            .filter_map(|(key, value)| {
                let method = key.parse::<HttpMethod>().ok()?;
                let raw = value.as_object()?;
                Some(self.operation(method, raw, &shared))
            })
            .collect()
    }

    fn operation(
        &self,
        method: HttpMethod,
        raw: &'a Map<String, JsonValue>,
        shared: &[&'a Map<String, JsonValue>],
    ) -> Operation {
        let text = |key: &str| raw.get(key).and_then(JsonValue::as_str).map(String::from);

        // Operation-level parameters override path-level ones by (name, in)
        let mut raw_params: Vec<&Map<String, JsonValue>> = shared.to_vec();
        for param in self.parameter_list(raw.get("parameters")) {
            let key = parameter_key(param);
            match raw_params.iter().position(|p| parameter_key(p) == key) {
                Some(index) => raw_params[index] = param,
                None => raw_params.push(param),
            }
        }

        let mut parameters = Vec::new();
        let mut body_param = None;
        let mut form_params = Vec::new();
        for param in raw_params {
            match param.get("in").and_then(JsonValue::as_str) {
                Some("body") => body_param = Some(param),
                Some("formData") => form_params.push(param),
                _ => parameters.extend(self.parameter(param)),
            }
        }

        let request_body = match raw.get("requestBody") {
            Some(body) => self.request_body(body),
            None if body_param.is_some() || !form_params.is_empty() => {
                Some(self.swagger2_body(raw, body_param, &form_params))
            }
            None => None,
        };

        Operation {
            method,
            operation_id: text("operationId"),
            summary: text("summary"),
            description: text("description"),
            parameters,
            request_body,
        }
    }

    fn parameter_list(&self, value: Option<&'a JsonValue>) -> Vec<&'a Map<String, JsonValue>> {
        value
            .and_then(JsonValue::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|p| self.deref(p).and_then(JsonValue::as_object))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parameter(&self, raw: &'a Map<String, JsonValue>) -> Option<Parameter> {
        let name = raw.get("name").and_then(JsonValue::as_str)?;
        let location_str = raw.get("in").and_then(JsonValue::as_str)?;
        let location = match location_str.parse::<ParameterLocation>() {
            Ok(location) => location,
            Err(e) => {
                log::warn!("Skipping parameter '{}': {}", name, e);
                return None;
            }
        };

        let required = raw
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(location == ParameterLocation::Path);
        // OpenAPI 3 keeps the default on the schema, Swagger 2 on the parameter
        let default = raw
            .get("schema")
            .and_then(|s| self.deref(s))
            .and_then(|s| s.get("default"))
            .or_else(|| raw.get("default"))
            .cloned();

        Some(Parameter {
            name: name.to_string(),
            location,
            required,
            description: raw
                .get("description")
                .and_then(JsonValue::as_str)
                .map(String::from),
            default,
        })
    }

    fn request_body(&self, value: &'a JsonValue) -> Option<RequestBody> {
        let content = self
            .deref(value)?
            .get("content")
            .and_then(JsonValue::as_object)?;
        Some(RequestBody {
            content: content
                .iter()
                .map(|(content_type, media)| MediaType {
                    content_type: content_type.clone(),
                    schema: media.get("schema").map(|s| self.schema(s)),
                })
                .collect(),
        })
    }

    /// Swagger 2 carries bodies as `in: body` / `in: formData` parameters
    fn swagger2_body(
        &self,
        raw: &'a Map<String, JsonValue>,
        body_param: Option<&'a Map<String, JsonValue>>,
        form_params: &[&'a Map<String, JsonValue>],
    ) -> RequestBody {
        let consumes: Vec<&str> = raw
            .get("consumes")
            .or_else(|| self.root.get("consumes"))
            .and_then(JsonValue::as_array)
            .map(|arr| arr.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();

        if let Some(param) = body_param {
            let schema = param.get("schema").map(|s| self.schema(s));
            let types = if consumes.is_empty() {
                vec![crate::config::DEFAULT_CONTENT_TYPE]
            } else {
                consumes
            };
            return RequestBody {
                content: types
                    .into_iter()
                    .map(|content_type| MediaType {
                        content_type: content_type.to_string(),
                        schema: schema.clone(),
                    })
                    .collect(),
            };
        }

        let content_type = if consumes.contains(&MULTIPART_FORM_DATA) {
            MULTIPART_FORM_DATA
        } else {
            FORM_URLENCODED
        };
        let properties = form_params
            .iter()
            .filter_map(|param| {
                let name = param.get("name").and_then(JsonValue::as_str)?;
                let schema = SchemaBuilder::new(self).build_object(*param, 0);
                Some((name.to_string(), schema))
            })
            .collect();

        RequestBody {
            content: vec![MediaType {
                content_type: content_type.to_string(),
                schema: Some(Schema::object(properties)),
            }],
        }
    }

    fn schema(&self, value: &'a JsonValue) -> Schema {
        SchemaBuilder::new(self).build(value, 0)
    }
}

fn parameter_key<'m>(param: &'m Map<String, JsonValue>) -> (Option<&'m str>, Option<&'m str>) {
    (
        param.get("name").and_then(JsonValue::as_str),
        param.get("in").and_then(JsonValue::as_str),
    )
}

/// Converts schema nodes, tracking the `$ref`s being expanded on the current branch
struct SchemaBuilder<'r, 'a> {
    resolver: &'r Resolver<'a>,
    expanding: Vec<&'a str>,
}

impl<'r, 'a> SchemaBuilder<'r, 'a> {
    fn new(resolver: &'r Resolver<'a>) -> Self {
        Self {
            resolver,
            expanding: Vec::new(),
        }
    }

    fn build(&mut self, value: &'a JsonValue, depth: usize) -> Schema {
        if depth > MAX_SCHEMA_DEPTH {
            log::debug!("Schema nesting deeper than {}, truncating", MAX_SCHEMA_DEPTH);
            return Schema::unspecified();
        }

        if let Some(reference) = value.get("$ref").and_then(JsonValue::as_str) {
            if self.expanding.contains(&reference) {
                return Schema::unspecified();
            }
            let Some(target) = self.resolver.lookup(reference) else {
                return Schema::unspecified();
            };
            self.expanding.push(reference);
            let schema = self.build(target, depth + 1);
            self.expanding.pop();
            return schema;
        }

        match value.as_object() {
            Some(raw) => self.build_object(raw, depth),
            None => Schema::unspecified(),
        }
    }

    fn build_object(&mut self, raw: &'a Map<String, JsonValue>, depth: usize) -> Schema {
        let example = raw
            .get("example")
            .or_else(|| {
                raw.get("examples")
                    .and_then(JsonValue::as_array)
                    .and_then(|list| list.first())
            })
            .cloned();

        let mut schema = if let Some(members) = raw.get("allOf").and_then(JsonValue::as_array) {
            self.merge_all_of(members, depth)
        } else if let Some(first) = ["oneOf", "anyOf"]
            .iter()
            .find_map(|key| raw.get(*key).and_then(JsonValue::as_array)?.first())
        {
            self.build(first, depth + 1)
        } else {
            Schema::new(self.kind(raw, depth))
        };

        if example.is_some() {
            schema.example = example;
        }
        schema
    }

    fn kind(&mut self, raw: &'a Map<String, JsonValue>, depth: usize) -> SchemaKind {
        let declared = match raw.get("type") {
            Some(JsonValue::String(name)) => Some(name.as_str()),
            // OpenAPI 3.1 allows a list such as ["string", "null"]
            Some(JsonValue::Array(names)) => names
                .iter()
                .filter_map(JsonValue::as_str)
                .find(|name| *name != "null"),
            _ => None,
        };
        let inferred = declared.or_else(|| {
            if raw.contains_key("properties") {
                Some("object")
            } else if raw.contains_key("items") {
                Some("array")
            } else {
                None
            }
        });

        match inferred {
            Some("object") => SchemaKind::Object {
                properties: self.properties(raw, depth),
            },
            Some("array") => SchemaKind::Array {
                items: raw
                    .get("items")
                    .map(|items| Box::new(self.build(items, depth + 1))),
            },
            Some("string") | Some("file") => SchemaKind::String {
                format: raw
                    .get("format")
                    .and_then(JsonValue::as_str)
                    .map(String::from),
            },
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            _ => SchemaKind::Unspecified,
        }
    }

    fn properties(
        &mut self,
        raw: &'a Map<String, JsonValue>,
        depth: usize,
    ) -> Vec<(String, Schema)> {
        raw.get("properties")
            .and_then(JsonValue::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| (name.clone(), self.build(prop, depth + 1)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn merge_all_of(&mut self, members: &'a [JsonValue], depth: usize) -> Schema {
        let mut merged: Option<Vec<(String, Schema)>> = None;
        let mut fallback = None;

        for member in members {
            let schema = self.build(member, depth + 1);
            match schema.kind {
                SchemaKind::Object { properties } => {
                    let target = merged.get_or_insert_with(Vec::new);
                    for (name, prop) in properties {
                        match target.iter_mut().find(|(existing, _)| *existing == name) {
                            Some(slot) => slot.1 = prop,
                            None => target.push((name, prop)),
                        }
                    }
                }
                other => {
                    fallback.get_or_insert(Schema {
                        kind: other,
                        example: schema.example,
                    });
                }
            }
        }

        match (merged, fallback) {
            (Some(properties), _) => Schema::object(properties),
            (None, Some(schema)) => schema,
            (None, None) => Schema::unspecified(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(json: JsonValue) -> OpenApiContext {
        OpenApiContext { json }
    }

    #[test]
    fn test_missing_paths_is_an_error() {
        let err = context(json!({"openapi": "3.0.0"})).description().unwrap_err();
        assert!(matches!(err, Error::OpenApi(_)));
    }

    #[test]
    fn test_operations_keep_document_order() -> crate::Result<()> {
        let spec = context(json!({
            "paths": {
                "/pets": {
                    "summary": "ignored, not a method",
                    "post": {"operationId": "createPet"},
                    "get": {"operationId": "listPets"}
                },
                "/pets/{id}": {
                    "delete": {"operationId": "deletePet"}
                }
            }
        }));
        let description = spec.description()?;
        let ids: Vec<_> = description
            .operations()
            .map(|(route, op)| (route.to_string(), op.operation_id.clone().unwrap()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("/pets".to_string(), "createPet".to_string()),
                ("/pets".to_string(), "listPets".to_string()),
                ("/pets/{id}".to_string(), "deletePet".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parameters_resolve_refs_and_merge() -> crate::Result<()> {
        let spec = context(json!({
            "paths": {
                "/pets/{id}": {
                    "parameters": [
                        {"name": "id", "in": "path", "description": "shared"},
                        {"name": "trace", "in": "header"}
                    ],
                    "get": {
                        "parameters": [
                            {"$ref": "#/components/parameters/limit"},
                            {"name": "id", "in": "path", "required": true, "description": "override"},
                            {"name": "weird", "in": "matrix"}
                        ]
                    }
                }
            },
            "components": {
                "parameters": {
                    "limit": {
                        "name": "limit",
                        "in": "query",
                        "schema": {"$ref": "#/components/schemas/Limit"}
                    }
                },
                "schemas": {"Limit": {"type": "integer", "default": 10}}
            }
        }));
        let description = spec.description()?;
        let (_, op) = description.operations().next().unwrap();

        let names: Vec<_> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "trace", "limit"]);
        assert_eq!(op.parameters[0].description.as_deref(), Some("override"));
        assert!(op.parameters[0].required);
        assert!(!op.parameters[1].required);
        assert_eq!(op.parameters[2].default, Some(json!(10)));
        Ok(())
    }

    #[test]
    fn test_request_body_schema_conversion() -> crate::Result<()> {
        let spec = context(json!({
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": {"$ref": "#/components/requestBodies/Pet"}
                    }
                }
            },
            "components": {
                "requestBodies": {
                    "Pet": {
                        "content": {
                            "application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}
                        }
                    }
                },
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "age": {"type": "integer"},
                            "born": {"type": ["string", "null"], "format": "date"},
                            "tags": {"type": "array", "items": {"type": "string"}},
                            "owner": {"properties": {"email": {"type": "string", "format": "email"}}}
                        }
                    }
                }
            }
        }));
        let description = spec.description()?;
        let (_, op) = description.operations().next().unwrap();
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(body.first_content_type(), Some("application/json"));

        let schema = body.schema_for("application/json").unwrap();
        assert_eq!(schema.property_names(), vec!["name", "age", "born", "tags", "owner"]);

        let SchemaKind::Object { properties } = &schema.kind else {
            panic!("expected object schema");
        };
        assert_eq!(properties[1].1.kind, SchemaKind::Integer);
        assert_eq!(
            properties[2].1.kind,
            SchemaKind::String {
                format: Some("date".to_string())
            }
        );
        assert!(matches!(properties[3].1.kind, SchemaKind::Array { items: Some(_) }));
        assert_eq!(properties[4].1.property_names(), vec!["email"]);
        Ok(())
    }

    #[test]
    fn test_recursive_schema_is_cut() -> crate::Result<()> {
        let spec = context(json!({
            "paths": {
                "/nodes": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {"schema": {"$ref": "#/components/schemas/Node"}}
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Node": {
                        "type": "object",
                        "properties": {
                            "value": {"type": "integer"},
                            "next": {"$ref": "#/components/schemas/Node"}
                        }
                    }
                }
            }
        }));
        let description = spec.description()?;
        let (_, op) = description.operations().next().unwrap();
        let schema = op
            .request_body
            .as_ref()
            .and_then(|b| b.schema_for("application/json"))
            .unwrap();
        let SchemaKind::Object { properties } = &schema.kind else {
            panic!("expected object schema");
        };
        assert_eq!(properties[1].0, "next");
        assert_eq!(properties[1].1.kind, SchemaKind::Unspecified);
        Ok(())
    }

    #[test]
    fn test_all_of_merges_and_one_of_picks_first() -> crate::Result<()> {
        let spec = context(json!({
            "paths": {
                "/a": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "allOf": [
                                            {"type": "object", "properties": {"id": {"type": "integer"}}},
                                            {"type": "object", "properties": {"name": {"type": "string"}}}
                                        ]
                                    }
                                },
                                "text/plain": {
                                    "schema": {"oneOf": [{"type": "boolean"}, {"type": "string"}]}
                                }
                            }
                        }
                    }
                }
            }
        }));
        let description = spec.description()?;
        let (_, op) = description.operations().next().unwrap();
        let body = op.request_body.as_ref().unwrap();
        assert_eq!(
            body.schema_for("application/json").unwrap().property_names(),
            vec!["id", "name"]
        );
        assert_eq!(
            body.schema_for("text/plain").unwrap().kind,
            SchemaKind::Boolean
        );
        Ok(())
    }

    #[test]
    fn test_swagger2_bodies_and_host() -> crate::Result<()> {
        let spec = context(json!({
            "swagger": "2.0",
            "host": "petstore.swagger.io",
            "basePath": "/v2",
            "schemes": ["http", "https"],
            "paths": {
                "/pet": {
                    "post": {
                        "consumes": ["application/json", "application/xml"],
                        "parameters": [
                            {"in": "body", "name": "body", "schema": {"type": "object", "properties": {"name": {"type": "string"}}}}
                        ]
                    }
                },
                "/pet/{petId}/uploadImage": {
                    "post": {
                        "consumes": ["multipart/form-data"],
                        "parameters": [
                            {"name": "petId", "in": "path", "required": true, "type": "integer"},
                            {"name": "additionalMetadata", "in": "formData", "type": "string"},
                            {"name": "file", "in": "formData", "type": "file"}
                        ]
                    }
                }
            }
        }));
        let description = spec.description()?;
        assert_eq!(description.first_server(), Some("https://petstore.swagger.io/v2"));

        let ops: Vec<_> = description.operations().map(|(_, op)| op).collect();
        let json_body = ops[0].request_body.as_ref().unwrap();
        assert_eq!(json_body.content.len(), 2);
        assert_eq!(json_body.first_content_type(), Some("application/json"));
        assert!(ops[0].parameters.is_empty());

        let form_body = ops[1].request_body.as_ref().unwrap();
        assert_eq!(form_body.first_content_type(), Some(MULTIPART_FORM_DATA));
        assert_eq!(
            form_body.schema_for(MULTIPART_FORM_DATA).unwrap().property_names(),
            vec!["additionalMetadata", "file"]
        );
        assert_eq!(ops[1].parameters.len(), 1);
        Ok(())
    }

    #[test]
    fn test_server_variables_are_expanded() {
        let spec = context(json!({
            "servers": [
                {"url": "https://{region}.example.com/{version}", "variables": {
                    "region": {"default": "eu"},
                    "version": {"default": "v1"}
                }},
                {"url": "/fallback"}
            ],
            "paths": {}
        }));
        assert_eq!(
            spec.server_urls(),
            vec!["https://eu.example.com/v1".to_string(), "/fallback".to_string()]
        );
    }
}
