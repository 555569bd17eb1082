//! Representative sample values for request body schemas.
//!
//! Samples are illustrative defaults, not validated payloads. A schema's
//! literal `example` always wins; otherwise a value is built from the
//! schema's kind. Synthesis never fails a generation run.

// Internal imports (std, crate)
use crate::openapi::{Schema, SchemaKind};

// External imports (alphabetized)
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as JsonValue};

/// Placeholder for `format: email`
pub const SAMPLE_EMAIL: &str = "user@example.com";
/// Placeholder for `format: uri`
pub const SAMPLE_URI: &str = "https://example.com";

/// Builds sample values, with `date`/`date-time` derived from a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct SampleSynthesizer {
    now: DateTime<Utc>,
}

impl Default for SampleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSynthesizer {
    /// Synthesizer using the current time for date formats
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Synthesizer using a fixed instant for date formats
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Build a representative value for a schema
    pub fn synthesize(&self, schema: &Schema) -> JsonValue {
        if let Some(example) = &schema.example {
            return example.clone();
        }

        match &schema.kind {
            SchemaKind::Object { properties } => {
                let object: Map<String, JsonValue> = properties
                    .iter()
                    .map(|(name, prop)| (name.clone(), self.synthesize(prop)))
                    .collect();
                JsonValue::Object(object)
            }
            SchemaKind::Array { items } => match items {
                Some(items) => JsonValue::Array(vec![self.synthesize(items)]),
                None => JsonValue::Array(Vec::new()),
            },
            SchemaKind::String { format } => self.string_sample(format.as_deref()),
            SchemaKind::Integer => json!(0),
            SchemaKind::Number => json!(0.0),
            SchemaKind::Boolean => JsonValue::Bool(false),
            SchemaKind::Unspecified => json!("value"),
        }
    }

    fn string_sample(&self, format: Option<&str>) -> JsonValue {
        let sample = match format {
            Some("date") => self.now.format("%Y-%m-%d").to_string(),
            Some("date-time") => self.now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            Some("email") => SAMPLE_EMAIL.to_string(),
            Some("uri") => SAMPLE_URI.to_string(),
            _ => "string".to_string(),
        };
        JsonValue::String(sample)
    }

    /// Serialize a sample for a schema as compact JSON
    ///
    /// A missing schema, or anything going wrong while serializing, yields `{}`.
    pub fn sample_json(&self, schema: Option<&Schema>) -> String {
        let Some(schema) = schema else {
            return "{}".to_string();
        };

        serde_json::to_string(&self.synthesize(schema)).unwrap_or_else(|e| {
            log::warn!("Failed to serialize sample body: {}", e);
            "{}".to_string()
        })
    }
}
