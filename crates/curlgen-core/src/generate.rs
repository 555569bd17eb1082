//! Script generation entry points

// Internal imports (std, crate)
use std::sync::Arc;

use crate::{
    config::Settings,
    dialects::ScriptDialect,
    error::Result,
    logging::{sink_from_settings, LogSink},
    naming::{script_filename, DefaultOperationNamer, OperationNamer},
    openapi::{ApiDescription, OpenApiContext},
    sample::SampleSynthesizer,
    script::RequestAssembler,
    templates::TemplateManager,
};

// External imports (alphabetized)
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

/// One generated script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptFile {
    pub filename: String,
    pub content: String,
}

impl ScriptFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Scripts of one dialect, in description order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub dialect: ScriptDialect,
    pub files: Vec<ScriptFile>,
}

impl GenerationResult {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a script by file name
    pub fn file(&self, filename: &str) -> Option<&ScriptFile> {
        self.files.iter().find(|f| f.filename == filename)
    }
}

/// Generates the scripts of one dialect for a description
pub struct ScriptGenerator {
    settings: Settings,
    dialect: ScriptDialect,
    namer: Arc<dyn OperationNamer>,
    sink: Arc<dyn LogSink>,
    clock: Option<DateTime<Utc>>,
}

impl ScriptGenerator {
    /// Generator with the default namer and the log sink selected by `settings`
    pub fn new(settings: Settings, dialect: ScriptDialect) -> Self {
        let sink = sink_from_settings(&settings);
        Self {
            settings,
            dialect,
            namer: Arc::new(DefaultOperationNamer),
            sink,
            clock: None,
        }
    }

    pub fn with_namer(mut self, namer: Arc<dyn OperationNamer>) -> Self {
        self.namer = namer;
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fix the instant used for `date` and `date-time` samples
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dialect(&self) -> ScriptDialect {
        self.dialect
    }

    /// Load the description named by the settings and generate its scripts
    pub async fn generate(&self) -> Result<GenerationResult> {
        self.sink.log("Starting generation...");
        self.log_settings();

        let description = load_description(&self.settings).await?;
        self.generate_from(&description)
    }

    /// Generate scripts from an already loaded description
    pub fn generate_from(&self, description: &ApiDescription) -> Result<GenerationResult> {
        let base_url = resolve_base_url(&self.settings, description);
        self.sink.log(&format!("Base URL: {}", base_url));

        let templates = TemplateManager::new()?;
        let dialect = self.dialect.dialect();
        let synthesizer = self
            .clock
            .map(SampleSynthesizer::at)
            .unwrap_or_default();
        let assembler = RequestAssembler::new(
            &self.settings,
            dialect.as_ref(),
            &templates,
            synthesizer,
            self.sink.as_ref(),
        );

        let mut files = Vec::new();
        for item in &description.paths {
            self.sink.log(&format!("Processing path: {}", item.route));
            for operation in &item.operations {
                self.sink
                    .log(&format!("Processing operation: {}", operation.method.capitalized()));

                let name =
                    self.namer
                        .operation_name(description, &item.route, operation.method, operation);
                let filename = script_filename(&name, self.dialect.file_extension());
                let content = assembler.assemble(&base_url, &item.route, operation)?;

                self.sink
                    .log(&format!("Generated code for {}:\n{}", filename, content));
                files.push(ScriptFile::new(filename, content));
            }
        }

        log::info!(
            "Generated {} {} script(s) from {}",
            files.len(),
            self.dialect,
            self.settings.openapi_path
        );

        Ok(GenerationResult {
            dialect: self.dialect,
            files,
        })
    }

    fn log_settings(&self) {
        match serde_json::to_string_pretty(&self.settings) {
            Ok(json) => self.sink.log(&format!("Settings: {}", json)),
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

async fn load_description(settings: &Settings) -> Result<ApiDescription> {
    let context = OpenApiContext::from_file_or_url(&settings.openapi_path).await?;
    log::debug!(
        "Loaded {} {}",
        context.title().unwrap_or("untitled API"),
        context.version().unwrap_or_default()
    );
    context.description()
}

/// Base URL every request of a description is sent to
///
/// The configured base URL is prefixed to the first declared server. When the
/// result is not an absolute URL and the description was fetched over HTTP,
/// the scheme and authority of the description's URL are put in front.
pub fn resolve_base_url(settings: &Settings, description: &ApiDescription) -> String {
    let base_url = format!(
        "{}{}",
        settings.base_url.as_deref().unwrap_or_default(),
        description.first_server().unwrap_or_default()
    );

    if Url::parse(&base_url).is_ok() || !settings.is_remote_source() {
        return base_url;
    }

    match Url::parse(&settings.openapi_path) {
        Ok(source) => format!("{}{}", source.origin().ascii_serialization(), base_url),
        Err(e) => {
            log::warn!("Cannot re-base on {}: {}", settings.openapi_path, e);
            base_url
        }
    }
}

/// Generate the scripts of one dialect
pub async fn generate(settings: &Settings, dialect: ScriptDialect) -> Result<GenerationResult> {
    ScriptGenerator::new(settings.clone(), dialect).generate().await
}

/// Generate the scripts of several dialects from a single load of the description
pub async fn generate_all(
    settings: &Settings,
    dialects: &[ScriptDialect],
) -> Result<Vec<GenerationResult>> {
    let sink = sink_from_settings(settings);
    sink.log("Starting generation...");

    let description = load_description(settings).await?;
    dialects
        .iter()
        .map(|dialect| {
            ScriptGenerator::new(settings.clone(), *dialect)
                .with_log_sink(sink.clone())
                .generate_from(&description)
        })
        .collect()
}
