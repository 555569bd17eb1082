//! curlgen CLI entrypoint
//! Parses command-line arguments and writes one curl script per operation.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use curlgen_core::{generate_all, ScriptDialect, Settings};
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "curlgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path or URL to the OpenAPI description (YAML or JSON)
    ///
    /// Can be a local file path or an HTTP/HTTPS URL.
    /// Optional when --config names one.
    openapi_path: Option<String>,

    /// Output directory for generated scripts
    #[arg(long, short, default_value = ".")]
    output: PathBuf,

    /// Script dialect to generate: bash, powershell or all
    #[arg(long, default_value = "all")]
    dialect: String,

    /// Settings file (JSON, TOML or YAML) applied before the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append diagnostic messages to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Value of the Authorization header sent with every request
    #[arg(long)]
    authorization_header: Option<String>,

    /// Content type for the Accept header and for operations without a body
    #[arg(long)]
    content_type: Option<String>,

    /// Prefix for the server URL declared in the description
    #[arg(long)]
    base_url: Option<String>,

    /// Pass --insecure to curl
    #[arg(long)]
    skip_cert_check: bool,

    /// Read request bodies from standard input instead of embedding a sample
    #[arg(long)]
    read_body_from_stdin: bool,

    /// Read parameters from environment variables
    #[arg(long)]
    environment_parameters: bool,

    /// Fall back to declared defaults for missing required parameters
    #[arg(long)]
    required_default: bool,

    /// Cookie file read and updated by every request
    #[arg(long)]
    cookie_file: Option<String>,

    /// Extra curl options added to every request verbatim
    #[arg(long, allow_hyphen_values = true)]
    extra_options: Option<String>,
}

impl Cli {
    /// Settings from --config, overridden by explicit flags
    async fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)
                .await
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(path) = &self.openapi_path {
            settings.openapi_path = path.clone();
        }
        if settings.openapi_path.is_empty() {
            anyhow::bail!("No OpenAPI description given, pass a path or URL or use --config");
        }

        if let Some(log_file) = &self.log_file {
            settings.log_file = Some(log_file.clone());
        }
        if let Some(authorization) = &self.authorization_header {
            settings.authorization_header = Some(authorization.clone());
        }
        if let Some(content_type) = &self.content_type {
            settings.content_type = content_type.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(cookie_file) = &self.cookie_file {
            settings.cookie_file = Some(cookie_file.clone());
        }
        if let Some(extra_options) = &self.extra_options {
            settings.extra_options = Some(extra_options.clone());
        }
        settings.skip_certificate_check |= self.skip_cert_check;
        settings.read_body_from_stdin |= self.read_body_from_stdin;
        settings.environment_parameters |= self.environment_parameters;
        settings.required_default |= self.required_default;

        Ok(settings)
    }

    fn dialects(&self) -> anyhow::Result<Vec<ScriptDialect>> {
        if self.dialect.eq_ignore_ascii_case("all") {
            return Ok(ScriptDialect::all().collect());
        }
        let dialect: ScriptDialect = self
            .dialect
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid dialect '{}': {}", self.dialect, e))?;
        Ok(vec![dialect])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dialects = cli.dialects()?;
    let settings = cli.settings().await?;

    tracing::debug!(?settings, "resolved settings");
    println!("Loading OpenAPI description from: {}", settings.openapi_path);

    let results = generate_all(&settings, &dialects)
        .await
        .with_context(|| format!("Failed to generate scripts from {}", settings.openapi_path))?;

    // Create output directory if it doesn't exist
    if !cli.output.exists() {
        println!("Creating output directory: {}", cli.output.display());
        fs::create_dir_all(&cli.output)
            .await
            .with_context(|| format!("Failed to create output directory {}", cli.output.display()))?;
    }

    let mut written = 0;
    for result in &results {
        for file in &result.files {
            let path = cli.output.join(&file.filename);
            fs::write(&path, &file.content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote script");
            written += 1;
        }
        println!("Generated {} {} script(s)", result.len(), result.dialect);
    }

    println!(
        "✅ Successfully wrote {} file(s) to: {}",
        written,
        cli.output.display()
    );
    Ok(())
}
