//! Curlgen Core Library
//!
//! This library generates runnable curl request scripts, one per operation,
//! from OpenAPI descriptions. Scripts are produced for Bash and PowerShell.

pub mod body;
pub mod config;
pub mod dialects;
pub mod error;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod openapi;
pub mod sample;
pub mod script;
pub mod templates;
pub mod utils;

pub use crate::{
    config::Settings,
    dialects::ScriptDialect,
    error::{Error, Result},
    generate::{generate, generate_all, GenerationResult, ScriptFile, ScriptGenerator},
    logging::{FileLogSink, LogSink, NoopLogSink},
    naming::{DefaultOperationNamer, OperationNamer},
    openapi::{ApiDescription, OpenApiContext},
    sample::SampleSynthesizer,
};
