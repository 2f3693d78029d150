//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every setting is optional here so that
//! `.focuslens.toml` values are only overridden when a flag is given.

use crate::config::ModelProvider;
use clap::Parser;
use std::path::PathBuf;

/// FocusLens - LLM-powered productivity classifier for browsing activity
///
/// Receives batches of browsing activity from the browser extension,
/// classifies each page title as Productive or Distracting with a language
/// model, stores the results and reports today's totals.
///
/// Examples:
///   focuslens
///   focuslens --port 5000 --database ~/.local/share/focuslens.db
///   focuslens --provider ollama --model llama3.2:latest
///   focuslens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Interface to bind the HTTP server to
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Language model backend
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<ModelProvider>,

    /// Model to use for classification
    ///
    /// Defaults to gemini-2.5-flash for Gemini and llama3.2:latest for Ollama.
    #[arg(short, long, env = "FOCUSLENS_MODEL")]
    pub model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Ollama API endpoint URL
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Temperature for LLM responses
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Model request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path of the SQLite history database
    #[arg(short, long, value_name = "FILE", env = "FOCUSLENS_DB")]
    pub database: Option<PathBuf>,

    /// Number of records returned by the history endpoint
    #[arg(long, value_name = "COUNT")]
    pub history_limit: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .focuslens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .focuslens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.history_limit == Some(0) {
            return Err("History limit must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
