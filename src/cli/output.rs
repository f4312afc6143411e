//! Output formatting for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;

use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) -> Result<()> {
        let json = match self.format {
            // Callers normally render text themselves; fall back to pretty JSON
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        }
        .context("Failed to serialize output")?;

        println!("{}", json);
        Ok(())
    }

    /// Prints an operation outcome: the record in JSON mode, the message in text mode
    pub fn outcome<T: Serialize>(&self, success: bool, message: &str, record: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => return self.data(record),
            OutputFormat::Text if success => println!("{}", message),
            OutputFormat::Text => println!("Failed: {}", message),
        }
        Ok(())
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn unserializable_data_is_an_error() {
        // JSON object keys must be strings
        let mut data = BTreeMap::new();
        data.insert((1, 2), "pair");

        for format in [OutputFormat::Json, OutputFormat::Text] {
            let err = Output::new(format, false).data(&data).unwrap_err();
            assert!(format!("{err:#}").contains("Failed to serialize output"));
        }
    }

    #[test]
    fn config_format_converts() {
        assert_eq!(OutputFormat::from(storage::OutputFormat::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(storage::OutputFormat::Text), OutputFormat::Text);
    }
}
