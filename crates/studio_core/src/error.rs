use std::io;

use thiserror::Error;

/// Failure to build or deliver an export artifact
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("no bundled font faces for {0}")]
    Font(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Failure reported by a content generator
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "API_KEY is not configured. Please provide it in your environment or enter a custom key."
    )]
    MissingCredential,

    #[error("content generation failed: {0}")]
    Failed(String),

    #[error("malformed generator response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure of a whole generation batch
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Please enter at least one product idea.")]
    NoIdeas,

    #[error(transparent)]
    Credential(GenerationError),

    #[error("generation failed for \"{idea}\": {source}")]
    Generation {
        idea: String,
        #[source]
        source: GenerationError,
    },

    #[error("generation task did not complete: {0}")]
    Task(String),
}

impl BatchError {
    /// Message suitable for showing to the user.
    ///
    /// Only a missing credential is surfaced verbatim; everything else maps to
    /// a generic retry prompt.
    pub fn user_message(&self) -> String {
        match self {
            BatchError::NoIdeas => self.to_string(),
            BatchError::Credential(source)
            | BatchError::Generation {
                source: source @ GenerationError::MissingCredential,
                ..
            } => source.to_string(),
            _ => "An error occurred while generating content. Please check the logs for details and try again.".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
