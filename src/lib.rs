//! CaptionScribe - turn a video's auto-generated caption track into clean prose
//!
//! The library downloads a WebVTT caption track through yt-dlp into a per-call
//! workspace, strips headers, timing and markup from it, and returns a single
//! normalized string suitable for summarization or indexing.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod server;
pub mod transcribe;
pub mod transcript;
pub mod utils;
pub mod workspace;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{CaptionExtractor, ExtractionError, ExtractionRequest};
pub use transcribe::{TranscriptPipeline, TranscriptResponse};
pub use transcript::{clean, CleanTranscript, TranscriptDocument};
pub use workspace::DownloadSession;

/// Result type used throughout the application layer
pub type Result<T> = anyhow::Result<T>;

/// Failure classifications surfaced by a fetch-and-clean call
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Failed to download video or subtitles: {0}")]
    ExtractionFailed(String),

    #[error("No subtitles found for this video (language: {language})")]
    CaptionsNotFound { language: String },

    #[error("An error occurred: {0}")]
    Internal(String),
}

impl TranscriptError {
    /// HTTP status the transport reports for this classification
    pub fn status_code(&self) -> u16 {
        match self {
            TranscriptError::ExtractionFailed(_) => 400,
            TranscriptError::CaptionsNotFound { .. } => 404,
            TranscriptError::Internal(_) => 500,
        }
    }

    /// Message shown to remote callers
    pub fn detail(&self) -> String {
        match self {
            TranscriptError::ExtractionFailed(_) => {
                "Failed to download video or subtitles.".to_string()
            }
            TranscriptError::CaptionsNotFound { .. } => {
                "No subtitles found for this video.".to_string()
            }
            TranscriptError::Internal(message) => format!("An error occurred: {}", message),
        }
    }
}

impl From<std::io::Error> for TranscriptError {
    fn from(err: std::io::Error) -> Self {
        TranscriptError::Internal(err.to_string())
    }
}

impl From<ExtractionError> for TranscriptError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Download(message) => TranscriptError::ExtractionFailed(message),
            other => TranscriptError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TranscriptError::ExtractionFailed("x".into()).status_code(), 400);
        assert_eq!(
            TranscriptError::CaptionsNotFound { language: "en".into() }.status_code(),
            404
        );
        assert_eq!(TranscriptError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_extraction_error_classification() {
        let download: TranscriptError = ExtractionError::Download("blocked".into()).into();
        assert!(matches!(download, TranscriptError::ExtractionFailed(_)));

        let missing: TranscriptError = ExtractionError::ToolUnavailable("yt-dlp".into()).into();
        assert!(matches!(missing, TranscriptError::Internal(_)));
    }

    #[test]
    fn test_internal_detail_carries_message() {
        let err = TranscriptError::Internal("disk full".into());
        assert_eq!(err.detail(), "An error occurred: disk full");
    }
}
