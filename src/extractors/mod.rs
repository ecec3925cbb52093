use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod ytdlp;

pub use ytdlp::YtDlpExtractor;

/// File stem every extraction artifact is written under
pub const ARTIFACT_STEM: &str = "file";

/// Everything the extractor needs for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Video URL, already validated
    pub url: String,

    /// Caption language to request
    pub language: String,

    /// Workspace directory the artifacts land in
    pub workspace: PathBuf,

    /// Caption file extension requested from the extractor
    pub subtitle_format: String,
}

impl ExtractionRequest {
    pub fn new(
        url: impl Into<String>,
        language: impl Into<String>,
        workspace: &Path,
        subtitle_format: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            language: language.into(),
            workspace: workspace.to_path_buf(),
            subtitle_format: subtitle_format.into(),
        }
    }

    /// Output template handed to the extractor, e.g. `<workspace>/file.%(ext)s`
    pub fn output_template(&self) -> PathBuf {
        self.workspace.join(format!("{}.%(ext)s", ARTIFACT_STEM))
    }

    /// Where the caption track is expected after a successful fetch
    pub fn caption_path(&self) -> PathBuf {
        self.workspace.join(format!(
            "{}.{}.{}",
            ARTIFACT_STEM, self.language, self.subtitle_format
        ))
    }
}

/// Errors reported by a caption extractor
#[derive(thiserror::Error, Debug)]
pub enum ExtractionError {
    /// The tool ran and reported that the video or captions could not be fetched
    #[error("extraction failed: {0}")]
    Download(String),

    #[error("extractor not available: {0}")]
    ToolUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for fetching a caption track into a workspace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionExtractor: Send + Sync {
    /// Download the automatic caption track to `request.caption_path()`.
    ///
    /// Returning `Ok(())` does not guarantee a file was written: a video without
    /// captions in the requested language succeeds silently.
    async fn fetch_captions(&self, request: &ExtractionRequest) -> Result<(), ExtractionError>;

    /// Check if the underlying tool can be run
    async fn check_availability(&self) -> bool;

    /// Get the name of this extractor
    fn platform_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_path_follows_naming_convention() {
        let request = ExtractionRequest::new(
            "https://youtu.be/abc",
            "en",
            Path::new("/tmp/ws"),
            "vtt",
        );
        assert_eq!(request.caption_path(), PathBuf::from("/tmp/ws/file.en.vtt"));
        assert_eq!(request.output_template(), PathBuf::from("/tmp/ws/file.%(ext)s"));
    }

    #[test]
    fn test_caption_path_uses_language() {
        let request = ExtractionRequest::new("https://youtu.be/abc", "pt-BR", Path::new("/w"), "vtt");
        assert_eq!(request.caption_path(), PathBuf::from("/w/file.pt-BR.vtt"));
    }
}
