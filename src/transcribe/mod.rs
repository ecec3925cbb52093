use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::extractors::{CaptionExtractor, ExtractionRequest, YtDlpExtractor};
use crate::transcript::TranscriptDocument;
use crate::utils;
use crate::workspace::{self, DownloadSession};
use crate::TranscriptError;

/// Successful result of a fetch-and-clean call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    /// The cleaned caption text
    pub subtitles: String,
}

/// Sequences workspace, extraction, cleaning and teardown for each call
pub struct TranscriptPipeline {
    config: Config,
    extractor: Arc<dyn CaptionExtractor>,
    workspace_root: PathBuf,
}

impl TranscriptPipeline {
    /// Create a pipeline backed by yt-dlp
    pub fn new(config: Config) -> Self {
        let extractor = Arc::new(YtDlpExtractor::new(config.extractor.clone()));
        Self::with_extractor(config, extractor)
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn CaptionExtractor>) -> Self {
        let workspace_root = config.workspace_root();
        Self {
            config,
            extractor,
            workspace_root,
        }
    }

    pub fn extractor(&self) -> &dyn CaptionExtractor {
        self.extractor.as_ref()
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Fetch the caption track for `url` and return it as clean prose.
    ///
    /// `language` falls back to the configured default when absent or blank.
    /// The call's workspace is removed before this returns, whatever the outcome.
    pub async fn fetch_transcript(
        &self,
        url: &str,
        language: Option<&str>,
    ) -> Result<TranscriptResponse, TranscriptError> {
        let started = Instant::now();
        let url = url.trim();

        utils::validate_and_normalize_url(url)
            .map_err(|e| TranscriptError::ExtractionFailed(e.to_string()))?;

        let language = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(self.config.app.default_language.as_str());

        if !utils::is_valid_language(language) {
            return Err(TranscriptError::ExtractionFailed(format!(
                "invalid caption language: {:?}",
                language
            )));
        }

        let domain = utils::extract_domain(url).unwrap_or_default();
        tracing::info!(
            %url,
            %domain,
            %language,
            "fetching captions"
        );

        let session = DownloadSession::open(workspace::session_path(&self.workspace_root))?;
        let request = ExtractionRequest::new(
            url,
            language,
            session.path(),
            self.config.extractor.subtitle_format.as_str(),
        );

        let outcome = self.run_session(&request).await;
        let result = settle(outcome, session.close());

        match &result {
            Ok(response) => tracing::info!(
                %url,
                chars = response.subtitles.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "captions cleaned"
            ),
            Err(e) => tracing::info!(%url, error = %e, "caption request failed"),
        }

        result
    }

    async fn run_session(
        &self,
        request: &ExtractionRequest,
    ) -> Result<TranscriptResponse, TranscriptError> {
        self.extractor.fetch_captions(request).await?;

        let caption_path = request.caption_path();
        let is_file = match tokio::fs::metadata(&caption_path).await {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if !is_file {
            tracing::debug!(path = %caption_path.display(), "no caption artifact");
            return Err(TranscriptError::CaptionsNotFound {
                language: request.language.clone(),
            });
        }

        let document = TranscriptDocument::read(&caption_path).await?;
        tracing::debug!(bytes = document.text.len(), "caption artifact read");

        Ok(TranscriptResponse {
            subtitles: document.clean().into_inner(),
        })
    }
}

/// Combine a call's outcome with its workspace teardown.
/// A teardown error only surfaces when nothing more specific is pending.
fn settle<T>(
    outcome: Result<T, TranscriptError>,
    closed: std::io::Result<()>,
) -> Result<T, TranscriptError> {
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(TranscriptError::Internal(format!(
            "failed to remove workspace: {}",
            e
        ))),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "failed to remove workspace after error");
            Err(e)
        }
    }
}
