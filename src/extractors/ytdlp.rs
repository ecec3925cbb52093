use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{CaptionExtractor, ExtractionError, ExtractionRequest};
use crate::config::ExtractorConfig;
use crate::utils::truncate_message;

const MAX_STDERR_CHARS: usize = 1000;

/// Caption extractor backed by the yt-dlp executable
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Arguments for one caption download. Passed to the process directly, never through a shell.
    pub fn build_args(&self, request: &ExtractionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            self.config.format.clone().into(),
            "--output".into(),
            request.output_template().into_os_string(),
            "--write-auto-subs".into(),
            "--sub-langs".into(),
            request.language.clone().into(),
            "--sub-format".into(),
            request.subtitle_format.clone().into(),
            "--add-header".into(),
            format!("User-Agent:{}", self.config.user_agent).into(),
            "--no-exec".into(),
            "--no-progress".into(),
        ];

        if self.config.no_playlist {
            args.push("--no-playlist".into());
        }

        // Audio is never consumed; skip it unless explicitly asked for
        if !self.config.download_media {
            args.push("--skip-download".into());
        }

        args.push("--".into());
        args.push(request.url.clone().into());
        args
    }
}

#[async_trait]
impl CaptionExtractor for YtDlpExtractor {
    async fn fetch_captions(&self, request: &ExtractionRequest) -> Result<(), ExtractionError> {
        let args = self.build_args(request);
        tracing::debug!(binary = %self.config.binary, ?args, "running extractor");

        let child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match self.config.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), child)
                .await
                .map_err(|_| {
                    ExtractionError::Download(format!("extractor timed out after {}s", secs))
                })?,
            None => child.await,
        };

        let output = output.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ExtractionError::ToolUnavailable(self.config.binary.clone())
            } else {
                ExtractionError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Download(truncate_message(
                &stderr,
                MAX_STDERR_CHARS,
            )));
        }

        tracing::debug!(url = %request.url, "extractor finished");
        Ok(())
    }

    async fn check_availability(&self) -> bool {
        crate::utils::check_command_available(&self.config.binary).await
    }

    fn platform_name(&self) -> &'static str {
        "yt-dlp"
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
