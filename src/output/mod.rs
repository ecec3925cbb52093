use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcribe::TranscriptResponse;

/// Render a response in the requested format
pub fn render(response: &TranscriptResponse, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(response)?,
        OutputFormat::Text => response.subtitles.clone(),
    };
    Ok(content)
}

/// Save transcript to file
pub async fn save_to_file(
    response: &TranscriptResponse,
    path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let content = render(response, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print transcript to console
pub fn print_to_console(response: &TranscriptResponse, format: &OutputFormat) -> Result<()> {
    println!("{}", render(response, format)?);
    Ok(())
}
