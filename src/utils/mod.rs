use anyhow::Result;
use url::Url;

const MAX_LANGUAGE_LEN: usize = 16;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    if parsed.host_str().is_none() {
        anyhow::bail!("URL has no host: {}", url);
    }

    Ok(parsed.to_string())
}

/// Caption language codes end up in a file name, so only `[A-Za-z0-9-]` is allowed
pub fn is_valid_language(lang: &str) -> bool {
    !lang.is_empty()
        && lang.len() <= MAX_LANGUAGE_LEN
        && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Extract domain from URL for display purposes
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Truncate tool output before it is carried in an error message
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// Check if the current environment has required tools
pub async fn check_dependencies(extractor_binary: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(extractor_binary).await {
        missing.push(format!(
            "{} - required for caption extraction",
            extractor_binary
        ));
    }

    missing
}

/// Check if a command is available in PATH
pub async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
