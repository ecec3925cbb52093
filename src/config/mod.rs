use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::transcript::CaptionFormat;
use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// yt-dlp invocation settings
    pub extractor: ExtractorConfig,

    /// Application settings
    pub app: AppConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path or name of the yt-dlp executable
    pub binary: String,

    /// Media format selector passed to `--format`
    pub format: String,

    /// Caption format requested from the extractor
    pub subtitle_format: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Download only the single video, never a playlist
    pub no_playlist: bool,

    /// Also download the media stream alongside the captions
    pub download_media: bool,

    /// Kill the extractor after this many seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Caption language used when a request does not name one
    pub default_language: String,

    /// Directory that holds per-call workspaces
    pub workspace_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            format: "bestaudio/best".to_string(),
            subtitle_format: "vtt".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            no_playlist: true,
            download_media: false,
            timeout_secs: Some(300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            app: AppConfig {
                default_language: "en".to_string(),
                workspace_root: None,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(&config_path).await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("captionscribe").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extractor.binary.trim().is_empty() {
            anyhow::bail!("Extractor binary must be configured");
        }

        if !utils::is_valid_language(&self.app.default_language) {
            anyhow::bail!(
                "Invalid default language code: {:?}",
                self.app.default_language
            );
        }

        // The artifact path is built from this value, so it must match the extension exactly
        if self.extractor.subtitle_format != CaptionFormat::WebVtt.extension() {
            anyhow::bail!(
                "Unsupported subtitle format: {:?} (only vtt is cleaned)",
                self.extractor.subtitle_format
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        Ok(())
    }

    /// Resolved directory for per-call workspaces
    pub fn workspace_root(&self) -> PathBuf {
        self.app
            .workspace_root
            .clone()
            .unwrap_or_else(crate::workspace::default_root)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Extractor: {}", self.extractor.binary);
        println!("  Format: {}", self.extractor.format);
        println!("  Subtitle Format: {}", self.extractor.subtitle_format);
        println!("  Download Media: {}", self.extractor.download_media);
        println!("  Default Language: {}", self.app.default_language);
        println!("  Workspace Root: {}", self.workspace_root().display());
        println!("  Server: {}:{}", self.server.host, self.server.port);
    }
}
