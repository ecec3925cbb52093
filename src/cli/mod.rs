use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "captionscribe",
    about = "CaptionScribe - Download a video's auto-generated captions and return them as clean text",
    version,
    long_about = "Fetches the automatic caption track of a video with yt-dlp, strips WebVTT headers, timestamps and inline markup, and returns one normalized paragraph. Runs as a one-shot CLI or as a small HTTP service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "CAPTIONSCRIBE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and clean the captions of a single video
    Fetch {
        /// Video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Caption language code (defaults to the configured language)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides the configuration)
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        /// Port to bind (overrides the configuration)
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },

    /// Show or create the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON object with a `subtitles` field
    Json,
    /// Plain text
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "captionscribe",
            "fetch",
            "https://youtu.be/abc",
            "-l",
            "de",
            "-f",
            "text",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch { url, language, format, output } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert_eq!(language.as_deref(), Some("de"));
                assert_eq!(format, OutputFormat::Text);
                assert!(output.is_none());
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["captionscribe", "serve", "--port", "9000", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }
}
