use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// Word-level timing and styling markup, e.g. <00:00:01.200><c>word</c>
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}").unwrap()
});

static POSITION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"align:start position:[^%]+%").unwrap());

// Information separators \x1c-\x1f count as whitespace alongside Unicode \s
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x1c-\x1f]+").unwrap());

// Every line boundary a caption file may use, CR-only included
static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c\x1d\x1e\x85\x{2028}\x{2029}]").unwrap()
});

const SIGNATURE: &str = "WEBVTT";
const KIND_TAG: &str = "Kind:";
const LANGUAGE_TAG: &str = "Language:";

/// Caption formats the cleaner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionFormat {
    WebVtt,
}

impl CaptionFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            CaptionFormat::WebVtt => "vtt",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "vtt" => Some(CaptionFormat::WebVtt),
            _ => None,
        }
    }
}

/// Raw caption text as read from the extraction artifact
#[derive(Debug, Clone)]
pub struct TranscriptDocument {
    pub text: String,
    pub format: CaptionFormat,
}

impl TranscriptDocument {
    pub fn new(text: impl Into<String>, format: CaptionFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Read a caption artifact, inferring the format from its extension
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(CaptionFormat::from_extension)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unsupported caption format: {}", path.display()),
                )
            })?;

        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self { text, format })
    }

    pub fn clean(&self) -> CleanTranscript {
        CleanTranscript(clean(&self.text))
    }
}

/// Normalized prose: no headers, markup or timestamps; single-spaced and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanTranscript(String);

impl CleanTranscript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CleanTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn a raw WebVTT caption track into one line of prose.
///
/// The passes run in a fixed order: header lines are dropped first, then
/// inline tags, cue timing ranges and positioning directives are removed,
/// and finally whitespace is collapsed and trimmed. Malformed input is never
/// an error; whatever cannot be recognized passes through collapsed.
pub fn clean(raw: &str) -> String {
    let mut lines: Vec<&str> = LINE_BREAK_REGEX.split(raw).collect();

    // Each header check looks at whatever line is first after the previous drop
    for tag in [SIGNATURE, KIND_TAG, LANGUAGE_TAG] {
        if lines.first().is_some_and(|line| line.starts_with(tag)) {
            lines.remove(0);
        }
    }

    let text = lines.join("\n");
    let text = TAG_REGEX.replace_all(&text, "");
    let text = CUE_TIMING_REGEX.replace_all(&text, "");
    let text = POSITION_REGEX.replace_all(&text, "");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");

    text.trim_matches(is_separator).to_string()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:01.000 --> 00:00:02.000 align:start position:0%\nHello <c>world</c>\n";

    #[test]
    fn test_clean_full_track() {
        assert_eq!(clean(SAMPLE), "Hello world");
    }

    #[test]
    fn test_clean_is_deterministic() {
        assert_eq!(clean(SAMPLE), clean(SAMPLE));
    }

    #[test]
    fn test_clean_idempotent_on_clean_text() {
        let once = clean(SAMPLE);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_missing_kind_line() {
        let raw = "WEBVTT\nLanguage: en\n\n00:00:01.000 --> 00:00:02.000\nbody text\n";
        assert_eq!(clean(raw), "body text");
    }

    #[test]
    fn test_header_checks_follow_current_first_line() {
        // No signature, but Kind: and Language: still lead the document
        let raw = "Kind: captions\nLanguage: en\nfirst words";
        assert_eq!(clean(raw), "first words");
    }

    #[test]
    fn test_header_tag_not_at_start_is_kept() {
        let raw = "WEBVTT\nintro\nKind: of magic";
        assert_eq!(clean(raw), "intro Kind: of magic");
    }

    #[test]
    fn test_multiple_cues_with_inline_timing() {
        let raw = "WEBVTT\nKind: captions\nLanguage: en\n\n\
            00:00:00.160 --> 00:00:02.869 align:start position:0%\n\
            \n\
            so<00:00:00.560><c> today</c><00:00:01.040><c> we</c>\n\
            \n\
            00:00:02.869 --> 00:00:02.879 align:start position:0%\n\
            so today we\n";
        assert_eq!(clean(raw), "so today we so today we");
    }

    #[test]
    fn test_output_has_no_removable_patterns() {
        let raw = "  <b>a</b>\t\t00:10:00.000 --> 00:10:01.500\n\n align:start position:42%  b <i>c</i>  ";
        let out = clean(raw);
        assert_eq!(out, "a b c");
        assert!(!TAG_REGEX.is_match(&out));
        assert!(!CUE_TIMING_REGEX.is_match(&out));
        assert!(!POSITION_REGEX.is_match(&out));
        assert!(!out.contains("  "));
        assert_eq!(out, out.trim());
    }

    #[test]
    fn test_timing_requires_fixed_width() {
        // Single-digit hour fields are not cue timings
        let raw = "0:00:01.000 --> 0:00:02.000 text";
        assert_eq!(clean(raw), "0:00:01.000 --> 0:00:02.000 text");
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("WEBVTT\nKind: captions\nLanguage: en\n"), "");
    }

    #[test]
    fn test_windows_line_endings() {
        let raw = "WEBVTT\r\nKind: captions\r\nLanguage: en\r\n\r\nline one\r\nline two\r\n";
        assert_eq!(clean(raw), "line one line two");
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let raw = "WEBVTT\rKind: captions\rLanguage: en\r\r00:00:01.000 --> 00:00:02.000\rHello world\r";
        assert_eq!(clean(raw), "Hello world");
    }

    #[test]
    fn test_unicode_line_separators_split_header() {
        let raw = "WEBVTT\u{2028}Kind: captions\u{85}Language: en\x0cbody";
        assert_eq!(clean(raw), "body");
    }

    #[test]
    fn test_information_separators_collapse() {
        assert_eq!(clean("Hello\u{1c}\u{1c}world"), "Hello world");
        assert_eq!(clean("\u{1f} edge \u{1f}"), "edge");
    }

    #[tokio::test]
    async fn test_read_rejects_unknown_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("file.en.srt");
        std::fs::write(&path, "1\n00:00:01,000 --> 00:00:02,000\nhi\n").unwrap();

        let err = TranscriptDocument::read(&path).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

        let vtt = tmp.path().join("file.en.vtt");
        std::fs::write(&vtt, "WEBVTT\n\nhi").unwrap();
        let doc = TranscriptDocument::read(&vtt).await.unwrap();
        assert_eq!(doc.format, CaptionFormat::WebVtt);
    }

    #[test]
    fn test_document_clean_wraps_result() {
        let doc = TranscriptDocument::new(SAMPLE, CaptionFormat::WebVtt);
        let cleaned = doc.clean();
        assert_eq!(cleaned.as_str(), "Hello world");
        assert_eq!(cleaned.to_string(), "Hello world");
    }

    #[test]
    fn test_caption_format_extension() {
        assert_eq!(CaptionFormat::from_extension("VTT"), Some(CaptionFormat::WebVtt));
        assert_eq!(CaptionFormat::from_extension("srt"), None);
        assert_eq!(CaptionFormat::WebVtt.extension(), "vtt");
    }
}
