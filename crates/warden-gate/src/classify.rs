//! Content classification from a bounded prefix.
//!
//! Quick binary detection using NUL byte scanning plus a non-text byte
//! ratio, with a language hint from the file extension. The classifier is
//! swappable behind the [`Classify`] trait without affecting the sandbox or
//! mutation logic.

use std::path::Path;

use memchr::memchr;
use serde::{Deserialize, Serialize};

/// How many bytes of the file are sniffed for classification.
pub const SNIFF_PREFIX_LEN: usize = 8192;

/// Fraction of non-text bytes above which a prefix is considered binary.
const NON_TEXT_RATIO_THRESHOLD: f32 = 0.30;

/// Broad content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    /// Decodable text content.
    Text,
    /// Binary content unsuitable for text mutation.
    Binary,
    /// Zero-length file.
    Empty,
}

/// Classification verdict for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Broad content category.
    pub category: ContentCategory,
    /// Whether text-mutating operations may read this content.
    pub readable: bool,
    /// Heuristic confidence in the verdict, 0.0..=1.0.
    pub confidence: f32,
    /// Language hint from the file extension, when recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'static str>,
}

/// A swappable content classifier.
///
/// The safety gate consumes this for its binary check; implementations may
/// be replaced without affecting sandbox or mutation logic.
pub trait Classify: Send + Sync {
    /// Classify a file from its path and a bounded content prefix.
    fn classify(&self, path: &Path, prefix: &[u8]) -> Classification;
}

/// Default classifier: NUL scan + non-text ratio + extension table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixClassifier;

impl Classify for PrefixClassifier {
    fn classify(&self, path: &Path, prefix: &[u8]) -> Classification {
        let language = language_hint(path);

        if prefix.is_empty() {
            return Classification {
                category: ContentCategory::Empty,
                readable: true,
                confidence: 1.0,
                language,
            };
        }

        let sample = &prefix[..prefix.len().min(SNIFF_PREFIX_LEN)];

        if memchr(0, sample).is_some() {
            return Classification {
                category: ContentCategory::Binary,
                readable: false,
                confidence: 0.99,
                language,
            };
        }

        let non_text = sample
            .iter()
            .filter(|&&b| b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
            .count();
        #[allow(clippy::cast_precision_loss)]
        let ratio = non_text as f32 / sample.len() as f32;

        if ratio > NON_TEXT_RATIO_THRESHOLD {
            Classification {
                category: ContentCategory::Binary,
                readable: false,
                confidence: 0.5 + ratio / 2.0,
                language,
            }
        } else {
            Classification {
                category: ContentCategory::Text,
                readable: true,
                confidence: 1.0 - ratio,
                language,
            }
        }
    }
}

/// Quick binary check over a content prefix.
///
/// Convenience wrapper for callers that only need the boolean.
#[must_use]
pub fn is_binary(prefix: &[u8]) -> bool {
    !PrefixClassifier.classify(Path::new(""), prefix).readable
}

/// Language hint from the file extension.
fn language_hint(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    let language = match ext {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "hpp" => "cpp",
        "rb" => "ruby",
        "sh" | "bash" => "shell",
        "md" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        _ => return None,
    };
    Some(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nul_byte_is_binary() {
        let c = PrefixClassifier.classify(Path::new("a.bin"), b"\x00\x01\x02\x03");
        assert_eq!(c.category, ContentCategory::Binary);
        assert!(!c.readable);
    }

    #[test]
    fn test_plain_text_is_readable() {
        let c = PrefixClassifier.classify(Path::new("a.txt"), b"hello world\n");
        assert_eq!(c.category, ContentCategory::Text);
        assert!(c.readable);
    }

    #[test]
    fn test_empty_prefix() {
        let c = PrefixClassifier.classify(Path::new("a.txt"), b"");
        assert_eq!(c.category, ContentCategory::Empty);
        assert!(c.readable);
    }

    #[test]
    fn test_control_byte_density_is_binary() {
        let mut content = vec![0x01u8; 60];
        content.extend_from_slice(b"some text tail");
        assert!(is_binary(&content));
    }

    #[test]
    fn test_utf8_multibyte_is_text() {
        let c = PrefixClassifier.classify(Path::new("a.txt"), "日本語テキスト".as_bytes());
        assert_eq!(c.category, ContentCategory::Text);
    }

    #[test]
    fn test_language_hint() {
        let c = PrefixClassifier.classify(Path::new("src/main.rs"), b"fn main() {}\n");
        assert_eq!(c.language, Some("rust"));
        let c = PrefixClassifier.classify(Path::new("noext"), b"text");
        assert_eq!(c.language, None);
    }
}
