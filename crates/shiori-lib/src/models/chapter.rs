use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NUMBER_PREFIX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").ok());

/// A chapter entry as it comes out of a provider feed.
///
/// `chapter` is the provider's label and is not guaranteed to be numeric or
/// unique, translations of the same chapter share a label.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChapterRecord {
    pub id: String,
    pub chapter: Option<String>,
}

impl ChapterRecord {
    pub fn new(id: impl Into<String>, chapter: Option<&str>) -> Self {
        Self {
            id: id.into(),
            chapter: chapter.map(str::to_string),
        }
    }

    /// Numeric value of the chapter label, `None` when absent or not a number
    pub fn number(&self) -> Option<f64> {
        self.chapter.as_deref().and_then(parse_chapter_number)
    }
}

/// Parse a chapter label into a finite number.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12.5"` is 12.5 and `"12a"` is 12. Labels without a numeric prefix, or
/// that overflow to infinity, yield `None`.
pub fn parse_chapter_number(label: &str) -> Option<f64> {
    let label = label.trim_start();
    let prefix = NUMBER_PREFIX
        .as_ref()?
        .find(label)
        .ok()
        .flatten()?
        .as_str();

    prefix.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_chapter_number() {
        assert_eq!(parse_chapter_number("10"), Some(10.0));
        assert_eq!(parse_chapter_number("10.5"), Some(10.5));
        assert_eq!(parse_chapter_number("  7"), Some(7.0));
        assert_eq!(parse_chapter_number(".5"), Some(0.5));
        assert_eq!(parse_chapter_number("-1"), Some(-1.0));
        assert_eq!(parse_chapter_number("1e2"), Some(100.0));
    }

    #[test]
    fn test_parse_chapter_number_prefix() {
        assert_eq!(parse_chapter_number("12a"), Some(12.0));
        assert_eq!(parse_chapter_number("3.5 (extra)"), Some(3.5));
        assert_eq!(parse_chapter_number("4."), Some(4.0));
    }

    #[test]
    fn test_parse_chapter_number_invalid() {
        assert_eq!(parse_chapter_number(""), None);
        assert_eq!(parse_chapter_number("abc"), None);
        assert_eq!(parse_chapter_number("ch. 5"), None);
        assert_eq!(parse_chapter_number("."), None);
        assert_eq!(parse_chapter_number("Infinity"), None);
        assert_eq!(parse_chapter_number("NaN"), None);
        assert_eq!(parse_chapter_number("1e999"), None);
    }

    #[test]
    fn test_record_number() {
        assert_eq!(ChapterRecord::new("a", Some("42")).number(), Some(42.0));
        assert_eq!(ChapterRecord::new("b", None).number(), None);
        assert_eq!(ChapterRecord::new("c", Some("oneshot")).number(), None);
    }
}
