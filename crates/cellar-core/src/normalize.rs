use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const NON_BREAKING_SPACE: char = '\u{00A0}';

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;])").expect("valid regex"));
static SPACE_AFTER_OPEN_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s+").expect("valid regex"));
static SPACE_BEFORE_CLOSE_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\)").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

/// Final whitespace rule of the cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Any run of two or more whitespace characters becomes one space.
    CompactWhitespace,
    /// Runs of two or more newlines become one newline; other whitespace
    /// is left alone.
    CompactBlankLines,
}

/// Cleans up markup-conversion artifacts. The rules run in a fixed order
/// and the result is trimmed; applying it twice changes nothing.
pub fn normalize(text: &str, profile: Profile) -> String {
    let text = text.replace(NON_BREAKING_SPACE, " ");
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = SPACE_AFTER_OPEN_PAREN.replace_all(&text, "(");
    let text = SPACE_BEFORE_CLOSE_PAREN.replace_all(&text, ")");
    let text = text.trim();

    match profile {
        Profile::CompactWhitespace => WHITESPACE_RUN.replace_all(text, " ").into_owned(),
        Profile::CompactBlankLines => BLANK_LINES.replace_all(text, "\n").into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Hello  world .",
        "Article 3 ( 1 ) , point ( a ) ;",
        "a . . ,",
        "(\u{00A0}x\u{00A0})",
        "one\n\n\ntwo\n \nthree",
        "  lead\t\ttrail  \n",
        "( )",
        "x \n.\n\n(\n y \n)",
    ];

    #[test]
    fn test_non_breaking_spaces() {
        assert_eq!(
            normalize("Article\u{00A0}5\u{00A0}\u{00A0}text", Profile::CompactBlankLines),
            "Article 5  text"
        );
    }

    #[test]
    fn test_space_before_punctuation() {
        assert_eq!(
            normalize("one , two ; three .", Profile::CompactWhitespace),
            "one, two; three."
        );
        assert_eq!(normalize("end \t .", Profile::CompactBlankLines), "end.");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            normalize("Regulation ( EU ) No 575/2013", Profile::CompactWhitespace),
            "Regulation (EU) No 575/2013"
        );
    }

    #[test]
    fn test_compact_whitespace() {
        assert_eq!(
            normalize("a  b\n\nc\t\td", Profile::CompactWhitespace),
            "a b c d"
        );
        assert_eq!(normalize("a\nb", Profile::CompactWhitespace), "a\nb");
    }

    #[test]
    fn test_compact_blank_lines() {
        assert_eq!(
            normalize("a  b\n\n\nc\n\nd", Profile::CompactBlankLines),
            "a  b\nc\nd"
        );
    }

    #[test]
    fn test_profiles_differ() {
        let text = "first.\n\nsecond  part.";
        assert_ne!(
            normalize(text, Profile::CompactWhitespace),
            normalize(text, Profile::CompactBlankLines)
        );
    }

    #[test]
    fn test_trims() {
        assert_eq!(normalize("  \n text \n ", Profile::CompactBlankLines), "text");
    }

    #[test]
    fn test_idempotent() {
        for profile in [Profile::CompactWhitespace, Profile::CompactBlankLines] {
            for sample in SAMPLES {
                let once = normalize(sample, profile);
                assert_eq!(normalize(&once, profile), once, "{profile:?} {sample:?}");
            }
        }
    }

    #[test]
    fn test_nbsp_next_to_parenthesis() {
        for profile in [Profile::CompactWhitespace, Profile::CompactBlankLines] {
            assert_eq!(
                normalize("see (\u{00A0}annex\u{00A0})", profile),
                normalize("see ( annex )", profile)
            );
            assert_eq!(normalize("see (\u{00A0}annex\u{00A0})", profile), "see (annex)");
        }
    }
}
