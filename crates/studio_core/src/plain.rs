//! Unstyled text helpers: markdown stripping and filename slugs.

use std::sync::OnceLock;

use regex::Regex;

use crate::inline::bold_regex;

struct StripPatterns {
    headings: [Regex; 4],
    line_break: Regex,
}

fn strip_patterns() -> &'static StripPatterns {
    static PATTERNS: OnceLock<StripPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| StripPatterns {
        headings: [
            Regex::new(r"#### (.*)").expect("Invalid heading regex"),
            Regex::new(r"### (.*)").expect("Invalid heading regex"),
            Regex::new(r"## (.*)").expect("Invalid heading regex"),
            Regex::new(r"# (.*)").expect("Invalid heading regex"),
        ],
        line_break: Regex::new(r"\r\n|\n|\r").expect("Invalid line break regex"),
    })
}

fn strip_once(text: &str) -> String {
    let patterns = strip_patterns();
    let mut out = text.to_string();
    for heading in &patterns.headings {
        out = heading.replace_all(&out, "$1").into_owned();
    }
    out = bold_regex().replace_all(&out, "$1").into_owned();
    out = patterns.line_break.replace_all(&out, "\n").into_owned();
    out.trim().to_string()
}

/// Remove heading markers and bold delimiters, normalize line breaks and trim.
///
/// List markers and rule lines are left alone. Stripping repeats until the
/// text stops changing, so stripping twice is the same as stripping once.
pub fn strip_markdown(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Filename-safe slug: lowercase, whitespace runs to `-`, only ASCII word
/// characters and hyphens kept, repeated hyphens collapsed.
pub fn slugify(text: &str) -> String {
    static SLUG: OnceLock<[Regex; 3]> = OnceLock::new();
    let [whitespace, non_word, hyphens] = SLUG.get_or_init(|| {
        [
            Regex::new(r"\s+").expect("Invalid whitespace regex"),
            Regex::new(r"[^A-Za-z0-9_\-]+").expect("Invalid slug regex"),
            Regex::new(r"\-\-+").expect("Invalid hyphen regex"),
        ]
    });

    let lowered = text.to_lowercase();
    let slug = whitespace.replace_all(lowered.trim(), "-");
    let slug = non_word.replace_all(&slug, "");
    hyphens.replace_all(&slug, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title\nBody", "Title\nBody")]
    #[case("## **Bold** heading", "Bold heading")]
    #[case("#### four\r\n### three\rtwo", "four\nthree\ntwo")]
    #[case("- item stays\n---", "- item stays\n---")]
    #[case("  padded  \n\n", "padded")]
    #[case("a # b", "a b")]
    #[case("# # nested", "nested")]
    fn strips(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_markdown(input), expected);
    }

    #[rstest]
    #[case(
        "50 Social Media Post Ideas for Realtors!",
        "50-social-media-post-ideas-for-realtors"
    )]
    #[case("  Budget   Planner  ", "budget-planner")]
    #[case("Kids - Chore Chart", "kids-chore-chart")]
    #[case("Café Menu", "caf-menu")]
    #[case("snake_case idea", "snake_case-idea")]
    fn slugs(#[case] idea: &str, #[case] expected: &str) {
        assert_eq!(slugify(idea), expected);
    }

    proptest! {
        #[test]
        fn stripping_is_idempotent(text in "[#*\\-a \\r\\n]{0,60}") {
            let once = strip_markdown(&text);
            prop_assert_eq!(strip_markdown(&once), once);
        }

        #[test]
        fn slugs_are_filename_safe(idea in "\\PC{0,40}") {
            let slug = slugify(&idea);
            prop_assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
