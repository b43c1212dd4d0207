use std::sync::OnceLock;

use regex::Regex;

use crate::block::Span;

/// Non-greedy `**...**` pair. The first closing marker wins, so bold never nests.
pub(crate) fn bold_regex() -> &'static Regex {
    static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
    BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"))
}

/// Split block text into plain and bold spans.
///
/// Text outside a complete delimiter pair, including a stray `**`, stays in a
/// plain span. A pair with nothing between the markers yields no span.
pub fn spans(text: &str) -> Vec<Span<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;

    for caps in bold_regex().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > pos {
            out.push(Span::plain(&text[pos..whole.start()]));
        }
        if !inner.is_empty() {
            out.push(Span::bold(inner.as_str()));
        }
        pos = whole.end();
    }

    if pos < text.len() {
        out.push(Span::plain(&text[pos..]));
    }
    out
}

/// Visible text of a block with bold markers removed
pub fn plain_text(text: &str) -> String {
    spans(text).iter().map(|span| span.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn splits_bold_from_plain() {
        assert_eq!(
            spans("Some **bold** text"),
            vec![
                Span::plain("Some "),
                Span::bold("bold"),
                Span::plain(" text")
            ]
        );
    }

    #[rstest]
    #[case("no markers", vec![Span::plain("no markers")])]
    #[case("**all bold**", vec![Span::bold("all bold")])]
    #[case("**a** and **b**", vec![Span::bold("a"), Span::plain(" and "), Span::bold("b")])]
    #[case("stray ** marker", vec![Span::plain("stray ** marker")])]
    #[case("**open **close** tail**", vec![Span::bold("open "), Span::plain("close"), Span::bold(" tail")])]
    #[case("** **", vec![Span::bold(" ")])]
    #[case("x****y", vec![Span::plain("x"), Span::plain("y")])]
    #[case("***", vec![Span::plain("***")])]
    #[case("", vec![])]
    fn resolves_spans(#[case] text: &str, #[case] expected: Vec<Span>) {
        assert_eq!(spans(text), expected);
    }

    #[test]
    fn plain_text_drops_markers() {
        assert_eq!(plain_text("a **b** c **"), "a b c **");
    }

    /// Pair each `**` with the next one, left to right. Returns the text with
    /// paired markers removed and the non-empty bold contents.
    fn scan_pairs(text: &str) -> (String, Vec<String>) {
        let mut visible = String::new();
        let mut bold = Vec::new();
        let mut rest = text;
        while let Some(open) = rest.find("**") {
            let Some(close) = rest[open + 2..].find("**") else {
                break;
            };
            let inner = &rest[open + 2..open + 2 + close];
            visible.push_str(&rest[..open]);
            visible.push_str(inner);
            if !inner.is_empty() {
                bold.push(inner.to_string());
            }
            rest = &rest[open + 2 + close + 2..];
        }
        visible.push_str(rest);
        (visible, bold)
    }

    #[test]
    fn scan_pairs_matches_known_cases() {
        assert_eq!(
            scan_pairs("**open **close** tail**"),
            ("open close tail".to_string(), vec!["open ".to_string(), " tail".to_string()])
        );
        assert_eq!(scan_pairs("a ** b"), ("a ** b".to_string(), vec![]));
    }

    proptest! {
        #[test]
        fn spans_agree_with_pairwise_scan(text in "[a* ]{0,40}") {
            let resolved = spans(&text);
            let (visible, bold) = scan_pairs(&text);

            let joined: String = resolved.iter().map(|s| s.text).collect();
            prop_assert_eq!(joined, visible);

            let resolved_bold: Vec<String> = resolved
                .iter()
                .filter(|s| s.bold)
                .map(|s| s.text.to_string())
                .collect();
            prop_assert_eq!(resolved_bold, bold);
        }

        #[test]
        fn bold_spans_never_contain_markers(text in "[a* ]{0,40}") {
            for span in spans(&text).iter().filter(|s| s.bold) {
                prop_assert!(!span.text.contains("**"));
            }
        }
    }
}
