use crate::block::{Block, BlockKind, Group, Span};
use crate::inline::spans;
use crate::parser::group;

/// Display node for on-screen presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    Heading { level: u8, content: Vec<Span<'a>> },
    List { items: Vec<Vec<Span<'a>>> },
    Paragraph { content: Vec<Span<'a>> },
    Rule,
}

/// Build the display tree. Blank lines only close list runs.
pub fn render<'a>(blocks: impl IntoIterator<Item = Block<'a>>) -> Vec<Element<'a>> {
    group(blocks)
        .into_iter()
        .filter_map(|group| match group {
            Group::List(items) => Some(Element::List {
                items: items.into_iter().map(spans).collect(),
            }),
            Group::Single(block) => element(block),
        })
        .collect()
}

fn element(block: Block<'_>) -> Option<Element<'_>> {
    match block.kind {
        BlockKind::Heading(level) => Some(Element::Heading {
            level,
            content: spans(block.text),
        }),
        BlockKind::Paragraph => Some(Element::Paragraph {
            content: spans(block.text),
        }),
        BlockKind::Rule => Some(Element::Rule),
        // list items arrive grouped
        BlockKind::ListItem | BlockKind::Blank => None,
    }
}

/// Serialize a display tree as an HTML fragment
pub fn to_html(elements: &[Element<'_>]) -> String {
    let mut out = String::new();

    for element in elements {
        match element {
            Element::Heading { level, content } => {
                out.push_str(&format!("<h{level}>"));
                spans_to_html(content, &mut out);
                out.push_str(&format!("</h{level}>"));
            }
            Element::List { items } => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    spans_to_html(item, &mut out);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Element::Paragraph { content } => {
                out.push_str("<p>");
                spans_to_html(content, &mut out);
                out.push_str("</p>");
            }
            Element::Rule => out.push_str("<hr />"),
        }
        out.push('\n');
    }

    out
}

fn spans_to_html(spans: &[Span<'_>], out: &mut String) {
    for span in spans {
        if span.bold {
            out.push_str("<strong>");
            html_escape::encode_double_quoted_attribute_to_string(span.text, out);
            out.push_str("</strong>");
        } else {
            html_escape::encode_double_quoted_attribute_to_string(span.text, out);
        }
    }
}
