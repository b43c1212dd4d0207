//! Lay blocks out on fixed-size pages as absolutely positioned draw commands.
//!
//! The page-break check runs once per block, before it is drawn. A block
//! taller than a whole page is drawn past the bottom margin rather than split.

use crate::block::{Block, BlockKind, Span};
use crate::config::PageConfig;
use crate::inline::spans;
use crate::metrics::FontMetrics;
use crate::wrap::wrap;

/// Vertical space claimed by a blank line, and by each half of a rule
const SPACING: f64 = 5.0;
const LIST_INDENT: f64 = 5.0;
const BULLET: &str = "\u{2022} ";

/// Drawing command with coordinates in millimetres from the page's top-left
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline
    Text {
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        text: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedDocument {
    pub width_mm: f64,
    pub height_mm: f64,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    /// Font size in points
    size: f64,
    line_height: f64,
    spacing_after: f64,
    bold: bool,
    indent: f64,
}

impl TextStyle {
    fn for_kind(kind: BlockKind) -> Option<Self> {
        let body = TextStyle {
            size: 10.0,
            line_height: 4.5,
            spacing_after: SPACING / 2.0,
            bold: false,
            indent: 0.0,
        };
        let heading = |size, line_height| TextStyle {
            size,
            line_height,
            spacing_after: SPACING,
            bold: true,
            indent: 0.0,
        };

        match kind {
            BlockKind::Heading(1) => Some(heading(20.0, 8.0)),
            BlockKind::Heading(2) => Some(heading(16.0, 6.5)),
            BlockKind::Heading(3) => Some(heading(14.0, 5.5)),
            BlockKind::Heading(_) => Some(heading(12.0, 5.0)),
            BlockKind::ListItem => Some(TextStyle {
                spacing_after: 0.0,
                indent: LIST_INDENT,
                ..body
            }),
            BlockKind::Paragraph => Some(body),
            BlockKind::Rule | BlockKind::Blank => None,
        }
    }
}

struct Cursor<'c> {
    page: &'c PageConfig,
    metrics: &'c FontMetrics,
    pages: Vec<Page>,
    y: f64,
}

impl<'c> Cursor<'c> {
    fn new(page: &'c PageConfig, metrics: &'c FontMetrics) -> Self {
        Self {
            page,
            metrics,
            pages: vec![Page::default()],
            y: page.margin_mm,
        }
    }

    /// Start a new page if `height` does not fit below the cursor. A page the
    /// cursor has not moved on is never abandoned.
    fn reserve(&mut self, height: f64) {
        let bottom = self.page.height_mm - self.page.margin_mm;
        if self.y + height > bottom && self.y > self.page.margin_mm {
            log::debug!(
                "page break before {height:.1}mm block at y={:.1}mm (page {})",
                self.y,
                self.pages.len()
            );
            self.pages.push(Page::default());
            self.y = self.page.margin_mm;
        }
    }

    fn draw(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text_block(&mut self, style: TextStyle, content: &[Span<'_>]) {
        let x = self.page.margin_mm + style.indent;
        let width = self.page.usable_width() - style.indent;
        let lines = wrap(self.metrics, content, style.size, style.bold, width);

        self.reserve(lines.len() as f64 * style.line_height);

        for (index, line) in lines.iter().enumerate() {
            let y = self.y + index as f64 * style.line_height;
            for segment in &line.segments {
                self.draw(DrawOp::Text {
                    x: x + segment.offset,
                    y,
                    size: style.size,
                    bold: segment.bold,
                    text: segment.text.clone(),
                });
            }
        }

        self.y += lines.len() as f64 * style.line_height + style.spacing_after;
    }

    fn rule(&mut self) {
        self.reserve(SPACING * 2.0);
        self.y += SPACING;
        let x1 = self.page.margin_mm;
        self.draw(DrawOp::Line {
            x1,
            y1: self.y,
            x2: x1 + self.page.usable_width(),
            y2: self.y,
        });
        self.y += SPACING;
    }

    fn blank(&mut self) {
        self.reserve(SPACING);
        self.y += SPACING;
    }
}

/// Lay out blocks on pages of the configured geometry, breaking lines with
/// the widths of the faces in `metrics`.
pub fn paginate<'a>(
    blocks: impl IntoIterator<Item = Block<'a>>,
    page: &PageConfig,
    metrics: &FontMetrics,
) -> PaginatedDocument {
    let mut cursor = Cursor::new(page, metrics);

    for block in blocks {
        match (block.kind, TextStyle::for_kind(block.kind)) {
            (BlockKind::ListItem, Some(style)) => {
                let mut content = vec![Span::plain(BULLET)];
                content.extend(spans(block.text));
                cursor.text_block(style, &content);
            }
            (_, Some(style)) => cursor.text_block(style, &spans(block.text)),
            (BlockKind::Rule, None) => cursor.rule(),
            (_, None) => cursor.blank(),
        }
    }

    PaginatedDocument {
        width_mm: page.width_mm,
        height_mm: page.height_mm,
        pages: cursor.pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_FAMILY;
    use crate::parser::segment;
    use pretty_assertions::assert_eq;

    fn metrics() -> FontMetrics {
        FontMetrics::load(DEFAULT_FAMILY).expect("bundled family")
    }

    fn layout(markdown: &str) -> PaginatedDocument {
        paginate(segment(markdown), &PageConfig::default(), &metrics())
    }

    fn texts(page: &Page) -> Vec<(f64, f64, &str)> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                DrawOp::Line { .. } => None,
            })
            .collect()
    }

    #[test]
    fn lays_out_blocks_top_down() {
        let doc = layout("# Title\nBody text\n- item\n---\n\nEnd");
        assert_eq!(doc.pages.len(), 1);

        let page = &doc.pages[0];
        // heading advances 8+5, body 4.5+2.5, list 4.5, rule 5 then 5, blank 5
        assert_eq!(
            texts(page),
            vec![
                (15.0, 15.0, "Title"),
                (15.0, 28.0, "Body text"),
                (20.0, 35.0, "\u{2022} item"),
                (15.0, 54.5, "End"),
            ]
        );
        assert!(page.ops.contains(&DrawOp::Line {
            x1: 15.0,
            y1: 44.5,
            x2: 195.0,
            y2: 44.5
        }));
    }

    #[test]
    fn headings_are_bold_and_sized_by_level() {
        let doc = layout("# A\n## B\n### C\n#### D\nbody");
        let sizes: Vec<_> = doc.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { size, bold, .. } => Some((*size, *bold)),
                DrawOp::Line { .. } => None,
            })
            .collect();
        assert_eq!(
            sizes,
            vec![
                (20.0, true),
                (16.0, true),
                (14.0, true),
                (12.0, true),
                (10.0, false)
            ]
        );
    }

    #[test]
    fn bold_spans_drawn_bold() {
        let doc = layout("Some **bold** text");
        let bolds: Vec<_> = doc.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { bold, text, .. } => Some((text.as_str(), *bold)),
                DrawOp::Line { .. } => None,
            })
            .collect();
        assert_eq!(
            bolds,
            vec![("Some ", false), ("bold", true), (" text", false)]
        );
    }

    #[test]
    fn segments_sit_where_the_rendered_prefix_ends() {
        let metrics = metrics();
        let doc = layout("Some **bold** text");
        let xs: Vec<_> = texts(&doc.pages[0]).iter().map(|(x, _, _)| *x).collect();

        let some = metrics.text_width("Some", 10.0, false) + metrics.text_width(" ", 10.0, false);
        let bold = metrics.text_width("bold", 10.0, true);
        assert_eq!(xs.len(), 3);
        assert!((xs[1] - (15.0 + some)).abs() < 1e-9);
        assert!((xs[2] - (15.0 + some + bold)).abs() < 1e-9);
    }

    #[test]
    fn tall_paragraph_breaks_once_before_drawing() {
        // 35 short paragraphs at 7mm each leave the cursor at 260mm
        let mut markdown = "line\n".repeat(35);
        let long = "word ".repeat(200);
        markdown.push_str(&long);

        let doc = layout(&markdown);
        assert_eq!(doc.pages.len(), 2);

        let second = texts(&doc.pages[1]);
        assert!(!second.is_empty());
        // every line of the long paragraph is on the new page, starting at the margin
        assert_eq!(second[0].1, 15.0);
        assert!(texts(&doc.pages[0]).iter().all(|(_, _, t)| *t == "line"));
    }

    #[test]
    fn block_taller_than_page_overflows_without_split() {
        let long = "word ".repeat(5000);
        let doc = layout(&long);
        assert_eq!(doc.pages.len(), 1);

        let last_y = texts(&doc.pages[0])
            .last()
            .map(|(_, y, _)| *y)
            .unwrap_or_default();
        assert!(last_y > 297.0);
    }

    #[test]
    fn blank_advances_without_drawing() {
        let doc = layout("\n\nText");
        assert_eq!(texts(&doc.pages[0]), vec![(15.0, 25.0, "Text")]);
    }

    #[test]
    fn custom_page_geometry() {
        let page = PageConfig {
            width_mm: 100.0,
            height_mm: 40.0,
            margin_mm: 10.0,
        };
        let doc = paginate(segment("one\ntwo\nthree\nfour\nfive"), &page, &metrics());
        // each paragraph takes 7mm; bottom at 30mm
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.width_mm, 100.0);
        assert_eq!(texts(&doc.pages[1])[0], (10.0, 10.0, "four"));
    }
}
