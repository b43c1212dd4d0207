use crate::block::Span;
use crate::metrics::FontMetrics;

/// Run of same-weight text on a wrapped line
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
    /// Horizontal offset from the start of the line, in millimetres
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub segments: Vec<Segment>,
    pub width: f64,
}

impl Line {
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, metrics: &FontMetrics, text: &str, bold: bool, size: f64) {
        let width = metrics.text_width(text, size, bold);
        match self.segments.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                bold,
                offset: self.width,
            }),
        }
        self.width += width;
    }
}

/// Piece of a span, either all whitespace or all non-whitespace
#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    text: &'a str,
    bold: bool,
}

/// A word and the whitespace that precedes it. A word may cross bold boundaries.
#[derive(Debug, Default)]
struct Word<'a> {
    gap: Vec<Piece<'a>>,
    body: Vec<Piece<'a>>,
}

fn pieces_width(metrics: &FontMetrics, pieces: &[Piece<'_>], size: f64) -> f64 {
    pieces
        .iter()
        .map(|p| metrics.text_width(p.text, size, p.bold))
        .sum()
}

fn words<'a>(spans: &[Span<'a>], force_bold: bool) -> Vec<Word<'a>> {
    let mut words = Vec::new();
    let mut current = Word::default();

    for span in spans {
        let bold = span.bold || force_bold;
        let mut rest = span.text;
        while let Some(first) = rest.chars().next() {
            let is_space = first.is_whitespace();
            let end = rest
                .find(|c: char| c.is_whitespace() != is_space)
                .unwrap_or(rest.len());
            let piece = Piece {
                text: &rest[..end],
                bold,
            };
            if is_space {
                if !current.body.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                current.gap.push(piece);
            } else {
                current.body.push(piece);
            }
            rest = &rest[end..];
        }
    }

    if !current.body.is_empty() || !current.gap.is_empty() {
        words.push(current);
    }
    words
}

/// Greedily wrap spans to `max_width` millimetres, measured with `metrics`.
///
/// Whitespace before a wrapped word is dropped. A word wider than the line is
/// broken between characters. Always returns at least one line.
pub fn wrap(
    metrics: &FontMetrics,
    spans: &[Span<'_>],
    size: f64,
    force_bold: bool,
    max_width: f64,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for word in words(spans, force_bold) {
        let gap = pieces_width(metrics, &word.gap, size);
        let body = pieces_width(metrics, &word.body, size);

        // Leading whitespace is kept only at the very start of the text
        let at_start = lines.is_empty() && line.is_empty();
        if at_start || (!line.is_empty() && line.width + gap + body <= max_width) {
            for piece in &word.gap {
                line.push(metrics, piece.text, piece.bold, size);
            }
        } else if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        if line.width + body <= max_width {
            for piece in &word.body {
                line.push(metrics, piece.text, piece.bold, size);
            }
            continue;
        }

        for piece in &word.body {
            for (index, ch) in piece.text.char_indices() {
                let glyph = &piece.text[index..index + ch.len_utf8()];
                let width = metrics.text_width(glyph, size, piece.bold);
                if !line.is_empty() && line.width + width > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(metrics, glyph, piece.bold, size);
            }
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
