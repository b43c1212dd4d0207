use crate::block::{Block, BlockKind, Group};

/// Line prefixes in match order. Longer heading markers must come first.
const PREFIXES: [(&str, BlockKind); 6] = [
    ("#### ", BlockKind::Heading(4)),
    ("### ", BlockKind::Heading(3)),
    ("## ", BlockKind::Heading(2)),
    ("# ", BlockKind::Heading(1)),
    ("- ", BlockKind::ListItem),
    ("* ", BlockKind::ListItem),
];

/// Segment markdown text into blocks.
///
/// The returned iterator borrows the input and can be cloned to walk the
/// document again from the current position.
pub fn segment(markdown: &str) -> Blocks<'_> {
    Blocks {
        lines: Lines {
            rest: Some(markdown),
        },
    }
}

/// Lazy block sequence over a source string
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    lines: Lines<'a>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(classify)
    }
}

/// Splits on `\n`, `\r\n` and lone `\r`. A trailing break yields a final empty line.
#[derive(Debug, Clone)]
struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match rest.find(['\r', '\n']) {
            Some(end) => {
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[end + width..]);
                Some(&rest[..end])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Classify one line. The line is trimmed once and the marker is cut from the
/// trimmed copy, so `#  Title` keeps the extra space in its text.
pub fn classify(line: &str) -> Block<'_> {
    let trimmed = line.trim();

    for (prefix, kind) in PREFIXES {
        if let Some(text) = trimmed.strip_prefix(prefix) {
            return Block::new(kind, text);
        }
    }

    if trimmed == "---" {
        Block::rule()
    } else if !trimmed.is_empty() {
        Block::paragraph(trimmed)
    } else {
        Block::blank()
    }
}

/// Collapse runs of list items into `Group::List`.
///
/// Every other block, `Blank` included, closes the pending run before it is
/// passed through as `Group::Single`.
pub fn group<'a>(blocks: impl IntoIterator<Item = Block<'a>>) -> Vec<Group<'a>> {
    let (pending, output) =
        blocks
            .into_iter()
            .fold((Vec::new(), Vec::new()), |(mut pending, output), block| {
                if block.kind == BlockKind::ListItem {
                    pending.push(block.text);
                    (pending, output)
                } else {
                    let (pending, mut output) = flush(pending, output);
                    output.push(Group::Single(block));
                    (pending, output)
                }
            });

    flush(pending, output).1
}

fn flush<'a>(
    pending: Vec<&'a str>,
    mut output: Vec<Group<'a>>,
) -> (Vec<&'a str>, Vec<Group<'a>>) {
    if pending.is_empty() {
        return (pending, output);
    }
    output.push(Group::List(pending));
    (Vec::new(), output)
}
