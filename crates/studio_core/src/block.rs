use std::fmt;

/// Classification of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading level 1 through 4
    Heading(u8),
    ListItem,
    Rule,
    Paragraph,
    Blank,
}

/// One classified line of the document.
///
/// `text` borrows from the source with the leading marker removed. It is empty
/// for `Rule` and `Blank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub text: &'a str,
}

impl<'a> Block<'a> {
    pub fn new(kind: BlockKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    pub fn heading(level: u8, text: &'a str) -> Self {
        Self::new(BlockKind::Heading(level), text)
    }

    pub fn list_item(text: &'a str) -> Self {
        Self::new(BlockKind::ListItem, text)
    }

    pub fn paragraph(text: &'a str) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn rule() -> Self {
        Self::new(BlockKind::Rule, "")
    }

    pub fn blank() -> Self {
        Self::new(BlockKind::Blank, "")
    }
}

/// Writes the block back out as a single markdown line.
impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BlockKind::Heading(level) => {
                for _ in 0..level {
                    f.write_str("#")?;
                }
                write!(f, " {}", self.text)
            }
            BlockKind::ListItem => write!(f, "- {}", self.text),
            BlockKind::Rule => f.write_str("---"),
            BlockKind::Paragraph => f.write_str(self.text),
            BlockKind::Blank => Ok(()),
        }
    }
}

/// Inline run of text, either plain or bold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub bold: bool,
    pub text: &'a str,
}

impl<'a> Span<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { bold: false, text }
    }

    pub fn bold(text: &'a str) -> Self {
        Self { bold: true, text }
    }
}

/// A block after list grouping: consecutive list items collapse into one `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group<'a> {
    Single(Block<'a>),
    List(Vec<&'a str>),
}
