//! Word-processor document model and `.docx` packaging.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::block::{Block, BlockKind, Group};
use crate::error::ExportError;
use crate::inline::spans;
use crate::parser::group;

const BULLET_NUM_ID: u32 = 1;

/// Paragraph style applied in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Heading(u8),
    Bullet,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn empty() -> Self {
        Self {
            style: ParagraphStyle::Body,
            runs: Vec::new(),
        }
    }

    fn from_text(style: ParagraphStyle, text: &str) -> Self {
        let runs = spans(text)
            .into_iter()
            .map(|span| Run {
                text: span.text.to_string(),
                bold: span.bold,
            })
            .collect();
        Self { style, runs }
    }
}

/// A single-section document. Never empty: building from no content yields one
/// empty paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDocument {
    pub paragraphs: Vec<Paragraph>,
}

/// Build the document model from blocks.
pub fn build<'a>(blocks: impl IntoIterator<Item = Block<'a>>) -> WordDocument {
    let mut paragraphs = Vec::new();

    for group in group(blocks) {
        match group {
            Group::List(items) => paragraphs.extend(
                items
                    .into_iter()
                    .map(|item| Paragraph::from_text(ParagraphStyle::Bullet, item)),
            ),
            Group::Single(block) => match block.kind {
                BlockKind::Heading(level) => paragraphs.push(Paragraph::from_text(
                    ParagraphStyle::Heading(level),
                    block.text,
                )),
                BlockKind::Paragraph => {
                    paragraphs.push(Paragraph::from_text(ParagraphStyle::Body, block.text))
                }
                BlockKind::Rule => paragraphs.push(Paragraph::empty()),
                BlockKind::ListItem | BlockKind::Blank => {}
            },
        }
    }

    if paragraphs.is_empty() {
        paragraphs.push(Paragraph::empty());
    }
    WordDocument { paragraphs }
}

impl WordDocument {
    /// Package the document as `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
            ("word/document.xml", self.document_xml()),
            ("word/styles.xml", styles_xml()),
            ("word/numbering.xml", NUMBERING_XML.to_string()),
        ];

        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn document_xml(&self) -> String {
        let mut xml = String::with_capacity(4096 + self.paragraphs.len() * 128);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
        xml.push_str("<w:body>");

        for paragraph in &self.paragraphs {
            paragraph_xml(paragraph, &mut xml);
        }

        // A4 portrait in twentieths of a point, 1440 = one inch margins
        xml.push_str(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#);
        xml.push_str(r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#);
        xml.push_str("</w:sectPr></w:body></w:document>");
        xml
    }
}

fn paragraph_xml(paragraph: &Paragraph, xml: &mut String) {
    xml.push_str("<w:p>");

    match paragraph.style {
        ParagraphStyle::Heading(level) => {
            xml.push_str(&format!(r#"<w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr>"#));
        }
        ParagraphStyle::Bullet => {
            xml.push_str(&format!(
                r#"<w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{BULLET_NUM_ID}"/></w:numPr></w:pPr>"#
            ));
        }
        ParagraphStyle::Body => {}
    }

    for run in &paragraph.runs {
        xml.push_str("<w:r>");
        if run.bold {
            xml.push_str("<w:rPr><w:b/><w:bCs/></w:rPr>");
        }
        xml.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape(run.text.as_str())
        ));
        xml.push_str("</w:r>");
    }

    xml.push_str("</w:p>");
}

/// Heading sizes in half-points, level 1 first
const HEADING_SIZES: [u32; 4] = [32, 26, 24, 22];

fn styles_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#);
    xml.push_str(r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#);
    xml.push_str("</w:rPr></w:rPrDefault>");
    xml.push_str(r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#);
    xml.push_str("</w:docDefaults>");

    xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);

    for (index, size) in HEADING_SIZES.iter().enumerate() {
        let level = index + 1;
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{index}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#
        ));
    }

    xml.push_str(r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="720"/><w:contextualSpacing/></w:pPr></w:style>"#);
    xml.push_str("</w:styles>");
    xml
}

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#,
    r#"</Relationships>"#
);

const NUMBERING_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="hybridMultilevel"/>"#,
    r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/>"#,
    r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>"#,
    r#"</w:abstractNum>"#,
    r#"<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#,
    r#"</w:numbering>"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::segment;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn run(text: &str, bold: bool) -> Run {
        Run {
            text: text.to_string(),
            bold,
        }
    }

    #[test]
    fn builds_styled_paragraphs() {
        let doc = build(segment("## Intro\n**Key** point\n- one\n- two\n---\n\n#### Small"));
        assert_eq!(
            doc.paragraphs,
            vec![
                Paragraph {
                    style: ParagraphStyle::Heading(2),
                    runs: vec![run("Intro", false)]
                },
                Paragraph {
                    style: ParagraphStyle::Body,
                    runs: vec![run("Key", true), run(" point", false)]
                },
                Paragraph {
                    style: ParagraphStyle::Bullet,
                    runs: vec![run("one", false)]
                },
                Paragraph {
                    style: ParagraphStyle::Bullet,
                    runs: vec![run("two", false)]
                },
                Paragraph::empty(),
                Paragraph {
                    style: ParagraphStyle::Heading(4),
                    runs: vec![run("Small", false)]
                },
            ]
        );
    }

    #[test]
    fn empty_input_still_has_one_paragraph() {
        assert_eq!(build(segment("\n \n")).paragraphs, vec![Paragraph::empty()]);
        assert_eq!(build(Vec::new()).paragraphs, vec![Paragraph::empty()]);
    }

    #[test]
    fn package_contains_document_parts() {
        let bytes = build(segment("# T & C\n- <item>"))
            .to_bytes()
            .expect("docx packaging");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/styles.xml",
            "word/numbering.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part")
            .read_to_string(&mut document)
            .expect("utf-8 document");
        assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(document.contains("T &amp; C"));
        assert!(document.contains("&lt;item&gt;"));
        assert!(document.contains(r#"<w:numId w:val="1"/>"#));
    }

    #[test]
    fn styles_define_every_heading_level() {
        let styles = styles_xml();
        for (level, size) in [(1, 32), (2, 26), (3, 24), (4, 22)] {
            assert!(styles.contains(&format!(r#"w:styleId="Heading{level}""#)));
            assert!(styles.contains(&format!(
                r#"<w:outlineLvl w:val="{}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{size}"/>"#,
                level - 1
            )));
        }
        assert!(styles.contains(r#"w:styleId="ListParagraph""#));
    }
}
