mod block;
mod config;
mod docx;
mod elements;
mod error;
mod export;
mod generate;
mod inline;
mod listing;
mod metrics;
mod paginate;
mod parser;
mod plain;
mod sink;
mod typst;
mod wrap;

pub use block::{Block, BlockKind, Group, Span};
pub use config::{Config, ExportConfig, FontConfig, GenerationConfig, PageConfig};
pub use docx::{Paragraph, ParagraphStyle, Run, WordDocument};
pub use elements::{Element, to_html};
pub use error::{BatchError, ConfigError, ExportError, GenerationError};
pub use export::{
    ARCHIVE_NAME, ExportFormat, bundle, bundle_with, listing_filename, product_bytes,
    product_filename,
};
pub use generate::{ContentGenerator, generate_batch, ideas, resolve_credential};
pub use inline::{plain_text, spans};
pub use listing::{GeneratedContent, Listing, split_tags};
pub use metrics::{DEFAULT_FAMILY, FontMetrics};
pub use paginate::{DrawOp, Page, PaginatedDocument};
pub use parser::{Blocks, classify, group, segment};
pub use plain::{slugify, strip_markdown};
pub use sink::{DirectorySink, DownloadSink};
pub use wrap::{Line, Segment, wrap};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block<'_>> {
    segment(markdown).collect()
}

/// Build the on-screen display tree.
pub fn markdown_to_elements(markdown: &str) -> Vec<Element<'_>> {
    elements::render(segment(markdown))
}

/// Render markdown as an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    to_html(&markdown_to_elements(markdown))
}

/// Build the word-processor document model.
pub fn markdown_to_document(markdown: &str) -> WordDocument {
    docx::build(segment(markdown))
}

/// Convert markdown to `.docx` bytes.
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>, ExportError> {
    markdown_to_document(markdown).to_bytes()
}

/// Lay markdown out on pages, measuring text with `metrics`.
pub fn markdown_to_layout(
    markdown: &str,
    page: &PageConfig,
    metrics: &FontMetrics,
) -> PaginatedDocument {
    paginate::paginate(segment(markdown), page, metrics)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> Result<String, ExportError> {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(
    markdown: &str,
    config: &Config,
) -> Result<String, ExportError> {
    let metrics = FontMetrics::load(&config.font.family)?;
    Ok(layout_to_typst(markdown, config, &metrics))
}

fn layout_to_typst(markdown: &str, config: &Config, metrics: &FontMetrics) -> String {
    let layout = markdown_to_layout(markdown, &config.page, metrics);
    log::debug!("laid out {} pages", layout.pages.len());
    typst::document_to_typst(&layout, metrics)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, ExportError> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Compile markdown to a Typst document.
fn compile_document(
    markdown: &str,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument, ExportError> {
    let metrics = FontMetrics::load(&config.font.family)?;
    let typst_content = layout_to_typst(markdown, config, &metrics);

    // Embedded fonts only cover glyphs the measured faces lack
    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .fonts(metrics.faces())
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| ExportError::Compile(format!("{:?}", e)))
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    let doc = compile_document(markdown, config)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}

/// Result of rendering markdown to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Convert markdown to SVG pages using default config.
pub fn markdown_to_svg(markdown: &str) -> Result<SvgDocument, ExportError> {
    markdown_to_svg_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to SVG pages with custom config.
pub fn markdown_to_svg_with_config(
    markdown: &str,
    config: &Config,
) -> Result<SvgDocument, ExportError> {
    let doc = compile_document(markdown, config)?;

    let pages: Vec<String> = doc.pages.iter().map(typst_svg::svg).collect();

    // Every page shares the configured geometry
    let (width_pt, height_pt) = match doc.pages.first() {
        Some(first_page) => {
            let size = first_page.frame.size();
            (size.x.to_pt(), size.y.to_pt())
        }
        None => (
            config.page.width_mm / metrics::PT_TO_MM,
            config.page.height_mm / metrics::PT_TO_MM,
        ),
    };

    Ok(SvgDocument {
        pages,
        width_pt,
        height_pt,
    })
}
