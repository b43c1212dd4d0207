use std::collections::HashSet;
use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::config::Config;
use crate::error::ExportError;
use crate::listing::GeneratedContent;
use crate::plain::slugify;

pub const ARCHIVE_NAME: &str = "etsy-product-studio-export.zip";
const LISTING_FILE: &str = "etsy-listing.txt";
const PRODUCT_STEM: &str = "product-content";

/// Format for long-form product content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Build the product document in the requested format.
pub fn product_bytes(
    markdown: &str,
    format: ExportFormat,
    config: &Config,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Docx => crate::markdown_to_docx(markdown),
        ExportFormat::Pdf => crate::markdown_to_pdf_with_config(markdown, config),
    }
}

/// Download name for a single listing export
pub fn listing_filename(idea: &str) -> String {
    format!("etsy-listing-{}.txt", slugify(idea))
}

/// Download name for a single product export
pub fn product_filename(idea: &str, format: ExportFormat) -> String {
    format!("{PRODUCT_STEM}-{}.{}", slugify(idea), format.extension())
}

/// Zip every result into one folder per idea.
///
/// A product document that cannot be built is logged and left out; the
/// listing text and every other result still go into the archive.
pub fn bundle(
    results: &[GeneratedContent],
    format: ExportFormat,
    config: &Config,
) -> Result<Vec<u8>, ExportError> {
    bundle_with(results, format, |markdown| {
        product_bytes(markdown, format, config)
    })
}

/// `bundle` with a caller-supplied product document builder
pub fn bundle_with<F>(
    results: &[GeneratedContent],
    format: ExportFormat,
    mut build_product: F,
) -> Result<Vec<u8>, ExportError>
where
    F: FnMut(&str) -> Result<Vec<u8>, ExportError>,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut folders = HashSet::new();

    for result in results {
        let folder = unique_folder(&result.idea, &mut folders);
        zip.add_directory(format!("{folder}/"), options)?;

        zip.start_file(format!("{folder}/{LISTING_FILE}"), options)?;
        zip.write_all(result.listing.to_text().as_bytes())?;

        match build_product(&result.product) {
            Ok(bytes) => {
                zip.start_file(
                    format!("{folder}/{PRODUCT_STEM}.{}", format.extension()),
                    options,
                )?;
                zip.write_all(&bytes)?;
            }
            Err(e) => {
                log::error!(
                    "Error creating {} for \"{}\": {e}",
                    format.extension(),
                    result.idea
                );
            }
        }
    }

    Ok(zip.finish()?.into_inner())
}

/// Folder name for an idea. Empty slugs fall back to `untitled`; repeats get
/// a numeric suffix.
fn unique_folder(idea: &str, taken: &mut HashSet<String>) -> String {
    let mut base = slugify(idea);
    if base.is_empty() {
        base = "untitled".to_string();
    }

    let mut name = base.clone();
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{base}-{n}");
        n += 1;
    }
    name
}
