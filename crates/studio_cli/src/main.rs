use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use studio_core::{
    ARCHIVE_NAME, Config, DirectorySink, DownloadSink, ExportFormat, GeneratedContent, Listing,
};

#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Render and export generated product listings")]
struct Cli {
    /// Config file (defaults to studio.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown file
    Render {
        /// Input Markdown file
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = RenderFormat::Pdf)]
        format: RenderFormat,

        /// Output file (defaults to input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the plain-text export of a listing JSON file
    Listing {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Zip a JSON array of generated results, one folder per idea
    Bundle {
        input: PathBuf,

        /// Product content format (defaults to the config's export format)
        #[arg(short, long, value_enum)]
        format: Option<BundleFormat>,

        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print the filename slug for an idea
    Slug { idea: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderFormat {
    Pdf,
    Docx,
    Html,
    Txt,
    Svg,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            RenderFormat::Pdf => "pdf",
            RenderFormat::Docx => "docx",
            RenderFormat::Html => "html",
            RenderFormat::Txt => "txt",
            RenderFormat::Svg => "svg",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BundleFormat {
    Docx,
    Pdf,
}

impl From<BundleFormat> for ExportFormat {
    fn from(format: BundleFormat) -> Self {
        match format {
            BundleFormat::Docx => ExportFormat::Docx,
            BundleFormat::Pdf => ExportFormat::Pdf,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::try_load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(Path::new("studio.toml")),
    };

    match cli.command {
        Command::Render {
            input,
            format,
            output,
        } => render(&input, format, output, &config),
        Command::Listing { input, output } => listing(&input, output),
        Command::Bundle {
            input,
            format,
            output_dir,
        } => {
            let format = format.map(Into::into).unwrap_or(config.export.format);
            bundle(&input, format, &output_dir, &config)
        }
        Command::Slug { idea } => {
            println!("{}", studio_core::slugify(&idea));
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Deliver through a directory sink rooted at the output's parent
fn deliver(output: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid output path {}", output.display()))?;

    DirectorySink::new(dir).deliver(name, bytes)?;
    println!("Created {}", output.display());
    Ok(())
}

fn render(
    input: &Path,
    format: RenderFormat,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let markdown = read(input)?;
    let output = output.unwrap_or_else(|| input.with_extension(format.extension()));

    match format {
        RenderFormat::Pdf => {
            let bytes = studio_core::markdown_to_pdf_with_config(&markdown, config)?;
            deliver(&output, &bytes)
        }
        RenderFormat::Docx => deliver(&output, &studio_core::markdown_to_docx(&markdown)?),
        RenderFormat::Html => deliver(&output, studio_core::markdown_to_html(&markdown).as_bytes()),
        RenderFormat::Txt => {
            deliver(&output, studio_core::strip_markdown(&markdown).as_bytes())
        }
        RenderFormat::Svg => {
            let svg = studio_core::markdown_to_svg_with_config(&markdown, config)?;
            let stem = output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("page")
                .to_string();
            for (index, page) in svg.pages.iter().enumerate() {
                deliver(
                    &output.with_file_name(format!("{stem}-{}.svg", index + 1)),
                    page.as_bytes(),
                )?;
            }
            Ok(())
        }
    }
}

fn listing(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let listing = Listing::from_json(&read(input)?)
        .with_context(|| format!("parsing listing {}", input.display()))?;
    let output = output.unwrap_or_else(|| input.with_extension("txt"));
    deliver(&output, listing.to_text().as_bytes())
}

fn bundle(input: &Path, format: ExportFormat, output_dir: &Path, config: &Config) -> Result<()> {
    let results: Vec<GeneratedContent> = serde_json::from_str(&read(input)?)
        .with_context(|| format!("parsing results {}", input.display()))?;
    for result in &results {
        result.listing.check();
    }

    let bytes = studio_core::bundle(&results, format, config)?;
    deliver(&output_dir.join(ARCHIVE_NAME), &bytes)
}
