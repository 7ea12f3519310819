//! provdoc: normalize provider reference docs from the command line.
//!
//! Two modes:
//!
//! - **stdin mode**: `provdoc < page.md` writes the rendering to stdout
//! - **file mode**: `provdoc -o out/ docs/r/*.html.markdown` writes one file per input

use anyhow::{bail, Context, Result};
use clap::Parser;
use provdoc::logger::init_logger;
use provdoc::render::{self, Renderer};
use provdoc::{CommandConverter, Config, Converter, Pipeline};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "provdoc",
    about = "Normalize provider reference documentation and assemble multi-language examples"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Base URL for site-relative links (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Target language for example conversion. Can be specified multiple times.
    #[arg(long = "language")]
    languages: Vec<String>,

    /// Entity name used in example identifiers in stdin mode
    #[arg(long, default_value = "stdin")]
    name: String,

    /// Debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let config = load_config(&cli)?;
    let converter = config.converter.as_ref().map(CommandConverter::from_config);
    let pipeline = Pipeline::new(config)?;
    let renderer = render::create_renderer(&cli.format)?;

    let converter = converter.as_ref().map(|c| c as &dyn Converter);
    if cli.files.is_empty() {
        return stdin_mode(&cli, &pipeline, converter, renderer.as_ref());
    }

    file_mode(&cli, &pipeline, converter, renderer.as_ref())
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    Ok(config)
}

/// stdin mode: read one page from stdin, write the rendering to stdout.
fn stdin_mode(
    cli: &Cli,
    pipeline: &Pipeline,
    converter: Option<&dyn Converter>,
    renderer: &dyn Renderer,
) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = pipeline.normalize(&input, &cli.name, converter);
    print!("{}", renderer.render(&doc)?);
    Ok(())
}

/// file mode: normalize every input in parallel, one output file each.
fn file_mode(
    cli: &Cli,
    pipeline: &Pipeline,
    converter: Option<&dyn Converter>,
    renderer: &dyn Renderer,
) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = collect_inputs(&cli.files)?;
    check_output_collisions(&input_files, renderer.file_extension())?;

    let rendered: Vec<(PathBuf, String)> = input_files
        .par_iter()
        .filter_map(|path| {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping unreadable file: {}", e);
                    return None;
                }
            };
            let name = derive_output_name(path);
            let doc = pipeline.normalize(&content, &name, converter);
            for diagnostic in &doc.diagnostics {
                tracing::info!(
                    example = %diagnostic.example,
                    language = %diagnostic.language,
                    "{}",
                    diagnostic.message
                );
            }
            let out_path = output_dir.join(format!("{}.{}", name, renderer.file_extension()));
            Some(
                renderer
                    .render(&doc)
                    .map(|output| (out_path, output))
                    .with_context(|| format!("failed to render {}", path.display())),
            )
        })
        .collect::<Result<_>>()?;

    for (out_path, output) in rendered {
        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        tracing::debug!(path = %out_path.display(), "wrote");
    }

    Ok(())
}

/// Fail when two inputs share a stem, e.g. `r/vpc.md` and `d/vpc.md`.
/// Checked up front so no output is written over another.
fn check_output_collisions(inputs: &[PathBuf], extension: &str) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for path in inputs {
        let name = derive_output_name(path);
        if let Some(previous) = seen.insert(name.clone(), path) {
            bail!(
                "{} and {} would both be written to {}.{}; use separate output directories",
                previous.display(),
                path.display(),
                name,
                extension
            );
        }
    }
    Ok(())
}

/// File suffixes recognized as documentation sources.
const SUPPORTED_SUFFIXES: &[&str] = &[".html.markdown", ".markdown", ".md"];

fn is_supported(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| SUPPORTED_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// Resolve the command-line inputs to documentation pages.
///
/// A file is taken as given, a directory contributes its pages (one level
/// deep) and anything else is a glob pattern. The result is sorted and free
/// of duplicates so runs are reproducible.
fn collect_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            pages.push(path.to_path_buf());
        } else if path.is_dir() {
            pages.extend(pages_in_dir(path)?);
        } else {
            let before = pages.len();
            pages.extend(
                glob::glob(pattern)
                    .with_context(|| format!("invalid glob pattern: {}", pattern))?
                    .filter_map(|entry| entry.ok())
                    .filter(|p| p.is_file()),
            );
            if pages.len() == before {
                tracing::warn!("no files matched: {}", pattern);
            }
        }
    }
    pages.sort();
    pages.dedup();
    Ok(pages)
}

fn pages_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_supported(p))
        .collect())
}

/// Derive the output file name (without extension) from a source path.
/// "website/docs/r/lambda_function.html.markdown" → "lambda_function"
fn derive_output_name(path: &Path) -> String {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    SUPPORTED_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))
        .unwrap_or(filename)
        .to_string()
}
