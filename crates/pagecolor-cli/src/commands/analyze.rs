//! Analyze command - classify every page of a single PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use pagecolor_core::models::BackendKind;
use pagecolor_core::{
    AnalyzerConfig, CancelFlag, DocumentScanner, EmbeddedImageBackend, PageColorError,
    RasterBackend, ScanResult,
};

use super::load_config;

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Rasterizer backend (overrides the config file)
    #[arg(short, long, value_enum)]
    backend: Option<BackendArg>,

    /// Rendering resolution in DPI (overrides the config file)
    #[arg(long)]
    dpi: Option<u32>,

    /// Directory containing the pdfium library
    #[arg(long)]
    pdfium_dir: Option<PathBuf>,

    /// Do not show a progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON output
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendArg {
    /// Render pages with pdfium
    Pdfium,
    /// Use the pages' embedded images (no native library needed)
    Embedded,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Pdfium => BackendKind::Pdfium,
            BackendArg::Embedded => BackendKind::Embedded,
        }
    }
}

/// JSON report for one analyzed file.
#[derive(Serialize)]
struct AnalysisReport<'a> {
    file: String,
    total_pages: u32,
    color_pages: &'a [u32],
    monochrome_pages: &'a [u32],
    color_ranges: String,
    monochrome_ranges: String,
    summary: String,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(backend) = args.backend {
        config.render.backend = backend.into();
    }
    if let Some(dpi) = args.dpi {
        config.render.dpi = dpi;
    }
    if let Some(dir) = &args.pdfium_dir {
        config.render.pdfium_library_dir = Some(dir.clone());
    }
    config.validate()?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let is_pdf = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        anyhow::bail!("Please select a PDF file.");
    }

    info!("Analyzing PDF: {}", args.input.display());

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages")?
            .progress_chars("##-"),
    );

    // Ctrl-C stops the scan before its next page
    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let (tx, mut rx) = unbounded_channel();
    let input = args.input.clone();
    let handle = tokio::task::spawn_blocking(move || scan_file(&input, &config, cancel, tx));

    while let Some((done, total)) = rx.recv().await {
        pb.set_length(u64::from(total));
        pb.set_position(u64::from(done));
    }

    let result = match handle.await? {
        Ok(result) => result,
        Err(PageColorError::Cancelled { completed, total }) => {
            pb.abandon();
            anyhow::bail!("Analysis cancelled after {} of {} pages", completed, total);
        }
        Err(e) => {
            pb.abandon();
            anyhow::bail!("An error occurred: {}", e);
        }
    };
    pb.finish_and_clear();

    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = match args.format {
        OutputFormat::Text => format_text(&file_name, &result),
        OutputFormat::Json => format_json(&file_name, &result)?,
    };

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Runs on a blocking worker; progress goes back over `progress`.
fn scan_file(
    input: &Path,
    config: &AnalyzerConfig,
    cancel: CancelFlag,
    progress: UnboundedSender<(u32, u32)>,
) -> pagecolor_core::Result<ScanResult> {
    match config.render.backend {
        BackendKind::Pdfium => {
            #[cfg(feature = "pdfium")]
            {
                use pagecolor_core::{PdfError, PdfiumBackend};

                match PdfiumBackend::bind(
                    config.render.pdfium_library_dir.as_deref(),
                    config.render.dpi,
                ) {
                    Ok(backend) => return scan_with(backend, input, config, cancel, &progress),
                    Err(PdfError::BackendUnavailable(reason)) => {
                        warn!(
                            "pdfium not available ({}), falling back to embedded images",
                            reason
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            #[cfg(not(feature = "pdfium"))]
            {
                warn!("Built without pdfium support, falling back to embedded images");
            }

            scan_with(EmbeddedImageBackend::new(), input, config, cancel, &progress)
        }
        BackendKind::Embedded => {
            scan_with(EmbeddedImageBackend::new(), input, config, cancel, &progress)
        }
    }
}

fn scan_with<B: RasterBackend>(
    backend: B,
    input: &Path,
    config: &AnalyzerConfig,
    cancel: CancelFlag,
    progress: &UnboundedSender<(u32, u32)>,
) -> pagecolor_core::Result<ScanResult> {
    let scanner = DocumentScanner::new(backend)
        .with_classifier_config(&config.classifier)
        .with_cancel_flag(cancel);

    let report = |done: u32, total: u32| {
        // The receiver only goes away when the command is already failing.
        let _ = progress.send((done, total));
    };
    scanner.scan_with_progress(input, &report)
}

fn format_text(file_name: &str, result: &ScanResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Analysis complete: {}\n", file_name));
    if result.is_empty() {
        output.push_str(&format!("{}\n", style(result.summary()).yellow()));
        return output;
    }

    output.push_str(&format!("Total pages: {}\n", result.total_pages));
    output.push_str(&format!("Color pages: {}\n", result.color_count()));
    output.push('\n');
    for line in result.summary_lines() {
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn format_json(file_name: &str, result: &ScanResult) -> anyhow::Result<String> {
    let report = AnalysisReport {
        file: file_name.to_string(),
        total_pages: result.total_pages,
        color_pages: &result.color_pages,
        monochrome_pages: &result.monochrome_pages,
        color_ranges: result.color_ranges(),
        monochrome_ranges: result.monochrome_ranges(),
        summary: result.summary(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
