use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use label_2up::{render_label_pdf, render_single_label_pdf, Cli, FileDecoder, PdfPageWriter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = cli.pipeline_options();
    let decoder = FileDecoder::new(cli.pdfium_dir.clone());
    let writer = PdfPageWriter;
    let output_path = cli.output_path();

    let saved = if cli.single {
        let size = cli.label_size.size();
        render_single_label_pdf(
            &decoder,
            &writer,
            &cli.input,
            Some(output_path.as_path()),
            size,
            &options,
        )
        .with_context(|| {
            format!("Failed to produce {} label from {:?}", cli.label_size, cli.input)
        })?
    } else {
        render_label_pdf(
            &decoder,
            &writer,
            &cli.input,
            cli.input2.as_deref(),
            Some(output_path.as_path()),
            &options,
        )
        .with_context(|| format!("Failed to produce label page from {:?}", cli.input))?
    };

    println!("Label saved to: {}", saved.display());

    Ok(())
}
