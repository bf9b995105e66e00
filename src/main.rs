//! Prepends generated pages to a PDF.
//!
//! ```bash
//! pdf-prepend toc.json report.pdf report-with-toc.pdf
//! pdf-prepend toc.json report.pdf out.pdf --count-only
//! RUST_LOG=debug pdf-prepend toc.json report.pdf out.pdf
//! ```

use clap::Parser;
use pdf_prepender::{DocumentBuilder, PrependConfig, PrependError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pdf-prepend", version, about = "Prepend generated pages with working links to a PDF")]
struct Cli {
    /// JSON specification of the pages to generate
    spec: PathBuf,
    /// The PDF to prepend to
    original: PathBuf,
    /// Where to write the result
    output: PathBuf,
    /// Only print how many pages would be prepended
    #[arg(long)]
    count_only: bool,
    /// Compress content streams in the output
    #[arg(long)]
    compress: bool,
}

fn run(cli: &Cli) -> Result<(), PrependError> {
    let builder = DocumentBuilder::from_json_file(&cli.spec)?
        .with_config(PrependConfig::default().with_compression(cli.compress));

    if cli.count_only {
        println!("{}", builder.prepend_page_count()?);
        return Ok(());
    }

    builder.build_to_file(&cli.original, &cli.output)?;
    println!("Successfully generated {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
