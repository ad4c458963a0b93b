mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "factura",
    version,
    about = "Extract invoice line items from scanned PDFs using OCR word coordinates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract table rows from a scanned invoice (PDF, Tesseract TSV or hOCR)
    Extract {
        /// Path to a PDF, a Tesseract .tsv file or an .hocr/.html file
        input_file: PathBuf,

        /// Predefined template: regal (default), goodyear, duca
        #[arg(short, long, value_name = "NAME", conflicts_with = "template_file")]
        template: Option<String>,

        /// Custom JSON template file
        #[arg(long = "template-file", value_name = "FILE")]
        template_file: Option<PathBuf>,

        /// Rasterization DPI for PDFs; for TSV/hOCR input, the DPI the page was scanned at
        #[arg(long)]
        dpi: Option<u32>,

        /// Tesseract language (e.g. eng, spa, eng+spa)
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Tesseract page segmentation mode (default 6, a single uniform block)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=13))]
        psm: Option<u8>,

        /// Output format: table, json or csv [default: table, or by --out extension]
        #[arg(short, long, value_parser = ["table", "json", "csv"])]
        output: Option<String>,

        /// Write the rows to a file; without -o, .csv writes CSV and anything else JSON
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print every warning, not just the count
        #[arg(long)]
        verbose: bool,
    },
    /// Manage and inspect layout templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },
}

#[derive(Subcommand)]
enum TemplatesAction {
    /// List predefined templates
    List,
    /// Explain a template's layout in plain language
    Explain {
        /// Preset name (e.g., "regal")
        preset: String,
    },
    /// Validate a custom template file
    Validate {
        /// Path to JSON template file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("factura=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            template,
            template_file,
            dpi,
            lang,
            psm,
            output,
            out,
            verbose,
        } => commands::extract::run(commands::extract::ExtractArgs {
            input_file,
            template,
            template_file,
            dpi,
            lang,
            psm,
            output,
            out,
            verbose,
        }),
        Commands::Templates { action } => match action {
            TemplatesAction::List => commands::templates::list(),
            TemplatesAction::Explain { preset } => commands::templates::explain(&preset),
            TemplatesAction::Validate { file } => commands::templates::validate(&file),
        }
        .map(|()| commands::Outcome::Done),
    };

    match result {
        Ok(commands::Outcome::Done) => ExitCode::SUCCESS,
        Ok(commands::Outcome::NoData) => {
            eprintln!("No data detected");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
