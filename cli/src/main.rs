//! pdf2office CLI - convert PDF content to Excel or Word

mod web;

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2office::{
    convert_bytes, ConvertOptions, ErrorKind, ExcelSource, ExtractOptions, Extractor,
    PageSelection, PdfExtractor,
};

/// Exit code when table mode finds nothing to convert.
const EXIT_NOTHING_TO_CONVERT: i32 = 2;

#[derive(Parser)]
#[command(name = "pdf2office")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert PDF content to Excel workbooks and Word documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to Excel (tables) or Word (text)
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "excel")]
        format: Format,

        /// Compress the output as converted.zip
        #[arg(short, long)]
        zip: bool,

        /// Excel only: write text lines instead of detected tables
        #[arg(long)]
        text: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output file (default: conventional name in the current directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Skip pages that fail to parse instead of aborting
        #[arg(long)]
        lenient: bool,
    },

    /// Print extracted lines or tables as JSON
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show detected tables instead of text lines
        #[arg(long)]
        tables: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Serve the conversion form over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = web::DEFAULT_ADDR)]
        addr: SocketAddr,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Excel workbook (.xlsx)
    Excel,
    /// Word document (.docx)
    Word,
}

impl From<Format> for pdf2office::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Excel => pdf2office::OutputFormat::Excel,
            Format::Word => pdf2office::OutputFormat::Word,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            format,
            zip,
            text,
            pages,
            output,
            lenient,
        } => {
            let request = ConvertRequest {
                format,
                zip,
                text,
                pages,
                lenient,
            };
            cmd_convert(&input, output.as_deref(), request)
        }
        Commands::Inspect {
            input,
            tables,
            pages,
        } => cmd_inspect(&input, tables, pages.as_deref()),
        Commands::Serve { addr } => cmd_serve(addr),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct ConvertRequest {
    format: Format,
    zip: bool,
    text: bool,
    pages: Option<String>,
    lenient: bool,
}

impl ConvertRequest {
    fn options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut extract = ExtractOptions::new().with_pages(parse_pages(self.pages.as_deref())?);
        if self.lenient {
            extract = extract.lenient();
        }
        let source = if self.text {
            ExcelSource::Text
        } else {
            ExcelSource::Tables
        };

        Ok(ConvertOptions::new()
            .with_format(self.format.into())
            .with_compress(self.zip)
            .with_excel_source(source)
            .with_extract_options(extract))
    }
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    Ok(match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    })
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    request: ConvertRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = request.options()?;
    let data = fs::read(input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting and converting...");

    let result = convert_bytes(&data, &options);
    pb.finish_and_clear();

    let download = match result {
        Ok(download) => download,
        Err(e) if e.kind() == ErrorKind::EmptyResult => {
            println!("{} {}", "Warning:".yellow().bold(), "No tables found in the PDF.");
            println!("  {}", "Try --text to convert the text lines instead.".dimmed());
            std::process::exit(EXIT_NOTHING_TO_CONVERT);
        }
        Err(e) => return Err(e.into()),
    };

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&download.filename));
    fs::write(&path, &download.bytes)?;

    if options.compress {
        println!("{}", "Conversion complete! File compressed as ZIP.".green().bold());
    } else {
        println!(
            "{}",
            format!("Conversion to {} complete!", options.format).green().bold()
        );
    }
    println!(
        "  {} {} ({} bytes)",
        "└─".dimmed(),
        path.display(),
        download.len()
    );

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    tables: bool,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new().lenient().with_pages(parse_pages(pages)?);
    let extractor = PdfExtractor::with_options(options);
    let data = fs::read(input)?;

    let json = if tables {
        serde_json::to_string_pretty(&extractor.extract_tables(&data)?)?
    } else {
        serde_json::to_string_pretty(&extractor.extract_lines(&data)?)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_serve(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} http://{}", "Serving form on".cyan(), addr);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(web::start_server(addr))?;

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2office".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Excel/Word converter");
    println!();
    println!("License: MIT");
}
