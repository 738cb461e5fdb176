//! pdftables CLI - PDF table extraction tool

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftables::extract::{extract_plaintext, page_fragments};
use pdftables::render::{to_json, to_text};
use pdftables::{
    CsvLayout, JsonFormat, PageSelection, ParseOptions, PdfDocument, PlainText, Table,
    TableOptions, TableReconstructor, TableWriter, DEFAULT_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "pdftables")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract tables from PDF page geometry to CSV", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output CSV file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct tables and write them out
    Extract(ExtractArgs),

    /// Print the text of each page, figures indented
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long, env = "PDFTABLES_PAGES")]
        pages: Option<String>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ExtractArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long, env = "PDFTABLES_PAGES")]
    pages: Option<String>,

    /// Row tolerance as a fraction of the row's Y coordinate
    #[arg(long, env = "PDFTABLES_TOLERANCE", default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f32,

    /// Write fragments in layout order without row reconstruction
    #[arg(long, conflicts_with = "format")]
    raw: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "records")]
    format: OutputFormat,

    /// Text node granularity
    #[arg(long, value_enum, default_value = "lines")]
    granularity: Granularity,

    /// Skip pages whose content cannot be decoded
    #[arg(long)]
    lenient: bool,
}

impl ExtractArgs {
    fn minimal(input: PathBuf, output: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            pages: None,
            tolerance: DEFAULT_TOLERANCE,
            raw: false,
            format: OutputFormat::Records,
            granularity: Granularity::Lines,
            lenient: false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// x0,y0,x1,y1,text per fragment
    Records,
    /// One CSV record per row
    Grid,
    /// Tables as JSON
    Json,
    /// Tab-separated rows
    Text,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Granularity {
    /// Group lines into text boxes
    Boxes,
    /// One node per text line
    Lines,
}

impl From<Granularity> for pdftables::Granularity {
    fn from(g: Granularity) -> Self {
        match g {
            Granularity::Boxes => pdftables::Granularity::Boxes,
            Granularity::Lines => pdftables::Granularity::Lines,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract(args)) => cmd_extract(&args),
        Some(Commands::Text { input, pages }) => cmd_text(&input, pages.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_extract(&ExtractArgs::minimal(input, cli.output))
            } else {
                println!("{}", "Usage: pdftables <FILE> [OUTPUT]".yellow());
                println!("       pdftables --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn page_selection(pages: Option<&str>) -> pdftables::Result<PageSelection> {
    pages.map_or(Ok(PageSelection::All), PageSelection::parse)
}

/// Page numbers of `doc` picked by its page selection.
fn selected_pages(doc: &PdfDocument) -> Vec<u32> {
    (1..=doc.page_count())
        .filter(|n| doc.options().pages.includes(*n))
        .collect()
}

fn cmd_extract(args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reconstructor =
        TableReconstructor::with_options(TableOptions::new().with_tolerance(args.tolerance))?;

    let mut options = ParseOptions::new()
        .with_pages(page_selection(args.pages.as_deref())?)
        .with_granularity(args.granularity.into());
    if args.lenient {
        options = options.lenient();
    }
    let doc = PdfDocument::open_with_options(&args.input, options)?;
    let pages = selected_pages(&doc);
    log::debug!(
        "Extracting {} of {} pages from {}",
        pages.len(),
        doc.page_count(),
        args.input.display()
    );

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let pb = if args.output.is_some() && pages.len() > 1 {
        let pb = ProgressBar::new(pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut tables = Vec::with_capacity(pages.len());
    let mut writer = TableWriter::new(sink);

    for number in pages {
        pb.set_message(format!("page {}", number));
        let page = doc.parse_page(number)?;

        if args.raw {
            writer.write_fragments(&page_fragments(&page))?;
        } else {
            let table = reconstructor.reconstruct(&page);
            match args.format {
                OutputFormat::Records => writer.write_table(&table, CsvLayout::Records)?,
                OutputFormat::Grid => writer.write_table(&table, CsvLayout::Grid)?,
                OutputFormat::Json | OutputFormat::Text => tables.push(table),
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut sink = writer.into_inner()?;
    if !args.raw {
        write_document(sink.as_mut(), &tables, args.format)?;
    }
    sink.flush()?;

    if let Some(path) = &args.output {
        println!("{} {}", "Saved to".green(), path.display());
    }

    Ok(())
}

/// Write whole-document formats, collected after all pages are parsed.
fn write_document(
    sink: &mut dyn Write,
    tables: &[Table],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => writeln!(sink, "{}", to_json(tables, JsonFormat::Pretty)?)?,
        OutputFormat::Text => writeln!(sink, "{}", to_text(tables))?,
        OutputFormat::Records | OutputFormat::Grid => {}
    }
    Ok(())
}

fn cmd_text(input: &Path, pages: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient: show what text there is even if some pages fail.
    let options = ParseOptions::new()
        .lenient()
        .with_pages(page_selection(pages)?);
    let doc = PdfDocument::open_with_options(input, options)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for page in doc.parse_pages()? {
        let header = format!("── Page {} ──", page.number);
        writeln!(out, "{}", header.as_str().dimmed())?;
        for item in extract_plaintext(&page.children) {
            print_plaintext(&mut out, &item, 0)?;
        }
    }

    Ok(())
}

fn print_plaintext(out: &mut impl Write, item: &PlainText, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match item {
        PlainText::Text(text) => {
            for line in text.lines() {
                writeln!(out, "{}{}", indent, line)?;
            }
        }
        PlainText::Group(items) => {
            writeln!(out, "{}{}", indent, "[figure]".dimmed())?;
            for child in items {
                print_plaintext(out, child, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient: metadata is still worth showing when page content fails.
    let doc = PdfDocument::open_with_options(input, ParseOptions::new().lenient())?;
    let metadata = doc.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Page Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let reconstructor = TableReconstructor::new();
    for page in doc.parse_pages()? {
        let table = reconstructor.reconstruct(&page);
        println!(
            "{} {:>4}: {:>5} fragments, {:>4} rows, {:>3} columns",
            "Page".bold(),
            page.number,
            table.fragment_count(),
            table.row_count(),
            table.column_count()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdftables".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF table extraction tool");
    println!();
    println!("Library: pdftables {}", env!("CARGO_PKG_VERSION"));
    println!("License: MIT");
}
