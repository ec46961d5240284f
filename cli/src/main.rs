use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pdf_lange::{DateRange, Flavor, Pages, Report, TableExtractor, collect_records};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableFlavor {
    /// Tables are grids of drawn lines
    Lattice,
    /// Tables are inferred from text alignment
    Stream,
}

impl From<TableFlavor> for Flavor {
    fn from(flavor: TableFlavor) -> Self {
        match flavor {
            TableFlavor::Lattice => Flavor::Lattice,
            TableFlavor::Stream => Flavor::Stream,
        }
    }
}

#[derive(Parser)]
#[command(name = "pdf-lange")]
#[command(about = "Sum the Länge values of PDF protocols", long_about = None)]
struct Args {
    /// Directory searched recursively for PDF files
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    directory: PathBuf,

    /// Only include protocols from this day (DD.MM.YYYY), or from this day on
    /// when END is given
    #[arg(value_name = "DATE")]
    date: Option<String>,

    /// Last day to include (DD.MM.YYYY)
    #[arg(value_name = "END")]
    end: Option<String>,

    /// Further arguments turn the date filter off
    #[arg(hide = true)]
    extra: Vec<String>,

    /// Password for encrypted PDFs
    #[arg(short, long)]
    password: Option<String>,

    /// Pages to read tables from, e.g. "1,3-5" or "2-end"
    #[arg(long, default_value = "all")]
    pages: String,

    /// How tables are located
    #[arg(short, long, value_enum, default_value_t = TableFlavor::Lattice)]
    flavor: TableFlavor,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging();

    let dates: Vec<&str> = if args.extra.is_empty() {
        args.date.iter().chain(args.end.iter()).map(String::as_str).collect()
    } else {
        debug!("{} positional arguments, not filtering by date", args.extra.len() + 3);
        Vec::new()
    };
    let range = match DateRange::from_args(dates.as_slice()) {
        Ok(range) => range,
        Err(e) => {
            debug!("{}", e);
            println!("Invalid date format. Use DD.MM.YYYY");
            std::process::exit(1);
        }
    };

    let pages: Pages = match args.pages.parse() {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut builder = TableExtractor::builder()
        .pages(pages)
        .flavor(args.flavor.into());
    if let Some(password) = args.password {
        builder = builder.password(password);
    }
    let extractor = builder.build();

    let collection = collect_records(&args.directory, range.as_ref(), &extractor);
    for (path, e) in &collection.failures {
        println!("Error processing {}: {}", path.display(), e);
    }

    let report = Report::new(collection.records);
    match report.render(range.as_ref()) {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("Error writing report: {}", e);
            std::process::exit(1);
        }
    }
}
